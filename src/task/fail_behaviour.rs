// src/task/fail_behaviour.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::UnibuildError;

/// How the scheduler should react when a task fails.
///
/// The node only stores this value. Enforcing it is the scheduler's job
/// (see [`Runner`](crate::dag::Runner) for one that does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailBehaviour {
    /// Abort the entire run.
    #[default]
    Fail,
    /// Record the failure; independent branches keep going.
    Continue,
    /// Abandon the rest of the failed task's context; other contexts continue.
    SkipProject,
}

impl FailBehaviour {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailBehaviour::Fail => "fail",
            FailBehaviour::Continue => "continue",
            FailBehaviour::SkipProject => "skip_project",
        }
    }
}

impl fmt::Display for FailBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailBehaviour {
    type Err = UnibuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail" => Ok(FailBehaviour::Fail),
            "continue" => Ok(FailBehaviour::Continue),
            "skip_project" => Ok(FailBehaviour::SkipProject),
            other => Err(UnibuildError::InvalidFailBehaviour(other.to_string())),
        }
    }
}

/// Legacy numeric codes: 1 = fail, 2 = continue, 3 = skip project.
impl TryFrom<u8> for FailBehaviour {
    type Error = UnibuildError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(FailBehaviour::Fail),
            2 => Ok(FailBehaviour::Continue),
            3 => Ok(FailBehaviour::SkipProject),
            other => Err(UnibuildError::InvalidFailBehaviour(other.to_string())),
        }
    }
}
