// src/task/work.rs

use std::collections::BTreeMap;
use std::time::Duration;

use crate::progress::Progress;

/// Scheduler-supplied parameters a task may use to filter itself in or out.
pub type Parameters = BTreeMap<String, String>;

/// The part of a task that concrete build steps provide.
///
/// A [`TaskNode`](crate::task::TaskNode) wraps one of these and adds the
/// dependency linkage, context and completion tracking. Only [`name`] is
/// required; every other hook has a neutral default.
///
/// [`name`]: TaskWork::name
pub trait TaskWork: Send + Sync {
    /// Stable identifier, used for registry lookup and marker paths.
    fn name(&self) -> &str;

    /// How long a persisted success stays valid. `None` means forever.
    fn expiration(&self) -> Option<Duration> {
        None
    }

    /// Whether this task takes part in a run with the given parameters.
    /// `None` means "no opinion".
    fn applies(&self, _parameters: &Parameters) -> Option<bool> {
        None
    }

    /// The task's own readiness, on top of its dependencies.
    fn fulfilled(&self) -> bool {
        true
    }

    /// Cheap initialisation that dependents rely on. Runs even when the
    /// task's success was loaded from a previous run.
    fn prepare(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// The actual work.
    fn process(&self, _progress: &mut dyn Progress) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A task that does nothing but carry a name.
///
/// Useful for aggregation nodes (usually made `dummy()`) and for poking at
/// markers of tasks that are not otherwise loaded.
#[derive(Debug, Clone)]
pub struct NamedTask {
    name: String,
    expiration: Option<Duration>,
}

impl NamedTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expiration: None,
        }
    }

    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

impl TaskWork for NamedTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn expiration(&self) -> Option<Duration> {
        self.expiration
    }
}
