// src/task/context.rs

use std::fmt;
use std::sync::Arc;

/// A named execution scope (typically one project) shared by every task
/// working on it. Its name namespaces the completion markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
    name: String,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Convenience for the common case of handing the same scope to many nodes.
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
