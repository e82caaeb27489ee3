// src/registry.rs

//! Name → task lookup used when a dependency is given by name.

use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::{Result, UnibuildError};
use crate::task::Task;

/// Resolves task names to nodes.
pub trait TaskRegistry {
    fn get(&self, name: &str) -> Option<Task>;
}

/// Simple in-memory registry keyed by task name.
///
/// Names are unique, which also keeps completion markers unique within a
/// context.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    tasks: BTreeMap<String, Task>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: Task) -> Result<()> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(UnibuildError::DuplicateTask(name));
        }
        debug!(task = %name, "registered task");
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskRegistry for MemoryRegistry {
    fn get(&self, name: &str) -> Option<Task> {
        self.tasks.get(name).cloned()
    }
}
