// src/task/mod.rs

//! The dependency-graph node and everything it carries.
//!
//! - [`node`] holds [`TaskNode`], the vertex a scheduler drives.
//! - [`work`] is the trait concrete tasks implement ([`TaskWork`]).
//! - [`completion`] persists "this task succeeded in this context" as
//!   marker files.
//! - [`fail_behaviour`] is the policy a scheduler reads on failure.
//! - [`context`] is the shared execution scope.

pub mod completion;
pub mod context;
pub mod fail_behaviour;
pub mod node;
pub mod work;

pub use completion::CompletionStore;
pub use context::Context;
pub use fail_behaviour::FailBehaviour;
pub use node::{Task, TaskNode};
pub use work::{NamedTask, Parameters, TaskWork};
