// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnibuildError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A dependency given by name could not be resolved by the registry.
    #[error("unknown task \"{0}\"")]
    UnknownDependency(String),

    #[error("task \"{0}\" is already registered")]
    DuplicateTask(String),

    #[error("cyclic dependency involving task \"{0}\"")]
    CyclicDependency(String),

    #[error("invalid fail behaviour: {0} (expected \"fail\", \"continue\" or \"skip_project\")")]
    InvalidFailBehaviour(String),

    /// The completion marker could not be written or inspected.
    #[error("failed to persist completion marker at {path:?}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Error raised by a task's own `prepare` or `process` step.
    #[error("task \"{task}\" failed: {source:#}")]
    ProcessingFailure {
        task: String,
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, UnibuildError>;
