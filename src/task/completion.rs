// src/task/completion.rs

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::config::{ProgressLayout, StoreConfig};
use crate::errors::{Result, UnibuildError};

/// Filesystem-backed record of which tasks succeeded in which context.
///
/// Each (context, task) pair maps to one zero-byte marker file; its
/// modification time is the time of the last success. Nothing is cached, so
/// a marker written by [`mark`](Self::mark) is visible to the very next
/// [`is_complete`](Self::is_complete) call.
#[derive(Debug, Clone)]
pub struct CompletionStore {
    config: StoreConfig,
}

impl CompletionStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn layout(&self) -> ProgressLayout {
        self.config.layout
    }

    /// Derive the marker location for `task_name` within `context_name`.
    ///
    /// Without a context the sanitized task name doubles as the scope.
    pub fn marker_path(&self, context_name: Option<&str>, task_name: &str) -> PathBuf {
        let task_token = sanitize(task_name);
        let scope_token = context_name.unwrap_or(&task_token);

        match self.config.layout {
            ProgressLayout::Folders => self
                .config
                .root
                .join(scope_token)
                .join(format!("{task_token}_complete.txt")),
            ProgressLayout::Flat => self
                .config
                .root
                .join(format!("{scope_token}_complete_{task_token}.txt")),
        }
    }

    /// Whether a marker exists at `path` and is still fresh.
    ///
    /// With a non-zero `expiration`, the marker is valid only while
    /// `mtime + expiration` lies strictly in the future. A missing marker
    /// (or missing progress root) simply means "not complete".
    pub fn is_complete(&self, path: &Path, expiration: Option<Duration>) -> Result<bool> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(marker = ?path, "no completion marker");
                return Ok(false);
            }
            Err(source) => {
                return Err(UnibuildError::PersistenceFailure {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        // A zero expiration means "no expiration", like an absent one.
        let Some(expiration) = expiration.filter(|d| !d.is_zero()) else {
            return Ok(true);
        };

        let modified = metadata
            .modified()
            .map_err(|source| UnibuildError::PersistenceFailure {
                path: path.to_path_buf(),
                source,
            })?;

        let fresh = match modified.checked_add(expiration) {
            Some(valid_until) => valid_until > SystemTime::now(),
            // Too far in the future to represent: never stale.
            None => true,
        };

        debug!(marker = ?path, ?expiration, fresh, "checked completion marker age");
        Ok(fresh)
    }

    /// Write (or refresh) the marker at `path`, creating parent directories.
    pub fn mark(&self, path: &Path) -> Result<()> {
        let persist_err = |source: std::io::Error| UnibuildError::PersistenceFailure {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        let file = File::create(path).map_err(persist_err)?;
        // Truncating an already-empty file does not reliably bump mtime.
        file.set_modified(SystemTime::now()).map_err(persist_err)?;

        info!(marker = ?path, "recorded task success");
        Ok(())
    }

    /// Remove the marker at `path`. Removing a marker that does not exist is
    /// not an error.
    pub fn clear(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(marker = ?path, "removed completion marker");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(UnibuildError::PersistenceFailure {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Replace path separators and spaces so a task name is usable as a file
/// name component.
fn sanitize(task_name: &str) -> String {
    task_name.replace(['/', '\\', ' '], "_")
}
