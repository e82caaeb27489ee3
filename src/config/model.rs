// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// progress_method = "folders"
///
/// [paths]
/// progress = "progress"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Filesystem locations from `[paths]`.
    pub paths: PathsSection,

    /// `"folders"` selects one directory per context; anything else (or no
    /// value at all) selects the flat layout.
    #[serde(default)]
    pub progress_method: Option<String>,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Root directory for completion markers.
    pub progress: PathBuf,
}

impl ConfigFile {
    /// Layout selected by `progress_method`.
    pub fn layout(&self) -> ProgressLayout {
        ProgressLayout::from_method(self.progress_method.as_deref())
    }

    /// Build the settings handed to a [`CompletionStore`](crate::task::CompletionStore).
    ///
    /// A relative `paths.progress` is resolved against `base_dir`, which is
    /// normally the directory holding the config file.
    pub fn store_config(&self, base_dir: &Path) -> StoreConfig {
        let root = if self.paths.progress.is_absolute() {
            self.paths.progress.clone()
        } else {
            base_dir.join(&self.paths.progress)
        };

        StoreConfig {
            root,
            layout: self.layout(),
        }
    }
}

/// How completion markers are arranged below the progress root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressLayout {
    /// `<root>/<scope>/<task>_complete.txt`
    Folders,
    /// `<root>/<scope>_complete_<task>.txt`
    #[default]
    Flat,
}

impl ProgressLayout {
    /// Map the `progress_method` option onto a layout.
    ///
    /// Only an exact `"folders"` selects [`ProgressLayout::Folders`].
    pub fn from_method(method: Option<&str>) -> Self {
        match method {
            Some("folders") => ProgressLayout::Folders,
            _ => ProgressLayout::Flat,
        }
    }
}

/// Explicit settings for a completion store: where markers live and how
/// they are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub layout: ProgressLayout,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>, layout: ProgressLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }
}
