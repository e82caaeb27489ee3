// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{Result, UnibuildError};

/// Check the invariants serde cannot express on its own.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_progress_root(cfg)?;
    Ok(())
}

fn validate_progress_root(cfg: &ConfigFile) -> Result<()> {
    if cfg.paths.progress.as_os_str().is_empty() {
        return Err(UnibuildError::Config(
            "[paths].progress must not be empty".to_string(),
        ));
    }
    Ok(())
}
