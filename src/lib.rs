// src/lib.rs

//! Core of a dependency-graph task runner.
//!
//! A [`TaskNode`](task::TaskNode) declares its prerequisites, remembers
//! whether it already succeeded (as a marker file under a progress root,
//! optionally expiring), and carries a [`FailBehaviour`](task::FailBehaviour)
//! for the scheduler to act on. [`dag::Runner`] is a simple sequential
//! scheduler built on top of that contract.

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod progress;
pub mod registry;
pub mod task;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::{CliArgs, Command, MarkerArgs};
use crate::config::load_and_validate;
use crate::task::{CompletionStore, Context, NamedTask, Task, TaskNode};

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config;
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {:?}", config_path))?;

    let store_config = cfg.store_config(&config_root_dir(&config_path));
    debug!(root = ?store_config.root, layout = ?store_config.layout, "completion store");
    let store = Arc::new(CompletionStore::new(store_config));

    match args.command {
        Command::Path(marker) => {
            let task = marker_task(&store, &marker, None);
            println!("{}", task.marker_path().display());
        }
        Command::Status { marker, expiration } => {
            let task = marker_task(&store, &marker, expiration.map(Duration::from_secs));
            let done = task.already_processed()?;
            println!(
                "{}: {}",
                task.name(),
                if done { "processed" } else { "pending" }
            );
        }
        Command::Mark(marker) => {
            let task = marker_task(&store, &marker, None);
            task.mark_success()?;
            println!("{}", task.marker_path().display());
        }
        Command::Clear(marker) => {
            let task = marker_task(&store, &marker, None);
            store.clear(&task.marker_path())?;
        }
    }

    Ok(())
}

/// Stand-in node for a task that is only known by name.
fn marker_task(
    store: &Arc<CompletionStore>,
    marker: &MarkerArgs,
    expiration: Option<Duration>,
) -> Task {
    let mut work = NamedTask::new(&marker.task);
    if let Some(expiration) = expiration {
        work = work.with_expiration(expiration);
    }

    let task = TaskNode::new(work, Arc::clone(store)).shared();
    if let Some(ref name) = marker.context {
        task.set_context(Context::shared(name));
    }
    task
}

/// Directory relative progress roots are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "build/unibuild.toml"),
///   we use that directory.
/// - If it's just a bare filename like "unibuild.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
