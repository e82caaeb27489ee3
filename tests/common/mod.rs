#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use tracing_subscriber::{EnvFilter, fmt};
use unibuild::config::{ProgressLayout, StoreConfig};
use unibuild::progress::Progress;
use unibuild::task::{CompletionStore, NamedTask, Parameters, Task, TaskNode, TaskWork};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs are captured per-test and only shown for failing tests (unless run
/// with `-- --nocapture`). Enable levels with e.g. `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

pub fn store(root: &Path, layout: ProgressLayout) -> Arc<CompletionStore> {
    Arc::new(CompletionStore::new(StoreConfig::new(root, layout)))
}

/// Plain named node with no work attached.
pub fn node(name: &str, store: &Arc<CompletionStore>) -> Task {
    TaskNode::new(NamedTask::new(name), Arc::clone(store)).shared()
}

/// Node around a [`ScriptedTask`].
pub fn scripted(work: ScriptedTask, store: &Arc<CompletionStore>) -> Task {
    TaskNode::new(work, Arc::clone(store)).shared()
}

/// Shared, ordered log of lifecycle calls across several tasks.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Task whose hooks record themselves in a [`CallLog`] and can be told to
/// fail or to filter themselves out.
pub struct ScriptedTask {
    name: String,
    log: CallLog,
    fail_process: bool,
    fulfilled: bool,
    applies: Option<bool>,
}

impl ScriptedTask {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
            fail_process: false,
            fulfilled: true,
            applies: None,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_process = true;
        self
    }

    pub fn unfulfilled(mut self) -> Self {
        self.fulfilled = false;
        self
    }

    pub fn with_applies(mut self, applies: bool) -> Self {
        self.applies = Some(applies);
        self
    }

    fn record(&self, what: &str) {
        self.log.lock().unwrap().push(format!("{what}:{}", self.name));
    }
}

impl TaskWork for ScriptedTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies(&self, _parameters: &Parameters) -> Option<bool> {
        self.applies
    }

    fn fulfilled(&self) -> bool {
        self.fulfilled
    }

    fn prepare(&self) -> anyhow::Result<()> {
        self.record("prepare");
        Ok(())
    }

    fn process(&self, progress: &mut dyn Progress) -> anyhow::Result<()> {
        self.record("process");
        progress.set_maximum(1);
        if self.fail_process {
            anyhow::bail!("{} exploded", self.name);
        }
        progress.set_value(1);
        Ok(())
    }
}
