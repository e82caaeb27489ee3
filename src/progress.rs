// src/progress.rs

//! Progress reporting handles passed to [`TaskWork::process`](crate::task::TaskWork::process).
//!
//! The scheduler owns the handle; tasks only push updates into it.

use tracing::{debug, info};

/// Sink for progress updates from a running task.
pub trait Progress: Send {
    /// Name of the job currently being worked on.
    fn set_job(&mut self, job: &str);

    fn set_maximum(&mut self, maximum: u64);

    fn set_value(&mut self, value: u64);

    fn finish(&mut self);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn set_job(&mut self, _job: &str) {}
    fn set_maximum(&mut self, _maximum: u64) {}
    fn set_value(&mut self, _value: u64) {}
    fn finish(&mut self) {}
}

/// Forwards updates to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct LogProgress {
    job: String,
    maximum: u64,
    value: u64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn maximum(&self) -> u64 {
        self.maximum
    }
}

impl Progress for LogProgress {
    fn set_job(&mut self, job: &str) {
        self.job = job.to_string();
        self.maximum = 0;
        self.value = 0;
        info!(job = %self.job, "started");
    }

    fn set_maximum(&mut self, maximum: u64) {
        self.maximum = maximum;
    }

    fn set_value(&mut self, value: u64) {
        self.value = value;
        debug!(job = %self.job, value, maximum = self.maximum, "progress");
    }

    fn finish(&mut self) {
        self.value = self.maximum;
        debug!(job = %self.job, "finished");
    }
}
