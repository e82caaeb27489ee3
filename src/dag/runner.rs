// src/dag/runner.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::dag::graph::collect;
use crate::errors::{Result, UnibuildError};
use crate::progress::Progress;
use crate::task::{FailBehaviour, Parameters, Task, TaskNode};

/// What happened to a single task during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// `process` ran and the success was recorded.
    Processed,
    /// A fresh marker from an earlier run was found; only `prepare` ran.
    AlreadyProcessed,
    /// The task filtered itself out via `applies`.
    NotApplicable,
    /// Its context was abandoned by an earlier `SkipProject` failure.
    Skipped,
    /// A dependency did not succeed, or the task reported itself unfulfilled.
    Blocked,
    Failed,
}

impl TaskOutcome {
    /// Whether dependents may proceed after this outcome.
    pub fn satisfies_dependents(self) -> bool {
        matches!(
            self,
            TaskOutcome::Processed | TaskOutcome::AlreadyProcessed | TaskOutcome::NotApplicable
        )
    }
}

/// A failure that the task's fail behaviour allowed the run to survive.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: String,
    pub behaviour: FailBehaviour,
    pub error: UnibuildError,
}

/// Per-task outcomes of one run, in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<(String, TaskOutcome)>,
    failures: Vec<TaskFailure>,
}

impl RunReport {
    pub fn outcomes(&self) -> &[(String, TaskOutcome)] {
        &self.outcomes
    }

    pub fn failures(&self) -> &[TaskFailure] {
        &self.failures
    }

    /// Outcome of the first task called `name`.
    pub fn outcome_of(&self, name: &str) -> Option<TaskOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| *o)
    }

    /// Names of the tasks that ended with `outcome`, in execution order.
    pub fn tasks_with(&self, outcome: TaskOutcome) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential scheduler for a forest of task nodes.
///
/// Tasks run one at a time, dependencies first. Each task is driven through
/// `fulfilled` → `already_processed` → `prepare` → `process` →
/// `mark_success`. An error from any of these steps is handled according to
/// the task's [`FailBehaviour`]:
///
/// - `Fail`: the run stops and the error is returned.
/// - `Continue`: the failure is recorded; dependents are blocked.
/// - `SkipProject`: the failure is recorded and every later task in the same
///   context is skipped.
#[derive(Debug, Default)]
pub struct Runner {
    parameters: Parameters,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters handed to each task's `applies` hook.
    pub fn with_parameters(parameters: Parameters) -> Self {
        Self { parameters }
    }

    pub fn run(&self, roots: &[Task], progress: &mut dyn Progress) -> Result<RunReport> {
        let order = collect(roots)?;
        info!(tasks = order.len(), "starting run");

        let mut states: HashMap<*const TaskNode, TaskOutcome> = HashMap::new();
        let mut abandoned: HashSet<Scope> = HashSet::new();
        let mut report = RunReport::default();

        for task in order {
            let outcome = match self.drive(&task, &states, &abandoned, progress) {
                Ok(outcome) => outcome,
                Err(err) => {
                    let behaviour = task.fail_behaviour();
                    match behaviour {
                        FailBehaviour::Fail => {
                            error!(task = %task.name(), error = %err, "task failed; aborting run");
                            return Err(err);
                        }
                        FailBehaviour::Continue => {
                            warn!(task = %task.name(), error = %err, "task failed; continuing");
                        }
                        FailBehaviour::SkipProject => {
                            let scope = Scope::of(&task);
                            warn!(
                                task = %task.name(),
                                ?scope,
                                error = %err,
                                "task failed; skipping the rest of its context"
                            );
                            abandoned.insert(scope);
                        }
                    }
                    report.failures.push(TaskFailure {
                        task: task.name().to_string(),
                        behaviour,
                        error: err,
                    });
                    TaskOutcome::Failed
                }
            };

            debug!(task = %task.name(), ?outcome, "task settled");
            states.insert(Arc::as_ptr(&task), outcome);
            report.outcomes.push((task.name().to_string(), outcome));
        }

        info!(
            tasks = report.outcomes.len(),
            failures = report.failures.len(),
            "run finished"
        );
        Ok(report)
    }

    fn drive(
        &self,
        task: &Task,
        states: &HashMap<*const TaskNode, TaskOutcome>,
        abandoned: &HashSet<Scope>,
        progress: &mut dyn Progress,
    ) -> Result<TaskOutcome> {
        if task.applies(&self.parameters) == Some(false) {
            debug!(task = %task.name(), "task does not apply to this run");
            return Ok(TaskOutcome::NotApplicable);
        }

        if abandoned.contains(&Scope::of(task)) {
            return Ok(TaskOutcome::Skipped);
        }

        let blocked = task.dependencies().iter().any(|dep| {
            states
                .get(&Arc::as_ptr(dep))
                .is_some_and(|o| !o.satisfies_dependents())
        });
        if blocked {
            debug!(task = %task.name(), "a dependency did not succeed");
            return Ok(TaskOutcome::Blocked);
        }

        if !task.fulfilled()? {
            warn!(task = %task.name(), "task not fulfilled; not running it");
            return Ok(TaskOutcome::Blocked);
        }

        let already = task.already_processed()?;
        task.prepare()?;

        if already {
            info!(task = %task.name(), "already processed");
            return Ok(TaskOutcome::AlreadyProcessed);
        }

        info!(task = %task.name(), "processing");
        progress.set_job(task.name());
        task.process(progress)?;
        progress.finish();
        task.mark_success()?;

        Ok(TaskOutcome::Processed)
    }
}

/// What a `SkipProject` failure abandons.
///
/// Contextless tasks are their own scope, kept apart from context names so
/// a task called `a` never shadows a context called `a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Scope {
    Context(String),
    Task(*const TaskNode),
}

impl Scope {
    fn of(task: &TaskNode) -> Self {
        match task.context() {
            Some(ctx) => Scope::Context(ctx.name().to_string()),
            None => Scope::Task(task as *const TaskNode),
        }
    }
}
