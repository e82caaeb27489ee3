// src/task/node.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::errors::{Result, UnibuildError};
use crate::progress::Progress;
use crate::registry::TaskRegistry;
use crate::task::completion::CompletionStore;
use crate::task::context::Context;
use crate::task::fail_behaviour::FailBehaviour;
use crate::task::work::{Parameters, TaskWork};

/// Shared handle to a node. A node may be the dependency of many others.
pub type Task = Arc<TaskNode>;

/// Identity of a node on the current traversal path.
type PathEntry = *const TaskNode;

/// A vertex in the dependency graph.
///
/// The node knows its dependencies, its context and whether it already
/// succeeded; it never calls into a scheduler. A scheduler pulls state from
/// it and drives the lifecycle:
///
/// 1. `fulfilled()` before anything else,
/// 2. `already_processed()`,
/// 3. `prepare()` (always, even when already processed),
/// 4. `process()` unless already processed,
/// 5. `mark_success()` after a successful `process()`.
///
/// The order among sibling dependencies is not guaranteed; independent
/// branches may run concurrently. Query methods are safe to call from
/// several threads as long as nobody is calling `depend_on*` or
/// `set_context` on the same node, which belong to the single-threaded
/// graph construction phase.
///
/// The graph is expected to be acyclic. Traversals (`depends_on`,
/// `fulfilled`) track the current path and return
/// [`UnibuildError::CyclicDependency`] instead of recursing forever.
pub struct TaskNode {
    work: Box<dyn TaskWork>,
    store: Arc<CompletionStore>,
    dependencies: RwLock<Vec<Task>>,
    context: OnceLock<Arc<Context>>,
    fail_behaviour: FailBehaviour,
    dummy: bool,
}

impl TaskNode {
    pub fn new(work: impl TaskWork + 'static, store: Arc<CompletionStore>) -> Self {
        Self::from_boxed(Box::new(work), store)
    }

    pub fn from_boxed(work: Box<dyn TaskWork>, store: Arc<CompletionStore>) -> Self {
        Self {
            work,
            store,
            dependencies: RwLock::new(Vec::new()),
            context: OnceLock::new(),
            fail_behaviour: FailBehaviour::default(),
            dummy: false,
        }
    }

    /// Never persist success for this node. Used for nodes that only group
    /// dependencies.
    pub fn dummy(mut self) -> Self {
        self.dummy = true;
        self
    }

    pub fn set_fail_behaviour(mut self, behaviour: FailBehaviour) -> Self {
        self.fail_behaviour = behaviour;
        self
    }

    /// Finish building and turn the node into a shareable [`Task`].
    pub fn shared(self) -> Task {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        self.work.name()
    }

    pub fn work(&self) -> &dyn TaskWork {
        self.work.as_ref()
    }

    pub fn fail_behaviour(&self) -> FailBehaviour {
        self.fail_behaviour
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy
    }

    pub fn context(&self) -> Option<&Arc<Context>> {
        self.context.get()
    }

    pub fn expiration(&self) -> Option<Duration> {
        self.work.expiration()
    }

    /// Snapshot of the direct dependencies, in insertion order.
    pub fn dependencies(&self) -> Vec<Task> {
        self.read_deps().clone()
    }

    /// Attach `task` as a dependency.
    ///
    /// If this node already has a context, the dependency receives it too
    /// (unless it already has one of its own).
    pub fn depend_on(&self, task: Task) -> &Self {
        if let Some(ctx) = self.context() {
            task.set_context(Arc::clone(ctx));
        }
        debug!(task = %self.name(), dependency = %task.name(), "attached dependency");
        self.write_deps().push(task);
        self
    }

    /// Attach the task called `name`, as resolved by `registry`.
    ///
    /// The resolved task keeps whatever context it has; nothing is
    /// propagated at this point.
    pub fn depend_on_named(&self, name: &str, registry: &dyn TaskRegistry) -> Result<&Self> {
        let task = registry
            .get(name)
            .ok_or_else(|| UnibuildError::UnknownDependency(name.to_string()))?;
        debug!(task = %self.name(), dependency = %name, "attached dependency by name");
        self.write_deps().push(task);
        Ok(self)
    }

    /// Assign the context if none is set yet, then hand it to every current
    /// dependency. Later calls are ignored, whatever context they carry.
    pub fn set_context(&self, context: Arc<Context>) {
        if self.context.set(Arc::clone(&context)).is_err() {
            return;
        }
        debug!(task = %self.name(), context = %context, "context assigned");
        for dep in self.dependencies() {
            dep.set_context(Arc::clone(&context));
        }
    }

    /// Whether any direct or transitive dependency is called `name`.
    pub fn depends_on(&self, name: &str) -> Result<bool> {
        let mut path = vec![self as PathEntry];
        self.depends_on_inner(name, &mut path)
    }

    fn depends_on_inner(&self, name: &str, path: &mut Vec<PathEntry>) -> Result<bool> {
        for dep in self.dependencies() {
            if dep.name() == name {
                return Ok(true);
            }
            enter(path, &dep)?;
            let found = dep.depends_on_inner(name, path)?;
            path.pop();
            if found {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when this task's own readiness hook and every dependency,
    /// recursively, are fulfilled. Recomputed on every call.
    pub fn fulfilled(&self) -> Result<bool> {
        let mut path = vec![self as PathEntry];
        self.fulfilled_inner(&mut path)
    }

    fn fulfilled_inner(&self, path: &mut Vec<PathEntry>) -> Result<bool> {
        if !self.work.fulfilled() {
            return Ok(false);
        }
        for dep in self.dependencies() {
            enter(path, &dep)?;
            let ok = dep.fulfilled_inner(path)?;
            path.pop();
            if !ok {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Where this node's completion marker lives.
    pub fn marker_path(&self) -> PathBuf {
        self.store.marker_path(self.context().map(|c| c.name()), self.name())
    }

    /// Whether a fresh success from an earlier run is on record.
    pub fn already_processed(&self) -> Result<bool> {
        self.store.is_complete(&self.marker_path(), self.expiration())
    }

    /// Persist success. Does nothing for dummy nodes.
    pub fn mark_success(&self) -> Result<()> {
        if self.dummy {
            debug!(task = %self.name(), "dummy task; not recording success");
            return Ok(());
        }
        self.store.mark(&self.marker_path())
    }

    pub fn applies(&self, parameters: &Parameters) -> Option<bool> {
        self.work.applies(parameters)
    }

    pub fn prepare(&self) -> Result<()> {
        self.work
            .prepare()
            .map_err(|source| UnibuildError::ProcessingFailure {
                task: self.name().to_string(),
                source,
            })
    }

    pub fn process(&self, progress: &mut dyn Progress) -> Result<()> {
        self.work
            .process(progress)
            .map_err(|source| UnibuildError::ProcessingFailure {
                task: self.name().to_string(),
                source,
            })
    }

    fn read_deps(&self) -> RwLockReadGuard<'_, Vec<Task>> {
        self.dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_deps(&self) -> RwLockWriteGuard<'_, Vec<Task>> {
        self.dependencies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Push `dep` onto the traversal path, failing if it is already on it.
fn enter(path: &mut Vec<PathEntry>, dep: &Task) -> Result<()> {
    let entry = Arc::as_ptr(dep);
    if path.contains(&entry) {
        return Err(UnibuildError::CyclicDependency(dep.name().to_string()));
    }
    path.push(entry);
    Ok(())
}

impl fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<String> = self
            .read_deps()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        f.debug_struct("TaskNode")
            .field("name", &self.name())
            .field("context", &self.context().map(|c| c.name()))
            .field("fail_behaviour", &self.fail_behaviour)
            .field("dummy", &self.dummy)
            .field("dependencies", &deps)
            .finish()
    }
}
