mod common;

use std::error::Error;
use std::sync::Arc;

use tempfile::tempdir;
use unibuild::config::ProgressLayout;
use unibuild::errors::UnibuildError;
use unibuild::registry::MemoryRegistry;
use unibuild::task::{Context, FailBehaviour, TaskNode};

use common::{ScriptedTask, call_log, node, scripted, store};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn depends_on_is_transitive() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let a = node("A", &store);
    let b = node("B", &store);
    let c = node("C", &store);
    b.depend_on(Arc::clone(&c));
    a.depend_on(Arc::clone(&b));

    assert!(a.depends_on("B")?);
    assert!(a.depends_on("C")?);
    assert!(b.depends_on("C")?);
    assert!(!c.depends_on("A")?);
    assert!(!a.depends_on("A")?);
    Ok(())
}

#[test]
fn depend_on_is_fluent_and_keeps_insertion_order() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let all = node("all", &store);
    all.depend_on(node("z", &store))
        .depend_on(node("a", &store))
        .depend_on(node("m", &store));

    let names: Vec<String> = all
        .dependencies()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(names, ["z", "a", "m"]);
    Ok(())
}

#[test]
fn fulfilled_follows_transitive_dependencies() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);
    let log = call_log();

    let leaf = node("leaf", &store);
    assert!(leaf.fulfilled()?);

    let blocker = scripted(ScriptedTask::new("blocker", &log).unfulfilled(), &store);
    let middle = node("middle", &store);
    let top = node("top", &store);
    middle.depend_on(Arc::clone(&blocker));
    top.depend_on(Arc::clone(&middle)).depend_on(leaf);

    assert!(!blocker.fulfilled()?);
    assert!(!middle.fulfilled()?);
    assert!(!top.fulfilled()?);
    Ok(())
}

#[test]
fn first_context_wins() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let task = node("build", &store);
    task.set_context(Context::shared("ctx1"));
    task.set_context(Context::shared("ctx2"));

    assert_eq!(task.context().map(|c| c.name()), Some("ctx1"));
    Ok(())
}

#[test]
fn set_context_propagates_to_existing_dependencies_only() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let parent = node("parent", &store);
    let child = node("child", &store);
    let grandchild = node("grandchild", &store);
    let own = node("own", &store);
    own.set_context(Context::shared("other"));

    child.depend_on(Arc::clone(&grandchild));
    parent.depend_on(Arc::clone(&child)).depend_on(Arc::clone(&own));
    parent.set_context(Context::shared("proj"));

    assert_eq!(child.context().map(|c| c.name()), Some("proj"));
    assert_eq!(grandchild.context().map(|c| c.name()), Some("proj"));
    assert_eq!(own.context().map(|c| c.name()), Some("other"));

    // Added after the context was set, but by reference: propagated at attach time.
    let late = node("late", &store);
    parent.depend_on(Arc::clone(&late));
    assert_eq!(late.context().map(|c| c.name()), Some("proj"));
    Ok(())
}

#[test]
fn context_is_shared_between_nodes() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let ctx = Context::shared("proj");
    let parent = node("parent", &store);
    let child = node("child", &store);
    parent.depend_on(Arc::clone(&child));
    parent.set_context(Arc::clone(&ctx));

    let child_ctx = child.context().ok_or("child has no context")?;
    assert!(Arc::ptr_eq(child_ctx, &ctx));
    Ok(())
}

#[test]
fn depend_on_named_resolves_without_propagating_context() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let mut registry = MemoryRegistry::new();
    let download = node("download", &store);
    registry.register(Arc::clone(&download))?;

    let parent = node("parent", &store);
    parent.set_context(Context::shared("proj"));
    parent.depend_on_named("download", &registry)?;

    assert!(parent.depends_on("download")?);
    assert!(download.context().is_none());
    Ok(())
}

#[test]
fn named_dependency_receives_context_set_later() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let mut registry = MemoryRegistry::new();
    let download = node("download", &store);
    registry.register(Arc::clone(&download))?;

    let parent = node("parent", &store);
    parent.depend_on_named("download", &registry)?;
    assert!(download.context().is_none());

    parent.set_context(Context::shared("proj"));
    assert_eq!(download.context().map(|c| c.name()), Some("proj"));
    Ok(())
}

#[test]
fn depend_on_named_unknown_task_fails() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);
    let registry = MemoryRegistry::new();

    let parent = node("parent", &store);
    match parent.depend_on_named("nonexistent", &registry) {
        Err(UnibuildError::UnknownDependency(name)) => assert_eq!(name, "nonexistent"),
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
    assert!(parent.dependencies().is_empty());
    Ok(())
}

#[test]
fn registry_rejects_duplicate_names() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let mut registry = MemoryRegistry::new();
    registry.register(node("same", &store))?;
    let err = registry.register(node("same", &store)).unwrap_err();

    assert!(matches!(err, UnibuildError::DuplicateTask(ref n) if n == "same"));
    assert_eq!(registry.len(), 1);
    Ok(())
}

#[test]
fn cycles_are_reported_instead_of_overflowing() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let a = node("A", &store);
    let b = node("B", &store);
    a.depend_on(Arc::clone(&b));
    b.depend_on(Arc::clone(&a));

    assert!(matches!(a.depends_on("missing"), Err(UnibuildError::CyclicDependency(_))));
    assert!(matches!(a.fulfilled(), Err(UnibuildError::CyclicDependency(_))));

    // Setting a context terminates on a cycle too.
    a.set_context(Context::shared("proj"));
    assert_eq!(b.context().map(|c| c.name()), Some("proj"));
    Ok(())
}

#[test]
fn diamond_is_not_a_cycle() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);

    let base = node("base", &store);
    let left = node("left", &store);
    let right = node("right", &store);
    let top = node("top", &store);
    left.depend_on(Arc::clone(&base));
    right.depend_on(Arc::clone(&base));
    top.depend_on(left).depend_on(right);

    assert!(top.fulfilled()?);
    assert!(!top.depends_on("nothing")?);
    Ok(())
}

#[test]
fn builder_flags_are_exposed() -> TestResult {
    let dir = tempdir()?;
    let store = store(dir.path(), ProgressLayout::Flat);
    let log = call_log();

    let plain = node("plain", &store);
    assert_eq!(plain.fail_behaviour(), FailBehaviour::Fail);
    assert!(!plain.is_dummy());

    let tuned = TaskNode::new(ScriptedTask::new("tuned", &log), Arc::clone(&store))
        .dummy()
        .set_fail_behaviour(FailBehaviour::SkipProject)
        .shared();
    assert_eq!(tuned.fail_behaviour(), FailBehaviour::SkipProject);
    assert!(tuned.is_dummy());
    Ok(())
}
