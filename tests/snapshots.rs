use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wirebox::{Container, Lifecycle, RegistrationOptions};

fn current(container: &Container) -> String {
    container.resolve::<String>("svc").unwrap().as_str().to_string()
}

#[test]
fn test_backup_restore_round_trip() {
    let container = Container::new();
    container.register_value("svc", "original".to_string()).unwrap();

    container.backup(false);
    container
        .register_with("svc", RegistrationOptions::value("changed".to_string()).replace(true))
        .unwrap();
    container.register_value("extra", 1u32).unwrap();
    assert_eq!(current(&container), "changed");

    container.restore(false);
    assert_eq!(current(&container), "original");
    assert!(!container.has("extra", None));
}

#[test]
fn test_snapshots_are_lifo() {
    let container = Container::new();
    container.register_value("svc", "original".to_string()).unwrap();

    container.backup(false);
    container
        .register_with("svc", RegistrationOptions::value("outer".to_string()).replace(true))
        .unwrap();

    container.backup(false);
    container
        .register_with("svc", RegistrationOptions::value("inner".to_string()).replace(true))
        .unwrap();
    assert_eq!(current(&container), "inner");

    container.restore(false);
    assert_eq!(current(&container), "outer");
    container.restore(false);
    assert_eq!(current(&container), "original");
}

#[test]
fn test_restore_without_backup_is_noop() {
    let container = Container::new();
    container.register_value("svc", "original".to_string()).unwrap();

    container.restore(false);
    container.restore(false);
    assert_eq!(current(&container), "original");
}

#[test]
fn test_cascade_backs_up_whole_chain() {
    let parent = Container::new();
    parent.register_value("parent-svc", "p-original".to_string()).unwrap();
    let child = parent.create_child();
    child.register_value("svc", "c-original".to_string()).unwrap();

    child.backup(true);
    parent
        .register_with(
            "parent-svc",
            RegistrationOptions::value("p-changed".to_string()).replace(true),
        )
        .unwrap();
    child
        .register_with("svc", RegistrationOptions::value("c-changed".to_string()).replace(true))
        .unwrap();

    child.restore(true);
    assert_eq!(current(&child), "c-original");
    assert_eq!(
        &*parent.resolve::<String>("parent-svc").unwrap(),
        "p-original"
    );
}

#[test]
fn test_noncascade_backup_leaves_parent_live() {
    let parent = Container::new();
    parent.register_value("parent-svc", "p-original".to_string()).unwrap();
    let child = parent.create_child();

    child.backup(false);
    parent
        .register_with(
            "parent-svc",
            RegistrationOptions::value("p-changed".to_string()).replace(true),
        )
        .unwrap();
    child.restore(false);

    // Only the child round-tripped; the parent kept its change.
    assert_eq!(&*parent.resolve::<String>("parent-svc").unwrap(), "p-changed");
}

#[test]
fn test_post_backup_singleton_materialization_stays_out_of_snapshot() {
    let container = Container::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();
    container
        .register_factory("clock", Lifecycle::Singleton, move |_| {
            Ok(runs_clone.fetch_add(1, Ordering::SeqCst) + 1)
        })
        .unwrap();

    container.backup(false);
    assert_eq!(*container.resolve::<usize>("clock").unwrap(), 1);
    container.restore(false);

    // The snapshot never saw the cache write; the factory runs again.
    assert_eq!(*container.resolve::<usize>("clock").unwrap(), 2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_pre_backup_singleton_cache_survives_round_trip() {
    let container = Container::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();
    container
        .register_factory("clock", Lifecycle::Singleton, move |_| {
            Ok(runs_clone.fetch_add(1, Ordering::SeqCst) + 1)
        })
        .unwrap();

    // Materialized before the backup, so both the snapshot and the live
    // copy carry the instance.
    assert_eq!(*container.resolve::<usize>("clock").unwrap(), 1);
    container.backup(false);
    assert_eq!(*container.resolve::<usize>("clock").unwrap(), 1);
    container.restore(false);
    assert_eq!(*container.resolve::<usize>("clock").unwrap(), 1);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
