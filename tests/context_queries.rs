use wirebox::{Container, Lifecycle};

type Probe = (Vec<String>, bool, bool, bool);

#[test]
fn test_stack_and_resolving_queries_inside_a_factory() {
    let container = Container::new();
    container
        .register_factory("inner", Lifecycle::Transient, |ctx| {
            Ok((
                ctx.stack(),
                ctx.is_resolving("outer", None),
                ctx.is_directly_resolving("outer", None),
                ctx.is_directly_resolving("inner", None),
            ))
        })
        .unwrap();
    container
        .register_factory("outer", Lifecycle::Transient, |ctx| {
            Ok((*ctx.resolve::<Probe>("inner")?).clone())
        })
        .unwrap();

    let (stack, resolving_outer, directly_outer, directly_inner) =
        (*container.resolve::<Probe>("outer").unwrap()).clone();

    assert_eq!(stack, vec!["outer#default", "inner#default"]);
    assert!(resolving_outer);
    // The direct parent is "outer"; "inner" is the current entry itself.
    assert!(directly_outer);
    assert!(!directly_inner);
}

#[test]
fn test_directly_resolving_is_false_at_the_root() {
    let container = Container::new();
    container
        .register_factory("solo", Lifecycle::Transient, |ctx| {
            Ok(ctx.is_directly_resolving("solo", None))
        })
        .unwrap();

    assert!(!*container.resolve::<bool>("solo").unwrap());
}

#[test]
fn test_resolving_queries_respect_names() {
    let container = Container::new();
    container
        .register_factory("inner", Lifecycle::Transient, |ctx| {
            Ok((
                ctx.is_resolving("outer", Some("special")),
                ctx.is_resolving("outer", Some("other")),
            ))
        })
        .unwrap();
    container
        .register_named_factory("outer", "special", Lifecycle::Transient, |ctx| {
            Ok(*ctx.resolve::<(bool, bool)>("inner")?)
        })
        .unwrap();

    let (special, other) = *container
        .resolve_named::<(bool, bool)>("outer", "special")
        .unwrap();
    assert!(special);
    assert!(!other);
}

#[test]
fn test_context_view_queries() {
    let parent = Container::new();
    parent.register_named_value("svc", "a", 1u32).unwrap();
    let child = parent.create_child();
    child.register_named_value("svc", "b", 2u32).unwrap();

    child
        .register_factory("probe", Lifecycle::Transient, |ctx| {
            Ok((ctx.has("svc", None), ctx.has("svc", Some("c")), ctx.service_names("svc")))
        })
        .unwrap();

    let (has_any, has_c, names) =
        (*child.resolve::<(bool, bool, Vec<String>)>("probe").unwrap()).clone();
    assert!(has_any);
    assert!(!has_c);
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_stack_snapshot_is_not_live() {
    let container = Container::new();
    container
        .register_factory("leaf", Lifecycle::Transient, |ctx| Ok(ctx.stack()))
        .unwrap();

    let stack = container.resolve::<Vec<String>>("leaf").unwrap();
    // The frame was popped when the call returned; the snapshot kept it.
    assert_eq!(*stack, vec!["leaf#default".to_string()]);
}
