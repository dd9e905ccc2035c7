use proptest::prelude::*;
use wirebox::Container;

proptest! {
    /// Names and values under one key always come back in registration order.
    #[test]
    fn names_preserve_insertion_order(values in prop::collection::vec(any::<u32>(), 1..16)) {
        let container = Container::new();
        for (i, value) in values.iter().enumerate() {
            container
                .register_named_value("svc", &format!("n{}", i), *value)
                .unwrap();
        }

        let expected: Vec<String> = (0..values.len()).map(|i| format!("n{}", i)).collect();
        prop_assert_eq!(container.service_names("svc"), expected);

        let resolved: Vec<u32> = container
            .resolve_all::<u32>("svc")
            .unwrap()
            .iter()
            .map(|v| **v)
            .collect();
        prop_assert_eq!(resolved, values);
    }

    /// Any subset of child overrides wins for the child, never reaches the
    /// parent, and never disturbs the merged name count or order.
    #[test]
    fn child_overrides_are_isolated(
        values in prop::collection::vec(any::<u32>(), 1..10),
        mask in prop::collection::vec(any::<bool>(), 10),
    ) {
        let parent = Container::new();
        for (i, value) in values.iter().enumerate() {
            parent
                .register_named_value("svc", &format!("n{}", i), *value)
                .unwrap();
        }

        let child = parent.create_child();
        for (i, value) in values.iter().enumerate() {
            if mask[i] {
                child
                    .register_named_value("svc", &format!("n{}", i), value.wrapping_add(1))
                    .unwrap();
            }
        }

        for (i, value) in values.iter().enumerate() {
            let name = format!("n{}", i);
            let expected = if mask[i] { value.wrapping_add(1) } else { *value };
            prop_assert_eq!(*child.resolve_named::<u32>("svc", &name).unwrap(), expected);
            prop_assert_eq!(*parent.resolve_named::<u32>("svc", &name).unwrap(), *value);
        }

        let expected_names: Vec<String> = (0..values.len()).map(|i| format!("n{}", i)).collect();
        prop_assert_eq!(child.service_names("svc"), expected_names);
    }

    /// Backup and restore always round-trips the registration set, whatever
    /// got registered or replaced in between.
    #[test]
    fn snapshot_round_trip_restores_registrations(
        before in prop::collection::vec(any::<u32>(), 1..8),
        after in prop::collection::vec(any::<u32>(), 0..8),
    ) {
        let container = Container::new();
        for (i, value) in before.iter().enumerate() {
            container
                .register_named_value("svc", &format!("n{}", i), *value)
                .unwrap();
        }

        container.backup(false);
        for (i, value) in after.iter().enumerate() {
            container
                .register_named_value("extra", &format!("x{}", i), *value)
                .unwrap();
        }
        container.restore(false);

        prop_assert!(container.service_names("extra").is_empty());
        let resolved: Vec<u32> = container
            .resolve_all::<u32>("svc")
            .unwrap()
            .iter()
            .map(|v| **v)
            .collect();
        prop_assert_eq!(resolved, before);
    }
}
