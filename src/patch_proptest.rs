//! Property-based tests for argument classification, inventory ordering and
//! scoped settings.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::inventory::Inventory;
    use crate::patch::PatchRequest;
    use crate::registry::{Registry, Visibility};
    use crate::scope::SettingsStack;
    use proptest::prelude::*;

    fn option_token() -> impl Strategy<Value = String> {
        "-[a-zA-Z0-9]{1,4}"
    }

    fn target_token() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9_./]{0,12}"
    }

    // ============================================================================
    // PatchRequest::classify property tests
    // ============================================================================

    proptest! {
        /// Property: options followed by targets always classify cleanly
        #[test]
        fn classify_accepts_options_then_targets(
            options in prop::collection::vec(option_token(), 0..4),
            targets in prop::collection::vec(target_token(), 1..5),
        ) {
            let args: Vec<String> = options.iter().chain(targets.iter()).cloned().collect();
            let request = PatchRequest::classify(&args).unwrap();
            prop_assert_eq!(&request.options, &options);
            prop_assert_eq!(request.targets.len(), targets.len());
        }

        /// Property: any option after a target is a usage error
        #[test]
        fn classify_rejects_option_after_target(
            before in prop::collection::vec(target_token(), 1..3),
            option in option_token(),
            after in prop::collection::vec(target_token(), 0..3),
        ) {
            let mut args = before.clone();
            args.push(option);
            args.extend(after);
            let is_usage_error = matches!(PatchRequest::classify(&args), Err(Error::Usage { .. }));
            prop_assert!(is_usage_error);
        }

        /// Property: everything after the separator is a target
        #[test]
        fn classify_separator_makes_targets(
            targets in prop::collection::vec(prop_oneof![option_token(), target_token()], 1..5),
        ) {
            let mut args = vec!["--".to_string()];
            args.extend(targets.iter().cloned());
            let request = PatchRequest::classify(&args).unwrap();
            prop_assert!(request.options.is_empty());
            prop_assert_eq!(request.targets.len(), targets.len());
        }
    }

    // ============================================================================
    // Inventory property tests
    // ============================================================================

    proptest! {
        /// Property: public names precede internal names, each block sorted
        #[test]
        fn inventory_is_partitioned_and_sorted(
            public in prop::collection::btree_set("[a-z][a-z_]{0,8}", 0..10),
            internal in prop::collection::btree_set("__[a-z_]{1,8}", 0..10),
        ) {
            let mut registry = Registry::new();
            for name in public.iter().rev() {
                registry.define("p", name, Visibility::Public, |_, _, _| Ok(0)).unwrap();
            }
            for name in internal.iter().rev() {
                registry.define("i", name, Visibility::Internal, |_, _, _| Ok(0)).unwrap();
            }

            let inventory = Inventory::build(&registry);
            let rendered: Vec<&str> = inventory.names().collect();
            let expected: Vec<&str> = public
                .iter()
                .chain(internal.iter())
                .map(String::as_str)
                .collect();
            prop_assert_eq!(rendered, expected);
            prop_assert_eq!(inventory.render(), Inventory::build(&registry).render());
        }
    }

    // ============================================================================
    // SettingsStack property tests
    // ============================================================================

    proptest! {
        /// Property: N pushes followed by N pops restore the original value
        #[test]
        fn settings_unwind_to_original(
            original in proptest::option::of("[a-zA-Z_.-]{1,10}"),
            pushed in prop::collection::vec("[a-zA-Z_.-]{1,10}", 0..6),
        ) {
            let mut settings = SettingsStack::new();
            if let Some(value) = &original {
                settings.set("collation", value.clone());
            }
            for value in &pushed {
                settings.push("collation", value.clone());
            }
            for _ in &pushed {
                prop_assert!(settings.pop("collation"));
            }
            prop_assert_eq!(settings.get("collation"), original.as_deref());
            prop_assert_eq!(settings.depth("collation"), 0);
        }
    }
}
