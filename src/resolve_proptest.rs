//! Property-based tests for the configuration resolver.
//!
//! These tests use proptest to generate random answers and rename maps and
//! verify that normalization invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use crate::prompt::RawAnswer;
    use crate::resolve::normalize;
    use crate::schema::{Defaults, Prompts, RenameTarget, ServiceSchema, Target};
    use proptest::prelude::*;
    use serde_json::Value;

    fn split_schema(map: BTreeMap<String, RenameTarget>, defaults: Defaults) -> ServiceSchema {
        ServiceSchema {
            name: "svc".to_string(),
            path: Some("images/svc".to_string()),
            compose: None,
            prompt: Some(Prompts::Split {
                development: Vec::new(),
                production: None,
            }),
            map,
            defaults,
            dependencies: Vec::new(),
            generate: Vec::new(),
        }
    }

    fn dev_answer<'a>(schema: &'a ServiceSchema, answers: &BTreeMap<String, String>) -> RawAnswer<'a> {
        let batch = answers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        RawAnswer {
            service: schema.name.clone(),
            schema: Some(schema),
            batches: BTreeMap::from([(Target::Dev, batch)]),
        }
    }

    // ============================================================================
    // rename fan-out
    // ============================================================================

    proptest! {
        /// Property: every key a raw key fans out to receives the identical value
        #[test]
        fn fan_out_copies_identical_value(
            value in ".*",
            targets in prop::collection::btree_set("[A-Z][A-Z_]{0,8}", 1..5),
        ) {
            let map = BTreeMap::from([(
                "RAW".to_string(),
                RenameTarget::Many(targets.iter().cloned().collect()),
            )]);
            let schema = split_schema(map, Defaults::default());
            let answers = BTreeMap::from([("RAW".to_string(), value.clone())]);

            let bucket = normalize(dev_answer(&schema, &answers));
            let dev = bucket.dev.unwrap();
            for target in &targets {
                prop_assert_eq!(dev.get(target), Some(&value));
            }
            if !targets.contains("RAW") {
                prop_assert!(!dev.contains_key("RAW"));
            }
        }

        /// Property: keys without a rename entry pass through unchanged
        #[test]
        fn unmapped_keys_pass_through(
            answers in prop::collection::btree_map("[A-Z]{1,6}", "[a-z0-9]{0,6}", 0..8),
        ) {
            let schema = split_schema(BTreeMap::new(), Defaults::default());
            let bucket = normalize(dev_answer(&schema, &answers));
            prop_assert_eq!(bucket.dev.unwrap(), answers);
        }
    }

    // ============================================================================
    // explicit answers over defaults
    // ============================================================================

    proptest! {
        /// Property: an explicit answer always wins over a default for the same key
        #[test]
        fn explicit_answers_override_defaults(
            answers in prop::collection::btree_map("[A-Z]{1,4}", "[a-z]{0,6}", 0..6),
            defaults in prop::collection::btree_map("[A-Z]{1,4}", "[0-9]{1,6}", 0..6),
        ) {
            let schema = split_schema(
                BTreeMap::new(),
                Defaults {
                    dev: defaults
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                    ..Defaults::default()
                },
            );

            let dev = normalize(dev_answer(&schema, &answers)).dev.unwrap();
            for (key, value) in &answers {
                prop_assert_eq!(dev.get(key), Some(value));
            }
            for (key, value) in &defaults {
                if !answers.contains_key(key) {
                    prop_assert_eq!(dev.get(key), Some(value));
                }
            }
            prop_assert!(dev.len() <= answers.len() + defaults.len());
        }
    }
}
