//! Tests for the override fuzzer.

use super::*;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn top_level_fields(spec: &FuzzSpec) -> Vec<&str> {
    spec.choices()
        .iter()
        .flat_map(|choice| match choice {
            FuzzChoice::Object(fields) => fields
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        })
        .collect()
}

// ============================================================================
// FuzzSpec
// ============================================================================

mod fuzz_spec_tests {
    use super::*;

    #[test]
    fn test_values_creates_one_choice_per_value() {
        let spec = FuzzSpec::values(["a", "b", "c"]);

        assert_eq!(
            spec.choices(),
            &[
                FuzzChoice::Value(json!("a")),
                FuzzChoice::Value(json!("b")),
                FuzzChoice::Value(json!("c")),
            ]
        );
    }

    #[test]
    fn test_or_adds_alternatives() {
        let spec = FuzzSpec::values([false]).or(FuzzSpec::object([("x", FuzzSpec::values([1]))]));

        assert_eq!(spec.choices().len(), 2);
        assert!(spec.field("x").is_some());
    }

    #[test]
    fn test_with_field_replaces_existing_field() {
        let spec = FuzzSpec::object([("a", FuzzSpec::values([1]))])
            .with_field("a", FuzzSpec::values([2]));

        assert_eq!(spec.field("a"), Some(&FuzzSpec::values([2])));
        assert_eq!(top_level_fields(&spec), vec!["a"]);
    }

    #[test]
    fn test_with_field_appends_new_field() {
        let spec = FuzzSpec::object([("a", FuzzSpec::values([1]))])
            .with_field("b", FuzzSpec::values([2]));

        assert_eq!(top_level_fields(&spec), vec!["a", "b"]);
    }

    #[test]
    fn test_with_field_ignores_leaf_choices() {
        let spec = FuzzSpec::values([1]).with_field("a", FuzzSpec::values([2]));

        assert_eq!(spec, FuzzSpec::values([1]));
        assert!(spec.field("a").is_none());
    }
}

// ============================================================================
// set_deep
// ============================================================================

mod set_deep_tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sets_nested_value() {
        let mut target = json!({ "a": { "b": {} } });

        set_deep(&mut target, &path(&["a", "b", "c"]), json!(1));

        assert_eq!(target, json!({ "a": { "b": { "c": 1 } } }));
    }

    #[test]
    fn test_missing_parent_is_a_no_op() {
        let mut target = json!({ "a": {} });

        set_deep(&mut target, &path(&["x", "y"]), json!(1));

        assert_eq!(target, json!({ "a": {} }));
    }

    #[test]
    fn test_null_parent_is_a_no_op() {
        let mut target = json!({ "a": null });

        set_deep(&mut target, &path(&["a", "b"]), json!(1));

        assert_eq!(target, json!({ "a": null }));
    }

    #[test]
    fn test_dotted_segment_is_a_single_key() {
        let mut target = json!({});

        set_deep(&mut target, &path(&["a.b"]), json!(true));

        assert_eq!(target, json!({ "a.b": true }));
    }

    #[test]
    fn test_array_index_appends_or_replaces() {
        let mut target = json!({ "list": [1] });

        set_deep(&mut target, &path(&["list", "1"]), json!(2));
        set_deep(&mut target, &path(&["list", "0"]), json!(0));
        set_deep(&mut target, &path(&["list", "5"]), json!(5));

        assert_eq!(target, json!({ "list": [0, 2] }));
    }
}

// ============================================================================
// Generation
// ============================================================================

mod generation_tests {
    use super::*;

    #[test]
    fn test_no_progress_generates_empty_document() {
        let mut rng = rng(1);

        for _ in 0..20 {
            let input = create_fuzzer_input(&branch_fuzz_spec(), 0.0, &mut rng);
            assert_eq!(input, json!({}));
        }
    }

    #[test]
    fn test_same_seed_generates_same_document() {
        let spec = environment_fuzz_spec();

        let first = create_fuzzer_input(&spec, 0.8, &mut rng(42));
        let second = create_fuzzer_input(&spec, 0.8, &mut rng(42));

        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_documents_are_valid_configs() {
        let spec = organization_fuzz_spec();
        let mut rng = rng(7);

        for i in 0..200 {
            let result = create_fuzzer_config(&spec, i as f64 / 200.0, &mut rng);
            assert!(result.is_ok(), "iteration {}: {:?}", i, result);
        }
    }

    #[test]
    fn test_generated_keys_start_with_known_fields() {
        let spec = branch_fuzz_spec();
        let fields = top_level_fields(&spec);
        let mut rng = rng(11);

        for _ in 0..100 {
            let input = create_fuzzer_input(&spec, 1.0, &mut rng);
            let object = input.as_object().expect("root should be an object");
            for key in object.keys() {
                let first = key.split('.').next().unwrap_or_default();
                assert!(
                    fields.iter().any(|field| *field == first),
                    "unexpected key {}",
                    key
                );
            }
        }
    }

    #[test]
    fn test_full_progress_eventually_generates_dotted_keys_and_nulls() {
        let spec = environment_fuzz_spec();
        let mut rng = rng(3);
        let mut saw_dotted = false;
        let mut saw_null = false;

        for _ in 0..500 {
            let config = create_fuzzer_config(&spec, 1.0, &mut rng).unwrap();
            saw_dotted |= config.keys().any(|key| key.contains('.'));
            saw_null |= config.to_string().contains("null");
        }

        assert!(saw_dotted, "expected at least one dotted key");
        assert!(saw_null, "expected at least one null value");
    }
}

// ============================================================================
// Level specs
// ============================================================================

mod level_spec_tests {
    use super::*;

    #[test]
    fn test_project_spec_only_has_source_of_truth() {
        assert_eq!(top_level_fields(&project_fuzz_spec()), vec!["sourceOfTruth"]);
    }

    #[test]
    fn test_environment_widens_branch() {
        let branch = branch_fuzz_spec();
        let environment = environment_fuzz_spec();

        assert_eq!(top_level_fields(&branch), top_level_fields(&environment));

        let provider = |spec: &FuzzSpec| {
            spec.field("auth")
                .and_then(|s| s.field("oauth"))
                .and_then(|s| s.field("providers"))
                .and_then(|s| s.field("google"))
                .cloned()
                .unwrap()
        };
        assert!(provider(&branch).field("clientSecret").is_none());
        assert!(provider(&environment).field("clientSecret").is_some());

        let emails = environment.field("emails").unwrap();
        assert!(emails.field("server").is_some());
        assert!(emails.field("themes").is_some());
        assert!(environment
            .field("domains")
            .and_then(|d| d.field("trustedDomains"))
            .is_some());
    }

    #[test]
    fn test_organization_matches_environment() {
        assert_eq!(organization_fuzz_spec(), environment_fuzz_spec());
    }
}
