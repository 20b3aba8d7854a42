use clap::{Args, Command, FromArgMatches};
use matchlens::config::{ExplainConfig, ModelSettings};
use matchlens::error::MatchLensError;
use matchlens::explain::FieldOrder;
use serde_json::json;

fn settings(value: serde_json::Value) -> ModelSettings {
    ModelSettings::new(value)
}

// --- RETAINED COLUMNS ---
#[test]
fn test_retained_columns_from_array() {
    let s = settings(json!({ "additional_columns_to_retain": ["first_lower", "phone_list"] }));
    assert_eq!(s.retained_columns().unwrap(), vec!["first_lower", "phone_list"]);
}

#[test]
fn test_retained_columns_from_literal_text() {
    let s = settings(json!({ "additional_columns_to_retain": "['first_lower', \"zip\"]" }));
    assert_eq!(s.retained_columns().unwrap(), vec!["first_lower", "zip"]);
}

#[test]
fn test_retained_columns_invalid_text_fails_fast() {
    let s = settings(json!({ "additional_columns_to_retain": "first_lower, zip" }));
    match s.retained_columns() {
        Err(MatchLensError::InvalidSchemaConfiguration(msg)) => {
            assert!(msg.contains("Invalid format for 'additional_columns_to_retain'"));
        }
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_retained_columns_wrong_types() {
    for bad in [
        json!({ "additional_columns_to_retain": 5 }),
        json!({ "additional_columns_to_retain": ["ok", 3] }),
        json!({}),
    ] {
        assert!(matches!(
            settings(bad).retained_columns(),
            Err(MatchLensError::InvalidSchemaConfiguration(_))
        ));
    }
}

// --- MODEL ORDER & IDS ---
#[test]
fn test_comparison_order() {
    let s = settings(json!({
        "comparisons": [
            { "output_column_name": "first_lower" },
            { "comparison_levels": [] },
            { "output_column_name": "phone_list" }
        ]
    }));
    assert_eq!(
        s.comparison_order(),
        Some(FieldOrder::Canonical(vec!["first_lower".into(), "phone_list".into()]))
    );
    assert_eq!(settings(json!({})).comparison_order(), None);
}

#[test]
fn test_unique_id_column() {
    assert_eq!(settings(json!({})).unique_id_column(), "unique_id");
    assert_eq!(
        settings(json!({ "unique_id_column_name": "contact_id" })).unique_id_column(),
        "contact_id"
    );
}

// --- EXPLAIN CONFIG ---
#[test]
fn test_explain_config_defaults() {
    let c = ExplainConfig::default();
    assert_eq!(c.tolerance, 1e-9);
    assert_eq!(c.label_threshold, 0.2);
    assert_eq!(c.field_order(), None);
}

#[test]
fn test_explain_config_from_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explain.json");
    std::fs::write(&path, r#"{ "field_order": "surname, dob" }"#).unwrap();

    let c = ExplainConfig::load_from_file(&path).unwrap();
    assert_eq!(c.tolerance, 1e-9);
    assert_eq!(
        c.field_order(),
        Some(FieldOrder::Canonical(vec!["surname".into(), "dob".into()]))
    );
}

#[test]
fn test_explain_config_missing_file() {
    assert!(matches!(
        ExplainConfig::load_from_file("/nonexistent/explain.json"),
        Err(MatchLensError::Io(_))
    ));
}

#[test]
fn test_cli_values_override_file() {
    let cmd = ExplainConfig::augment_args(Command::new("test"));
    let matches = cmd.get_matches_from(["test", "--tolerance", "0.5"]);
    let cli = ExplainConfig::from_arg_matches(&matches).unwrap();

    let mut from_file = ExplainConfig {
        tolerance: 0.01,
        field_order: "dob".to_string(),
        label_threshold: 1.0,
    };
    from_file.merge_from_cli(&cli, &matches);

    assert_eq!(from_file.tolerance, 0.5);
    // Defaults on the command line do not clobber file values.
    assert_eq!(from_file.field_order, "dob");
    assert_eq!(from_file.label_threshold, 1.0);
}
