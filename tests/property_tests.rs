use matchlens::diff::{generate_diff, reconstruct, DiffKind};
use matchlens::explain::{build_waterfall, derive_starting_weight, filter_for_chart, log2, FieldOrder, ScoredComparisonRecord};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// --- STRATEGIES ---

// A well-formed scored record: every field has gamma_ and bf_, some have bf_tf_adj_.
prop_compose! {
    fn arb_record()(
        fields in proptest::collection::btree_map("[a-z]{1,8}", (0i64..4, 0.01..100.0f64, proptest::option::of(0.01..100.0f64)), 0..8),
        prior in -20.0..5.0f64
    ) -> ScoredComparisonRecord {
        let mut values = Map::new();
        let mut total = prior;
        for (name, (gamma, bf, tf)) in fields {
            values.insert(format!("gamma_{}", name), json!(gamma));
            values.insert(format!("bf_{}", name), json!(bf));
            total += bf.log2();
            if let Some(tf) = tf {
                values.insert(format!("bf_tf_adj_{}", name), json!(tf));
                total += tf.log2();
            }
        }
        values.insert("match_weight".to_string(), json!(total));
        ScoredComparisonRecord::new(values)
    }
}

fn gamma_count(r: &ScoredComparisonRecord) -> usize {
    r.values().keys().filter(|k| k.starts_with("gamma_")).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn test_prior_plus_factors_is_match_weight(r in arb_record()) {
        let sum: f64 = r
            .values()
            .iter()
            .filter(|(k, _)| k.starts_with("bf_"))
            .filter_map(|(_, v)| v.as_f64())
            .map(log2)
            .sum();
        let diff = derive_starting_weight(&r) + sum - r.match_weight();
        prop_assert!(diff.abs() < 1e-9, "drift {}", diff);
    }

    #[test]
    fn test_waterfall_shape(r in arb_record(), tolerance in 0.0..0.5f64) {
        let rows = build_waterfall(&r, &FieldOrder::Lexicographic);
        prop_assert_eq!(rows.len(), 2 + 2 * gamma_count(&r));

        let filtered = filter_for_chart(&rows, tolerance);
        prop_assert_eq!(filtered.first().map(|r| r.column_name.as_str()), Some("Prior"));
        let last = filtered.last().unwrap();
        prop_assert_eq!(last.column_name.as_str(), "Final score");
        prop_assert_eq!(last.log2_bayes_factor, r.match_weight());
        for (i, row) in filtered.iter().enumerate() {
            prop_assert_eq!(row.sort_order, i);
        }
    }

    #[test]
    fn test_field_rows_sum_to_final(r in arb_record()) {
        let rows = build_waterfall(&r, &FieldOrder::Lexicographic);
        let body: f64 = rows[..rows.len() - 1].iter().map(|r| r.log2_bayes_factor).sum();
        prop_assert!((body - r.match_weight()).abs() < 1e-9);
    }

    #[test]
    fn test_diff_reconstructs_both_sides(left in "[a-d ]{0,24}", right in "[a-d ]{0,24}") {
        let segs = generate_diff(&left, &right);
        prop_assert_eq!(reconstruct(&segs, true), left);
        prop_assert_eq!(reconstruct(&segs, false), right);
    }

    #[test]
    fn test_diff_of_equal_text_is_single_segment(text in "\\PC{0,30}") {
        let segs = generate_diff(&text, &text);
        prop_assert_eq!(segs.len(), 1);
        prop_assert_eq!(segs[0].kind, DiffKind::Equal);
    }
}

#[test]
fn test_non_object_record_rejected() {
    assert!(ScoredComparisonRecord::from_value(Value::Array(vec![])).is_err());
}
