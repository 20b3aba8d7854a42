use super::record::{ScoredComparisonRecord, GAMMA_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PRIOR_COLUMN: &str = "Prior";
pub const FINAL_COLUMN: &str = "Final score";

/// One bar of the explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallRow {
    pub column_name: String,
    pub label: String,
    pub log2_bayes_factor: f64,
    pub bayes_factor: f64,
    pub comparison_vector_value: Option<i64>,
    pub is_tf_adjustment: Option<bool>,
    pub sort_order: usize,
}

/// Order in which compared fields appear in the waterfall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldOrder {
    /// Sort by the `gamma_<field>` key string. Stable, but carries no meaning
    /// beyond spelling, and a renamed column can move.
    #[default]
    Lexicographic,
    /// Listed fields first in the given order, then any unlisted fields
    /// lexicographically. Listed names without a `gamma_` key are skipped.
    Canonical(Vec<String>),
}

impl FieldOrder {
    /// Comma-separated names; blank text means lexicographic.
    pub fn parse(text: &str) -> Self {
        let names: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            FieldOrder::Lexicographic
        } else {
            FieldOrder::Canonical(names)
        }
    }

    pub fn arrange(&self, mut fields: Vec<String>) -> Vec<String> {
        fields.sort_by_key(|f| format!("{}{}", GAMMA_PREFIX, f));
        fields.dedup();

        match self {
            FieldOrder::Lexicographic => fields,
            FieldOrder::Canonical(names) => {
                let mut ordered = Vec::with_capacity(fields.len());
                for name in names {
                    if fields.contains(name) && !ordered.contains(name) {
                        ordered.push(name.clone());
                    }
                }
                for field in fields {
                    if !ordered.contains(&field) {
                        ordered.push(field);
                    }
                }
                ordered
            }
        }
    }
}

/// `log2(x)`, except that non-positive inputs give 0 rather than -inf.
///
/// A Bayes factor of 0 therefore contributes nothing to the waterfall even
/// though it rules the match out.
pub fn log2(x: f64) -> f64 {
    if x > 0.0 {
        x.log2()
    } else {
        0.0
    }
}

/// Log-odds attributable to the prior alone: the final score with every
/// `bf_*` factor (standard and tf-adjusted) divided out.
///
/// Positive factors are summed in log space so long records cannot underflow
/// the product. A zero or negative factor falls back to `log2` of the raw
/// product, which the floor maps to 0.
pub fn derive_starting_weight(record: &ScoredComparisonRecord) -> f64 {
    let factors: Vec<f64> = record.bayes_factors().map(|(_, bf)| bf).collect();
    let evidence: f64 = if factors.iter().all(|bf| *bf > 0.0) {
        factors.iter().map(|bf| bf.log2()).sum()
    } else {
        log2(factors.iter().product())
    };
    record.match_weight() - evidence
}

pub fn build_waterfall(record: &ScoredComparisonRecord, order: &FieldOrder) -> Vec<WaterfallRow> {
    let fields = order.arrange(record.gamma_fields());
    let mut rows = Vec::with_capacity(2 + 2 * fields.len());

    let prior = derive_starting_weight(record);
    rows.push(WaterfallRow {
        column_name: PRIOR_COLUMN.to_string(),
        label: "Starting match weight (prior)".to_string(),
        log2_bayes_factor: prior,
        bayes_factor: prior.exp2(),
        comparison_vector_value: None,
        is_tf_adjustment: None,
        sort_order: 0,
    });

    for field in &fields {
        let gamma = record.comparison_vector_value(field);
        let label = format!("Gamma value for {}", field);

        let standard = record.standard_factor(field);
        rows.push(WaterfallRow {
            column_name: field.clone(),
            label: label.clone(),
            log2_bayes_factor: log2(standard),
            bayes_factor: standard,
            comparison_vector_value: gamma,
            is_tf_adjustment: Some(false),
            sort_order: rows.len(),
        });

        let tf = record.tf_adjustment_factor(field);
        rows.push(WaterfallRow {
            column_name: format!("tf adj on {}", field),
            label,
            log2_bayes_factor: log2(tf),
            bayes_factor: tf,
            comparison_vector_value: gamma,
            is_tf_adjustment: Some(true),
            sort_order: rows.len(),
        });
    }

    let final_score = record.match_weight();
    rows.push(WaterfallRow {
        column_name: FINAL_COLUMN.to_string(),
        label: "Final score".to_string(),
        log2_bayes_factor: final_score,
        bayes_factor: final_score.exp2(),
        comparison_vector_value: None,
        is_tf_adjustment: None,
        sort_order: rows.len(),
    });

    debug!(
        "waterfall: {} fields, prior {:.4}, final {:.4}",
        fields.len(),
        prior,
        final_score
    );
    rows
}
