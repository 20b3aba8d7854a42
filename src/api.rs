use crate::config::{ExplainConfig, ModelSettings};
use crate::diff::{generate_diff, DiffSegment};
use crate::error::{MatchLensError, MlResult};
use crate::explain::{Explanation, FieldOrder, ScoredComparisonRecord};
use crate::records::{build_record, display_value, RawInputs, StorageRecord};
use crate::scoring::ComparisonScorer;
use serde::Serialize;
use tracing::{info, warn};

/// One column shown side by side.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FieldDiff {
    pub column: String,
    pub left: String,
    pub right: String,
    pub segments: Vec<DiffSegment>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub explanation: Explanation,
    pub field_diffs: Vec<FieldDiff>,
    pub record_left: StorageRecord,
    pub record_right: StorageRecord,
}

/// Field order for a request: an explicit config order wins, then the
/// model's comparison order, then key order.
pub fn resolve_field_order(config: &ExplainConfig, settings: Option<&ModelSettings>) -> FieldOrder {
    config
        .field_order()
        .or_else(|| settings.and_then(ModelSettings::comparison_order))
        .unwrap_or_default()
}

pub fn explain_record(record: &ScoredComparisonRecord, config: &ExplainConfig) -> Explanation {
    Explanation::build(record, &resolve_field_order(config, None), config)
}

pub fn diff_records(columns: &[String], left: &StorageRecord, right: &StorageRecord) -> Vec<FieldDiff> {
    columns
        .iter()
        .map(|column| {
            let l = display_value(left, column);
            let r = display_value(right, column);
            FieldDiff {
                column: column.clone(),
                segments: generate_diff(&l, &r),
                left: l,
                right: r,
            }
        })
        .collect()
}

/// Builds both records, scores them and explains the result.
///
/// A malformed retained-column list aborts before any record is built.
pub fn compare_records(
    settings: &ModelSettings,
    left_inputs: &RawInputs,
    right_inputs: &RawInputs,
    scorer: &dyn ComparisonScorer,
    config: &ExplainConfig,
) -> MlResult<ComparisonReport> {
    let columns = settings.retained_columns()?;
    info!("Record schema: {}", columns.join(", "));

    let record_left = build_record(&columns, left_inputs);
    let record_right = build_record(&columns, right_inputs);

    let scored = match scorer.compare_records(&record_left, &record_right)? {
        Some(s) => s,
        None => {
            warn!("Scoring engine returned no row for the pair");
            return Err(MatchLensError::EmptyScoreResult);
        }
    };

    let order = resolve_field_order(config, Some(settings));
    let explanation = Explanation::build(&scored, &order, config);
    info!(
        "Match weight {:.4} corresponding to match probability {:.2}%",
        explanation.summary.match_weight,
        explanation.summary.match_probability * 100.0
    );

    Ok(ComparisonReport {
        explanation,
        field_diffs: diff_records(&columns, &record_left, &record_right),
        record_left,
        record_right,
    })
}
