pub mod chart;
pub mod record;
pub mod waterfall;

pub use chart::{chart_domain, cumulative_curve, filter_for_chart, ChartBar, ChartView, CumulativePoint};
pub use record::ScoredComparisonRecord;
pub use waterfall::{build_waterfall, derive_starting_weight, log2, FieldOrder, WaterfallRow};

use crate::config::ExplainConfig;
use serde::Serialize;

pub fn bayes_factor_to_prob(bf: f64) -> f64 {
    bf / (bf + 1.0)
}

pub fn prob_to_bayes_factor(p: f64) -> f64 {
    p / (1.0 - p)
}

/// `2^x / (2^x + 1)`, written so that large `|x|` saturates instead of
/// producing NaN.
pub fn log2_odds_to_probability(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp2())
}

/// Headline numbers for one scored pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_weight: f64,
    pub bayes_factor: f64,
    pub match_probability: f64,
}

impl MatchSummary {
    pub fn from_match_weight(match_weight: f64) -> Self {
        let bayes_factor = match_weight.exp2();
        let match_probability = if bayes_factor.is_finite() {
            bayes_factor_to_prob(bayes_factor)
        } else {
            log2_odds_to_probability(match_weight)
        };
        Self {
            match_weight,
            bayes_factor,
            match_probability,
        }
    }
}

/// Full explanation of one scored pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub summary: MatchSummary,
    pub waterfall: Vec<WaterfallRow>,
    pub chart: ChartView,
}

impl Explanation {
    pub fn build(record: &ScoredComparisonRecord, order: &FieldOrder, config: &ExplainConfig) -> Self {
        let waterfall = build_waterfall(record, order);
        let chart = ChartView::build(&waterfall, config.tolerance, config.label_threshold);
        Self {
            summary: MatchSummary::from_match_weight(record.match_weight()),
            waterfall,
            chart,
        }
    }
}
