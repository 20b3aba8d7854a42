use super::waterfall::WaterfallRow;
use super::log2_odds_to_probability;
use serde::Serialize;

/// Drops near-zero contributions for display and renumbers what is left.
///
/// The first (prior) and last (final) rows always survive, whatever the
/// compared fields are called. The input is not modified.
pub fn filter_for_chart(rows: &[WaterfallRow], tolerance: f64) -> Vec<WaterfallRow> {
    let last = rows.len().saturating_sub(1);
    rows.iter()
        .enumerate()
        .filter(|(i, r)| *i == 0 || *i == last || r.log2_bayes_factor.abs() > tolerance)
        .map(|(_, r)| r.clone())
        .enumerate()
        .map(|(i, mut r)| {
            r.sort_order = i;
            r
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub cumulative: f64,
    pub previous_cumulative: f64,
    pub probability: f64,
    pub prev_probability: f64,
}

impl CumulativePoint {
    pub fn bar_middle(&self) -> f64 {
        (self.previous_cumulative + self.cumulative) / 2.0
    }
}

/// Running sum of `log2_bayes_factor` over `rows`, every row included.
pub fn cumulative_curve(rows: &[WaterfallRow]) -> Vec<CumulativePoint> {
    let mut running = 0.0;
    rows.iter()
        .map(|r| {
            let previous = running;
            running += r.log2_bayes_factor;
            CumulativePoint {
                cumulative: running,
                previous_cumulative: previous,
                probability: log2_odds_to_probability(running),
                prev_probability: log2_odds_to_probability(previous),
            }
        })
        .collect()
}

/// Shared y-range covering zero and every bar end.
pub fn chart_domain(points: &[CumulativePoint]) -> (f64, f64) {
    points.iter().fold((0.0f64, 0.0f64), |(lo, hi), p| {
        (
            lo.min(p.previous_cumulative).min(p.cumulative),
            hi.max(p.previous_cumulative).max(p.cumulative),
        )
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    #[serde(flatten)]
    pub row: WaterfallRow,
    #[serde(flatten)]
    pub point: CumulativePoint,
    pub bar_middle: f64,
    pub is_negative: bool,
    pub show_label: bool,
}

/// Everything a renderer needs to draw the waterfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub bars: Vec<ChartBar>,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartView {
    pub fn build(waterfall: &[WaterfallRow], tolerance: f64, label_threshold: f64) -> Self {
        let rows = filter_for_chart(waterfall, tolerance);
        let points = cumulative_curve(&rows);
        let (y_min, y_max) = chart_domain(&points);

        let bars = rows
            .into_iter()
            .zip(points)
            .map(|(row, point)| ChartBar {
                bar_middle: point.bar_middle(),
                is_negative: row.log2_bayes_factor < 0.0,
                show_label: row.log2_bayes_factor.abs() > label_threshold,
                row,
                point,
            })
            .collect();

        Self { bars, y_min, y_max }
    }
}
