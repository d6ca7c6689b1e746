//! Chart bundle renderer for the dashboard's three analytics panels.
//!
//! Pure with respect to the table argument: no I/O, no panics, and every
//! branch has a degraded rendering — an empty table produces panels in their
//! no-data state instead of an error.
//!
//! The bundle is plain serializable data (labels, series, colors,
//! annotations). The embedded web frontend draws it; nothing here knows about
//! pixels or markup.

use serde::Serialize;

use crate::analytics;
use crate::store::{Feedback, InteractionRecord};

/// The three panels rendered by the dashboard, derived from the full table.
#[derive(Debug, Clone, Serialize)]
pub struct ChartBundle {
    pub feedback: FeedbackPanel,
    pub hallucination: HallucinationPanel,
    pub latency: LatencyPanel,
}

// ---------------------------------------------------------------------------
// Panel types
// ---------------------------------------------------------------------------

/// Categorical bar chart of feedback counts.
///
/// One bar per feedback value present in the table, with a human-readable
/// label and a per-category color. `bars` is empty when no row carries
/// feedback — the no-data state.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPanel {
    pub bars: Vec<FeedbackBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackBar {
    pub label: &'static str,
    pub count: usize,
    /// Frontend color key (maps to a CSS variable).
    pub color: &'static str,
}

/// Single-bar hallucination count, annotated with the hallucination rate.
#[derive(Debug, Clone, Serialize)]
pub struct HallucinationPanel {
    pub count: usize,
    pub rate_pct: f64,
}

/// Sequential latency line: one point per row, x = row index.
///
/// `values` is empty when the table is empty — the no-data state. The OLS
/// trend overlay is present only when more than [`TREND_MIN_POINTS`] points
/// exist.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyPanel {
    pub values: Vec<f64>,
    pub mean: f64,
    pub trend: Option<TrendLine>,
}

/// Linear best fit over `(index, latency)` pairs, ordinary least squares.
#[derive(Debug, Clone, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Minimum point count before the latency trend overlay is drawn.
pub const TREND_MIN_POINTS: usize = 5;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the three-panel bundle from the full table.
pub fn render_charts(records: &[InteractionRecord]) -> ChartBundle {
    let stats = analytics::compute_stats(records);

    let mut bars = Vec::new();
    for (feedback, color) in [(Feedback::Positive, "green"), (Feedback::Negative, "red")] {
        let count = records
            .iter()
            .filter(|r| r.user_feedback == Some(feedback))
            .count();
        if count > 0 {
            bars.push(FeedbackBar {
                label: feedback.label(),
                count,
                color,
            });
        }
    }

    let values: Vec<f64> = records.iter().map(|r| r.latency).collect();
    let trend = if values.len() > TREND_MIN_POINTS {
        least_squares(&values)
    } else {
        None
    };

    ChartBundle {
        feedback: FeedbackPanel { bars },
        hallucination: HallucinationPanel {
            count: stats.hallucinations,
            rate_pct: stats.hallucination_rate,
        },
        latency: LatencyPanel {
            values,
            mean: stats.avg_latency,
            trend,
        },
    }
}

/// Ordinary least squares fit of `y = slope * index + intercept`.
///
/// Returns `None` for fewer than two points or a degenerate x-variance
/// (cannot happen with distinct indices, kept as a guard).
fn least_squares(values: &[f64]) -> Option<TrendLine> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        cov += dx * (y - mean_y);
        var += dx * dx;
    }

    if var == 0.0 {
        return None;
    }

    let slope = cov / var;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(latency: f64, feedback: Option<Feedback>, hallucination: bool) -> InteractionRecord {
        let mut r = InteractionRecord::new("p", "r", latency, "gpt2", "Default");
        r.user_feedback = feedback;
        r.hallucination = hallucination;
        r
    }

    #[test]
    fn empty_table_renders_no_data_panels() {
        let bundle = render_charts(&[]);
        assert!(bundle.feedback.bars.is_empty());
        assert_eq!(bundle.hallucination.count, 0);
        assert_eq!(bundle.hallucination.rate_pct, 0.0);
        assert!(bundle.latency.values.is_empty());
        assert_eq!(bundle.latency.mean, 0.0);
        assert!(bundle.latency.trend.is_none());
    }

    #[test]
    fn feedback_bars_use_labels_not_markers() {
        let table = vec![
            record(0.5, Some(Feedback::Positive), false),
            record(0.6, Some(Feedback::Positive), false),
            record(0.7, Some(Feedback::Negative), false),
        ];
        let bundle = render_charts(&table);

        assert_eq!(bundle.feedback.bars.len(), 2);
        let up = &bundle.feedback.bars[0];
        assert_eq!(up.label, "Thumbs up");
        assert_eq!(up.count, 2);
        assert_eq!(up.color, "green");
        let down = &bundle.feedback.bars[1];
        assert_eq!(down.label, "Thumbs down");
        assert_eq!(down.count, 1);
        assert_eq!(down.color, "red");
    }

    #[test]
    fn feedback_panel_skips_absent_categories() {
        let table = vec![record(0.5, Some(Feedback::Negative), false), record(0.6, None, false)];
        let bundle = render_charts(&table);
        assert_eq!(bundle.feedback.bars.len(), 1);
        assert_eq!(bundle.feedback.bars[0].label, "Thumbs down");
    }

    #[test]
    fn hallucination_panel_carries_rate_annotation() {
        let table = vec![
            record(0.5, None, true),
            record(0.6, None, false),
            record(0.7, None, true),
            record(0.8, None, false),
        ];
        let bundle = render_charts(&table);
        assert_eq!(bundle.hallucination.count, 2);
        assert_eq!(bundle.hallucination.rate_pct, 50.0);
    }

    #[test]
    fn trend_requires_more_than_five_points() {
        let five: Vec<InteractionRecord> = (0..5).map(|i| record(i as f64, None, false)).collect();
        assert!(render_charts(&five).latency.trend.is_none());

        let six: Vec<InteractionRecord> = (0..6).map(|i| record(i as f64, None, false)).collect();
        assert!(render_charts(&six).latency.trend.is_some());
    }

    #[test]
    fn least_squares_recovers_a_perfect_line() {
        // y = 0.5x + 1.0 over 8 points.
        let values: Vec<f64> = (0..8).map(|i| 0.5 * i as f64 + 1.0).collect();
        let trend = least_squares(&values).unwrap();
        assert!((trend.slope - 0.5).abs() < 1e-9);
        assert!((trend.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn latency_values_keep_table_order() {
        let table = vec![record(0.5, None, false), record(1.2, None, false), record(0.8, None, false)];
        let bundle = render_charts(&table);
        assert_eq!(bundle.latency.values, vec![0.5, 1.2, 0.8]);
        assert!((bundle.latency.mean - 0.8333333).abs() < 1e-6);
    }
}
