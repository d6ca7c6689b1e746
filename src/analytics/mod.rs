//! Aggregate statistics over the interaction table.
//!
//! Pure computation — no I/O. Feed it the full table from the store and it
//! returns the KPI set shown by `promptlens stats` and the dashboard tiles:
//! request count, feedback counts, hallucination count, average latency, and
//! the derived satisfaction / hallucination rates.

use serde::Serialize;

use crate::store::{Feedback, InteractionRecord};

/// Summary metrics for a full interaction table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Total number of logged requests.
    pub total: usize,
    pub thumbs_up: usize,
    pub thumbs_down: usize,
    /// Responses flagged as hallucinations by the user.
    pub hallucinations: usize,
    /// Arithmetic mean of latency over all rows; 0 for an empty table.
    pub avg_latency: f64,
    /// `thumbs_up / (thumbs_up + thumbs_down) * 100`; 0 with no feedback.
    pub satisfaction_rate: f64,
    /// `hallucinations / total * 100`; 0 for an empty table.
    pub hallucination_rate: f64,
}

/// Compute aggregate stats from the full table.
///
/// Deterministic for a given table; every denominator is guarded so an empty
/// or feedback-free table yields zeros rather than NaN.
pub fn compute_stats(records: &[InteractionRecord]) -> AggregateStats {
    let total = records.len();

    let thumbs_up = records
        .iter()
        .filter(|r| r.user_feedback == Some(Feedback::Positive))
        .count();
    let thumbs_down = records
        .iter()
        .filter(|r| r.user_feedback == Some(Feedback::Negative))
        .count();
    let hallucinations = records.iter().filter(|r| r.hallucination).count();

    let avg_latency = if total == 0 {
        0.0
    } else {
        records.iter().map(|r| r.latency).sum::<f64>() / total as f64
    };

    let rated = thumbs_up + thumbs_down;
    let satisfaction_rate = if rated == 0 {
        0.0
    } else {
        thumbs_up as f64 / rated as f64 * 100.0
    };

    let hallucination_rate = if total == 0 {
        0.0
    } else {
        hallucinations as f64 / total as f64 * 100.0
    };

    AggregateStats {
        total,
        thumbs_up,
        thumbs_down,
        hallucinations,
        avg_latency,
        satisfaction_rate,
        hallucination_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InteractionRecord;

    fn record(latency: f64, feedback: Option<Feedback>, hallucination: bool) -> InteractionRecord {
        let mut r = InteractionRecord::new("p", "r", latency, "gpt2", "Default");
        r.user_feedback = feedback;
        r.hallucination = hallucination;
        r
    }

    #[test]
    fn empty_table_yields_zeros() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_latency, 0.0);
        assert_eq!(stats.satisfaction_rate, 0.0);
        assert_eq!(stats.hallucination_rate, 0.0);
    }

    #[test]
    fn mixed_feedback_scenario() {
        let table = vec![
            record(0.5, Some(Feedback::Positive), false),
            record(1.2, Some(Feedback::Negative), true),
            record(0.8, None, false),
        ];
        let stats = compute_stats(&table);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.thumbs_up, 1);
        assert_eq!(stats.thumbs_down, 1);
        assert_eq!(stats.hallucinations, 1);
        assert_eq!(stats.satisfaction_rate, 50.0);
        assert!((stats.avg_latency - 0.8333333).abs() < 1e-6);
        assert!((stats.hallucination_rate - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn feedback_counts_never_exceed_total() {
        let table = vec![
            record(0.1, Some(Feedback::Positive), true),
            record(0.2, Some(Feedback::Positive), false),
            record(0.3, Some(Feedback::Negative), false),
        ];
        let stats = compute_stats(&table);
        assert!(stats.thumbs_up + stats.thumbs_down <= stats.total);
        assert!(stats.hallucinations <= stats.total);
    }

    #[test]
    fn all_positive_is_full_satisfaction() {
        let table = vec![
            record(0.1, Some(Feedback::Positive), false),
            record(0.2, Some(Feedback::Positive), false),
        ];
        let stats = compute_stats(&table);
        assert_eq!(stats.satisfaction_rate, 100.0);
        assert_eq!(stats.thumbs_down, 0);
    }

    #[test]
    fn unrated_rows_do_not_affect_satisfaction() {
        let table = vec![record(0.1, None, false), record(0.2, None, false)];
        let stats = compute_stats(&table);
        assert_eq!(stats.satisfaction_rate, 0.0);
        assert_eq!(stats.total, 2);
    }
}
