//! End-to-end orchestrator scenarios over a real store and a stub inference
//! provider: submit, error logging, feedback, and the derived analytics.

use std::cell::Cell;

use promptlens::analytics::compute_stats;
use promptlens::dashboard::{Dashboard, EMPTY_PROMPT_MESSAGE};
use promptlens::llm::{GenerationOutcome, InferenceProvider};
use promptlens::store::{Feedback, InteractionRecord, InteractionStore};

/// Provider stub with a canned outcome and a call counter.
struct StubProvider {
    outcome: GenerationOutcome,
    calls: Cell<usize>,
}

impl StubProvider {
    fn replying(text: &str) -> Self {
        Self {
            outcome: GenerationOutcome::Generated(text.to_string()),
            calls: Cell::new(0),
        }
    }

    fn failing(error: &str) -> Self {
        Self {
            outcome: GenerationOutcome::Failed(error.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl InferenceProvider for StubProvider {
    fn generate(&self, _prompt: &str, _model: &str) -> GenerationOutcome {
        self.calls.set(self.calls.get() + 1);
        self.outcome.clone()
    }
}

fn temp_dashboard(provider: StubProvider) -> (tempfile::TempDir, Dashboard<StubProvider>) {
    let dir = tempfile::tempdir().unwrap();
    let store = InteractionStore::open(dir.path().join("prompt-log.csv"));
    (dir, Dashboard::new(store, provider))
}

// ---------------------------------------------------------------------------
// Submit scenarios
// ---------------------------------------------------------------------------

#[test]
fn empty_prompt_short_circuits_before_the_provider() {
    let (_dir, mut dash) = temp_dashboard(StubProvider::replying("unused"));

    let (response, latency) = dash.submit("", "Default", "gpt2");
    assert_eq!(response, EMPTY_PROMPT_MESSAGE);
    assert_eq!(latency, 0.0);

    let (response, latency) = dash.submit("  \t\n ", "Default", "gpt2");
    assert_eq!(response, EMPTY_PROMPT_MESSAGE);
    assert_eq!(latency, 0.0);

    assert_eq!(dash.table().len(), 0, "nothing may be logged");
}

#[test]
fn provider_failure_is_logged_as_a_normal_row() {
    let (_dir, mut dash) =
        temp_dashboard(StubProvider::failing("Error with model gpt2: 503 from provider"));

    let (response, latency) = dash.submit("why is the sky blue", "Science", "gpt2");

    assert_eq!(response, "Error with model gpt2: 503 from provider");
    assert_eq!(latency, 0.0);

    // The failure is a regular interaction record, visible to analytics.
    let rows = dash.table();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].response, "Error with model gpt2: 503 from provider");
    assert_eq!(rows[0].latency, 0.0);
    assert_eq!(rows[0].prompt_template, "Science");

    let stats = dash.stats();
    assert_eq!(stats.total, 1);
}

#[test]
fn successful_submit_returns_the_logged_pair() {
    let (_dir, mut dash) = temp_dashboard(StubProvider::replying("because of Rayleigh scattering"));

    let (response, latency) = dash.submit("why is the sky blue", "Science", "gpt2");

    assert_eq!(response, "because of Rayleigh scattering");
    let rows = dash.table();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].latency, latency);
}

// ---------------------------------------------------------------------------
// Feedback + analytics scenario
// ---------------------------------------------------------------------------

#[test]
fn mixed_feedback_scenario_produces_the_expected_stats() {
    let dir = tempfile::tempdir().unwrap();
    let store = InteractionStore::open(dir.path().join("prompt-log.csv"));

    // Latencies [0.5, 1.2, 0.8] with feedback [positive, negative, absent].
    store.append(InteractionRecord::new("p1", "r1", 0.5, "gpt2", "Default"));
    store.append(InteractionRecord::new("p2", "r2", 1.2, "gpt2", "Default"));
    store.append(InteractionRecord::new("p3", "r3", 0.8, "gpt2", "Default"));
    store.update_by_match("p1", "r1", 0.5, Feedback::Positive, false);
    store.update_by_match("p2", "r2", 1.2, Feedback::Negative, false);

    let stats = compute_stats(&store.read_all());

    assert_eq!(stats.total, 3);
    assert_eq!(stats.thumbs_up, 1);
    assert_eq!(stats.thumbs_down, 1);
    assert_eq!(stats.satisfaction_rate, 50.0);
    assert!((stats.avg_latency - 0.8333333).abs() < 1e-6);
}

#[test]
fn feedback_through_the_orchestrator_updates_charts() {
    let (_dir, mut dash) = temp_dashboard(StubProvider::replying("an answer"));

    let (response, latency) = dash.submit("a question", "Default", "gpt2");
    let bundle = dash.submit_feedback("a question", &response, latency, Some(Feedback::Positive), false);

    assert_eq!(bundle.feedback.bars.len(), 1);
    assert_eq!(bundle.feedback.bars[0].label, "Thumbs up");
    assert_eq!(bundle.feedback.bars[0].count, 1);
    assert_eq!(bundle.hallucination.count, 0);
    assert_eq!(bundle.latency.values.len(), 1);
}

#[test]
fn absent_feedback_leaves_log_and_charts_untouched() {
    let (_dir, mut dash) = temp_dashboard(StubProvider::replying("an answer"));

    let (response, latency) = dash.submit("a question", "Default", "gpt2");
    let bundle = dash.submit_feedback("a question", &response, latency, None, true);

    assert!(bundle.feedback.bars.is_empty());
    assert_eq!(dash.table()[0].user_feedback, None);
    assert!(!dash.table()[0].hallucination);
}

#[test]
fn latency_trend_appears_after_six_submissions() {
    let (_dir, mut dash) = temp_dashboard(StubProvider::replying("ok"));

    for i in 0..6 {
        dash.submit(&format!("prompt {i}"), "Default", "gpt2");
    }

    let bundle = dash.charts();
    assert_eq!(bundle.latency.values.len(), 6);
    assert!(bundle.latency.trend.is_some());
}
