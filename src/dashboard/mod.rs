//! Interaction orchestrator: the glue between the UI layer, the inference
//! provider, and the interaction store.
//!
//! Holds an explicit in-memory copy of the full table for rendering — a
//! read-through cache refreshed after every write, passed in at construction
//! rather than hidden in a global. Each operation runs to completion before
//! the next (single-user session model); the only blocking point is the
//! inference call itself.

use std::time::Instant;

use crate::analytics::{self, AggregateStats};
use crate::charts::{self, ChartBundle};
use crate::llm::{GenerationOutcome, InferenceProvider};
use crate::store::{Feedback, InteractionRecord, InteractionStore, round_latency};

/// Placeholder response for an empty or whitespace-only prompt. Returned with
/// zero latency; nothing is logged and the provider is not called.
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt.";

/// Dashboard session state: store handle, inference provider, and the cached
/// table view.
pub struct Dashboard<P> {
    store: InteractionStore,
    provider: P,
    table: Vec<InteractionRecord>,
}

impl<P: InferenceProvider> Dashboard<P> {
    /// Build a session over an opened store, priming the cache with the
    /// existing log so analytics render immediately.
    pub fn new(store: InteractionStore, provider: P) -> Self {
        let table = store.read_all();
        Self {
            store,
            provider,
            table,
        }
    }

    /// The cached table view, in append order.
    pub fn table(&self) -> &[InteractionRecord] {
        &self.table
    }

    /// Re-read the cache from the store. A read failure keeps the previous
    /// cache — stale data beats an empty table mid-session.
    pub fn refresh(&mut self) {
        match self.store.try_read_all() {
            Ok(table) => self.table = table,
            Err(e) => eprintln!("promptlens: refresh failed, keeping cached table: {e:#}"),
        }
    }

    /// Aggregate stats over the cached table.
    pub fn stats(&self) -> AggregateStats {
        analytics::compute_stats(&self.table)
    }

    /// Chart bundle over the cached table.
    pub fn charts(&self) -> ChartBundle {
        charts::render_charts(&self.table)
    }

    /// Submit a prompt: time the inference call, log the interaction, and
    /// return `(response_text, latency_seconds)`.
    ///
    /// An empty or whitespace-only prompt is rejected up front with
    /// [`EMPTY_PROMPT_MESSAGE`] and latency 0 — no provider call, no log row.
    /// A failed call is logged as a normal row whose response is the error
    /// text and whose latency is 0, so failures stay visible in analytics.
    pub fn submit(&mut self, prompt: &str, template: &str, model: &str) -> (String, f64) {
        if prompt.trim().is_empty() {
            return (EMPTY_PROMPT_MESSAGE.to_string(), 0.0);
        }

        let start = Instant::now();
        let outcome = self.provider.generate(prompt, model);

        let latency = match &outcome {
            GenerationOutcome::Generated(_) => round_latency(start.elapsed().as_secs_f64()),
            GenerationOutcome::Failed(_) => 0.0,
        };

        let response = outcome.text().to_string();
        self.store.append(InteractionRecord::new(
            prompt,
            response.clone(),
            latency,
            model,
            template,
        ));
        self.refresh();

        (response, latency)
    }

    /// Attach feedback to a previously logged interaction and return a fresh
    /// chart bundle.
    ///
    /// With no feedback value this renders the current cache unchanged. The
    /// store update is matched on the (prompt, response, latency) triple;
    /// failures anywhere in the path degrade to rendering whatever the cache
    /// last held.
    pub fn submit_feedback(
        &mut self,
        prompt: &str,
        response: &str,
        latency: f64,
        feedback: Option<Feedback>,
        hallucination: bool,
    ) -> ChartBundle {
        let Some(feedback) = feedback else {
            return self.charts();
        };

        self.store
            .update_by_match(prompt, response, latency, feedback, hallucination);
        self.refresh();

        self.charts()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
