/// Inference collaborator — hosted LLM access for the dashboard.
///
/// The orchestrator talks to the model through the [`InferenceProvider`]
/// trait so tests can substitute a stub; the production implementation is
/// [`HfClient`] over the Hugging Face hosted inference API.
///
/// Every call resolves to a [`GenerationOutcome`]: either generated text or a
/// user-visible error description. Downstream logging branches on the tag —
/// failures are recorded as normal interaction rows whose response is the
/// error text, never raised.
pub mod hf;

pub use hf::HfClient;

/// Result of one inference call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model produced text.
    Generated(String),
    /// The call failed; the payload is the user-visible error description
    /// (missing credential, transport failure, provider error).
    Failed(String),
}

impl GenerationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The text either way — generated output or the error description.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Failed(text) => text,
        }
    }
}

/// A capability that turns a prompt into generated text for a given model.
pub trait InferenceProvider {
    fn generate(&self, prompt: &str, model: &str) -> GenerationOutcome;
}

/// Whether a model identifier names a chat-oriented model.
///
/// Chat models get the conversational call shape (single user turn); all
/// others get prompt continuation. Matches the markers case-insensitively.
pub fn is_chat_model(model: &str) -> bool {
    let lower = model.to_ascii_lowercase();
    lower.contains("llama") || lower.contains("chat")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
