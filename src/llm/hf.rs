/// Hugging Face hosted-inference client.
///
/// Uses the synchronous `ureq` HTTP client with two call shapes:
///
/// - **Chat completions** (`/v1/chat/completions`) for chat-oriented models —
///   a single user turn, bounded output length, fixed sampling temperature.
/// - **Text generation** (`/models/{id}`) for continuation models — the
///   prompt is extended and only the newly generated tokens are returned.
///
/// The call shape is selected by [`is_chat_model`] on the model identifier.
/// The API token comes from the resolved config (`HF_TOKEN`); a missing token
/// is reported as a user-visible error string, not a crash.
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{GenerationOutcome, InferenceProvider, is_chat_model};
use crate::config::PromptlensConfig;

/// Response length cap for the chat call shape.
const CHAT_MAX_TOKENS: u32 = 512;

/// New-token cap for the continuation call shape.
const GENERATION_MAX_NEW_TOKENS: u32 = 256;

/// Sampling temperature for both call shapes.
const TEMPERATURE: f32 = 0.7;

// ---------------------------------------------------------------------------
// Request / response types for the hosted inference API
// ---------------------------------------------------------------------------

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Response body from the chat-completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Request body for `POST /models/{id}` text generation.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    /// Return only the newly generated tokens, not the echoed prompt.
    return_full_text: bool,
}

/// The text-generation endpoint answers with a list of candidates.
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    generated_text: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous Hugging Face inference client.
#[derive(Debug)]
pub struct HfClient {
    chat_endpoint: String,
    generation_endpoint: String,
    timeout: Duration,
    token: Option<String>,
}

impl HfClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &PromptlensConfig) -> Self {
        Self {
            chat_endpoint: config.chat_endpoint.trim_end_matches('/').to_string(),
            generation_endpoint: config.generation_endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
            token: config.token.clone(),
        }
    }

    /// Whether an API token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Send a chat request and return the assistant's reply.
    fn chat_completion(&self, token: &str, prompt: &str, model: &str) -> Result<String> {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let resp = self
            .request(&self.chat_endpoint, token)
            .send_json(&body)
            .context("chat completion request failed")?;

        let parsed: ChatResponse = resp
            .into_json()
            .context("failed to parse chat completion response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("chat completion response contained no choices")?;

        if content.trim().is_empty() {
            anyhow::bail!("model returned an empty response");
        }

        Ok(content)
    }

    /// Send a continuation request and return the newly generated text.
    fn text_generation(&self, token: &str, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/{}", self.generation_endpoint, model);

        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: GENERATION_MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                do_sample: true,
                return_full_text: false,
            },
        };

        let resp = self
            .request(&url, token)
            .send_json(&body)
            .context("text generation request failed")?;

        let parsed: Vec<GenerationResponse> = resp
            .into_json()
            .context("failed to parse text generation response")?;

        let text = parsed
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .context("text generation response was empty")?;

        if text.trim().is_empty() {
            anyhow::bail!("model returned an empty response");
        }

        Ok(text)
    }

    /// Common request setup: auth header and the optional timeout (0 waits
    /// indefinitely — the dashboard blocks on the call either way).
    fn request(&self, url: &str, token: &str) -> ureq::Request {
        let req = ureq::post(url).set("Authorization", &format!("Bearer {token}"));
        if self.timeout.is_zero() {
            req
        } else {
            req.timeout(self.timeout)
        }
    }
}

impl InferenceProvider for HfClient {
    /// Generate text for `prompt` with `model`, never failing loudly: every
    /// error path (missing credential, transport, provider) collapses into
    /// [`GenerationOutcome::Failed`] with a user-visible description.
    fn generate(&self, prompt: &str, model: &str) -> GenerationOutcome {
        let Some(token) = self.token.clone() else {
            return GenerationOutcome::Failed(
                "Error: HF_TOKEN environment variable not set. \
                 Export your Hugging Face API token and restart."
                    .to_string(),
            );
        };

        let result = if is_chat_model(model) {
            self.chat_completion(&token, prompt, model)
        } else {
            self.text_generation(&token, prompt, model)
        };

        match result {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(e) => GenerationOutcome::Failed(format!("Error with model {model}: {e:#}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = PromptlensConfig::default();
        let client = HfClient::from_config(&config);
        assert_eq!(
            client.chat_endpoint,
            "https://router.huggingface.co/v1/chat/completions"
        );
        assert_eq!(
            client.generation_endpoint,
            "https://api-inference.huggingface.co/models"
        );
        assert!(client.timeout.is_zero());
        assert!(!client.has_token());
    }

    #[test]
    fn client_strips_trailing_slashes() {
        let mut config = PromptlensConfig::default();
        config.chat_endpoint = "http://localhost:8080/v1/chat/completions/".to_string();
        config.generation_endpoint = "http://localhost:8080/models/".to_string();
        let client = HfClient::from_config(&config);
        assert_eq!(client.chat_endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.generation_endpoint, "http://localhost:8080/models");
    }

    #[test]
    fn missing_token_fails_without_a_network_call() {
        let client = HfClient::from_config(&PromptlensConfig::default());
        let outcome = client.generate("hello", "gpt2");
        assert!(outcome.is_failure());
        assert!(outcome.text().contains("HF_TOKEN"));
    }

    #[test]
    fn chat_request_serializes_single_user_turn() {
        let body = ChatRequest {
            model: "meta-llama/Meta-Llama-3-8B-Instruct",
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"max_tokens\":512"));
    }

    #[test]
    fn generation_request_returns_new_tokens_only() {
        let body = GenerationRequest {
            inputs: "once upon a time",
            parameters: GenerationParameters {
                max_new_tokens: GENERATION_MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                do_sample: true,
                return_full_text: false,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"return_full_text\":false"));
        assert!(json.contains("\"max_new_tokens\":256"));
    }
}
