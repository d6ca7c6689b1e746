//! Runtime configuration for promptlens.
//!
//! Resolution follows the precedence chain: built-in defaults → TOML config
//! file (`~/.promptlens/config.toml`) → environment variables (highest).
//!
//! ```toml
//! [log]
//! file = "/home/me/.promptlens/prompt-log.csv"
//!
//! [inference]
//! default_model = "meta-llama/Meta-Llama-3-8B-Instruct"
//! default_template = "Default"
//! timeout_ms = 120000
//!
//! [server]
//! addr = "127.0.0.1:9747"
//! ```
//!
//! The Hugging Face API token is never read from the file — only from the
//! `HF_TOKEN` environment variable.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Default model identifier offered by the submit form.
const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

/// Default prompt-template label.
const DEFAULT_TEMPLATE: &str = "Default";

/// Chat-completions endpoint for chat-oriented models.
const DEFAULT_CHAT_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";

/// Text-generation endpoint base for continuation models (model id appended).
const DEFAULT_GENERATION_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Default dashboard bind address.
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Public config struct
// ---------------------------------------------------------------------------

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct PromptlensConfig {
    /// Path of the CSV interaction log.
    pub log_file: PathBuf,
    /// Model identifier pre-filled in the submit form and used by `ask`.
    pub default_model: String,
    /// Prompt-template label pre-filled in the submit form.
    pub default_template: String,
    pub chat_endpoint: String,
    pub generation_endpoint: String,
    /// Inference request timeout in milliseconds; 0 waits indefinitely.
    pub timeout_ms: u64,
    /// Dashboard bind address.
    pub server_addr: String,
    /// Hugging Face API token, from `HF_TOKEN`. Absence is surfaced to the
    /// user as an error response, never a crash.
    pub token: Option<String>,
}

impl Default for PromptlensConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            default_model: DEFAULT_MODEL.to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            generation_endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            timeout_ms: 0,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            token: None,
        }
    }
}

impl PromptlensConfig {
    /// Load the config using the precedence chain:
    /// defaults → TOML file → environment variables.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(file_cfg) = FileConfig::load() {
            file_cfg.apply_to(&mut config);
        }

        Self::apply_env_overrides(&mut config);

        config
    }

    /// Apply environment-variable overrides.
    fn apply_env_overrides(config: &mut Self) {
        if let Ok(val) = std::env::var("PROMPTLENS_LOG_FILE")
            && !val.is_empty()
        {
            config.log_file = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("PROMPTLENS_MODEL")
            && !val.is_empty()
        {
            config.default_model = val;
        }

        if let Ok(val) = std::env::var("PROMPTLENS_TEMPLATE")
            && !val.is_empty()
        {
            config.default_template = val;
        }

        if let Ok(val) = std::env::var("PROMPTLENS_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.timeout_ms = ms;
        }

        if let Ok(val) = std::env::var("PROMPTLENS_ADDR")
            && !val.is_empty()
        {
            config.server_addr = val;
        }

        if let Ok(val) = std::env::var("HF_TOKEN")
            && !val.is_empty()
        {
            config.token = Some(val);
        }
    }
}

// ---------------------------------------------------------------------------
// TOML config file schema
// ---------------------------------------------------------------------------

/// Top-level schema of `~/.promptlens/config.toml`.
///
/// All fields are optional — only present values override the defaults.
#[derive(Debug, Deserialize)]
struct FileConfig {
    log: Option<FileLog>,
    inference: Option<FileInference>,
    server: Option<FileServer>,
}

#[derive(Debug, Deserialize)]
struct FileLog {
    file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct FileInference {
    default_model: Option<String>,
    default_template: Option<String>,
    chat_endpoint: Option<String>,
    generation_endpoint: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FileServer {
    addr: Option<String>,
}

impl FileConfig {
    /// Attempt to load `~/.promptlens/config.toml`.
    /// Returns `None` if the file doesn't exist or is malformed.
    fn load() -> Option<Self> {
        let path = config_file_path()?;
        let contents = fs::read_to_string(path).ok()?;
        toml::from_str(&contents).ok()
    }

    /// Merge file-level overrides into a [`PromptlensConfig`].
    fn apply_to(&self, config: &mut PromptlensConfig) {
        if let Some(log) = &self.log
            && let Some(file) = &log.file
        {
            config.log_file = file.clone();
        }

        if let Some(inf) = &self.inference {
            if let Some(model) = &inf.default_model {
                config.default_model = model.clone();
            }
            if let Some(template) = &inf.default_template {
                config.default_template = template.clone();
            }
            if let Some(url) = &inf.chat_endpoint {
                config.chat_endpoint = url.clone();
            }
            if let Some(url) = &inf.generation_endpoint {
                config.generation_endpoint = url.clone();
            }
            if let Some(ms) = inf.timeout_ms {
                config.timeout_ms = ms;
            }
        }

        if let Some(server) = &self.server
            && let Some(addr) = &server.addr
        {
            config.server_addr = addr.clone();
        }
    }
}

/// `~/.promptlens/config.toml`, or `None` when no home directory resolves.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".promptlens").join("config.toml"))
}

/// Default interaction-log location: `~/.promptlens/prompt-log.csv`, falling
/// back to the working directory when no home directory resolves.
fn default_log_file() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".promptlens").join("prompt-log.csv"))
        .unwrap_or_else(|| PathBuf::from("prompt-log.csv"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PromptlensConfig::default();
        assert_eq!(config.default_model, "meta-llama/Meta-Llama-3-8B-Instruct");
        assert_eq!(config.default_template, "Default");
        assert_eq!(config.server_addr, "127.0.0.1:9747");
        assert_eq!(config.timeout_ms, 0);
        assert!(config.token.is_none());
        assert!(config.log_file.to_string_lossy().ends_with("prompt-log.csv"));
    }

    #[test]
    fn file_config_partial_overrides() {
        let mut config = PromptlensConfig::default();
        let file: FileConfig = toml::from_str(
            r#"
            [inference]
            default_model = "gpt2"
            timeout_ms = 5000

            [server]
            addr = "0.0.0.0:8080"
            "#,
        )
        .unwrap();

        file.apply_to(&mut config);

        assert_eq!(config.default_model, "gpt2");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        // unchanged
        assert_eq!(config.default_template, "Default");
        assert_eq!(config.chat_endpoint, DEFAULT_CHAT_ENDPOINT);
    }

    #[test]
    fn file_config_empty_is_valid() {
        let file: Result<FileConfig, _> = toml::from_str("");
        assert!(file.is_ok());
    }

    #[test]
    fn file_config_log_section() {
        let mut config = PromptlensConfig::default();
        let file: FileConfig = toml::from_str(
            r#"
            [log]
            file = "/tmp/interactions.csv"
            "#,
        )
        .unwrap();

        file.apply_to(&mut config);
        assert_eq!(config.log_file, PathBuf::from("/tmp/interactions.csv"));
    }
}
