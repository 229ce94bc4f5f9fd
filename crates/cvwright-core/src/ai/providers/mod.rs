#[cfg(feature = "anthropic")]
mod anthropic;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
#[cfg(feature = "openai")]
mod openai;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

use crate::{Error, Result};

/// Supported AI backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Auto-detection order when no provider is given
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    /// Environment variable holding this provider's credential
    pub fn api_key_var(&self) -> String {
        api_key_var(self.as_str())
    }
}

/// `<PROVIDER>_API_KEY` for any provider name, known or not
pub(crate) fn api_key_var(provider: &str) -> String {
    format!("{}_API_KEY", provider.to_uppercase())
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(Error::Config(format!(
                "Unknown AI provider: {other}. Supported providers: openai, anthropic"
            ))),
        }
    }
}

/// Resolved provider, credential and optional model override
#[derive(Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.is_empty());
        self
    }

    /// The pinned model, or the provider's default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

// Never print the credential
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model())
            .finish()
    }
}

/// Where and how to reach a backend
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg_attr(not(any(feature = "openai", feature = "anthropic")), allow(dead_code))]
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

/// Sampling settings for a single request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Defaults for free-text generation
    pub fn text() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    /// Defaults for structured JSON generation
    pub fn json() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 8192,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Uniform capability over every AI backend
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider identity
    fn provider(&self) -> Provider;

    /// Model used for requests
    fn model(&self) -> &str;

    /// Single-turn completion. Returns an empty string when the backend yields no content.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<String>;

    /// Single-turn completion that must yield parseable JSON
    async fn generate_json(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<Value>;
}

/// Strip a surrounding ```json / ``` code fence from model output
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"cv\": {\"name\": \"Jane\"}}\n```";
        assert_eq!(strip_code_fences(input), "{\"cv\": {\"name\": \"Jane\"}}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "  ```\n{\"a\": 1}\n```  ";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_plain_json_untouched() {
        assert_eq!(strip_code_fences(" {\"a\": [1, 2]} \n"), "{\"a\": [1, 2]}");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let body = r#"{"cv": {"name": "Jane", "sections": {"skills": [{"label": "Languages", "details": "Rust"}]}}}"#;
        let fenced = format!("```json\n{body}\n```");

        let a: Value = serde_json::from_str(strip_code_fences(&fenced)).unwrap();
        let b: Value = serde_json::from_str(strip_code_fences(body)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);

        let err = "gemini".parse::<Provider>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown AI provider: gemini. Supported providers: openai, anthropic"
        );
    }

    #[test]
    fn test_model_defaults_and_override() {
        let config = ProviderConfig::new(Provider::OpenAi, "sk-test");
        assert_eq!(config.model(), "gpt-4o");

        let config = ProviderConfig::new(Provider::Anthropic, "sk-ant");
        assert_eq!(config.model(), "claude-sonnet-4-20250514");

        let config = config.with_model(Some("claude-3-5-haiku-latest".to_string()));
        assert_eq!(config.model(), "claude-3-5-haiku-latest");

        let config = ProviderConfig::new(Provider::OpenAi, "k").with_model(Some(String::new()));
        assert_eq!(config.model(), "gpt-4o");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig::new(Provider::OpenAi, "sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_api_key_var() {
        assert_eq!(Provider::OpenAi.api_key_var(), "OPENAI_API_KEY");
        assert_eq!(Provider::Anthropic.api_key_var(), "ANTHROPIC_API_KEY");
        assert_eq!(api_key_var("mistral"), "MISTRAL_API_KEY");
    }
}
