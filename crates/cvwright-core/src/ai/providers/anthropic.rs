use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{strip_code_fences, AiProvider, Endpoint, GenerationParams, Provider, ProviderConfig};
use crate::{Error, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const JSON_ONLY_INSTRUCTION: &str =
    "\n\nRespond with valid JSON only. No explanation or markdown formatting.";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ClaudeMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Option<Vec<ClaudeContent>>,
    error: Option<ClaudeError>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeError {
    message: String,
}

/// Claude/Anthropic Messages API provider
///
/// No `Debug` derive: the struct holds the API key.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, endpoint: &Endpoint) -> Result<Self> {
        Ok(Self {
            client: endpoint.http_client()?,
            api_key: config.api_key.clone(),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            model: config.model().to_string(),
        })
    }

    async fn chat(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: params.max_tokens,
            messages: vec![ClaudeMessage {
                role: "user",
                content: prompt,
            }],
            system: system_prompt.filter(|s| !s.is_empty()),
            // A zero temperature is omitted and the server default applies
            temperature: (params.temperature > 0.0).then_some(params.temperature),
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            temperature = ?request.temperature,
            "Sending Claude messages request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::AiProvider(format!("Claude API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::AiProvider(format!("Failed to read Claude response: {}", e)))?;

        let claude_response: MessagesResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::AiProvider(format!(
                    "Claude API error (status {}): {}",
                    status.as_u16(),
                    body
                )));
            }
            Err(e) => {
                return Err(Error::AiProvider(format!(
                    "Failed to parse Claude response: {}",
                    e
                )));
            }
        };

        if let Some(error) = claude_response.error {
            return Err(Error::AiProvider(format!(
                "Claude API error (status {}): {}",
                status.as_u16(),
                error.message
            )));
        }

        if !status.is_success() {
            return Err(Error::AiProvider(format!(
                "Claude API error (status {})",
                status.as_u16()
            )));
        }

        let content = claude_response
            .content
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.text)
            .unwrap_or_default();

        Ok(content)
    }
}

#[async_trait::async_trait]
impl AiProvider for AnthropicProvider {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<String> {
        self.chat(prompt, system_prompt, params).await
    }

    async fn generate_json(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<Value> {
        let json_prompt = format!("{prompt}{JSON_ONLY_INSTRUCTION}");
        let content = self.chat(&json_prompt, system_prompt, params).await?;

        Ok(serde_json::from_str(strip_code_fences(&content))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_zero_temperature_and_missing_system() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 16,
            messages: vec![ClaudeMessage {
                role: "user",
                content: "hi",
            }],
            system: None,
            temperature: (0.0f32 > 0.0).then_some(0.0),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
