use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use serde_json::Value;
use tracing::debug;

use super::{AiProvider, Endpoint, GenerationParams, Provider, ProviderConfig};
use crate::{Error, Result};

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, endpoint: &Endpoint) -> Result<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&endpoint.base_url);
        let client = Client::with_config(openai_config).with_http_client(endpoint.http_client()?);

        Ok(Self {
            client,
            model: config.model().to_string(),
        })
    }

    fn messages(
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| Error::AiProvider(e.to_string()))?,
            ));
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| Error::AiProvider(e.to_string()))?,
        ));

        Ok(messages)
    }

    async fn chat(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
        response_format: Option<ResponseFormat>,
    ) -> Result<Option<String>> {
        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(&self.model)
            .messages(Self::messages(prompt, system_prompt)?)
            .temperature(params.temperature)
            .max_tokens(params.max_tokens);
        if let Some(format) = response_format {
            request.response_format(format);
        }
        let request = request
            .build()
            .map_err(|e| Error::AiProvider(e.to_string()))?;

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            temperature = params.temperature,
            "Sending OpenAI chat completion"
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| Error::AiProvider(e.to_string()))?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content))
    }
}

#[async_trait::async_trait]
impl AiProvider for OpenAiProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAi
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
        Ok(self
            .chat(prompt, system_prompt, params, None)
            .await?
            .unwrap_or_default())
    }

    async fn generate_json(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<Value> {
        let content = self
            .chat(prompt, system_prompt, params, Some(ResponseFormat::JsonObject))
            .await?
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "{}".to_string());

        Ok(serde_json::from_str(&content)?)
    }
}
