//! Canned-response provider for tests.

use std::sync::Mutex;

use serde_json::Value;

use super::{AiProvider, GenerationParams, Provider};
use crate::{Error, Result};

/// One recorded call to the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub params: GenerationParams,
}

/// Mock provider returning pre-configured replies in order and recording every call
pub struct MockProvider {
    replies: Mutex<Vec<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProvider {
    pub fn new(mut replies: Vec<Result<Value>>) -> Self {
        // Reversed so `pop` yields replies in the given order
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(reply: Value) -> Self {
        Self::new(vec![Ok(reply)])
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str, system_prompt: Option<&str>, params: GenerationParams) -> Result<()> {
        self.calls
            .lock()
            .map_err(|e| Error::AiProvider(format!("mock lock poisoned: {e}")))?
            .push(RecordedCall {
                prompt: prompt.to_string(),
                system_prompt: system_prompt.map(str::to_string),
                params,
            });
        Ok(())
    }

    fn next_reply(&self) -> Result<Value> {
        let mut replies = self
            .replies
            .lock()
            .map_err(|e| Error::AiProvider(format!("mock lock poisoned: {e}")))?;
        replies
            .pop()
            .unwrap_or_else(|| Err(Error::AiProvider("mock has no replies left".to_string())))
    }
}

#[async_trait::async_trait]
impl AiProvider for MockProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<String> {
        self.record(prompt, system_prompt, params)?;
        Ok(match self.next_reply()? {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    async fn generate_json(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: GenerationParams,
    ) -> Result<Value> {
        self.record(prompt, system_prompt, params)?;
        self.next_reply()
    }
}
