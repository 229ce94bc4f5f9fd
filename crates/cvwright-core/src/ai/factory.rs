//! Resolve provider, credential and model into a concrete [`AiProvider`].

use std::sync::Arc;

use tracing::{debug, info};

use super::providers::{api_key_var, AiProvider, Endpoint, Provider, ProviderConfig};
use crate::config::AiConfig;
use crate::{Error, Result};

/// Caller-supplied choices; every field is optional
#[derive(Debug, Clone, Default)]
pub struct ProviderSelection {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ProviderSelection {
    pub fn new(provider: Option<String>, api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            model,
        }
    }

    /// Fill provider and model from the config file where the caller left them unset
    pub fn with_defaults(mut self, ai: &AiConfig) -> Self {
        if self.provider.is_none() {
            self.provider = ai.provider.clone();
        }
        if self.model.is_none() {
            self.model = ai.model.clone();
        }
        self
    }
}

/// Credential lookup backed by the process environment
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve a [`ProviderConfig`] from explicit choices and a credential lookup.
///
/// Order:
/// 1. an API key without a provider is rejected as ambiguous;
/// 2. without a provider, the first provider whose credential is present wins
///    (`OPENAI_API_KEY`, then `ANTHROPIC_API_KEY`);
/// 3. a missing key is read from `<PROVIDER>_API_KEY`;
/// 4. the provider name must be a supported one.
///
/// Empty values count as absent.
pub fn resolve_provider_config<F>(selection: &ProviderSelection, lookup: F) -> Result<ProviderConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let mut api_key = selection.api_key.clone().filter(|k| !k.is_empty());

    let provider_name = match selection.provider.as_deref().filter(|p| !p.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            if api_key.is_some() {
                return Err(Error::Config(
                    "When providing an API key, you must also specify the provider \
                     (--provider openai or --provider anthropic)"
                        .to_string(),
                ));
            }

            let (provider, key) = Provider::ALL
                .iter()
                .find_map(|p| lookup(&p.api_key_var()).map(|key| (*p, key)))
                .ok_or_else(|| {
                    Error::Config(
                        "No API key found. Please set OPENAI_API_KEY or ANTHROPIC_API_KEY \
                         environment variable, or use --api-key with --provider option."
                            .to_string(),
                    )
                })?;

            debug!("Auto-detected provider {} from environment", provider);
            api_key = Some(key);
            provider.as_str().to_string()
        }
    };

    let api_key = match api_key {
        Some(key) => key,
        None => {
            let var = api_key_var(&provider_name);
            lookup(&var).ok_or_else(|| {
                Error::Config(format!(
                    "API key not found. Please set {var} environment variable or use --api-key option."
                ))
            })?
        }
    };

    let provider: Provider = provider_name.parse()?;

    Ok(ProviderConfig::new(provider, api_key).with_model(selection.model.clone()))
}

/// Build the backend client for a resolved configuration
pub fn create_provider(config: &ProviderConfig, ai: &AiConfig) -> Result<Arc<dyn AiProvider>> {
    info!("Using {} with model {}", config.provider, config.model());

    match config.provider {
        Provider::OpenAi => {
            let endpoint = Endpoint::new(&ai.openai_api_base).with_timeout(ai.request_timeout());
            build_openai(config, &endpoint)
        }
        Provider::Anthropic => {
            let endpoint =
                Endpoint::new(&ai.anthropic_api_base).with_timeout(ai.request_timeout());
            build_anthropic(config, &endpoint)
        }
    }
}

/// Resolve against the process environment and build the client in one step
pub fn get_ai_provider(selection: &ProviderSelection, ai: &AiConfig) -> Result<Arc<dyn AiProvider>> {
    let config = resolve_provider_config(selection, env_lookup)?;
    create_provider(&config, ai)
}

#[cfg(feature = "openai")]
fn build_openai(config: &ProviderConfig, endpoint: &Endpoint) -> Result<Arc<dyn AiProvider>> {
    Ok(Arc::new(super::providers::OpenAiProvider::new(config, endpoint)?))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_config: &ProviderConfig, _endpoint: &Endpoint) -> Result<Arc<dyn AiProvider>> {
    Err(Error::MissingDependency(
        "OpenAI support is not available. Rebuild with: cargo install cvwright-cli --features openai"
            .to_string(),
    ))
}

#[cfg(feature = "anthropic")]
fn build_anthropic(config: &ProviderConfig, endpoint: &Endpoint) -> Result<Arc<dyn AiProvider>> {
    Ok(Arc::new(super::providers::AnthropicProvider::new(config, endpoint)?))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(_config: &ProviderConfig, _endpoint: &Endpoint) -> Result<Arc<dyn AiProvider>> {
    Err(Error::MissingDependency(
        "Anthropic support is not available. Rebuild with: cargo install cvwright-cli --features anthropic"
            .to_string(),
    ))
}
