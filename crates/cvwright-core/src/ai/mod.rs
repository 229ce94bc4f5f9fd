mod factory;
pub mod prompts;
pub mod providers;
mod service;

pub use factory::{
    create_provider, env_lookup, get_ai_provider, resolve_provider_config, ProviderSelection,
};
pub use providers::{AiProvider, Endpoint, GenerationParams, Provider, ProviderConfig};
pub use service::ResumeService;
