pub mod generate;
pub mod parse;
pub mod polish;
pub mod tailor;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use cvwright_core::{AppConfig, ProviderSelection, ResumeService};

/// Provider flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// AI provider: 'openai' or 'anthropic'. Auto-detected from the environment when omitted
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// API key for the provider. Requires --provider
    #[arg(short = 'k', long = "api-key")]
    pub api_key: Option<String>,

    /// Model to use. Defaults: gpt-4o (OpenAI), claude-sonnet-4-20250514 (Anthropic)
    #[arg(short = 'm', long)]
    pub model: Option<String>,
}

impl ProviderArgs {
    pub fn selection(&self) -> ProviderSelection {
        ProviderSelection::new(
            self.provider.clone(),
            self.api_key.clone(),
            self.model.clone(),
        )
    }
}

pub fn build_service(args: &ProviderArgs, config: &AppConfig) -> Result<ResumeService> {
    let service = ResumeService::from_selection(&args.selection(), config)?;
    Ok(service)
}

/// `<stem><suffix>.yaml` in the working directory
pub fn stem_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    PathBuf::from(format!("{stem}{suffix}.yaml"))
}

/// `<Name_With_Underscores>_CV.yaml`
pub fn name_output(name: &str) -> PathBuf {
    PathBuf::from(format!("{}_CV.yaml", name.replace(' ', "_")))
}
