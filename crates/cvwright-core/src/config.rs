use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Default provider: "openai" or "anthropic". Auto-detected from the environment when unset.
    #[serde(default)]
    pub provider: Option<String>,
    /// Model override. Provider default is used when unset.
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL of the OpenAI-compatible chat completions API
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    /// Base URL of the Anthropic Messages API
    #[serde(default = "default_anthropic_api_base")]
    pub anthropic_api_base: String,
    /// Request timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            openai_api_base: default_openai_api_base(),
            anthropic_api_base: default_anthropic_api_base(),
            request_timeout_secs: None,
        }
    }
}

impl AiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Theme written into the `design` block of new resumes
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Language written into the `locale` block of new resumes
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_theme() -> String {
    "classic".to_string()
}

fn default_locale() -> String {
    "english".to_string()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/cvwright/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cvwright")
            .join("config.toml")
    }
}
