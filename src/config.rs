//! Cardsmith configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Cardsmith configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Generation loop configuration
    pub generation: GenerationConfig,

    /// Content library configuration
    pub content: ContentConfig,

    /// Export configuration
    pub export: ExportConfig,

    /// Log level override (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set. Call this early
    /// in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        // Check LLM API key environment variable is set
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }

        if self.generation.quality_threshold < 0.0 || self.generation.quality_threshold > 10.0 {
            return Err(eyre::eyre!(
                "quality-threshold must be between 0 and 10 (got {})",
                self.generation.quality_threshold
            ));
        }

        if self.generation.max_iterations == 0 {
            return Err(eyre::eyre!("max-iterations must be at least 1"));
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .cardsmith.yml
        let local_config = PathBuf::from(".cardsmith.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/cardsmith/cardsmith.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cardsmith").join("cardsmith.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level from the config file, before full load
    ///
    /// Logging has to be initialized before configuration errors can be
    /// reported, so this swallows all failures and returns None.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let config = Self::load(config_path).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("azure" or "openai")
    pub provider: String,

    /// Model identifier (for Azure, the deployment name)
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API endpoint (Azure resource endpoint, or OpenAI-compatible base URL)
    pub endpoint: String,

    /// Azure API version query parameter
    #[serde(rename = "api-version")]
    pub api_version: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.api_key_env
            )
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
            endpoint: String::new(),
            api_version: "2024-12-01-preview".to_string(),
            max_tokens: 3000,
            timeout_ms: 120_000,
        }
    }
}

/// Generation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum refinement iterations before giving up
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,

    /// Minimum overall score (0-10) for convergence
    #[serde(rename = "quality-threshold")]
    pub quality_threshold: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            quality_threshold: 8.0,
        }
    }
}

/// Content library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding source content files
    #[serde(rename = "content-dir")]
    pub content_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory CSV decks are written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("decks"),
        }
    }
}
