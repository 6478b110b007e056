//! LLM client abstraction and provider implementations
//!
//! The generate/assess/refine loop talks to a single [`LlmClient`] trait
//! object; the concrete provider is picked from configuration at startup.

pub mod azure;
pub mod client;
pub mod error;
pub mod openai;
pub mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};

use std::sync::Arc;
use tracing::debug;

use crate::config::LlmConfig;

/// Create an LLM client for the configured provider
///
/// Recognized providers are `azure` and `openai`.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "azure" => Ok(Arc::new(azure::AzureClient::from_config(config)?)),
        "openai" => Ok(Arc::new(openai::OpenAIClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: {other} (expected 'azure' or 'openai')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "bedrock".to_string(),
            ..Default::default()
        };

        let result = create_client(&config);
        assert!(result.is_err());
        let msg = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("bedrock"));
    }
}
