//! Azure OpenAI API client implementation
//!
//! Implements the LlmClient trait against an Azure OpenAI chat-completions
//! deployment: the model lives in the deployment URL and auth uses the
//! `api-key` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Sampling parameters for reproducible card generation
const TEMPERATURE: f64 = 0.1;
const TOP_P: f64 = 0.9;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Azure OpenAI API client
pub struct AzureClient {
    deployment: String,
    api_key: String,
    endpoint: String,
    api_version: String,
    http: Client,
    max_tokens: u32,
}

impl AzureClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            deployment: config.model.clone(),
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Deployment-scoped chat completions URL
    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    /// Build the request body for the Azure OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(deployment = %self.deployment, max_tokens = request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(request.messages.iter().map(|m| serde_json::json!(m)));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut body = serde_json::json!({
            "messages": messages,
            "temperature": TEMPERATURE,
            "top_p": TOP_P,
        });

        // Reasoning-model deployments take max_completion_tokens instead of max_tokens
        let uses_completion_tokens = ["o1", "o3", "o4", "gpt-5"]
            .iter()
            .any(|p| self.deployment.starts_with(p));
        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Parse the chat completions response into a CompletionResponse
    fn parse_response(&self, api_response: ChatResponse) -> Result<CompletionResponse, LlmError> {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            debug!("parse_response: empty content");
            return Err(LlmError::EmptyResponse);
        }

        Ok(CompletionResponse {
            content,
            usage: TokenUsage {
                input_tokens: api_response.usage.prompt_tokens,
                output_tokens: api_response.usage.completion_tokens,
            },
        })
    }
}

#[async_trait]
impl LlmClient for AzureClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(deployment = %self.deployment, max_tokens = request.max_tokens, "complete: called");
        let url = self.completions_url();
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(&url)
                .header("api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            debug!("complete: success");
            let api_response: ChatResponse = response.json().await?;
            return self.parse_response(api_response);
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

// Chat completions response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn test_client(deployment: &str) -> AzureClient {
        AzureClient {
            deployment: deployment.to_string(),
            api_key: "test-key".to_string(),
            endpoint: "https://example.openai.azure.com".to_string(),
            api_version: "2024-12-01-preview".to_string(),
            http: Client::new(),
            max_tokens: 3000,
        }
    }

    #[test]
    fn test_completions_url() {
        let client = test_client("o4-mini");
        assert_eq!(
            client.completions_url(),
            "https://example.openai.azure.com/openai/deployments/o4-mini/chat/completions?api-version=2024-12-01-preview"
        );
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client("gpt-4o");

        let request = CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], 0.1);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_build_request_body_reasoning_deployment() {
        let client = test_client("o4-mini");

        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["max_completion_tokens"], 1000);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client("gpt-4o");

        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 9000,
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 3000);
    }

    #[test]
    fn test_parse_response_empty_content_is_error() {
        let client = test_client("gpt-4o");
        let api_response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: Some("   ".to_string()),
                },
            }],
            usage: ChatUsage::default(),
        };

        let result = client.parse_response(api_response);
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_content_and_usage() {
        let client = test_client("gpt-4o");
        let api_response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: Some("hello".to_string()),
                },
            }],
            usage: ChatUsage {
                prompt_tokens: 12,
                completion_tokens: 3,
            },
        };

        let resp = client.parse_response(api_response).unwrap();
        assert_eq!(resp.content, "hello");
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 3);
    }
}
