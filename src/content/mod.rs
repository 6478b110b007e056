//! Content sources for flashcard generation
//!
//! Content can come from the on-disk library, direct input, Wikipedia, or
//! be auto-generated by the LLM. [`ContentSupplier`] resolves whichever
//! source was requested into the final text the generation loop consumes.

pub mod manager;
pub mod wikipedia;

pub use manager::ContentManager;

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Difficulty;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts;

/// Errors from resolving content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content file not found: {0}")]
    FileNotFound(String),

    #[error("Content file must be specified when using the file source")]
    MissingFile,

    #[error("Content must be provided when using the direct source")]
    MissingContent,

    #[error("No content available for flashcard generation")]
    EmptyContent,

    #[error("{0}")]
    Wikipedia(String),

    #[error("Content I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Where the source text for a deck comes from
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum ContentSource {
    /// Ask the LLM to write educational content about the topic
    AutoGenerate,
    /// Read a .txt file from the content library
    File,
    /// Use text supplied directly by the caller
    Direct,
    /// Use a canned library file matched against the topic
    Predefined,
    /// Fetch an article summary from Wikipedia
    Wikipedia,
}

/// Inputs for content resolution
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub source: ContentSource,
    pub topic: String,
    pub text: Option<String>,
    pub file: Option<String>,
    pub difficulty: Difficulty,
}

/// Resolves a [`ContentRequest`] to the text fed into generation
pub struct ContentSupplier {
    manager: ContentManager,
    llm: Arc<dyn LlmClient>,
}

impl ContentSupplier {
    pub fn new(manager: ContentManager, llm: Arc<dyn LlmClient>) -> Self {
        debug!("ContentSupplier::new: called");
        Self { manager, llm }
    }

    /// Resolve a request to non-empty content text
    pub async fn resolve(&self, request: &ContentRequest) -> Result<String, ContentError> {
        debug!(source = ?request.source, topic = %request.topic, "resolve: called");

        let content = match request.source {
            ContentSource::AutoGenerate => {
                info!(topic = %request.topic, "Auto-generating content");
                self.auto_generate(&request.topic, request.difficulty).await?
            }
            ContentSource::File => {
                let file = request.file.as_deref().ok_or(ContentError::MissingFile)?;
                info!(%file, "Reading content from file");
                self.manager.read_file(file)?
            }
            ContentSource::Direct => {
                let text = request.text.as_deref().ok_or(ContentError::MissingContent)?;
                if text.trim().is_empty() {
                    return Err(ContentError::MissingContent);
                }
                text.to_string()
            }
            ContentSource::Predefined => {
                info!(topic = %request.topic, "Using predefined content");
                self.manager
                    .predefined_for_topic(&request.topic)
                    .unwrap_or_else(|| {
                        format!(
                            "Please provide content about {} to generate flashcards.",
                            request.topic
                        )
                    })
            }
            ContentSource::Wikipedia => {
                info!(topic = %request.topic, "Fetching content from Wikipedia");
                wikipedia::fetch_summary(&request.topic).await?
            }
        };

        let content = content.trim();
        if content.is_empty() {
            debug!("resolve: resolved content is empty");
            return Err(ContentError::EmptyContent);
        }

        info!(chars = content.len(), "Content resolved");
        Ok(content.to_string())
    }

    /// Ask the LLM to write educational content for the topic
    async fn auto_generate(&self, topic: &str, difficulty: Difficulty) -> Result<String, ContentError> {
        debug!(%topic, ?difficulty, "auto_generate: called");

        let request = CompletionRequest {
            system_prompt: prompts::CONTENT.to_string(),
            messages: vec![Message::user(prompts::content_user(topic, difficulty.as_str()))],
            max_tokens: 4000,
        };

        let response = self.llm.complete(request).await?;
        info!(chars = response.content.len(), "Generated content");
        Ok(response.content)
    }

    /// Access the underlying content library
    pub fn manager(&self) -> &ContentManager {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use tempfile::TempDir;

    fn supplier_with(responses: &[&str]) -> (TempDir, ContentSupplier) {
        let dir = TempDir::new().unwrap();
        let manager = ContentManager::new(dir.path().join("content")).unwrap();
        let llm = Arc::new(MockLlmClient::from_texts(responses));
        let supplier = ContentSupplier::new(manager, llm);
        (dir, supplier)
    }

    fn request(source: ContentSource) -> ContentRequest {
        ContentRequest {
            source,
            topic: "MQTT".to_string(),
            text: None,
            file: None,
            difficulty: Difficulty::Intermediate,
        }
    }

    #[tokio::test]
    async fn test_direct_source() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::Direct);
        req.text = Some("MQTT is a pub/sub protocol.".to_string());

        let content = supplier.resolve(&req).await.unwrap();
        assert_eq!(content, "MQTT is a pub/sub protocol.");
    }

    #[tokio::test]
    async fn test_direct_source_trims_whitespace() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::Direct);
        req.text = Some("  MQTT is a pub/sub protocol.  \n".to_string());

        let content = supplier.resolve(&req).await.unwrap();
        assert_eq!(content, "MQTT is a pub/sub protocol.");
    }

    #[tokio::test]
    async fn test_auto_generated_content_trimmed() {
        let (_dir, supplier) = supplier_with(&["\nGenerated content.\n\n"]);
        let req = request(ContentSource::AutoGenerate);

        let content = supplier.resolve(&req).await.unwrap();
        assert_eq!(content, "Generated content.");
    }

    #[tokio::test]
    async fn test_direct_source_missing_text() {
        let (_dir, supplier) = supplier_with(&[]);
        let req = request(ContentSource::Direct);

        assert!(matches!(
            supplier.resolve(&req).await,
            Err(ContentError::MissingContent)
        ));
    }

    #[tokio::test]
    async fn test_direct_source_blank_text() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::Direct);
        req.text = Some("   ".to_string());

        assert!(matches!(
            supplier.resolve(&req).await,
            Err(ContentError::MissingContent)
        ));
    }

    #[tokio::test]
    async fn test_file_source() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::File);
        req.file = Some("azure_openai.txt".to_string());

        let content = supplier.resolve(&req).await.unwrap();
        assert!(content.contains("Azure OpenAI Service"));
    }

    #[tokio::test]
    async fn test_file_source_requires_filename() {
        let (_dir, supplier) = supplier_with(&[]);
        let req = request(ContentSource::File);

        assert!(matches!(
            supplier.resolve(&req).await,
            Err(ContentError::MissingFile)
        ));
    }

    #[tokio::test]
    async fn test_predefined_source_matches_topic() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::Predefined);
        req.topic = "Azure Functions deep dive".to_string();

        let content = supplier.resolve(&req).await.unwrap();
        assert!(content.contains("serverless"));
    }

    #[tokio::test]
    async fn test_predefined_source_fallback_prompt() {
        let (_dir, supplier) = supplier_with(&[]);
        let mut req = request(ContentSource::Predefined);
        req.topic = "Kubernetes".to_string();

        let content = supplier.resolve(&req).await.unwrap();
        assert!(content.contains("Please provide content about Kubernetes"));
    }

    #[tokio::test]
    async fn test_auto_generate_uses_llm() {
        let (_dir, supplier) = supplier_with(&["Generated MQTT content with key concepts."]);
        let req = request(ContentSource::AutoGenerate);

        let content = supplier.resolve(&req).await.unwrap();
        assert_eq!(content, "Generated MQTT content with key concepts.");
    }
}
