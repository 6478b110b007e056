//! Wikipedia content source
//!
//! Fetches the lead-section summary of an article via the Wikipedia REST API.

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::ContentError;

const API_BASE: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
}

/// Fetch the summary of a Wikipedia article for the given topic
///
/// The topic is used as the article title; spaces become underscores per
/// Wikipedia title conventions.
pub async fn fetch_summary(topic: &str) -> Result<String, ContentError> {
    debug!(%topic, "fetch_summary: called");

    let title = topic.trim().replace(' ', "_");
    let url = format!("{API_BASE}/{title}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("cardsmith/0.1 (content source)")
        .build()
        .map_err(|e| ContentError::Wikipedia(e.to_string()))?;

    debug!(%url, "fetch_summary: sending HTTP request");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ContentError::Wikipedia(format!("Failed to fetch Wikipedia content: {e}")))?;

    if !response.status().is_success() {
        debug!(status = %response.status(), "fetch_summary: HTTP error status");
        return Err(ContentError::Wikipedia(format!(
            "Could not fetch Wikipedia content for '{topic}' (HTTP {})",
            response.status()
        )));
    }

    let summary: SummaryResponse = response
        .json()
        .await
        .map_err(|e| ContentError::Wikipedia(format!("Invalid Wikipedia response: {e}")))?;

    if summary.extract.trim().is_empty() {
        debug!("fetch_summary: empty extract");
        return Err(ContentError::Wikipedia(format!(
            "Wikipedia article for '{topic}' has no summary text"
        )));
    }

    debug!(chars = summary.extract.len(), "fetch_summary: success");
    Ok(summary.extract)
}
