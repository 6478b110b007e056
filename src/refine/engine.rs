//! RefineEngine - executes generate/assess/refine loop iterations

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info, warn};

use crate::domain::{AssessmentReport, CardBatch, Difficulty, Flashcard, IterationRecord, RefinementOutcome};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts;
use crate::quality;

use super::materialize::materialize;

/// Feedback seeded into the very first generation round
const INITIAL_FEEDBACK: &str = "Initial creation - focus on high-quality, concise flashcards.";

/// Feedback used when an assessment carried no improvement priorities
const DEFAULT_FEEDBACK: &str =
    "Continue improving quality with focus on technical precision and bidirectional design.";

/// Per-run loop parameters
#[derive(Debug, Clone)]
pub struct RefineConfig {
    pub topic: String,
    pub difficulty: Difficulty,
    pub max_iterations: u32,
    pub quality_threshold: f64,
}

/// Result of a full loop run
#[derive(Debug)]
pub struct RefineOutcome {
    /// Materialized cards from the last successful candidate set
    pub flashcards: Vec<Flashcard>,

    /// Whether the quality gate was cleared before the budget ran out
    pub converged: bool,

    /// One record per successfully assessed iteration
    pub history: Vec<IterationRecord>,
}

impl RefineOutcome {
    /// Overall score from the last assessed iteration, if any
    pub fn final_score(&self) -> Option<f64> {
        self.history.last().map(|r| r.overall_score)
    }
}

/// Loop execution engine
///
/// Drives the three-stage refinement loop against a single LLM client.
/// Calls are strictly sequential; one engine run owns all its state.
pub struct RefineEngine {
    llm: Arc<dyn LlmClient>,
    config: RefineConfig,
    max_tokens: u32,
}

impl RefineEngine {
    /// Create a new engine
    pub fn new(llm: Arc<dyn LlmClient>, config: RefineConfig, max_tokens: u32) -> Self {
        debug!(topic = %config.topic, max_iterations = config.max_iterations, "RefineEngine::new: called");
        Self { llm, config, max_tokens }
    }

    /// Run the loop over the given source content
    ///
    /// Parse failures in generation or assessment waste the iteration and
    /// continue; a parse failure in refinement ends the loop, because the
    /// next round would have no usable feedback to build on. Transport
    /// errors are fatal. Whatever candidate set survived is materialized,
    /// converged or not.
    pub async fn run(&self, content: &str) -> Result<RefineOutcome> {
        info!(topic = %self.config.topic, "Creating flashcards");
        info!(chars = content.len(), difficulty = %self.config.difficulty, "Content ready");

        let mut feedback = INITIAL_FEEDBACK.to_string();
        let mut current: Option<CardBatch> = None;
        let mut last_score = 0.0;
        let mut history = Vec::new();
        let mut converged = false;

        for iteration in 1..=self.config.max_iterations {
            info!(iteration, max = self.config.max_iterations, "Iteration");

            // Stage 1: generate
            info!("Generating flashcards...");
            let response = self.complete(prompts::GENERATE, prompts::generate_user(
                &self.config.topic,
                content,
                self.config.difficulty.as_str(),
                &feedback,
            ))
            .await?;

            let batch: CardBatch = match parse_payload(&response) {
                Ok(b) => b,
                Err(e) => {
                    warn!(iteration, %e, "Failed to parse generated flashcards; wasting iteration");
                    continue;
                }
            };

            info!(card_count = batch.flashcards.len(), "Generated cards");
            if batch.flashcards.is_empty() {
                warn!(iteration, "Generation produced no cards; wasting iteration");
                continue;
            }

            let batch_json = serde_json::to_string(&batch)?;
            current = Some(batch);

            // Stage 2: assess
            info!("Assessing flashcard quality...");
            let response = self
                .complete(prompts::ASSESS, prompts::assess_user(&batch_json, &self.config.topic))
                .await?;

            let report: AssessmentReport = match parse_payload(&response) {
                Ok(r) => r,
                Err(e) => {
                    warn!(iteration, %e, "Failed to parse assessment; wasting iteration");
                    continue;
                }
            };

            info!(score = report.overall_score, critical = report.critical_issues, "Quality assessed");
            info!(distribution = ?report.quality_distribution, "Quality distribution");

            last_score = report.overall_score;
            history.push(IterationRecord::from_report(iteration, &report));

            if self.quality_gate(&report) {
                info!("Quality threshold reached across all critical factors");
                converged = true;
                break;
            }

            // Stage 3: refine, only while iterations remain
            if iteration == self.config.max_iterations {
                debug!("run: budget exhausted, skipping refinement");
                break;
            }

            info!("Refining flashcards...");
            let report_json = serde_json::to_string(&report)?;
            let response = self
                .complete(
                    prompts::REFINE,
                    prompts::refine_user(&batch_json, &report_json, &self.config.topic),
                )
                .await?;

            let outcome: RefinementOutcome = match parse_payload(&response) {
                Ok(o) => o,
                Err(e) => {
                    warn!(iteration, %e, "Failed to parse refinement; ending loop");
                    break;
                }
            };

            info!(
                cards_improved = outcome.improvement_summary.cards_improved,
                quality_gain = outcome.improvement_summary.average_quality_gain,
                word_reduction = outcome.improvement_summary.average_word_reduction,
                "Refinement applied"
            );

            current = Some(CardBatch::new(outcome.flashcards));
            feedback = report.feedback().unwrap_or_else(|| DEFAULT_FEEDBACK.to_string());
        }

        let flashcards = match &current {
            Some(batch) => materialize(batch, &self.config.topic, self.config.difficulty, last_score),
            None => Vec::new(),
        };

        if let Some(last) = history.last() {
            info!(score = last.overall_score, distribution = ?last.quality_distribution, "Final quality metrics");
        }
        info!(card_count = flashcards.len(), converged, "Flashcard creation finished");

        Ok(RefineOutcome {
            flashcards,
            converged,
            history,
        })
    }

    /// Convergence gate: score, critical issues, and per-card floors
    ///
    /// Floors are recomputed locally from the assessor's factor scores;
    /// the model's own weighted scores are not trusted for this check.
    fn quality_gate(&self, report: &AssessmentReport) -> bool {
        debug!(score = report.overall_score, critical = report.critical_issues, "quality_gate: called");

        if report.overall_score < self.config.quality_threshold || report.critical_issues != 0 {
            return false;
        }

        report.assessments.iter().all(|a| quality::meets_floor(&a.quality_factors))
    }

    async fn complete(&self, system_prompt: &str, user_message: String) -> Result<String> {
        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            messages: vec![Message::user(user_message)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}

/// Parse a JSON payload from an LLM response, tolerating code fences
fn parse_payload<T: serde::de::DeserializeOwned>(response: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(response))
}

/// Strip a surrounding markdown code fence, if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
