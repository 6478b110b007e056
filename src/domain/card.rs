//! Candidate and final flashcard types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Flashcard difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Wire/display name (lowercase, matches the serde rename)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A not-yet-finalized question/answer pair from a generation or refinement round
///
/// Candidate cards are only ever replaced wholesale: a refinement round
/// yields an entirely new set, never in-place edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCard {
    pub question: String,

    pub answer: String,

    /// Concept label supplied by the model
    #[serde(default)]
    pub concept: String,

    /// Difficulty claimed by the model; the requested difficulty is the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    /// Self-reported quality factor scores in [0,1], keyed by factor name
    #[serde(default)]
    pub quality_factors: HashMap<String, f64>,
}

/// Wire payload for generation and refinement responses: `{"flashcards": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardBatch {
    #[serde(default)]
    pub flashcards: Vec<CandidateCard>,
}

impl CardBatch {
    /// Wrap a candidate list in the wire envelope
    pub fn new(flashcards: Vec<CandidateCard>) -> Self {
        debug!(card_count = flashcards.len(), "CardBatch::new: called");
        Self { flashcards }
    }
}

/// Refinement summary metadata reported alongside the rewritten card set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImprovementSummary {
    #[serde(default)]
    pub cards_improved: u32,

    #[serde(default)]
    pub average_quality_gain: f64,

    #[serde(default)]
    pub average_word_reduction: f64,
}

/// Wire payload for a refinement response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinementOutcome {
    #[serde(default)]
    pub flashcards: Vec<CandidateCard>,

    #[serde(default)]
    pub improvement_summary: ImprovementSummary,
}

/// Final flashcard record, derived once at loop exit and immutable thereafter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Stable slug id: `<slugified topic>_<NNN>` (1-based, zero-padded)
    pub id: String,

    pub question: String,

    pub answer: String,

    pub topic: String,

    pub difficulty: Difficulty,

    pub concept: String,

    /// Weighted rubric score in [0,10]
    pub quality_score: f64,
}
