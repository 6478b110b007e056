//! Card data model and LLM wire payloads
//!
//! The structs here mirror the JSON the model is instructed to emit for
//! each loop stage, plus the final flashcard record produced at loop exit.

mod assessment;
mod card;
mod record;

pub use assessment::{AssessmentReport, CardAssessment, PenaltyTag, QualityDistribution, RewardTag};
pub use card::{CandidateCard, CardBatch, Difficulty, Flashcard, ImprovementSummary, RefinementOutcome};
pub use record::IterationRecord;
