//! Cardsmith - Iterative LLM Flashcard Generator
//!
//! Cardsmith turns source text into study flashcards by looping an LLM
//! through three stages: draft a card set, critique it against a fixed
//! ten-factor rubric, then rewrite it using the critique. The loop repeats
//! until the assessed quality clears a threshold or the iteration budget
//! runs out, then the best-effort card set is materialized and exported.
//!
//! # Core Concepts
//!
//! - **Quality Gate**: convergence needs the overall score, the critical
//!   issue count, and every card's factor floors to pass simultaneously
//! - **Best Effort**: exhausting the budget is not an error; the last
//!   successful card set is always materialized
//! - **Sequential Calls**: exactly one outstanding completion call at a
//!   time; per-topic state is never shared
//!
//! # Modules
//!
//! - [`llm`] - completion service trait and provider clients
//! - [`content`] - content suppliers (files, Wikipedia, auto-generation)
//! - [`quality`] - the scoring rubric
//! - [`refine`] - the generate/assess/refine loop engine and materializer
//! - [`export`] - CSV export collaborator
//! - [`anki`] - AnkiConnect review analysis and revisit recommendations
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod anki;
pub mod cli;
pub mod config;
pub mod content;
pub mod domain;
pub mod export;
pub mod llm;
pub mod prompts;
pub mod quality;
pub mod refine;

// Re-export commonly used types
pub use anki::{AnkiClient, AnkiError, ReviewedCard};
pub use config::{Config, ExportConfig, GenerationConfig, LlmConfig};
pub use content::{ContentError, ContentManager, ContentRequest, ContentSource};
pub use domain::{
    AssessmentReport, CandidateCard, CardAssessment, CardBatch, Difficulty, Flashcard, IterationRecord, PenaltyTag,
    QualityDistribution, RefinementOutcome, RewardTag,
};
pub use export::{ExportError, export_csv};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, Role, create_client};
pub use refine::{RefineConfig, RefineEngine, RefineOutcome, materialize, slugify};
