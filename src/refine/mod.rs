//! The generate/assess/refine loop
//!
//! [`RefineEngine`] runs the three-stage loop against an LLM client and
//! [`materialize`] converts whatever candidate set survives into final
//! flashcards.

pub mod engine;
pub mod materialize;

pub use engine::{RefineConfig, RefineEngine, RefineOutcome};
pub use materialize::{materialize, slugify};
