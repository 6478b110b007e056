//! Card materialization
//!
//! Converts the final candidate set into immutable [`Flashcard`] records.
//! Materialization is best-effort: it runs on whatever candidate set the
//! loop last produced, converged or not.

use tracing::debug;

use crate::domain::{CardBatch, Difficulty, Flashcard};
use crate::quality;

/// Slug form of a topic for card ids: lowercase, whitespace collapsed to `_`
pub fn slugify(topic: &str) -> String {
    topic.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// Derive final flashcards from a candidate batch
///
/// Ids are `<slug>_<NNN>`, 1-based in candidate order. Cards without
/// self-reported factors fall back to the set-level score from the last
/// assessment; cards with factors get the locally recomputed weighted
/// score, never the model's own number.
pub fn materialize(
    batch: &CardBatch,
    topic: &str,
    requested_difficulty: Difficulty,
    fallback_score: f64,
) -> Vec<Flashcard> {
    debug!(card_count = batch.flashcards.len(), %topic, "materialize: called");
    let slug = slugify(topic);

    batch
        .flashcards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let quality_score = if card.quality_factors.is_empty() {
                fallback_score
            } else {
                quality::aggregate(&card.quality_factors)
            };

            Flashcard {
                id: format!("{}_{:03}", slug, i + 1),
                question: card.question.clone(),
                answer: card.answer.clone(),
                topic: topic.to_string(),
                difficulty: card.difficulty.unwrap_or(requested_difficulty),
                concept: card.concept.clone(),
                quality_score,
            }
        })
        .collect()
}
