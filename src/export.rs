//! CSV deck export

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Flashcard;

/// Errors from exporting a deck
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No flashcards to export")]
    NoCards,

    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column order is part of the format; downstream import tooling keys on it
const HEADER: [&str; 8] = [
    "id",
    "question",
    "answer",
    "topic",
    "difficulty",
    "quality_score",
    "concept",
    "created_date",
];

/// Export flashcards to a CSV file under `output_dir`
///
/// When `filename` is None a timestamped name is generated. Returns the
/// path of the written file; an empty deck is an error rather than an
/// empty file.
pub fn export_csv(
    flashcards: &[Flashcard],
    output_dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    debug!(card_count = flashcards.len(), dir = %output_dir.display(), "export_csv: called");

    if flashcards.is_empty() {
        return Err(ExportError::NoCards);
    }

    fs::create_dir_all(output_dir)?;

    let filename = match filename {
        Some(name) => name.to_string(),
        None => format!("flashcards_{}.csv", Local::now().format("%Y%m%d_%H%M%S")),
    };
    let path = output_dir.join(filename);

    let created_date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(HEADER)?;
    for card in flashcards {
        let score = format!("{:.1}", card.quality_score);
        writer.write_record([
            card.id.as_str(),
            card.question.as_str(),
            card.answer.as_str(),
            card.topic.as_str(),
            card.difficulty.as_str(),
            score.as_str(),
            card.concept.as_str(),
            created_date.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(card_count = flashcards.len(), path = %path.display(), "Exported flashcards");
    Ok(path)
}
