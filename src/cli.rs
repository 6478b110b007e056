//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::content::ContentSource;
use crate::domain::Difficulty;

/// Cardsmith - Iterative LLM Flashcard Generator
#[derive(Parser)]
#[command(
    name = "cardsmith",
    about = "Generates study flashcards by iteratively refining LLM output against a quality rubric",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a flashcard deck for a topic (batch mode)
    Generate {
        /// Topic to generate flashcards for
        topic: String,

        /// Where the source content comes from
        #[arg(short, long, value_enum, default_value = "auto-generate")]
        source: ContentSource,

        /// Content file name (for the file source)
        #[arg(short, long)]
        file: Option<String>,

        /// Inline content text (for the direct source)
        #[arg(short = 't', long)]
        text: Option<String>,

        /// Target difficulty level
        #[arg(short, long, value_enum, default_value = "intermediate")]
        difficulty: Difficulty,

        /// Maximum refinement iterations
        #[arg(short, long)]
        max_iterations: Option<u32>,

        /// Minimum overall score (0-10) for convergence
        #[arg(short, long)]
        quality_threshold: Option<f64>,

        /// CSV output file name (timestamped when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the deck without writing a CSV
        #[arg(long)]
        no_export: bool,
    },

    /// List available content files
    Sources,

    /// Recommend decks and cards to revisit based on Anki review history
    Recommend {
        /// AnkiConnect endpoint URL
        #[arg(long, default_value = crate::anki::DEFAULT_ANKI_URL)]
        url: String,
    },

    /// Check provider configuration and environment
    Check,

    /// Prompt for generation parameters interactively
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from(["cardsmith", "generate", "MQTT"]).unwrap();
        match cli.command {
            Some(Command::Generate {
                topic,
                source,
                difficulty,
                max_iterations,
                no_export,
                ..
            }) => {
                assert_eq!(topic, "MQTT");
                assert_eq!(source, ContentSource::AutoGenerate);
                assert_eq!(difficulty, Difficulty::Intermediate);
                assert_eq!(max_iterations, None);
                assert!(!no_export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_generate_with_options() {
        let cli = Cli::try_parse_from([
            "cardsmith",
            "generate",
            "Azure Functions",
            "--source",
            "file",
            "--file",
            "azure_functions.txt",
            "--difficulty",
            "advanced",
            "--max-iterations",
            "5",
            "--quality-threshold",
            "9.0",
            "--output",
            "deck.csv",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Generate {
                source,
                file,
                difficulty,
                max_iterations,
                quality_threshold,
                output,
                ..
            }) => {
                assert_eq!(source, ContentSource::File);
                assert_eq!(file.as_deref(), Some("azure_functions.txt"));
                assert_eq!(difficulty, Difficulty::Advanced);
                assert_eq!(max_iterations, Some(5));
                assert_eq!(quality_threshold, Some(9.0));
                assert_eq!(output.as_deref(), Some("deck.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_wikipedia_source() {
        let cli = Cli::try_parse_from(["cardsmith", "generate", "MQTT", "--source", "wikipedia"]).unwrap();
        match cli.command {
            Some(Command::Generate { source, .. }) => assert_eq!(source, ContentSource::Wikipedia),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["cardsmith", "--log-level", "DEBUG", "--config", "my.yml", "sources"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(cli.config, Some(PathBuf::from("my.yml")));
        assert!(matches!(cli.command, Some(Command::Sources)));
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from(["cardsmith", "recommend"]).unwrap();
        match cli.command {
            Some(Command::Recommend { url }) => assert_eq!(url, crate::anki::DEFAULT_ANKI_URL),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["cardsmith", "recommend", "--url", "http://localhost:9999"]).unwrap();
        match cli.command {
            Some(Command::Recommend { url }) => assert_eq!(url, "http://localhost:9999"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::try_parse_from(["cardsmith"]).unwrap();
        assert!(cli.command.is_none());
    }
}
