//! Cardsmith - Iterative LLM Flashcard Generator
//!
//! CLI entry point for generating and exporting flashcard decks.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use cardsmith::anki::{self, AnkiClient};
use cardsmith::cli::{Cli, Command};
use cardsmith::config::Config;
use cardsmith::content::{ContentManager, ContentRequest, ContentSource, ContentSupplier};
use cardsmith::domain::{Difficulty, Flashcard};
use cardsmith::export::export_csv;
use cardsmith::llm::create_client;
use cardsmith::refine::{RefineConfig, RefineEngine};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardsmith")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("cardsmith.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(provider = %config.llm.provider, model = %config.llm.model, "Cardsmith loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Generate {
            topic,
            source,
            file,
            text,
            difficulty,
            max_iterations,
            quality_threshold,
            output,
            no_export,
        }) => {
            debug!(%topic, ?source, "main: matched Generate command");
            let params = GenerateParams {
                topic,
                source,
                file,
                text,
                difficulty,
                max_iterations: max_iterations.unwrap_or(config.generation.max_iterations),
                quality_threshold: quality_threshold.unwrap_or(config.generation.quality_threshold),
                output,
                no_export,
            };
            cmd_generate(&config, params).await
        }
        Some(Command::Sources) => {
            debug!("main: matched Sources command");
            cmd_sources(&config)
        }
        Some(Command::Recommend { url }) => {
            debug!(%url, "main: matched Recommend command");
            cmd_recommend(&url).await
        }
        Some(Command::Check) => {
            debug!("main: matched Check command");
            cmd_check(&config)
        }
        Some(Command::Interactive) => {
            debug!("main: matched Interactive command");
            cmd_interactive(&config).await
        }
        None => {
            debug!("main: no command, starting interactive session");
            cmd_interactive(&config).await
        }
    }
}

/// Resolved inputs for one generation run
struct GenerateParams {
    topic: String,
    source: ContentSource,
    file: Option<String>,
    text: Option<String>,
    difficulty: Difficulty,
    max_iterations: u32,
    quality_threshold: f64,
    output: Option<String>,
    no_export: bool,
}

/// Run the full pipeline: resolve content, refine, print, export
async fn cmd_generate(config: &Config, params: GenerateParams) -> Result<()> {
    debug!(topic = %params.topic, "cmd_generate: called");

    config.validate()?;
    let llm = create_client(&config.llm)?;

    let manager = ContentManager::new(&config.content.content_dir)?;
    let supplier = ContentSupplier::new(manager, llm.clone());

    let request = ContentRequest {
        source: params.source,
        topic: params.topic.clone(),
        text: params.text,
        file: params.file,
        difficulty: params.difficulty,
    };
    let content = supplier.resolve(&request).await?;

    let engine = RefineEngine::new(
        llm,
        RefineConfig {
            topic: params.topic.clone(),
            difficulty: params.difficulty,
            max_iterations: params.max_iterations,
            quality_threshold: params.quality_threshold,
        },
        config.llm.max_tokens,
    );

    let outcome = engine.run(&content).await?;

    print_flashcards(&outcome.flashcards);

    if outcome.converged {
        println!("\n{}", "Quality threshold reached.".green());
    } else {
        println!(
            "\n{}",
            format!(
                "Budget of {} iterations exhausted; exporting best effort.",
                params.max_iterations
            )
            .yellow()
        );
    }
    if let Some(score) = outcome.final_score() {
        println!("Final assessed score: {score:.1}/10");
    }

    if params.no_export {
        return Ok(());
    }

    if outcome.flashcards.is_empty() {
        println!("{}", "No cards produced; nothing to export.".yellow());
        return Ok(());
    }

    let path = export_csv(&outcome.flashcards, &config.export.output_dir, params.output.as_deref())?;
    println!("Exported {} cards to {}", outcome.flashcards.len(), path.display());

    Ok(())
}

/// List content library files
fn cmd_sources(config: &Config) -> Result<()> {
    debug!("cmd_sources: called");
    let manager = ContentManager::new(&config.content.content_dir)?;

    println!("Content directory: {}", manager.dir_path().display());
    let files = manager.list_files()?;
    if files.is_empty() {
        println!("No content files found.");
    } else {
        for (i, file) in files.iter().enumerate() {
            println!("{}. {}", i + 1, file);
        }
    }
    println!("\nAdd your own .txt files to the content directory, or edit custom_content.txt.");
    Ok(())
}

/// Analyze Anki review history and print revisit recommendations
async fn cmd_recommend(url: &str) -> Result<()> {
    debug!(%url, "cmd_recommend: called");
    let client = AnkiClient::new(url);
    let cards = client.fetch_reviewed_cards().await?;
    let struggling = anki::struggle_cards(cards);

    if struggling.is_empty() {
        println!("No struggle cards in your recent reviews. Keep going!");
        return Ok(());
    }

    println!("{}\n", "Areas You Should Revisit or Explore Deeper:".bold());
    for (deck, cards) in anki::group_by_deck(struggling) {
        println!("Deck: {}", deck.cyan());
        for card in &cards {
            let question = card.question.replace('\n', " ");
            println!("  - Flashcard: \"{}\"", question.trim());
            println!("    - Lapses: {}, Ease: {}", card.lapses, card.ease);
        }
        println!();
    }
    Ok(())
}

/// Check provider configuration and environment
fn cmd_check(config: &Config) -> Result<()> {
    debug!("cmd_check: called");
    println!("{}", "PROVIDER CONFIGURATION CHECK".bold());
    println!("{}", "=".repeat(50));

    println!("Provider:    {}", config.llm.provider);
    println!("Model:       {}", config.llm.model);
    println!("API version: {}", config.llm.api_version);

    let mut ok = true;

    if config.llm.endpoint.is_empty() {
        if config.llm.provider == "azure" {
            println!("Endpoint:    {}", "missing (set llm.endpoint)".red());
            ok = false;
        } else {
            println!("Endpoint:    {} (default)", "https://api.openai.com");
        }
    } else {
        println!("Endpoint:    {}", config.llm.endpoint.green());
    }

    match config.llm.get_api_key() {
        Ok(key) => {
            println!("API key:     {} ({})", mask_key(&key).green(), config.llm.api_key_env);
        }
        Err(_) => {
            println!("API key:     {}", format!("missing ({} not set)", config.llm.api_key_env).red());
            ok = false;
        }
    }

    if ok {
        println!("\n{}", "Configuration looks good.".green());
        Ok(())
    } else {
        println!("\n{}", "Configuration incomplete. Set the missing values and retry.".red());
        Err(eyre::eyre!("configuration incomplete"))
    }
}

/// Prompt for generation parameters, then run the pipeline
async fn cmd_interactive(config: &Config) -> Result<()> {
    debug!("cmd_interactive: called");
    let mut rl = DefaultEditor::new()?;

    println!("{}", "CARDSMITH FLASHCARD GENERATOR".bold());
    println!("{}", "=".repeat(50));

    let topic = match prompt(&mut rl, "Topic: ")? {
        Some(t) if !t.is_empty() => t,
        Some(_) => "Azure OpenAI Service".to_string(),
        None => return Ok(()),
    };

    println!("\nContent source options:");
    println!("1. Auto-generate content");
    println!("2. Read from content file");
    println!("3. Paste content directly");
    println!("4. Use predefined content");
    println!("5. Fetch from Wikipedia");

    let source = match prompt(&mut rl, "Choose content source (1-5, default: 1): ")? {
        Some(choice) => match choice.as_str() {
            "2" => ContentSource::File,
            "3" => ContentSource::Direct,
            "4" => ContentSource::Predefined,
            "5" => ContentSource::Wikipedia,
            _ => ContentSource::AutoGenerate,
        },
        None => return Ok(()),
    };

    let mut file = None;
    let mut text = None;

    match source {
        ContentSource::File => {
            let manager = ContentManager::new(&config.content.content_dir)?;
            let files = manager.list_files()?;
            println!("\nAvailable content files ({}):", manager.dir_path().display());
            for (i, name) in files.iter().enumerate() {
                println!("{}. {}", i + 1, name);
            }
            let choice = match prompt(&mut rl, "Choose file (number or name): ")? {
                Some(c) => c,
                None => return Ok(()),
            };
            let mut name = match choice.parse::<usize>() {
                Ok(n) if n >= 1 && n <= files.len() => files[n - 1].clone(),
                _ => choice,
            };
            if !name.ends_with(".txt") {
                name.push_str(".txt");
            }
            file = Some(name);
        }
        ContentSource::Direct => {
            println!("\nPaste your content; finish with an empty line:");
            let mut lines = Vec::new();
            loop {
                match prompt(&mut rl, "")? {
                    Some(line) if line.is_empty() => break,
                    Some(line) => lines.push(line),
                    None => break,
                }
            }
            text = Some(lines.join("\n"));
        }
        _ => {}
    }

    println!("\nDifficulty levels: 1. Beginner  2. Intermediate  3. Advanced");
    let difficulty = match prompt(&mut rl, "Choose difficulty (1-3, default: 2): ")? {
        Some(choice) => match choice.as_str() {
            "1" => Difficulty::Beginner,
            "3" => Difficulty::Advanced,
            _ => Difficulty::Intermediate,
        },
        None => return Ok(()),
    };

    let quality_threshold = match prompt(
        &mut rl,
        &format!("Quality threshold (0-10, default: {}): ", config.generation.quality_threshold),
    )? {
        Some(choice) => choice.parse::<f64>().unwrap_or(config.generation.quality_threshold),
        None => return Ok(()),
    };

    let params = GenerateParams {
        topic,
        source,
        file,
        text,
        difficulty,
        max_iterations: config.generation.max_iterations,
        quality_threshold,
        output: None,
        no_export: false,
    };
    cmd_generate(config, params).await
}

/// Read one trimmed line; None means the user bailed out (Ctrl-C/Ctrl-D)
fn prompt(rl: &mut DefaultEditor, text: &str) -> Result<Option<String>> {
    match rl.readline(text) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Aborted.");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Mask an API key down to its last four characters
fn mask_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{tail}")
}

/// Per-difficulty card counts in first-seen order, e.g. "beginner: 2, advanced: 1"
fn difficulty_summary(flashcards: &[Flashcard]) -> String {
    let mut counts: Vec<(Difficulty, usize)> = Vec::new();
    for card in flashcards {
        match counts.iter_mut().find(|(d, _)| *d == card.difficulty) {
            Some((_, n)) => *n += 1,
            None => counts.push((card.difficulty, 1)),
        }
    }
    counts
        .iter()
        .map(|(d, n)| format!("{d}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a deck in a readable format
fn print_flashcards(flashcards: &[Flashcard]) {
    println!("\n{}", "FLASHCARDS".bold());
    println!("{}", "=".repeat(60));
    println!("Total cards: {}", flashcards.len());

    if !flashcards.is_empty() {
        let avg = flashcards.iter().map(|c| c.quality_score).sum::<f64>() / flashcards.len() as f64;
        println!("Average quality: {avg:.1}/10");
        println!("Difficulty distribution: {}", difficulty_summary(flashcards));
    }

    for (i, card) in flashcards.iter().enumerate() {
        println!("\n{} ({})", format!("Card {}", i + 1).bold(), card.difficulty);
        println!("  Q: {}", card.question.cyan());
        println!("  A: {}", card.answer.green());
        println!("  Concept: {}", card.concept);
        println!("  Quality: {:.1}/10", card.quality_score);
    }
}
