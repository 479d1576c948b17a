//! Trilang CLI
//!
//! Identifies the language of a text from its character trigrams.
//!
//! Text can be passed as an argument, read from a file or piped on stdin.
//! Results are printed to stdout, logs to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use trilang_classifiers::{classifier_from_config, TrigramClassifier, DEFAULT_MAX_TRIGRAMS};

mod commands;
mod config;

use commands::{DetectOptions, Input};

#[derive(Parser, Debug)]
#[command(name = "trilang")]
#[command(about = "Trigram-based language identification", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TRILANG_CONFIG", default_value = "trilang.yaml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify the language of TEXT, a file, or stdin
    Detect {
        /// Text to classify; stdin is read when omitted
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Also list the N best-scoring languages
        #[arg(short, long)]
        top: Option<usize>,

        /// Print JSON
        #[arg(long)]
        json: bool,

        /// Exit with an error when confidence is below this value
        #[arg(long, value_name = "CONFIDENCE")]
        min_confidence: Option<f64>,
    },

    /// List the configured language codes
    Languages,

    /// Build a profile store from `<code>.txt` corpus files
    BuildProfiles {
        /// Directory holding one corpus file per language
        #[arg(long)]
        corpus: PathBuf,

        /// Where to write the profile store JSON
        #[arg(short, long)]
        output: PathBuf,

        /// Trigrams kept per language
        #[arg(long, default_value_t = DEFAULT_MAX_TRIGRAMS)]
        max_trigrams: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    match cli.command {
        Command::Detect {
            text,
            file,
            top,
            json,
            min_confidence,
        } => {
            let classifier = load_classifier(&cli.config)?;
            let input = Input::from_args(text, file)?;
            let options = DetectOptions {
                top,
                json,
                min_confidence,
            };
            commands::detect(
                &classifier,
                input,
                &options,
                io::stdin().lock(),
                &mut io::stdout().lock(),
            )?;
        }
        Command::Languages => {
            let classifier = load_classifier(&cli.config)?;
            commands::languages(&classifier, &mut io::stdout().lock())?;
        }
        Command::BuildProfiles {
            corpus,
            output,
            max_trigrams,
        } => {
            commands::build_profiles(&corpus, &output, max_trigrams)?;
        }
    }

    Ok(())
}

/// Load configuration and build the classifier
fn load_classifier(config_path: &std::path::Path) -> Result<TrigramClassifier> {
    let config = config::load(config_path)?;
    let classifier = classifier_from_config(&config)?;
    info!(
        "Classifier ready with {} languages",
        classifier.store().len()
    );
    Ok(classifier)
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("trilang=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trilang=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from([
            "trilang",
            "detect",
            "hello world",
            "--top",
            "3",
            "--json",
            "--min-confidence",
            "0.8",
        ])
        .unwrap();
        match cli.command {
            Command::Detect {
                text,
                top,
                json,
                min_confidence,
                ..
            } => {
                assert_eq!(text.as_deref(), Some("hello world"));
                assert_eq!(top, Some(3));
                assert!(json);
                assert_eq!(min_confidence, Some(0.8));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_profiles_defaults() {
        let cli = Cli::try_parse_from([
            "trilang",
            "--verbose",
            "build-profiles",
            "--corpus",
            "data/corpus",
            "--output",
            "profiles.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::BuildProfiles { max_trigrams, .. } => {
                assert_eq!(max_trigrams, DEFAULT_MAX_TRIGRAMS)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
