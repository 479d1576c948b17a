//! Subcommand implementations
//!
//! Results go to the given writer; logging goes to stderr through tracing.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use trilang_classifiers::{
    build_store_from_corpus_dir, read_text, Classifier, LanguageScore, TrigramClassifier,
};
use trilang_core::Classification;

/// Where the text to classify comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl Input {
    /// Pick the input source from the `detect` arguments
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Result<Self> {
        match (text, file) {
            (Some(_), Some(_)) => bail!("Pass either TEXT or --file, not both"),
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(path)) => Ok(Self::File(path)),
            (None, None) => Ok(Self::Stdin),
        }
    }

    /// Materialize the text
    fn read(self, stdin: impl Read) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::File(path) => {
                let file = std::fs::File::open(&path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(read_text(file)?)
            }
            Self::Stdin => Ok(read_text(stdin).context("Failed to read stdin")?),
        }
    }
}

/// Options of the `detect` subcommand
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Also print the `top` best-scoring languages
    pub top: Option<usize>,

    /// Print JSON instead of plain text
    pub json: bool,

    /// Fail when the result's confidence is below this value
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DetectReport<'a> {
    #[serde(flatten)]
    classification: &'a Classification,

    #[serde(skip_serializing_if = "Option::is_none")]
    ranking: Option<Vec<RankedLanguage<'a>>>,
}

#[derive(Debug, Serialize)]
struct RankedLanguage<'a> {
    language: &'a str,
    similarity: f64,
}

/// Classify the input and print the result
///
/// The result is printed even when it misses `min_confidence`; the error
/// that follows gives the process a non-zero exit status.
pub fn detect(
    classifier: &TrigramClassifier,
    input: Input,
    options: &DetectOptions,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<Classification> {
    if let Some(min) = options.min_confidence {
        if !(0.0..=1.0).contains(&min) {
            bail!("--min-confidence must be between 0 and 1, got {}", min);
        }
    }

    let text = input.read(stdin)?;
    let classification = classifier.classify(&text);

    let ranking: Option<Vec<LanguageScore>> = options.top.map(|n| {
        let mut ranking = classifier.rank(&text);
        ranking.truncate(n);
        ranking
    });

    if options.json {
        let report = DetectReport {
            classification: &classification,
            ranking: ranking.as_ref().map(|scores| {
                scores
                    .iter()
                    .map(|score| RankedLanguage {
                        language: score.language.as_str(),
                        similarity: score.similarity,
                    })
                    .collect()
            }),
        };
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{}\t{:.4}",
            classification.language_code(),
            classification.confidence()
        )?;
        for score in ranking.iter().flatten() {
            writeln!(out, "  {}\t{:.6}", score.language, score.similarity)?;
        }
    }

    if let Some(min) = options.min_confidence {
        if !classification.exceeds_threshold(min) {
            bail!(
                "Confidence {:.4} for {} is below {}",
                classification.confidence(),
                classification.language_code(),
                min
            );
        }
    }

    Ok(classification)
}

/// Print the configured language codes, one per line
pub fn languages(classifier: &TrigramClassifier, out: &mut impl Write) -> Result<()> {
    for code in classifier.store().languages() {
        writeln!(out, "{}", code)?;
    }
    Ok(())
}

/// Rebuild a profile store from corpus files and write it as JSON
pub fn build_profiles(corpus: &Path, output: &Path, max_trigrams: usize) -> Result<()> {
    let store = build_store_from_corpus_dir(corpus, max_trigrams)
        .with_context(|| format!("Failed to build profiles from {}", corpus.display()))?;

    let json = store.to_json_pretty()?;
    std::fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Wrote {} language profiles to {}",
        store.len(),
        output.display()
    );
    Ok(())
}
