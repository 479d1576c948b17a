//! Trilang Classifiers
//!
//! Statistical language identification based on character trigrams.
//!
//! Text is reduced to a trigram frequency profile and compared against a
//! store of reference profiles, one per language:
//! - Extraction: lowercase, split into words, pad, slide a 3-char window
//! - Scoring: Euclidean distance between square-root frequency profiles
//! - Decision: best similarity wins, confidence from the squared winning margin
//!
//! Classification is synchronous, allocation-light and free of side effects
//! other than logging. A classifier can be shared across threads.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod loader;
pub mod profile;
pub mod reader;
pub mod store;
pub mod trigram;

pub use builder::{build_store_from_corpus_dir, ProfileBuilder, DEFAULT_MAX_TRIGRAMS};
pub use classifier::{
    confidence_from_gap, score_gap, Classifier, LanguageScore, ScoringOptions, ScoringStrategy,
    TrigramClassifier, DEFAULT_CONFIDENCE_MIDPOINT,
};
pub use config::{ClassifierConfig, ProfileSourceSpec, ScoringConfigSpec, ScoringStrategySpec};
pub use loader::{classifier_from_config, classifier_from_file, load_config, store_from_config};
pub use profile::{distance, similarity, FrequencyProfile};
pub use reader::{classify_reader, read_text};
pub use store::ProfileStore;
pub use trigram::{extract, words, Trigram, TrigramCounts, BOUNDARY};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, TrigramClassifier};
    pub use crate::store::ProfileStore;
    pub use trilang_core::{Classification, LanguageCode};
}
