//! Classifier trait and the trigram classifier

use crate::profile::{similarity, FrequencyProfile};
use crate::store::ProfileStore;
use crate::trigram::{extract, TrigramCounts};
use std::io::Read;
use std::sync::Arc;
use std::thread;
use tracing::{debug, trace};
use trilang_core::{Classification, Error, LanguageCode, Result};

/// Default score gap that maps to a confidence of 0.5
///
/// Calibrated on the bundled profiles: held-out sentences of a dozen words
/// land between 0.005 and 0.03, consonant salad below 0.0004.
pub const DEFAULT_CONFIDENCE_MIDPOINT: f64 = 0.00075;

/// Trait for all language classifiers
pub trait Classifier: Send + Sync {
    /// Classify the given text
    fn classify(&self, text: &str) -> Classification;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Drain a reader and classify its content
    fn classify_reader(&self, reader: &mut dyn Read) -> Result<Classification> {
        let text = crate::reader::read_text(reader)?;
        Ok(self.classify(&text))
    }
}

/// How the catalog is scored within one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringStrategy {
    /// Score languages one after another on the calling thread
    #[default]
    Sequential,

    /// Split the catalog across scoped worker threads
    ///
    /// `None` uses one worker per logical CPU.
    Parallel { workers: Option<usize> },
}

/// Tunable scoring parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringOptions {
    /// Score gap at which confidence reaches 0.5
    pub confidence_midpoint: f64,

    /// Sequential or parallel scoring
    pub strategy: ScoringStrategy,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            confidence_midpoint: DEFAULT_CONFIDENCE_MIDPOINT,
            strategy: ScoringStrategy::Sequential,
        }
    }
}

impl ScoringOptions {
    /// Check the options are usable
    pub fn validate(&self) -> Result<()> {
        if !self.confidence_midpoint.is_finite() || self.confidence_midpoint <= 0.0 {
            return Err(Error::config(format!(
                "confidence_midpoint must be a positive number, got {}",
                self.confidence_midpoint
            )));
        }
        if let ScoringStrategy::Parallel { workers: Some(0) } = self.strategy {
            return Err(Error::config("parallel scoring needs at least one worker"));
        }
        Ok(())
    }
}

/// Similarity of the input to one reference language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageScore {
    /// Language code
    pub language: LanguageCode,

    /// Similarity in `[0, 1]`, higher is closer
    pub similarity: f64,
}

/// Gap between the winner and the runner-up on the squared scale
///
/// `best² - runner_up²` is `(best - runner_up) * (best + runner_up)`: the
/// same lead counts for more between good matches than between two
/// languages that barely overlap the input.
pub fn score_gap(best: f64, runner_up: f64) -> f64 {
    best * best - runner_up * runner_up
}

/// Map a score gap to a confidence in `[0, 1)`
///
/// `gap² / (gap² + midpoint²)`: zero gap gives zero confidence, `midpoint`
/// gives 0.5, and the value tends to 1 as the gap grows. Non-decreasing in
/// `gap`, and flat near zero so that small leads stay near 0.
pub fn confidence_from_gap(gap: f64, midpoint: f64) -> f64 {
    if !gap.is_finite() || gap <= 0.0 {
        return 0.0;
    }
    let gap = gap * gap;
    gap / (gap + midpoint * midpoint)
}

/// Language classifier comparing trigram profiles
///
/// Holds the profile store behind an `Arc`; clones share it and any number
/// of threads may classify concurrently.
#[derive(Debug, Clone)]
pub struct TrigramClassifier {
    name: String,
    store: Arc<ProfileStore>,
    options: ScoringOptions,
}

impl TrigramClassifier {
    /// Create a classifier with default scoring options
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self {
            name: "trigram".to_string(),
            store,
            options: ScoringOptions::default(),
        }
    }

    /// Create a classifier with custom scoring options
    pub fn with_options(store: Arc<ProfileStore>, options: ScoringOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new(store)
        })
    }

    /// Classifier over the embedded reference profiles
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(ProfileStore::builtin()?)))
    }

    /// The shared profile store
    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// Classify already extracted trigram counts
    pub fn classify_counts(&self, counts: &TrigramCounts) -> Classification {
        if counts.is_empty() {
            debug!("No trigrams in input, returning und");
            return Classification::undetermined(1.0);
        }
        if self.store.is_empty() {
            debug!("Profile store is empty, returning und");
            return Classification::undetermined(0.0);
        }

        let input = FrequencyProfile::from_counts(counts);
        let scores = self.score_all(&input);

        let Some((winner, best, runner_up)) = select_best(&scores) else {
            return Classification::undetermined(0.0);
        };

        let gap = score_gap(best, runner_up);
        let confidence = confidence_from_gap(gap, self.options.confidence_midpoint);
        debug!(
            "Classified {} trigrams as {} (best {:.4}, runner-up {:.4}, confidence {:.4})",
            counts.total(),
            winner,
            best,
            runner_up,
            confidence
        );

        Classification::new(winner.clone(), confidence)
    }

    /// Score every language, best first
    ///
    /// Equal similarities are ordered by language code. Returns an empty
    /// list for letterless input or an empty store.
    pub fn rank(&self, text: &str) -> Vec<LanguageScore> {
        let counts = extract(text);
        if counts.is_empty() || self.store.is_empty() {
            return Vec::new();
        }

        let input = FrequencyProfile::from_counts(&counts);
        let mut scores = self.score_all(&input);
        scores.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.language.cmp(&b.language))
        });
        scores
    }

    /// Scores in ascending code order, whatever the strategy
    fn score_all(&self, input: &FrequencyProfile) -> Vec<LanguageScore> {
        match self.options.strategy {
            ScoringStrategy::Parallel { workers } => {
                let workers = workers.unwrap_or_else(num_cpus::get).min(self.store.len());
                if workers > 1 {
                    return self.score_parallel(input, workers);
                }
                self.score_sequential(input)
            }
            ScoringStrategy::Sequential => self.score_sequential(input),
        }
    }

    fn score_sequential(&self, input: &FrequencyProfile) -> Vec<LanguageScore> {
        self.store
            .all()
            .map(|(language, reference)| score_one(input, language, reference))
            .collect()
    }

    fn score_parallel(&self, input: &FrequencyProfile, workers: usize) -> Vec<LanguageScore> {
        let entries: Vec<_> = self.store.all().collect();
        let chunk_size = entries.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = entries
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|(language, reference)| score_one(input, language, reference))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            // Joining in spawn order keeps the catalog order
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}

impl Classifier for TrigramClassifier {
    fn classify(&self, text: &str) -> Classification {
        self.classify_counts(&extract(text))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn score_one(
    input: &FrequencyProfile,
    language: &LanguageCode,
    reference: &FrequencyProfile,
) -> LanguageScore {
    let similarity = similarity(input, reference);
    trace!("{}: similarity {:.6}", language, similarity);
    LanguageScore {
        language: language.clone(),
        similarity,
    }
}

/// Linear scan for the winner and the runner-up similarity
///
/// The leader only changes on a strictly higher similarity, so the first
/// code in catalog order wins a tie and the tie shows up as a zero gap. With
/// a single language the runner-up is the similarity floor, 0.0.
fn select_best(scores: &[LanguageScore]) -> Option<(&LanguageCode, f64, f64)> {
    let mut best: Option<&LanguageScore> = None;
    let mut runner_up = 0.0_f64;

    for score in scores {
        match best {
            Some(leader) if score.similarity > leader.similarity => {
                runner_up = runner_up.max(leader.similarity);
                best = Some(score);
            }
            Some(_) => runner_up = runner_up.max(score.similarity),
            None => best = Some(score),
        }
    }

    best.map(|leader| (&leader.language, leader.similarity, runner_up))
}
