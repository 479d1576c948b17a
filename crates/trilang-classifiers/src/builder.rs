//! Offline construction of reference profiles
//!
//! Profiles are fixed once built. This module turns corpus text into the
//! profile store asset; it is never used during classification.

use crate::profile::FrequencyProfile;
use crate::store::ProfileStore;
use crate::trigram::{extract, TrigramCounts};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info};
use trilang_core::{Error, LanguageCode, Result};

/// Default number of trigrams kept per language
pub const DEFAULT_MAX_TRIGRAMS: usize = 1000;

/// Extension of corpus files, one `<code>.txt` per language
pub const CORPUS_EXTENSION: &str = "txt";

/// Accumulates trigram counts for one language
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    language: LanguageCode,
    counts: TrigramCounts,
}

impl ProfileBuilder {
    pub fn new(language: LanguageCode) -> Self {
        Self {
            language,
            counts: TrigramCounts::new(),
        }
    }

    /// Add the trigrams of a piece of corpus text
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.counts.merge(&extract(text));
        self
    }

    /// Add the trigrams of everything a reader yields
    pub fn add_reader(&mut self, reader: impl Read) -> Result<&mut Self> {
        let text = crate::reader::read_text(reader)?;
        Ok(self.add_text(&text))
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    /// Counts gathered so far
    pub fn counts(&self) -> &TrigramCounts {
        &self.counts
    }

    /// Keep the `max_trigrams` most frequent trigrams and normalize
    ///
    /// Equal counts are ordered by trigram so the cut is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if no trigrams were collected or `max_trigrams` is 0.
    pub fn build(&self, max_trigrams: usize) -> Result<FrequencyProfile> {
        if max_trigrams == 0 {
            return Err(Error::config("max_trigrams must be at least 1"));
        }
        if self.counts.is_empty() {
            return Err(Error::profile(format!(
                "corpus for '{}' contains no letters",
                self.language
            )));
        }

        let mut ranked: Vec<_> = self.counts.iter().collect();
        ranked.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
        ranked.truncate(max_trigrams);

        let total: u64 = ranked.iter().map(|(_, count)| **count).sum();
        let frequencies: BTreeMap<_, _> = ranked
            .into_iter()
            .map(|(trigram, count)| (*trigram, *count as f64 / total as f64))
            .collect();

        debug!(
            "Built profile for {} with {} of {} distinct trigrams",
            self.language,
            frequencies.len(),
            self.counts.distinct()
        );
        FrequencyProfile::from_frequencies(frequencies)
    }
}

/// Build a store from a directory of `<code>.txt` corpora
///
/// Each corpus file is read and counted on its own scoped thread.
pub fn build_store_from_corpus_dir(
    dir: impl AsRef<Path>,
    max_trigrams: usize,
) -> Result<ProfileStore> {
    let dir = dir.as_ref();
    let corpora = list_corpora(dir)?;
    if corpora.is_empty() {
        return Err(Error::config(format!(
            "no .{} corpus files found in {}",
            CORPUS_EXTENSION,
            dir.display()
        )));
    }

    info!("Building {} profiles from {}", corpora.len(), dir.display());

    let profiles = thread::scope(|scope| {
        let handles: Vec<_> = corpora
            .into_iter()
            .map(|(language, path)| {
                scope.spawn(move || -> Result<(LanguageCode, FrequencyProfile)> {
                    let file = std::fs::File::open(&path)?;
                    let mut builder = ProfileBuilder::new(language);
                    builder.add_reader(file)?;
                    let profile = builder.build(max_trigrams)?;
                    Ok((builder.language, profile))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    ProfileStore::from_profiles(profiles)
}

/// Corpus files of a directory, sorted by language code
fn list_corpora(dir: &Path) -> Result<Vec<(LanguageCode, PathBuf)>> {
    let mut corpora = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension() != Some(std::ffi::OsStr::new(CORPUS_EXTENSION)) {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::config(format!("bad corpus file name {}", path.display())))?;
        corpora.push((LanguageCode::new(stem)?, path));
    }

    corpora.sort();
    Ok(corpora)
}
