//! Reference profile store
//!
//! The store is parsed and validated once, then only read. Any problem in
//! the reference data is reported while loading so that a classifier is
//! never built on a partially loaded catalog.

use crate::profile::FrequencyProfile;
use crate::trigram::Trigram;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use trilang_core::{Error, LanguageCode, Result};

/// Version of the JSON asset layout
pub const FORMAT_VERSION: u32 = 1;

/// Reference profiles embedded at build time
const BUILTIN_PROFILES: &str = include_str!("../data/profiles.json");

/// On-disk layout of a profile store
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileEntry {
    code: String,
    trigrams: BTreeMap<Trigram, f64>,
}

/// Immutable mapping from language code to reference profile
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: BTreeMap<LanguageCode, FrequencyProfile>,
}

impl ProfileStore {
    /// A store with no profiles
    pub fn empty() -> Self {
        Self::default()
    }

    /// The reference profiles shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PROFILES)
    }

    /// Build a store from already validated profiles
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate codes or if a profile is registered
    /// under `und`.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = (LanguageCode, FrequencyProfile)>,
    ) -> Result<Self> {
        let mut store = Self::empty();
        for (code, profile) in profiles {
            store.insert(code, profile)?;
        }
        Ok(store)
    }

    /// Parse a store from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let file: StoreFile = serde_json::from_str(json)?;
        Self::from_store_file(file)
    }

    /// Parse a store from a reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let file: StoreFile = serde_json::from_reader(reader)?;
        Self::from_store_file(file)
    }

    /// Load a store from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read profile store {}: {}",
                path.display(),
                e
            ))
        })?;
        let store = Self::from_json(&content)?;
        info!("Loaded profile store from {}", path.display());
        Ok(store)
    }

    fn from_store_file(file: StoreFile) -> Result<Self> {
        if file.version != FORMAT_VERSION {
            return Err(Error::profile(format!(
                "unsupported profile store version {} (expected {})",
                file.version, FORMAT_VERSION
            )));
        }

        let mut store = Self::empty();
        for entry in file.profiles {
            let code = LanguageCode::new(entry.code)?;
            let profile = FrequencyProfile::from_frequencies(entry.trigrams)
                .map_err(|e| Error::profile(format!("language '{}': {}", code, e)))?;
            store.insert(code, profile)?;
        }

        if store.is_empty() {
            warn!("Profile store contains no languages; every text will classify as und");
        } else {
            info!(
                "Loaded {} language profiles: {}",
                store.len(),
                store
                    .languages()
                    .map(LanguageCode::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(store)
    }

    fn insert(&mut self, code: LanguageCode, profile: FrequencyProfile) -> Result<()> {
        if code.is_undetermined() {
            return Err(Error::profile(
                "'und' is a classifier output and cannot have a reference profile",
            ));
        }
        if profile.is_empty() {
            return Err(Error::profile(format!("language '{}' has an empty profile", code)));
        }
        if self.profiles.contains_key(&code) {
            return Err(Error::profile(format!("duplicate language code '{}'", code)));
        }
        self.profiles.insert(code, profile);
        Ok(())
    }

    /// Keep only the allowlisted languages
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a requested code has no profile.
    pub fn retain_languages(mut self, languages: &[LanguageCode]) -> Result<Self> {
        if let Some(missing) = languages.iter().find(|code| !self.contains(code)) {
            return Err(Error::config(format!(
                "language '{}' is not in the profile store",
                missing
            )));
        }
        self.profiles.retain(|code, _| languages.contains(code));
        Ok(self)
    }

    /// Reference profile of one language
    pub fn get(&self, code: &LanguageCode) -> Option<&FrequencyProfile> {
        self.profiles.get(code)
    }

    /// Every `(code, profile)` pair in ascending code order
    pub fn all(&self) -> impl ExactSizeIterator<Item = (&LanguageCode, &FrequencyProfile)> {
        self.profiles.iter()
    }

    /// Language codes in ascending order
    pub fn languages(&self) -> impl ExactSizeIterator<Item = &LanguageCode> {
        self.profiles.keys()
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.profiles.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Serialize in the asset format
    pub fn to_json_pretty(&self) -> Result<String> {
        let file = StoreFile {
            version: FORMAT_VERSION,
            profiles: self
                .profiles
                .iter()
                .map(|(code, profile)| ProfileEntry {
                    code: code.to_string(),
                    trigrams: profile.frequencies().clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigram::extract;

    fn code(s: &str) -> LanguageCode {
        LanguageCode::new(s).unwrap()
    }

    fn sample_profile(text: &str) -> FrequencyProfile {
        FrequencyProfile::from_counts(&extract(text))
    }

    #[test]
    fn test_builtin_store_loads() {
        let store = ProfileStore::builtin().unwrap();
        for lang in ["de", "en", "es", "fr", "hu", "it", "nl", "pl", "pt", "ru", "uk"] {
            assert!(store.contains(&code(lang)), "missing {}", lang);
        }
        assert!(!store.contains(&LanguageCode::undetermined()));
    }

    #[test]
    fn test_all_is_sorted() {
        let store = ProfileStore::builtin().unwrap();
        let codes: Vec<_> = store.languages().cloned().collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(store.all().len(), store.len());
    }

    #[test]
    fn test_from_json_minimal() {
        let json = r#"{"version": 1, "profiles": [
            {"code": "xx", "trigrams": {" ab": 0.5, "ab ": 0.5}}
        ]}"#;
        let store = ProfileStore::from_json(json).unwrap();
        assert_eq!(store.len(), 1);
        let profile = store.get(&code("xx")).unwrap();
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_rejects_duplicate_codes() {
        let json = r#"{"version": 1, "profiles": [
            {"code": "xx", "trigrams": {" ab": 1.0}},
            {"code": "xx", "trigrams": {" cd": 1.0}}
        ]}"#;
        let err = ProfileStore::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_und() {
        let json = r#"{"version": 1, "profiles": [
            {"code": "und", "trigrams": {" ab": 1.0}}
        ]}"#;
        assert!(ProfileStore::from_json(json).is_err());

        let result = ProfileStore::from_profiles([(
            LanguageCode::undetermined(),
            sample_profile("abc"),
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_malformed_data() {
        let bad_version = r#"{"version": 2, "profiles": []}"#;
        assert!(ProfileStore::from_json(bad_version).is_err());

        let bad_code = r#"{"version": 1, "profiles": [
            {"code": "English", "trigrams": {" ab": 1.0}}
        ]}"#;
        assert!(ProfileStore::from_json(bad_code).is_err());

        let bad_trigram = r#"{"version": 1, "profiles": [
            {"code": "xx", "trigrams": {"abcd": 1.0}}
        ]}"#;
        assert!(ProfileStore::from_json(bad_trigram).is_err());

        let bad_sum = r#"{"version": 1, "profiles": [
            {"code": "xx", "trigrams": {" ab": 0.3}}
        ]}"#;
        assert!(ProfileStore::from_json(bad_sum).is_err());

        let empty_profile = r#"{"version": 1, "profiles": [
            {"code": "xx", "trigrams": {}}
        ]}"#;
        assert!(ProfileStore::from_json(empty_profile).is_err());

        assert!(ProfileStore::from_json("not json").is_err());
    }

    #[test]
    fn test_empty_store_is_valid() {
        let store = ProfileStore::from_json(r#"{"version": 1, "profiles": []}"#).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_retain_languages() {
        let store = ProfileStore::builtin().unwrap();
        let subset = store
            .clone()
            .retain_languages(&[code("en"), code("de")])
            .unwrap();
        assert_eq!(subset.len(), 2);
        assert!(subset.contains(&code("en")));

        assert!(store.retain_languages(&[code("zz")]).is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_profiles() {
        let store = ProfileStore::from_profiles([
            (code("aa"), sample_profile("alpha beta gamma")),
            (code("bb"), sample_profile("delta epsilon")),
        ])
        .unwrap();

        let reloaded = ProfileStore::from_json(&store.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 2);
        for (code, profile) in store.all() {
            let other = reloaded.get(code).unwrap();
            assert_eq!(profile.len(), other.len());
            for (trigram, frequency) in profile.iter() {
                assert!((other.get(trigram) - frequency).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "profiles": [{"code": "xx", "trigrams": {" ab": 1.0}}]}"#,
        )
        .unwrap();

        let store = ProfileStore::from_file(&path).unwrap();
        assert_eq!(store.len(), 1);

        let missing = ProfileStore::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Config(_))));
    }
}
