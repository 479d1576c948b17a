//! Classifier initialization from configuration

use crate::{ClassifierConfig, ProfileSourceSpec, ProfileStore, TrigramClassifier};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use trilang_core::{Error, Result};

/// Load classifier configuration from file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClassifierConfig> {
    let path = path.as_ref();
    ClassifierConfig::from_file(path).map_err(|e| {
        Error::config(format!(
            "Failed to load classifier config {}: {}",
            path.display(),
            e
        ))
    })
}

/// Load the profile store a configuration points at
///
/// Applies the language allowlist. Every failure here is fatal: the store
/// is either fully loaded or not at all.
pub fn store_from_config(config: &ClassifierConfig) -> Result<ProfileStore> {
    let store = match &config.profiles {
        ProfileSourceSpec::Builtin => {
            info!("Using builtin reference profiles");
            ProfileStore::builtin()?
        }
        ProfileSourceSpec::Local { path } => {
            info!("Loading reference profiles from {}", path.display());
            ProfileStore::from_file(path)?
        }
    };

    match &config.languages {
        Some(languages) => {
            let store = store.retain_languages(languages)?;
            info!("Restricted profile store to {} languages", store.len());
            Ok(store)
        }
        None => Ok(store),
    }
}

/// Build a classifier from configuration
pub fn classifier_from_config(config: &ClassifierConfig) -> Result<TrigramClassifier> {
    let options = config.scoring_options()?;
    let store = store_from_config(config)?;
    TrigramClassifier::with_options(Arc::new(store), options)
}

/// Build a classifier from a config file
pub fn classifier_from_file(path: impl AsRef<Path>) -> Result<TrigramClassifier> {
    let config = load_config(path)?;
    classifier_from_config(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Classifier;

    #[test]
    fn test_load_config() {
        let yaml = r#"
languages: [en, de]
scoring:
  confidence_midpoint: 0.004
"#;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trilang.yaml");
        std::fs::write(&path, yaml).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.languages.as_ref().unwrap().len(), 2);

        let classifier = classifier_from_file(&path).unwrap();
        assert_eq!(classifier.store().len(), 2);
        assert_eq!(classifier.options().confidence_midpoint, 0.004);
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let err = load_config("/nonexistent/trilang.yaml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_local_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("profiles.json");
        std::fs::write(
            &profiles,
            r#"{"version": 1, "profiles": [
                {"code": "aa", "trigrams": {" ae": 0.5, "aei": 0.5}},
                {"code": "bb", "trigrams": {" bc": 0.5, "bcd": 0.5}}
            ]}"#,
        )
        .unwrap();

        let config = ClassifierConfig {
            profiles: ProfileSourceSpec::Local { path: profiles },
            ..Default::default()
        };
        let classifier = classifier_from_config(&config).unwrap();
        assert_eq!(classifier.classify("bcd").language_code().as_str(), "bb");
    }

    #[test]
    fn test_bad_profiles_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("profiles.json");
        std::fs::write(&profiles, r#"{"version": 1, "profiles": [{"code": "aa"}]}"#).unwrap();

        let config = ClassifierConfig {
            profiles: ProfileSourceSpec::Local { path: profiles },
            ..Default::default()
        };
        assert!(classifier_from_config(&config).is_err());
    }

    #[test]
    fn test_unknown_allowlisted_language() {
        let config = ClassifierConfig::from_yaml("languages: [zz]").unwrap();
        let err = classifier_from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
