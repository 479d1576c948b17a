//! CLI configuration

use anyhow::Context;
use std::path::Path;
use tracing::debug;
use trilang_classifiers::ClassifierConfig;

/// Load classifier configuration, or use defaults if the file does not exist
pub fn load(config_path: &Path) -> anyhow::Result<ClassifierConfig> {
    if config_path.exists() {
        let config = ClassifierConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    } else {
        debug!(
            "No configuration at {}, using defaults",
            config_path.display()
        );
        Ok(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trilang_classifiers::ProfileSourceSpec;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("trilang.yaml")).unwrap();
        assert_eq!(config.profiles, ProfileSourceSpec::Builtin);
        assert!(config.languages.is_none());
    }

    #[test]
    fn test_loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trilang.yaml");
        std::fs::write(&path, "languages: [en, fr]\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.languages.unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trilang.yaml");
        std::fs::write(&path, "scoring: [not, a, map]\n").unwrap();

        assert!(load(&path).is_err());
    }
}
