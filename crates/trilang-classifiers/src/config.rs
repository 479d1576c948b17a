//! Configuration for the profile store and scoring

use crate::classifier::{ScoringOptions, ScoringStrategy, DEFAULT_CONFIDENCE_MIDPOINT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trilang_core::{LanguageCode, Result};

/// Configuration for the language classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Where reference profiles come from
    #[serde(default)]
    pub profiles: ProfileSourceSpec,

    /// Restrict classification to these languages
    #[serde(default)]
    pub languages: Option<Vec<LanguageCode>>,

    /// Scoring parameters
    #[serde(default)]
    pub scoring: ScoringConfigSpec,
}

/// Profile source specification (for config files)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileSourceSpec {
    /// JSON file in the profile store format
    Local { path: PathBuf },

    /// Profiles embedded in the crate
    #[default]
    Builtin,
}

/// Scoring specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfigSpec {
    /// Score gap at which confidence reaches 0.5
    #[serde(default = "default_confidence_midpoint")]
    pub confidence_midpoint: f64,

    /// Sequential or parallel scoring
    #[serde(default)]
    pub strategy: ScoringStrategySpec,
}

/// Scoring strategy specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategySpec {
    #[default]
    Sequential,
    Parallel {
        #[serde(default)]
        workers: Option<usize>,
    },
}

impl Default for ScoringConfigSpec {
    fn default() -> Self {
        Self {
            confidence_midpoint: default_confidence_midpoint(),
            strategy: ScoringStrategySpec::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Convert to validated runtime scoring options
    pub fn scoring_options(&self) -> Result<ScoringOptions> {
        let options = ScoringOptions {
            confidence_midpoint: self.scoring.confidence_midpoint,
            strategy: self.scoring.strategy.to_scoring_strategy(),
        };
        options.validate()?;
        Ok(options)
    }
}

impl ScoringStrategySpec {
    /// Convert to runtime scoring strategy
    pub fn to_scoring_strategy(&self) -> ScoringStrategy {
        match self {
            Self::Sequential => ScoringStrategy::Sequential,
            Self::Parallel { workers } => ScoringStrategy::Parallel { workers: *workers },
        }
    }
}

fn default_confidence_midpoint() -> f64 {
    DEFAULT_CONFIDENCE_MIDPOINT
}
