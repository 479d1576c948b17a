//! Core types for trilang

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short language code such as `en`, `de` or the sentinel `und`
///
/// Codes are two or three lowercase ASCII letters (ISO 639-1 / 639-3 shape).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Sentinel code returned when no language can be identified
    pub const UNDETERMINED: &'static str = "und";

    /// Create a validated language code
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let len = code.len();
        if !(2..=3).contains(&len) || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(Error::profile(format!(
                "invalid language code '{}': expected 2 or 3 lowercase ASCII letters",
                code
            )));
        }
        Ok(Self(code))
    }

    /// The `und` sentinel
    pub fn undetermined() -> Self {
        Self(Self::UNDETERMINED.to_string())
    }

    /// Check whether this is the `und` sentinel
    pub fn is_undetermined(&self) -> bool {
        self.0 == Self::UNDETERMINED
    }

    /// Borrow the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LanguageCode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Result of classifying one text
///
/// An immutable pair of language code and confidence. The confidence is
/// always within `[0.0, 1.0]`; it measures how clearly the winning language
/// beat the runner-up, not a calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    language_code: LanguageCode,
    confidence: f64,
}

impl Classification {
    /// Create a new classification, clamping the confidence into `[0, 1]`
    pub fn new(language_code: LanguageCode, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            language_code,
            confidence,
        }
    }

    /// An `und` result with the given confidence
    pub fn undetermined(confidence: f64) -> Self {
        Self::new(LanguageCode::undetermined(), confidence)
    }

    /// Winning language code, or `und`
    pub fn language_code(&self) -> &LanguageCode {
        &self.language_code
    }

    /// Confidence in `[0.0, 1.0]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Check if no language was identified
    pub fn is_undetermined(&self) -> bool {
        self.language_code.is_undetermined()
    }

    /// Check if confidence meets a threshold
    pub fn exceeds_threshold(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4})", self.language_code, self.confidence)
    }
}
