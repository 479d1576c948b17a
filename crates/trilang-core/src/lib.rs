//! Trilang Core
//!
//! Core types shared across trilang components.
//!
//! This crate provides:
//! - The `LanguageCode` and `Classification` value types
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Classification, LanguageCode};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Classification, LanguageCode};
}
