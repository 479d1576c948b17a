//! Error types for trilang

/// Result type alias using trilang's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for trilang operations
///
/// Classification itself never fails; every variant here belongs to
/// configuration time, profile loading, or the I/O of an input source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed reference profile data
    #[error("profile data error: {0}")]
    Profile(String),

    /// I/O errors from input sources and profile files
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new profile data error
    pub fn profile(msg: impl Into<String>) -> Self {
        Self::Profile(msg.into())
    }
}
