//! Error types for ChatGuard

/// Result type alias using ChatGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ChatGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (invalid thresholds, unreadable config)
    #[error("configuration error: {0}")]
    Config(String),

    /// Classifier construction or execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Moderation action errors
    #[error("moderation error: {0}")]
    Moderation(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new moderation error
    pub fn moderation(msg: impl Into<String>) -> Self {
        Self::Moderation(msg.into())
    }
}
