use thiserror::Error;

/// Top-level error type for Scriptflow.
///
/// Covers configuration loading and serialization. The dialogue crate defines
/// its own `DialogueError` and converts from this type so that `?` works
/// across the crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScriptflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ScriptflowError {
    fn from(err: toml::de::Error) -> Self {
        ScriptflowError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ScriptflowError {
    fn from(err: toml::ser::Error) -> Self {
        ScriptflowError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ScriptflowError {
    fn from(err: serde_json::Error) -> Self {
        ScriptflowError::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ScriptflowError>;
