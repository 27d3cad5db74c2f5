use thiserror::Error;

/// Result alias for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up shared infrastructure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The global logging subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// I/O failure, stored as text so the error stays `Clone`
    #[error("I/O error: {0}")]
    Io(String),

    /// Error annotated with an [`ErrorContext`](super::ErrorContext)
    #[error("{0}")]
    Custom(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
