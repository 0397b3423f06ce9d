//! Error types for UrjaSense

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// UrjaSense error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wire serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A shared lock was poisoned by a panicking thread
    #[error("Mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
