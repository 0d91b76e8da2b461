use thiserror::Error;

/// Core error type shared across datasynth crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied a request that cannot be generated or stored.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A table or column name is empty or otherwise unusable.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// A connection string or credential set could not be parsed.
    #[error("invalid connection: {0}")]
    InvalidConnection(String),
}

/// Convenience alias for results returned by datasynth crates.
pub type Result<T> = std::result::Result<T, Error>;
