use thiserror::Error;

/// Errors surfaced by the engine's control API.
#[derive(Debug, Error)]
pub enum TimerError {
    /// The scheduler loop is no longer running (or was shut down).
    #[error("timer engine is not running")]
    Closed,

    /// A duration expression could not be parsed.
    #[error("invalid duration expression: {0}")]
    InvalidDuration(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
