//! Player errors
use thiserror::Error;

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration parsed but holds unusable values
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The command channel is full; the dispatcher is falling behind
    #[error("Playback dispatcher is busy")]
    Busy,

    /// The dispatcher thread is no longer running
    #[error("Playback dispatcher is not running")]
    Disconnected,

    /// The dispatcher thread panicked
    #[error("Playback dispatcher panicked")]
    ThreadPanicked,

    /// Spawning the dispatcher thread failed
    #[error("Failed to spawn playback dispatcher: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        PlayerError::Config(err.to_string())
    }
}
