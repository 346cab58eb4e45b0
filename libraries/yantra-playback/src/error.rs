//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Only audio devices produce these. The controller never returns them to
/// its callers; it logs them and turns them into `PlaybackEvent::Error`.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The device could not load the requested media
    #[error("Failed to load {uri}: {reason}")]
    Load { uri: String, reason: String },

    /// The device rejected a transport command (play, pause, seek, volume)
    #[error("Audio device error: {0}")]
    Device(String),
}

impl PlaybackError {
    /// Create a device error from any displayable value
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device(message.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_media() {
        let err = PlaybackError::Load {
            uri: "mem://1".to_string(),
            reason: "404".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to load mem://1: 404");
        assert_eq!(
            PlaybackError::device("busy").to_string(),
            "Audio device error: busy"
        );
    }
}
