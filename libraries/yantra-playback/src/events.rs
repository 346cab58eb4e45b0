//! Playback Events
//!
//! Inputs are everything that can move the state machine: user commands,
//! device notifications and watchdog expiries. They all go through
//! `PlaybackController::apply`, so a track advancing because the device
//! reported the end of media takes the exact same path as the user pressing
//! "next".
//!
//! Outputs are `PlaybackEvent`s, queued by the controller and drained by
//! the host to keep the UI in sync.

use crate::output::DeviceEvent;
use crate::types::{RepeatMode, Track};
use serde::{Deserialize, Serialize};

/// User-initiated playback commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Play `track`, making `source` the new queue
    PlayTrack { track: Track, source: Vec<Track> },

    /// Flip between playing and paused
    TogglePlayPause,

    /// Advance using the selection algorithm
    Next,

    /// Step back (always sequential)
    Previous,

    /// Seek to a position in seconds
    Seek(f64),

    /// Set volume (nominally 0.0-1.0)
    SetVolume(f32),

    /// Flip shuffle on/off
    ToggleShuffle,

    /// Advance repeat mode Off -> One -> All -> Off
    CycleRepeat,
}

/// Anything the controller can react to
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// From the user
    Command(Command),

    /// From the audio device, stamped with the load it belongs to
    Device { generation: u64, event: DeviceEvent },

    /// A load watchdog armed for `generation` expired
    LoadTimeout { generation: u64 },
}

impl From<Command> for Input {
    fn from(command: Command) -> Self {
        Input::Command(command)
    }
}

impl Input {
    /// Device event reported against load `generation`
    pub fn device(generation: u64, event: DeviceEvent) -> Self {
        Input::Device { generation, event }
    }
}

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playing flag changed
    StateChanged { is_playing: bool },

    /// A different track became current (or the same one was reloaded)
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
        /// Queue cursor after the change
        index: Option<usize>,
    },

    /// Queue replaced
    QueueChanged { length: usize },

    /// Position moved (device tick or optimistic seek)
    PositionUpdate {
        position_secs: f64,
        duration_secs: f64,
    },

    /// Authoritative duration arrived from the device
    DurationChanged { duration_secs: f64 },

    VolumeChanged { volume: f32 },

    ShuffleChanged { enabled: bool },

    RepeatChanged { mode: RepeatMode },

    /// A device call or load failed
    Error { message: String },
}
