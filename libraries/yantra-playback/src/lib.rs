//! YantraTune - Playback Core
//!
//! Platform-agnostic playback state machine for YantraTune.
//!
//! This crate provides:
//! - A playback controller owning current track, position, volume and queue
//! - Queue navigation with shuffle (random pick) and repeat (Off, One, All)
//! - An `AudioOutput` capability trait for the one media device
//! - Device events folded into state through the same path as user commands
//! - UI events drained by the host after each transition
//!
//! # Architecture
//!
//! `yantra-playback` does no I/O and spawns no threads. The host owns the
//! controller, feeds it one `Input` at a time and drains `PlaybackEvent`s.
//! `yantra-player` is the threaded host used by the application.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use yantra_playback::{PlaybackConfig, PlaybackController, RecordingOutput, Track};
//!
//! let output = RecordingOutput::new();
//! let mut controller = PlaybackController::new(PlaybackConfig::default(), Box::new(output));
//!
//! let album = vec![
//!     Track::new("1", "Intro", "Artist", "https://cdn.example/1.mp3"),
//!     Track::new("2", "Single", "Artist", "https://cdn.example/2.mp3"),
//! ];
//!
//! controller.play_track(album[0].clone(), album.clone());
//! controller.play_next();
//! assert_eq!(controller.current_index(), Some(1));
//!
//! // The device reports back asynchronously
//! controller.on_duration_known(212.0);
//! controller.on_position_tick(3.5);
//! assert_eq!(controller.state().position_secs(), 3.5);
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use yantra_playback::{PlaybackController, PlaybackConfig, RecordingOutput, RepeatMode};
//!
//! let mut controller =
//!     PlaybackController::new(PlaybackConfig::default(), Box::new(RecordingOutput::new()));
//!
//! controller.toggle_shuffle();
//! controller.cycle_repeat_mode();
//! assert_eq!(controller.state().repeat_mode(), RepeatMode::One);
//! ```

mod controller;
mod error;
pub mod events;
pub mod format;
mod output;
mod queue;
pub mod selection;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::{Command, Input, PlaybackEvent};
pub use output::{AudioOutput, DeviceEvent, OutputCall, OutputLog, RecordingOutput};
pub use queue::Queue;
pub use types::{PlaybackConfig, PlaybackState, RepeatMode, Track};
