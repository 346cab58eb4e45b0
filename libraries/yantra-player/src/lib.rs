//! YantraTune - Player Host
//!
//! Runs a `yantra_playback::PlaybackController` on a dedicated thread and
//! serializes user commands and device events into it.
//!
//! # Example
//!
//! ```rust
//! use yantra_player::{Player, PlayerSettings};
//! use yantra_playback::{DeviceEvent, RecordingOutput, Track};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = RecordingOutput::new();
//! let log = output.log();
//! let player = Player::spawn(&PlayerSettings::default(), |_sink| Box::new(output))?;
//!
//! let album = vec![
//!     Track::new("1", "Intro", "Artist", "https://cdn.example/1.mp3"),
//!     Track::new("2", "Single", "Artist", "https://cdn.example/2.mp3"),
//! ];
//! player.play_track(album[0].clone(), album)?;
//! player.state()?;
//!
//! // Reported by the device when the first track runs out
//! let generation = log.source_generation();
//! player.device_events().send(generation, DeviceEvent::Ended)?;
//!
//! assert_eq!(player.state()?.current_index(), Some(1));
//! player.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
mod dispatcher;
mod error;

pub use config::{DispatcherSettings, PlayerSettings};
pub use dispatcher::{DeviceEventSink, Player};
pub use error::{PlayerError, Result};
