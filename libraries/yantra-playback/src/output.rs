//! Audio output capability
//!
//! The controller drives exactly one `AudioOutput` and never waits on it:
//! every call is fire-and-forget, and whatever the device later learns
//! (position, duration, end of media, failure) comes back as a
//! `DeviceEvent` through the host's event path, stamped with the generation
//! of the source it concerns.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Media-rendering device
///
/// Platform code (a browser media element bridge, a desktop decoder
/// thread, a network renderer) implements this.
pub trait AudioOutput: Send {
    /// Start loading media from `uri`
    ///
    /// Must abort any load still in flight: the newest source always wins.
    /// Events reported from now on carry `generation`; events still queued
    /// for an earlier source keep theirs and are dropped by the controller.
    fn set_source(&mut self, uri: &str, generation: u64) -> Result<()>;

    /// Start or resume rendering the loaded source
    fn play(&mut self) -> Result<()>;

    /// Pause rendering, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Jump to `position_secs`
    ///
    /// Values are passed through unchecked; clamping, if any, is the
    /// device's business.
    fn seek(&mut self, position_secs: f64) -> Result<()>;

    /// Set output volume, nominally 0.0-1.0 (passed through unchecked)
    fn set_volume(&mut self, volume: f32) -> Result<()>;
}

/// Notifications a device reports asynchronously
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Current playback position (fires periodically while rendering)
    PositionChanged(f64),

    /// Media metadata resolved; real duration known
    DurationResolved(f64),

    /// Current media played to the end
    Ended,

    /// Loading or rendering failed
    Failed(String),
}

/// A call made on a `RecordingOutput`
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    SetSource(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Debug, Default)]
struct LogInner {
    calls: Vec<OutputCall>,
    failures_pending: usize,
    generation: u64,
}

/// Shared view of everything a `RecordingOutput` was asked to do
///
/// Cloning is cheap; all clones observe the same log.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    inner: Arc<Mutex<LogInner>>,
}

impl OutputLog {
    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all recorded calls, oldest first
    pub fn calls(&self) -> Vec<OutputCall> {
        self.lock().calls.clone()
    }

    /// Remove and return all recorded calls
    pub fn take(&self) -> Vec<OutputCall> {
        std::mem::take(&mut self.lock().calls)
    }

    /// Sources loaded so far, in order
    pub fn loaded_sources(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                OutputCall::SetSource(uri) => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    /// Generation of the most recent `set_source`, 0 before any
    ///
    /// What a real device would stamp onto the events it reports.
    pub fn source_generation(&self) -> u64 {
        self.lock().generation
    }

    /// Make the next `count` calls fail
    ///
    /// Failing calls are still recorded.
    pub fn fail_next(&self, count: usize) {
        self.lock().failures_pending = count;
    }

    fn record(&self, call: OutputCall) -> bool {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.failures_pending > 0 {
            inner.failures_pending -= 1;
            true
        } else {
            false
        }
    }
}

/// Device double that renders nothing and records every call
///
/// Used by tests and headless hosts; pair it with the host's device-event
/// path to simulate position ticks, metadata and end of media.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    log: OutputLog,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto this output's call log
    pub fn log(&self) -> OutputLog {
        self.log.clone()
    }
}

impl AudioOutput for RecordingOutput {
    fn set_source(&mut self, uri: &str, generation: u64) -> Result<()> {
        self.log.lock().generation = generation;
        if self.log.record(OutputCall::SetSource(uri.to_string())) {
            return Err(PlaybackError::Load {
                uri: uri.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.log.record(OutputCall::Play) {
            return Err(PlaybackError::device("scripted play failure"));
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if self.log.record(OutputCall::Pause) {
            return Err(PlaybackError::device("scripted pause failure"));
        }
        Ok(())
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        if self.log.record(OutputCall::Seek(position_secs)) {
            return Err(PlaybackError::device("scripted seek failure"));
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        if self.log.record(OutputCall::SetVolume(volume)) {
            return Err(PlaybackError::device("scripted volume failure"));
        }
        Ok(())
    }
}
