//! Core types for playback management

use crate::format::parse_clock;
use crate::queue::Queue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// A playable catalog record
///
/// Owned by the catalog; the controller only keeps value copies and never
/// mutates one. Deserializes both from its own serialized form and from the
/// catalog's records (`audioUrl`, `coverUrl`, `"3:20"`-style durations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Identifier, unique within a session
    pub id: String,

    pub title: String,

    pub artist: String,

    #[serde(default)]
    pub album: String,

    /// Nominal duration from the catalog, if it has one
    #[serde(
        default,
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub duration: Option<Duration>,

    /// Media location handed to the audio device
    #[serde(alias = "audioUrl")]
    pub media_uri: String,

    /// Cover art location
    #[serde(default, alias = "coverUrl")]
    pub art_uri: Option<String>,
}

impl Track {
    /// Create a track with the required fields; the rest start empty
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        media_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            duration: None,
            media_uri: media_uri.into(),
            art_uri: None,
        }
    }

    /// Set the album name
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the nominal duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the cover art location
    pub fn with_art(mut self, art_uri: impl Into<String>) -> Self {
        self.art_uri = Some(art_uri.into());
        self
    }

    /// Nominal duration in seconds, 0 when the catalog has none
    pub fn nominal_secs(&self) -> f64 {
        self.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }
}

fn serialize_duration<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&d.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_duration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(f64),
        Clock(String),
    }

    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDuration::Seconds(secs)) if secs.is_finite() && secs >= 0.0 => {
            Some(Duration::from_secs_f64(secs))
        }
        Some(RawDuration::Clock(text)) => parse_clock(&text),
        _ => None,
    })
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop current track only
    One,

    /// Loop entire queue
    All,
}

impl RepeatMode {
    /// Next mode in the `Off -> One -> All -> Off` cycle
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

/// Initial settings for a playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Initial shuffle flag (default: false)
    #[serde(default)]
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    #[serde(default)]
    pub repeat: RepeatMode,

    /// Never let a shuffle pick land on the current track (default: false)
    #[serde(default)]
    pub shuffle_avoids_current: bool,
}

fn default_volume() -> f32 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            shuffle: false,
            repeat: RepeatMode::Off,
            shuffle_avoids_current: false,
        }
    }
}

/// Everything the UI renders about playback
///
/// Only the controller writes it. Positions and durations are plain seconds
/// because the device reports them that way and out-of-range seeks are
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub(crate) current_track: Option<Track>,
    pub(crate) is_playing: bool,
    pub(crate) position_secs: f64,
    pub(crate) duration_secs: f64,
    pub(crate) volume: f32,
    pub(crate) shuffle_enabled: bool,
    pub(crate) repeat_mode: RepeatMode,
    pub(crate) queue: Queue,
}

impl PlaybackState {
    /// Fresh state: nothing loaded, not playing
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: config.volume,
            shuffle_enabled: config.shuffle,
            repeat_mode: config.repeat,
            queue: Queue::new(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Cursor into the queue, `None` while the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Played fraction of the current track in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
