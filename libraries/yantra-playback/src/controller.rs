//! Playback controller - core orchestration
//!
//! Owns the playback state and the one audio output, and is the only thing
//! allowed to talk to that output. Commands update state immediately and
//! fire at most one logical device command ("load and play" counts as one);
//! nothing waits for the device to acknowledge.

use crate::{
    events::{Command, Input, PlaybackEvent},
    output::{AudioOutput, DeviceEvent},
    selection::{next_index, previous_index},
    types::{PlaybackConfig, PlaybackState, RepeatMode, Track},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Central playback management
///
/// Every state change funnels through [`PlaybackController::apply`]; the
/// named command and callback methods are shorthands for it.
pub struct PlaybackController {
    state: PlaybackState,
    output: Box<dyn AudioOutput>,
    rng: StdRng,
    shuffle_avoids_current: bool,

    // Bumped on every load. Device events and watchdog expiries carry the
    // generation they belong to; anything from a superseded load is dropped.
    load_generation: u64,
    media_responded: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller driving `output`
    ///
    /// The initial volume is pushed to the device right away so the two
    /// start out in agreement.
    pub fn new(config: PlaybackConfig, output: Box<dyn AudioOutput>) -> Self {
        Self::with_rng(config, output, StdRng::from_entropy())
    }

    /// Create a controller with a caller-supplied shuffle RNG
    pub fn with_rng(config: PlaybackConfig, output: Box<dyn AudioOutput>, rng: StdRng) -> Self {
        let mut controller = Self {
            state: PlaybackState::new(&config),
            output,
            rng,
            shuffle_avoids_current: config.shuffle_avoids_current,
            load_generation: 0,
            media_responded: true,
            pending_events: Vec::new(),
        };

        let volume = controller.state.volume;
        if let Err(e) = controller.output.set_volume(volume) {
            controller.report_error(format!("Failed to set initial volume: {}", e));
        }

        controller
    }

    /// Apply one input to the state machine
    pub fn apply(&mut self, input: impl Into<Input>) {
        match input.into() {
            Input::Command(command) => self.handle_command(command),
            Input::Device { generation, event } => self.handle_device_event(generation, event),
            Input::LoadTimeout { generation } => self.handle_load_timeout(generation),
        }
    }

    // ===== Commands =====

    /// Play `track`, replacing the queue with `source`
    ///
    /// If `track` is not in `source` the cursor starts at 0.
    pub fn play_track(&mut self, track: Track, source: Vec<Track>) {
        self.apply(Command::PlayTrack { track, source });
    }

    /// Pause if playing, resume if paused; no-op with nothing loaded
    pub fn toggle_play_pause(&mut self) {
        self.apply(Command::TogglePlayPause);
    }

    /// Skip to next track
    pub fn play_next(&mut self) {
        self.apply(Command::Next);
    }

    /// Go to previous track
    pub fn play_previous(&mut self) {
        self.apply(Command::Previous);
    }

    /// Seek within the current track; the position updates immediately
    pub fn seek_to(&mut self, position_secs: f64) {
        self.apply(Command::Seek(position_secs));
    }

    /// Set volume (not clamped)
    pub fn set_volume(&mut self, volume: f32) {
        self.apply(Command::SetVolume(volume));
    }

    pub fn toggle_shuffle(&mut self) {
        self.apply(Command::ToggleShuffle);
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.apply(Command::CycleRepeat);
    }

    // ===== Device callbacks =====
    //
    // These report against the current load. Hosts relaying events from a
    // device that may lag behind use `apply(Input::device(..))` instead.

    pub fn on_position_tick(&mut self, position_secs: f64) {
        self.apply(Input::device(
            self.load_generation,
            DeviceEvent::PositionChanged(position_secs),
        ));
    }

    pub fn on_duration_known(&mut self, duration_secs: f64) {
        self.apply(Input::device(
            self.load_generation,
            DeviceEvent::DurationResolved(duration_secs),
        ));
    }

    pub fn on_track_ended(&mut self) {
        self.apply(Input::device(self.load_generation, DeviceEvent::Ended));
    }

    pub fn on_device_error(&mut self, message: impl Into<String>) {
        self.apply(Input::device(
            self.load_generation,
            DeviceEvent::Failed(message.into()),
        ));
    }

    // ===== State Queries =====

    /// Snapshot source of truth
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_track()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Generation of the most recent load
    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    /// Whether playback was asked for but the current load has not yet
    /// produced any media event
    ///
    /// Paused loads never count: the device may not fetch anything until
    /// `play()`.
    pub fn awaiting_media(&self) -> bool {
        self.state.is_playing && !self.media_responded
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Transitions =====

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::PlayTrack { track, source } => {
                let index = source.iter().position(|t| t.id == track.id).unwrap_or(0);
                debug!(track_id = %track.id, index, queue_len = source.len(), "play track");

                self.state.queue.replace(source, index);
                self.emit(PlaybackEvent::QueueChanged {
                    length: self.state.queue.len(),
                });

                self.set_playing(true);
                self.load(track, true);
            }
            Command::TogglePlayPause => {
                if self.state.current_track.is_none() {
                    debug!("toggle ignored, nothing loaded");
                    return;
                }

                if self.state.is_playing {
                    self.set_playing(false);
                    if let Err(e) = self.output.pause() {
                        self.report_error(format!("Failed to pause: {}", e));
                    }
                } else {
                    self.set_playing(true);
                    if let Err(e) = self.output.play() {
                        self.device_failed(format!("Failed to resume: {}", e));
                    }
                }
            }
            Command::Next => {
                let Some(current) = self.state.queue.current_index() else {
                    return;
                };
                let target = self.select_next(current);
                if !self.advance_to(target) {
                    debug!(index = current, "next stayed on current track");
                }
            }
            Command::Previous => {
                let Some(current) = self.state.queue.current_index() else {
                    return;
                };
                let target =
                    previous_index(current, self.state.queue.len(), self.state.repeat_mode);
                if !self.advance_to(target) {
                    debug!(index = current, "previous stayed on current track");
                }
            }
            Command::Seek(position_secs) => {
                if let Err(e) = self.output.seek(position_secs) {
                    self.report_error(format!("Failed to seek: {}", e));
                }
                self.state.position_secs = position_secs;
                self.emit_position_update();
            }
            Command::SetVolume(volume) => {
                self.state.volume = volume;
                if let Err(e) = self.output.set_volume(volume) {
                    self.report_error(format!("Failed to set volume: {}", e));
                }
                self.emit(PlaybackEvent::VolumeChanged { volume });
            }
            Command::ToggleShuffle => {
                self.state.shuffle_enabled = !self.state.shuffle_enabled;
                self.emit(PlaybackEvent::ShuffleChanged {
                    enabled: self.state.shuffle_enabled,
                });
            }
            Command::CycleRepeat => {
                self.state.repeat_mode = self.state.repeat_mode.cycle();
                self.emit(PlaybackEvent::RepeatChanged {
                    mode: self.state.repeat_mode,
                });
            }
        }
    }

    fn handle_device_event(&mut self, generation: u64, event: DeviceEvent) {
        if generation != self.load_generation {
            debug!(
                generation,
                current = self.load_generation,
                ?event,
                "dropping event from superseded load"
            );
            return;
        }

        match event {
            DeviceEvent::PositionChanged(position_secs) => {
                if !position_secs.is_finite() {
                    debug!(position_secs, "ignoring non-finite position");
                    return;
                }
                self.media_responded = true;
                self.state.position_secs = position_secs;
                self.emit_position_update();
            }
            DeviceEvent::DurationResolved(duration_secs) => {
                if !duration_secs.is_finite() || duration_secs < 0.0 {
                    debug!(duration_secs, "ignoring unusable duration");
                    return;
                }
                self.media_responded = true;
                self.state.duration_secs = duration_secs;
                self.emit(PlaybackEvent::DurationChanged { duration_secs });
            }
            DeviceEvent::Ended => self.handle_track_ended(),
            DeviceEvent::Failed(message) => self.device_failed(message),
        }
    }

    /// The device ran out of media
    fn handle_track_ended(&mut self) {
        self.media_responded = true;

        if self.state.repeat_mode == RepeatMode::One {
            if let Some(track) = self.state.current_track.clone() {
                debug!(track_id = %track.id, "repeat one, restarting");
                self.set_playing(true);
                self.load(track, true);
                return;
            }
        }

        let Some(current) = self.state.queue.current_index() else {
            self.stop_at_end();
            return;
        };

        let target = self.select_next(current);
        if self.state.shuffle_enabled && target == current {
            // A shuffle draw may pick the track that just finished; play it again
            if let Some(track) = self.state.queue.get(target).cloned() {
                self.load(track, self.state.is_playing);
            }
        } else if !self.advance_to(target) {
            self.stop_at_end();
        }
    }

    fn handle_load_timeout(&mut self, generation: u64) {
        if generation != self.load_generation || !self.awaiting_media() {
            debug!(generation, current = self.load_generation, "stale load timeout");
            return;
        }

        let uri = self
            .state
            .current_track
            .as_ref()
            .map(|t| t.media_uri.clone())
            .unwrap_or_default();
        self.device_failed(format!("Timed out loading {}", uri));
    }

    fn select_next(&mut self, current: usize) -> usize {
        next_index(
            current,
            self.state.queue.len(),
            self.state.shuffle_enabled,
            self.state.repeat_mode,
            self.shuffle_avoids_current,
            &mut self.rng,
        )
    }

    /// Move the cursor to `target` and load that track
    ///
    /// Returns false, touching nothing, when `target` is already the
    /// current track.
    fn advance_to(&mut self, target: usize) -> bool {
        let Some(track) = self.state.queue.get(target).cloned() else {
            return false;
        };

        let same_track = self.state.queue.current_index() == Some(target)
            && self.state.current_track.as_ref().map(|t| t.id.as_str()) == Some(track.id.as_str());
        if same_track {
            return false;
        }

        self.state.queue.select(target);
        let autoplay = self.state.is_playing;
        self.load(track, autoplay);
        true
    }

    /// Make `track` current and hand its media to the device
    ///
    /// Setting a new source supersedes whatever load was in flight.
    fn load(&mut self, track: Track, autoplay: bool) {
        let previous_track_id = self.state.current_track.as_ref().map(|t| t.id.clone());
        let uri = track.media_uri.clone();
        let track_id = track.id.clone();

        self.state.position_secs = 0.0;
        self.state.duration_secs = track.nominal_secs();
        self.state.current_track = Some(track);
        self.load_generation += 1;
        self.media_responded = false;

        debug!(
            track_id = %track_id,
            generation = self.load_generation,
            autoplay,
            "loading track"
        );
        self.emit(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
            index: self.state.queue.current_index(),
        });

        if let Err(e) = self.output.set_source(&uri, self.load_generation) {
            self.device_failed(e.to_string());
            return;
        }

        if autoplay {
            if let Err(e) = self.output.play() {
                self.device_failed(format!("Failed to start playback: {}", e));
            }
        }
    }

    fn stop_at_end(&mut self) {
        info!("end of queue reached, stopping");
        self.set_playing(false);
    }

    /// Device can't render: stop claiming to play and tell the UI
    fn device_failed(&mut self, message: String) {
        self.set_playing(false);
        self.report_error(message);
    }

    fn report_error(&mut self, message: String) {
        warn!(%message, "audio device error");
        self.emit(PlaybackEvent::Error { message });
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.state.is_playing != is_playing {
            self.state.is_playing = is_playing;
            self.emit(PlaybackEvent::StateChanged { is_playing });
        }
    }

    fn emit_position_update(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_secs: self.state.position_secs,
            duration_secs: self.state.duration_secs,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}
