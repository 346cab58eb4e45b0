//! Serialized playback dispatcher
//!
//! One thread owns the `PlaybackController`. User commands and device
//! events share a single bounded channel into that thread, so every input
//! is applied to completion before the next one is looked at, whatever
//! thread it came from.

use crate::config::PlayerSettings;
use crate::error::{PlayerError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use yantra_playback::{
    AudioOutput, Command, DeviceEvent, Input, PlaybackController, PlaybackEvent, PlaybackState,
    Track,
};

/// Messages consumed by the dispatcher thread
enum Message {
    Input(Input),
    Snapshot(Sender<PlaybackState>),
    Shutdown,
}

/// Handle a device uses to report events back to the player
///
/// Cloneable and `Send`; hand it to whatever thread or callback observes
/// the media element. Every event carries the generation passed to the
/// `AudioOutput::set_source` call that started the media it concerns.
#[derive(Debug, Clone)]
pub struct DeviceEventSink {
    tx: Sender<Message>,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Input(input) => f.debug_tuple("Input").field(input).finish(),
            Message::Snapshot(_) => f.write_str("Snapshot"),
            Message::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl DeviceEventSink {
    /// Post an event, waiting if the channel is full
    pub fn send(&self, generation: u64, event: DeviceEvent) -> Result<()> {
        self.tx
            .send(Message::Input(Input::device(generation, event)))
            .map_err(|_| PlayerError::Disconnected)
    }

    /// Post an event without waiting
    ///
    /// Use this from inside `AudioOutput` methods: those run on the
    /// dispatcher thread, which cannot drain the channel while blocked.
    /// Returns `false` if the event was dropped.
    pub fn try_send(&self, generation: u64, event: DeviceEvent) -> bool {
        match self.tx.try_send(Message::Input(Input::device(generation, event))) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                warn!(?message, "Playback channel full, dropping device event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Threaded playback host
///
/// Commands never block: they are queued or refused with
/// [`PlayerError::Busy`]. UI events arrive on [`Player::events`].
pub struct Player {
    tx: Sender<Message>,
    event_rx: Receiver<PlaybackEvent>,
    thread: Option<JoinHandle<()>>,
}

impl Player {
    /// Start the dispatcher thread
    ///
    /// `make_output` receives the sink the device should report through and
    /// returns the device itself.
    pub fn spawn<F>(settings: &PlayerSettings, make_output: F) -> Result<Self>
    where
        F: FnOnce(DeviceEventSink) -> Box<dyn AudioOutput>,
    {
        settings.validate()?;

        let (tx, rx) = bounded(settings.dispatcher.command_capacity);
        let (event_tx, event_rx) = bounded(settings.dispatcher.event_capacity);

        let output = make_output(DeviceEventSink { tx: tx.clone() });
        let controller = PlaybackController::new(settings.playback.clone(), output);
        let load_timeout = settings.dispatcher.load_timeout();

        let thread = thread::Builder::new()
            .name("yantra-playback".to_string())
            .spawn(move || run(controller, rx, event_tx, load_timeout))?;

        Ok(Self {
            tx,
            event_rx,
            thread: Some(thread),
        })
    }

    /// Queue any input for the controller without waiting
    ///
    /// Fails with `Busy` while the dispatcher is `command_capacity` inputs
    /// behind, e.g. stuck in a slow device call.
    pub fn send(&self, input: impl Into<Input>) -> Result<()> {
        self.tx
            .try_send(Message::Input(input.into()))
            .map_err(|e| match e {
                TrySendError::Full(message) => {
                    debug!(?message, "Playback channel full, refusing command");
                    PlayerError::Busy
                }
                TrySendError::Disconnected(_) => PlayerError::Disconnected,
            })
    }

    pub fn play_track(&self, track: Track, source: Vec<Track>) -> Result<()> {
        self.send(Command::PlayTrack { track, source })
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(Command::TogglePlayPause)
    }

    pub fn play_next(&self) -> Result<()> {
        self.send(Command::Next)
    }

    pub fn play_previous(&self) -> Result<()> {
        self.send(Command::Previous)
    }

    pub fn seek_to(&self, position_secs: f64) -> Result<()> {
        self.send(Command::Seek(position_secs))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(Command::SetVolume(volume))
    }

    pub fn toggle_shuffle(&self) -> Result<()> {
        self.send(Command::ToggleShuffle)
    }

    pub fn cycle_repeat_mode(&self) -> Result<()> {
        self.send(Command::CycleRepeat)
    }

    /// Snapshot of the state after every input sent before this call
    pub fn state(&self) -> Result<PlaybackState> {
        let (reply_tx, reply_rx) = bounded(1);
        self.tx
            .send(Message::Snapshot(reply_tx))
            .map_err(|_| PlayerError::Disconnected)?;
        reply_rx.recv().map_err(|_| PlayerError::Disconnected)
    }

    /// UI events, in the order the controller emitted them
    pub fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.event_rx
    }

    /// Another sink onto this player's input channel
    pub fn device_events(&self) -> DeviceEventSink {
        DeviceEventSink {
            tx: self.tx.clone(),
        }
    }

    /// Stop the dispatcher and wait for it to exit
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.thread.take() else {
            return Ok(());
        };

        // Already gone if the thread panicked
        let _ = self.tx.send(Message::Shutdown);
        handle.join().map_err(|_| PlayerError::ThreadPanicked)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Playback dispatcher did not stop cleanly: {}", e);
        }
    }
}

/// Watchdog armed for one load
#[derive(Debug, Clone, Copy)]
struct Watchdog {
    generation: u64,
    deadline: Instant,
}

fn run(
    mut controller: PlaybackController,
    rx: Receiver<Message>,
    events: Sender<PlaybackEvent>,
    load_timeout: Option<Duration>,
) {
    info!("Playback dispatcher started");

    let mut watchdog: Option<Watchdog> = None;
    forward_events(&mut controller, &events);

    loop {
        let received = match watchdog {
            Some(armed) => rx.recv_deadline(armed.deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Message::Input(input)) => controller.apply(input),
            Ok(Message::Snapshot(reply)) => {
                let _ = reply.send(controller.state().clone());
                continue;
            }
            Ok(Message::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(expired) = watchdog.take() {
                    debug!(generation = expired.generation, "Load watchdog expired");
                    controller.apply(Input::LoadTimeout {
                        generation: expired.generation,
                    });
                }
            }
        }

        watchdog = rearm(&controller, watchdog, load_timeout);
        forward_events(&mut controller, &events);
    }

    info!("Playback dispatcher stopped");
}

/// Arm for a new load, keep an existing deadline, or disarm once media responded
fn rearm(
    controller: &PlaybackController,
    current: Option<Watchdog>,
    load_timeout: Option<Duration>,
) -> Option<Watchdog> {
    let timeout = load_timeout?;
    if !controller.awaiting_media() {
        return None;
    }

    let generation = controller.load_generation();
    match current {
        Some(armed) if armed.generation == generation => Some(armed),
        _ => Some(Watchdog {
            generation,
            deadline: Instant::now() + timeout,
        }),
    }
}

fn forward_events(controller: &mut PlaybackController, events: &Sender<PlaybackEvent>) {
    for event in controller.drain_events() {
        match events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(?event, "Event channel full, dropping playback event");
            }
            // Nobody listening
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}
