//! Property-based tests for the playback controller
//!
//! Uses proptest to check invariants across random command and device
//! event sequences.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use yantra_playback::{
    Command, DeviceEvent, Input, PlaybackConfig, PlaybackController, RecordingOutput, RepeatMode,
    Track,
};

// ===== Helpers =====

fn make_tracks(count: usize, prefix: &str) -> Vec<Track> {
    (0..count)
        .map(|i| {
            Track::new(
                format!("{}{}", prefix, i),
                format!("Song {}", i),
                "Artist",
                format!("mem://{}{}", prefix, i),
            )
        })
        .collect()
}

/// One step of a host session
///
/// Device events are stamped when applied: either with the current load or
/// with the one before it, as a lagging device would.
#[derive(Debug, Clone)]
enum Step {
    Apply(Input),
    Device { stale: bool, event: DeviceEvent },
}

fn apply_step(controller: &mut PlaybackController, step: Step) {
    match step {
        Step::Apply(input) => controller.apply(input),
        Step::Device { stale, event } => {
            let current = controller.load_generation();
            let generation = if stale { current.wrapping_sub(1) } else { current };
            controller.apply(Input::device(generation, event));
        }
    }
}

fn arbitrary_device_event() -> impl Strategy<Value = DeviceEvent> {
    prop_oneof![
        (0.0f64..500.0).prop_map(DeviceEvent::PositionChanged),
        (0.0f64..500.0).prop_map(DeviceEvent::DurationResolved),
        Just(DeviceEvent::Ended),
        Just(DeviceEvent::Failed("boom".to_string())),
    ]
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arbitrary_input().prop_map(Step::Apply),
        1 => (any::<bool>(), arbitrary_device_event())
            .prop_map(|(stale, event)| Step::Device { stale, event }),
    ]
}

fn arbitrary_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        (0usize..8, 0usize..10).prop_map(|(len, pick)| {
            let source = make_tracks(len, "t");
            let track = source
                .get(pick)
                .cloned()
                .unwrap_or_else(|| Track::new("stray", "Stray", "X", "mem://stray"));
            Input::Command(Command::PlayTrack { track, source })
        }),
        Just(Input::Command(Command::TogglePlayPause)),
        Just(Input::Command(Command::Next)),
        Just(Input::Command(Command::Previous)),
        (-10.0f64..500.0).prop_map(|p| Input::Command(Command::Seek(p))),
        (0.0f32..1.0).prop_map(|v| Input::Command(Command::SetVolume(v))),
        Just(Input::Command(Command::ToggleShuffle)),
        Just(Input::Command(Command::CycleRepeat)),
        (0u64..20).prop_map(|generation| Input::LoadTimeout { generation }),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: the cursor is inside the queue whenever the queue has tracks
    #[test]
    fn cursor_always_in_range(
        seed in any::<u64>(),
        steps in prop::collection::vec(arbitrary_step(), 1..60)
    ) {
        let mut controller = PlaybackController::with_rng(
            PlaybackConfig::default(),
            Box::new(RecordingOutput::new()),
            StdRng::seed_from_u64(seed),
        );

        for step in steps {
            apply_step(&mut controller, step);

            let state = controller.state();
            match state.current_index() {
                Some(index) => prop_assert!(index < state.queue().len()),
                None => prop_assert!(state.queue().is_empty()),
            }
            prop_assert!(state.duration_secs() >= 0.0);
        }
    }

    /// Property: events stamped for an earlier load change nothing
    #[test]
    fn superseded_device_events_are_inert(
        len in 2usize..10,
        skips in 1usize..5,
        events in prop::collection::vec(arbitrary_device_event(), 1..20)
    ) {
        let mut controller = PlaybackController::new(
            PlaybackConfig::default(),
            Box::new(RecordingOutput::new()),
        );
        let source = make_tracks(len, "s");
        controller.play_track(source[0].clone(), source);
        for _ in 0..skips {
            controller.play_next();
        }
        controller.drain_events();
        let before = controller.state().clone();
        let awaiting = controller.awaiting_media();

        for event in events {
            apply_step(&mut controller, Step::Device { stale: true, event });
        }

        prop_assert_eq!(controller.state(), &before);
        prop_assert_eq!(controller.awaiting_media(), awaiting);
        prop_assert!(!controller.has_pending_events());
    }

    /// Property: previous is sequential regardless of shuffle
    #[test]
    fn previous_is_deterministic(
        seed in any::<u64>(),
        len in 1usize..20,
        start in 0usize..20,
        shuffle in any::<bool>()
    ) {
        let start = start % len;
        let mut controller = PlaybackController::with_rng(
            PlaybackConfig { shuffle, ..Default::default() },
            Box::new(RecordingOutput::new()),
            StdRng::seed_from_u64(seed),
        );
        let source = make_tracks(len, "p");
        controller.play_track(source[start].clone(), source);

        controller.play_previous();

        prop_assert_eq!(controller.current_index(), Some(start.saturating_sub(1)));
    }

    /// Property: sequential next never leaves the queue and wraps only on repeat all
    #[test]
    fn sequential_next_matches_model(
        len in 1usize..20,
        start in 0usize..20,
        steps in 1usize..40,
        repeat_all in any::<bool>()
    ) {
        let start = start % len;
        let repeat = if repeat_all { RepeatMode::All } else { RepeatMode::Off };
        let mut controller = PlaybackController::new(
            PlaybackConfig { repeat, ..Default::default() },
            Box::new(RecordingOutput::new()),
        );
        let source = make_tracks(len, "n");
        controller.play_track(source[start].clone(), source);

        let mut expected = start;
        for _ in 0..steps {
            controller.play_next();
            expected = if expected + 1 < len {
                expected + 1
            } else if repeat_all {
                0
            } else {
                len - 1
            };
            prop_assert_eq!(controller.current_index(), Some(expected));
        }
    }

    /// Property: a seek is reflected immediately, whatever the value
    #[test]
    fn seek_is_always_optimistic(position in -1000.0f64..1000.0) {
        let mut controller =
            PlaybackController::new(PlaybackConfig::default(), Box::new(RecordingOutput::new()));
        controller.seek_to(position);
        prop_assert_eq!(controller.state().position_secs(), position);
    }
}
