/// Player configuration
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use yantra_playback::PlaybackConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub dispatcher: DispatcherSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatcherSettings {
    /// Bound of the shared command/device-event channel
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Bound of the outgoing UI event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// How long a load may go without any device event; 0 disables the watchdog
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            command_capacity: default_command_capacity(),
            event_capacity: default_event_capacity(),
            load_timeout_ms: default_load_timeout_ms(),
        }
    }
}

impl DispatcherSettings {
    pub fn load_timeout(&self) -> Option<Duration> {
        (self.load_timeout_ms > 0).then(|| Duration::from_millis(self.load_timeout_ms))
    }
}

impl PlayerSettings {
    /// Load settings from an optional TOML file, then the environment
    ///
    /// Environment variables are prefixed with `YANTRA_` and use `__` between
    /// nested keys, e.g. `YANTRA_PLAYBACK__VOLUME=0.4`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(true));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("YANTRA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = settings.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(?settings, "Loaded player settings");
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.dispatcher.command_capacity == 0 {
            return Err(PlayerError::InvalidSettings(
                "dispatcher.command_capacity must be at least 1".to_string(),
            ));
        }

        if self.dispatcher.event_capacity == 0 {
            return Err(PlayerError::InvalidSettings(
                "dispatcher.event_capacity must be at least 1".to_string(),
            ));
        }

        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::InvalidSettings(format!(
                "playback.volume must be within 0.0-1.0, got {volume}"
            )));
        }

        Ok(())
    }
}

// Default values
fn default_command_capacity() -> usize {
    64
}

fn default_event_capacity() -> usize {
    256
}

fn default_load_timeout_ms() -> u64 {
    15_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use yantra_playback::RepeatMode;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let settings = PlayerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.dispatcher.command_capacity, 64);
        assert_eq!(
            settings.dispatcher.load_timeout(),
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn zero_timeout_disables_watchdog() {
        let dispatcher = DispatcherSettings {
            load_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(dispatcher.load_timeout(), None);
    }

    #[test]
    fn loads_from_file_with_partial_sections() {
        let file = toml_file(
            r#"
            [playback]
            volume = 0.25
            repeat = "all"

            [dispatcher]
            load_timeout_ms = 500
            "#,
        );

        let settings = PlayerSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.playback.volume, 0.25);
        assert_eq!(settings.playback.repeat, RepeatMode::All);
        assert!(!settings.playback.shuffle);
        assert_eq!(settings.dispatcher.load_timeout_ms, 500);
        assert_eq!(settings.dispatcher.event_capacity, 256);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PlayerSettings::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn rejects_zero_capacity() {
        let file = toml_file("[dispatcher]\ncommand_capacity = 0\n");
        let result = PlayerSettings::load(Some(file.path()));
        assert!(matches!(result, Err(PlayerError::InvalidSettings(_))));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let mut settings = PlayerSettings::default();
        settings.playback.volume = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(PlayerError::InvalidSettings(_))
        ));
    }
}
