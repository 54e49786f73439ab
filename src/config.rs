//! # Configuration
//!
//! YAML configuration for the live staff. Every field is optional.
//!
//! ```yaml
//! key: D
//! mode: major
//! device: "Digital Piano"
//! channel: 12
//! note-off: toggle
//! key-table: my_keys.yaml
//! ```
//!
//! `channel` is 0-based, matching the low nibble of the status byte.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::NotationError;
use crate::key::{KeySignatureTable, Mode};
use crate::midi::{MidiFilter, NoteOffConvention};
use crate::pitch::Letter;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Initial tonic
    #[serde(default)]
    pub key: Letter,
    #[serde(default)]
    pub mode: Mode,
    /// Substring of the MIDI input port name to bind
    pub device: Option<String>,
    pub channel: Option<u8>,
    #[serde(default)]
    pub note_off: NoteOffConvention,
    /// Replacement key table; relative paths resolve against the config file
    pub key_table: Option<PathBuf>,
}

impl Config {
    pub fn from_yaml_str(source: &str) -> Result<Self, NotationError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config =
            serde_yaml::from_str(source).map_err(|e| NotationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NotationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| NotationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&source)?;

        if let (Some(table), Some(dir)) = (&config.key_table, path.parent()) {
            if table.is_relative() {
                config.key_table = Some(dir.join(table));
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), NotationError> {
        if let Some(channel) = self.channel {
            if channel > 15 {
                return Err(NotationError::Config(format!(
                    "channel must be 0-15, got {}",
                    channel
                )));
            }
        }
        Ok(())
    }

    pub fn midi_filter(&self) -> MidiFilter {
        MidiFilter {
            channel: self.channel,
            convention: self.note_off,
        }
    }

    /// The configured key table, or the built-in one
    pub fn key_table(&self) -> Result<KeySignatureTable, NotationError> {
        match &self.key_table {
            Some(path) => KeySignatureTable::load(path),
            None => KeySignatureTable::builtin(),
        }
    }
}
