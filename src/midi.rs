//! Raw MIDI message decoding for the note event sink.
//!
//! Only note messages matter to the staff; everything else is ignored.
//! Two release conventions are supported because some keyboards never send
//! note-off and instead repeat note-on for the release.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A decoded channel voice message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
}

impl MidiMessage {
    /// Decode raw bytes. Note-on with velocity 0 is reported as note-off.
    pub fn parse(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x90 if data.len() >= 3 => {
                let velocity = data[2];
                if velocity == 0 {
                    Some(MidiMessage::NoteOff {
                        channel,
                        pitch: data[1],
                    })
                } else {
                    Some(MidiMessage::NoteOn {
                        channel,
                        pitch: data[1],
                        velocity,
                    })
                }
            }
            0x80 if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                pitch: data[1],
            }),
            _ => {
                debug!("Ignoring MIDI message with status {:02X}", status);
                None
            }
        }
    }

    pub fn channel(&self) -> u8 {
        match self {
            MidiMessage::NoteOn { channel, .. } | MidiMessage::NoteOff { channel, .. } => *channel,
        }
    }

    pub fn pitch(&self) -> u8 {
        match self {
            MidiMessage::NoteOn { pitch, .. } | MidiMessage::NoteOff { pitch, .. } => *pitch,
        }
    }
}

/// How a device signals that a key was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteOffConvention {
    /// Note-off, or note-on with velocity 0
    #[default]
    Standard,
    /// Every note-on toggles the note; note-off still releases
    Toggle,
}

/// What a decoded message does to the held-note set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Press(u8),
    Release(u8),
    Toggle(u8),
}

/// Channel filter plus release convention for one input device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MidiFilter {
    /// 0-based channel to accept; `None` accepts all channels
    pub channel: Option<u8>,
    pub convention: NoteOffConvention,
}

impl MidiFilter {
    /// Map raw bytes to a note action, or `None` if the message is ignored
    pub fn action(&self, data: &[u8]) -> Option<NoteAction> {
        let message = MidiMessage::parse(data)?;
        if let Some(channel) = self.channel {
            if message.channel() != channel {
                debug!("Dropping message on channel {}", message.channel());
                return None;
            }
        }

        let action = match (message, self.convention) {
            (MidiMessage::NoteOn { pitch, .. }, NoteOffConvention::Standard) => NoteAction::Press(pitch),
            (MidiMessage::NoteOn { pitch, .. }, NoteOffConvention::Toggle) => NoteAction::Toggle(pitch),
            (MidiMessage::NoteOff { pitch, .. }, _) => NoteAction::Release(pitch),
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let msg = MidiMessage::parse(&[0x9C, 60, 100]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::NoteOn {
                channel: 12,
                pitch: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn test_parse_note_on_velocity_zero_is_note_off() {
        let msg = MidiMessage::parse(&[0x90, 64, 0]).unwrap();
        assert_eq!(msg, MidiMessage::NoteOff { channel: 0, pitch: 64 });
    }

    #[test]
    fn test_parse_note_off() {
        let msg = MidiMessage::parse(&[0x8C, 60, 64]).unwrap();
        assert_eq!(msg, MidiMessage::NoteOff { channel: 12, pitch: 60 });
    }

    #[test]
    fn test_ignores_other_messages() {
        assert!(MidiMessage::parse(&[]).is_none());
        assert!(MidiMessage::parse(&[0xB0, 7, 100]).is_none());
        assert!(MidiMessage::parse(&[0xF8]).is_none());
        assert!(MidiMessage::parse(&[0x90, 60]).is_none());
    }

    #[test]
    fn test_standard_convention() {
        let filter = MidiFilter::default();
        assert_eq!(filter.action(&[0x90, 60, 80]), Some(NoteAction::Press(60)));
        assert_eq!(filter.action(&[0x90, 60, 0]), Some(NoteAction::Release(60)));
        assert_eq!(filter.action(&[0x80, 60, 0]), Some(NoteAction::Release(60)));
    }

    #[test]
    fn test_toggle_convention() {
        let filter = MidiFilter {
            channel: None,
            convention: NoteOffConvention::Toggle,
        };
        assert_eq!(filter.action(&[0x9C, 62, 80]), Some(NoteAction::Toggle(62)));
        assert_eq!(filter.action(&[0x8C, 62, 0]), Some(NoteAction::Release(62)));
    }

    #[test]
    fn test_channel_filter() {
        let filter = MidiFilter {
            channel: Some(12),
            convention: NoteOffConvention::Standard,
        };
        assert_eq!(filter.action(&[0x9C, 60, 80]), Some(NoteAction::Press(60)));
        assert_eq!(filter.action(&[0x90, 60, 80]), None);
    }
}
