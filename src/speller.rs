//! # Pitch Speller
//!
//! Maps a single MIDI note number plus a key signature to a spelled note and
//! decides which accidental glyph, if any, must be drawn beside it.
//!
//! ## Spelling
//! The 7 white-key pitch classes have exactly one spelling. The 5 black-key
//! classes carry both a sharp and a flat spelling (pitch class 1 is `C#` or
//! `Db`); the key's preferred accidental picks one. There is no fallback
//! beyond that preference.
//!
//! ## Accidental Classification
//! | Spelling | In key scale? | Glyph drawn |
//! |----------|---------------|-------------|
//! | altered  | yes           | none (the key signature says it) |
//! | altered  | no            | the sharp/flat itself |
//! | bare     | no            | natural (cancels the signature) |
//! | bare     | yes           | none |

use serde::Serialize;

use crate::key::{KeySignature, PreferredAccidental};
use crate::pitch::{Accidental, Letter, MidiNote, SpelledPitch};

/// Spelling candidates for one pitch class
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spelling {
    White(Letter),
    Black { sharp: Letter, flat: Letter },
}

impl Spelling {
    /// Resolve to a concrete spelling under the key's preference
    pub fn resolve(self, preferred: PreferredAccidental) -> SpelledPitch {
        match (self, preferred) {
            (Spelling::White(letter), _) => SpelledPitch::natural(letter),
            (Spelling::Black { sharp, .. }, PreferredAccidental::Sharp) => {
                SpelledPitch::new(sharp, Accidental::Sharp)
            }
            (Spelling::Black { flat, .. }, PreferredAccidental::Flat) => {
                SpelledPitch::new(flat, Accidental::Flat)
            }
        }
    }
}

/// Pitch class 0-11 to spelling candidates
pub const CHROMATIC: [Spelling; 12] = [
    Spelling::White(Letter::C),
    Spelling::Black { sharp: Letter::C, flat: Letter::D },
    Spelling::White(Letter::D),
    Spelling::Black { sharp: Letter::D, flat: Letter::E },
    Spelling::White(Letter::E),
    Spelling::White(Letter::F),
    Spelling::Black { sharp: Letter::F, flat: Letter::G },
    Spelling::White(Letter::G),
    Spelling::Black { sharp: Letter::G, flat: Letter::A },
    Spelling::White(Letter::A),
    Spelling::Black { sharp: Letter::A, flat: Letter::B },
    Spelling::White(Letter::B),
];

/// Accidental glyph to draw next to a notehead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccidentalGlyph {
    #[default]
    None,
    Sharp,
    Flat,
    Natural,
}

impl AccidentalGlyph {
    /// MusicXML `<accidental>` value, if a glyph is drawn
    pub fn musicxml_name(self) -> Option<&'static str> {
        match self {
            AccidentalGlyph::None => None,
            AccidentalGlyph::Sharp => Some("sharp"),
            AccidentalGlyph::Flat => Some("flat"),
            AccidentalGlyph::Natural => Some("natural"),
        }
    }
}

/// Fully resolved notation descriptor for one active note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpelledNote {
    pub midi_note: MidiNote,
    pub letter: Letter,
    /// True alteration of the pitch under the key's preferred spelling
    pub chromatic_accidental: Accidental,
    /// Display octave: `floor(midi / 12) - 2`, floored at -1 (middle C = 3)
    pub octave: i8,
    pub rendered_accidental: AccidentalGlyph,
    /// Notehead drawn mirrored to clear an adjacent second
    pub flip: bool,
    pub vertical_offset: i32,
}

impl SpelledNote {
    pub fn pitch(&self) -> SpelledPitch {
        SpelledPitch::new(self.letter, self.chromatic_accidental)
    }

    /// Spelled name without octave, e.g. "F#"
    pub fn name(&self) -> String {
        self.pitch().to_string()
    }
}

/// Display octave of a MIDI note
pub fn display_octave(note: MidiNote) -> i8 {
    (note.value() as i8 / 12 - 2).max(-1)
}

/// Vertical staff position: 10 units per diatonic step, 70 per octave
pub fn vertical_offset(octave: i8, letter: Letter) -> i32 {
    32 - (octave as i32 - 3) * 70 - letter.index() * 10
}

/// Classify the glyph needed for a spelling in the given key
pub fn classify(pitch: &SpelledPitch, key: &KeySignature) -> AccidentalGlyph {
    match (pitch.accidental, key.contains(pitch)) {
        (Accidental::Natural, true) => AccidentalGlyph::None,
        (Accidental::Natural, false) => AccidentalGlyph::Natural,
        (_, true) => AccidentalGlyph::None,
        (Accidental::Sharp, false) => AccidentalGlyph::Sharp,
        (Accidental::Flat, false) => AccidentalGlyph::Flat,
    }
}

/// Spell one MIDI note in a key. `flip` is left unset for the layout pass.
pub fn spell(note: MidiNote, key: &KeySignature) -> SpelledNote {
    let octave = display_octave(note);
    let pitch = CHROMATIC[note.pitch_class() as usize].resolve(key.preferred);

    SpelledNote {
        midi_note: note,
        letter: pitch.letter,
        chromatic_accidental: pitch.accidental,
        octave,
        rendered_accidental: classify(&pitch, key),
        flip: false,
        vertical_offset: vertical_offset(octave, pitch.letter),
    }
}
