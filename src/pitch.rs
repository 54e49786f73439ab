//! # Pitch Value Types
//!
//! Small immutable types shared by the key table, the speller and the layout
//! engine.
//!
//! ## Key Concepts
//!
//! ### Letter Cycle
//! Letters are indexed `C=0 D=1 E=2 F=3 G=4 A=5 B=6`. The index drives both the
//! vertical staff offset and the second-interval flip heuristic.
//!
//! ### Spelled Pitch
//! A letter plus an optional sharp or flat, e.g. `F#` or `Bb`. Key signature
//! scales are lists of spelled pitches, and the chord namer consumes them.
//!
//! ### MIDI Note
//! Integer pitch code 0-127 where 60 is middle C. Out-of-range values are
//! rejected at construction so the engine never sees them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// Natural note letters in staff order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position in the natural letter cycle (C=0 .. B=6)
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    pub fn from_index(index: i32) -> Letter {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    /// Semitone offset of the natural letter from C
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Letter {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Letter::C),
            "D" => Ok(Letter::D),
            "E" => Ok(Letter::E),
            "F" => Ok(Letter::F),
            "G" => Ok(Letter::G),
            "A" => Ok(Letter::A),
            "B" => Ok(Letter::B),
            _ => Err(NotationError::InvalidPitchName(s.to_string())),
        }
    }
}

/// Chromatic alteration carried by a spelled pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    /// No alteration (bare letter)
    #[default]
    #[serde(rename = "none")]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Semitone adjustment applied to the letter
    pub fn alter(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// A letter with its alteration, e.g. `C`, `F#`, `Bb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpelledPitch {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl SpelledPitch {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub fn is_altered(&self) -> bool {
        self.accidental != Accidental::Natural
    }

    /// Pitch class 0-11 of this spelling
    pub fn pitch_class(&self) -> u8 {
        (self.letter.semitone() as i8 + self.accidental.alter()).rem_euclid(12) as u8
    }
}

impl fmt::Display for SpelledPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental.symbol())
    }
}

impl FromStr for SpelledPitch {
    type Err = NotationError;

    /// Accepts `C`, `F#`, `Bb`, plus the ASCII forms `Fs` and `Bf`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| NotationError::InvalidPitchName(s.to_string()))?
            .to_string()
            .parse::<Letter>()
            .map_err(|_| NotationError::InvalidPitchName(s.to_string()))?;

        let accidental = match chars.as_str() {
            "" => Accidental::Natural,
            "#" | "s" | "\u{266F}" => Accidental::Sharp,
            "b" | "f" | "\u{266D}" => Accidental::Flat,
            _ => return Err(NotationError::InvalidPitchName(s.to_string())),
        };

        Ok(Self { letter, accidental })
    }
}

impl TryFrom<String> for SpelledPitch {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpelledPitch> for String {
    fn from(pitch: SpelledPitch) -> Self {
        pitch.to_string()
    }
}

/// MIDI note number, guaranteed to be within 0-127
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MidiNote(u8);

impl MidiNote {
    pub fn new(value: i32) -> Result<Self, NotationError> {
        if (0..=127).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(NotationError::InvalidPitch(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }
}

impl TryFrom<u8> for MidiNote {
    type Error = NotationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as i32)
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
