//! # Key Signature Table
//!
//! Static catalogue of supported key signatures, keyed by (tonic letter, mode).
//!
//! ## Data Source
//! The built-in table is YAML embedded in the crate (`data/major_keys.yaml`).
//! A replacement table with the same schema can be loaded from disk:
//!
//! ```yaml
//! - tonic: D
//!   mode: major
//!   scale: [D, E, "F#", G, A, B, "C#"]
//!   accidental: sharp
//!   glyph-offsets: [5, 35]
//! ```
//!
//! ## Validation
//! Every entry is checked once, at load time:
//! - exactly 7 scale degrees, starting at the (natural) tonic
//! - degrees walk the letter cycle in order, so letters are unique
//! - degrees match the mode's interval pattern
//! - every altered degree uses the key's preferred accidental
//! - one glyph offset per altered degree
//! - no duplicate (tonic, mode) pair
//!
//! After loading, the table is immutable.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NotationError;
use crate::pitch::{Accidental, Letter, SpelledPitch};

const BUILTIN_TABLE: &str = include_str!("../data/major_keys.yaml");

/// Mode of a key signature. Only major is catalogued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
}

impl Mode {
    /// Semitone intervals from the tonic to each scale degree
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => f.write_str("major"),
        }
    }
}

impl FromStr for Mode {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" | "ionian" => Ok(Mode::Major),
            other => Err(NotationError::Config(format!("unknown mode '{}'", other))),
        }
    }
}

/// Which enharmonic spelling a key uses for black-key pitch classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredAccidental {
    Sharp,
    Flat,
}

impl PreferredAccidental {
    pub fn accidental(self) -> Accidental {
        match self {
            PreferredAccidental::Sharp => Accidental::Sharp,
            PreferredAccidental::Flat => Accidental::Flat,
        }
    }
}

/// A catalogued key signature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySignature {
    pub tonic: Letter,
    pub mode: Mode,
    /// Diatonic degrees in scale order (not pitch order)
    pub scale: [SpelledPitch; 7],
    pub preferred: PreferredAccidental,
    /// Vertical offsets of the key signature accidental glyphs
    pub glyph_offsets: Vec<i32>,
}

impl KeySignature {
    /// Whether this exact spelling is one of the key's scale degrees
    pub fn contains(&self, pitch: &SpelledPitch) -> bool {
        self.scale.contains(pitch)
    }

    /// Number of degrees altered by the signature
    pub fn altered_count(&self) -> usize {
        self.scale.iter().filter(|p| p.is_altered()).count()
    }

    /// Signed accidental count: positive = sharps, negative = flats
    pub fn fifths(&self) -> i8 {
        let count = self.altered_count() as i8;
        match self.preferred {
            PreferredAccidental::Sharp => count,
            PreferredAccidental::Flat => -count,
        }
    }

    /// Accidental glyph drawn in the signature
    pub fn glyph(&self) -> Accidental {
        if self.altered_count() == 0 {
            Accidental::Natural
        } else {
            self.preferred.accidental()
        }
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.tonic, self.mode)
    }
}

/// Raw key table entry for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RawKeyEntry {
    tonic: Letter,
    #[serde(default)]
    mode: Mode,
    scale: Vec<SpelledPitch>,
    accidental: PreferredAccidental,
    #[serde(default)]
    glyph_offsets: Vec<i32>,
}

impl RawKeyEntry {
    fn validate(self) -> Result<KeySignature, NotationError> {
        let name = format!("{} {}", self.tonic, self.mode);
        let fail = |message: String| NotationError::KeyTable {
            key: name.clone(),
            message,
        };

        let scale: [SpelledPitch; 7] = self.scale.clone().try_into().map_err(|_| {
            fail(format!("expected 7 scale degrees, got {}", self.scale.len()))
        })?;

        if scale[0] != SpelledPitch::natural(self.tonic) {
            return Err(fail(format!(
                "first scale degree {} does not match tonic {}",
                scale[0], self.tonic
            )));
        }

        let tonic_pc = self.tonic.semitone();
        let intervals = self.mode.intervals();
        for (degree, pitch) in scale.iter().enumerate() {
            let expected_letter = Letter::from_index(self.tonic.index() + degree as i32);
            if pitch.letter != expected_letter {
                return Err(fail(format!(
                    "scale degree {} is {}, expected letter {}",
                    degree + 1,
                    pitch,
                    expected_letter
                )));
            }

            let expected_pc = (tonic_pc + intervals[degree]) % 12;
            if pitch.pitch_class() != expected_pc {
                return Err(fail(format!(
                    "scale degree {} ({}) does not fit the {} interval pattern",
                    degree + 1,
                    pitch,
                    self.mode
                )));
            }

            if pitch.is_altered() && pitch.accidental != self.accidental.accidental() {
                return Err(fail(format!(
                    "scale degree {} ({}) contradicts the preferred accidental",
                    degree + 1,
                    pitch
                )));
            }
        }

        let altered = scale.iter().filter(|p| p.is_altered()).count();
        if self.glyph_offsets.len() != altered {
            return Err(fail(format!(
                "expected {} glyph offsets, got {}",
                altered,
                self.glyph_offsets.len()
            )));
        }

        Ok(KeySignature {
            tonic: self.tonic,
            mode: self.mode,
            scale,
            preferred: self.accidental,
            glyph_offsets: self.glyph_offsets,
        })
    }
}

/// Immutable, validated catalogue of key signatures
#[derive(Debug, Clone)]
pub struct KeySignatureTable {
    keys: Vec<KeySignature>,
}

impl KeySignatureTable {
    /// The embedded major-key table
    pub fn builtin() -> Result<Self, NotationError> {
        Self::from_yaml_str(BUILTIN_TABLE)
    }

    /// Parse and validate a YAML key table
    pub fn from_yaml_str(source: &str) -> Result<Self, NotationError> {
        let raw: Vec<RawKeyEntry> = serde_yaml::from_str(source)
            .map_err(|e| NotationError::Config(format!("key table: {}", e)))?;
        let keys = raw
            .into_iter()
            .map(RawKeyEntry::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_keys(keys)
    }

    /// Load a YAML key table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NotationError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| NotationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_yaml_str(&source)?;
        info!("Loaded {} key signatures from {}", table.len(), path.display());
        Ok(table)
    }

    fn from_keys(mut keys: Vec<KeySignature>) -> Result<Self, NotationError> {
        keys.sort_by_key(|k| (k.mode, k.tonic));
        if let Some(pair) = keys
            .windows(2)
            .find(|w| w[0].tonic == w[1].tonic && w[0].mode == w[1].mode)
        {
            return Err(NotationError::KeyTable {
                key: pair[0].name(),
                message: "duplicate entry".to_string(),
            });
        }
        Ok(Self { keys })
    }

    /// Find the key signature for a (tonic, mode) pair
    pub fn lookup(&self, tonic: Letter, mode: Mode) -> Result<&KeySignature, NotationError> {
        self.keys
            .iter()
            .find(|k| k.tonic == tonic && k.mode == mode)
            .ok_or(NotationError::UnsupportedKey { tonic, mode })
    }

    /// Catalogued keys ordered by mode, then tonic
    pub fn iter(&self) -> impl Iterator<Item = &KeySignature> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_catalogues_all_natural_tonics() {
        let table = KeySignatureTable::builtin().unwrap();
        assert_eq!(table.len(), 7);
        for letter in Letter::ALL {
            let key = table.lookup(letter, Mode::Major).unwrap();
            assert_eq!(key.tonic, letter);
            assert_eq!(key.glyph_offsets.len(), key.altered_count());
        }
    }

    #[test]
    fn test_fifths() {
        let table = KeySignatureTable::builtin().unwrap();
        let fifths: Vec<i8> = table.iter().map(|k| k.fifths()).collect();
        // C D E F G A B
        assert_eq!(fifths, vec![0, 2, 4, -1, 1, 3, 5]);
    }

    #[test]
    fn test_key_glyph() {
        let table = KeySignatureTable::builtin().unwrap();
        assert_eq!(table.lookup(Letter::C, Mode::Major).unwrap().glyph(), Accidental::Natural);
        assert_eq!(table.lookup(Letter::F, Mode::Major).unwrap().glyph(), Accidental::Flat);
        assert_eq!(table.lookup(Letter::A, Mode::Major).unwrap().glyph(), Accidental::Sharp);
    }

    #[test]
    fn test_unsupported_key() {
        let source = r#"
- tonic: C
  scale: [C, D, E, F, G, A, B]
  accidental: sharp
"#;
        let table = KeySignatureTable::from_yaml_str(source).unwrap();
        let result = table.lookup(Letter::D, Mode::Major);
        assert!(matches!(
            result,
            Err(NotationError::UnsupportedKey { tonic: Letter::D, mode: Mode::Major })
        ));
    }

    #[test]
    fn test_rejects_short_scale() {
        let source = r#"
- tonic: C
  scale: [C, D, E, F, G, A]
  accidental: sharp
"#;
        let result = KeySignatureTable::from_yaml_str(source);
        if let Err(NotationError::KeyTable { message, .. }) = result {
            assert!(message.contains("expected 7 scale degrees"));
        } else {
            panic!("Expected KeyTable error but got: {:?}", result);
        }
    }

    #[test]
    fn test_rejects_inconsistent_accidental() {
        let source = r#"
- tonic: F
  scale: [F, G, A, "A#", C, D, E]
  accidental: flat
  glyph-offsets: [45]
"#;
        let result = KeySignatureTable::from_yaml_str(source);
        assert!(matches!(result, Err(NotationError::KeyTable { .. })));
    }

    #[test]
    fn test_rejects_wrong_interval() {
        let source = r#"
- tonic: D
  scale: [D, E, F, G, A, B, "C#"]
  accidental: sharp
  glyph-offsets: [35]
"#;
        let result = KeySignatureTable::from_yaml_str(source);
        if let Err(NotationError::KeyTable { message, .. }) = result {
            assert!(message.contains("interval pattern"), "got: {}", message);
        } else {
            panic!("Expected KeyTable error but got: {:?}", result);
        }
    }

    #[test]
    fn test_rejects_glyph_count_mismatch() {
        let source = r#"
- tonic: G
  scale: [G, A, B, C, D, E, "F#"]
  accidental: sharp
"#;
        let result = KeySignatureTable::from_yaml_str(source);
        if let Err(NotationError::KeyTable { message, .. }) = result {
            assert!(message.contains("glyph offsets"));
        } else {
            panic!("Expected KeyTable error but got: {:?}", result);
        }
    }

    #[test]
    fn test_rejects_duplicates() {
        let source = r#"
- tonic: C
  scale: [C, D, E, F, G, A, B]
  accidental: sharp
- tonic: C
  scale: [C, D, E, F, G, A, B]
  accidental: flat
"#;
        let result = KeySignatureTable::from_yaml_str(source);
        if let Err(NotationError::KeyTable { message, .. }) = result {
            assert_eq!(message, "duplicate entry");
        } else {
            panic!("Expected KeyTable error but got: {:?}", result);
        }
    }
}
