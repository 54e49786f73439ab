//! Chord naming from spelled pitches.
//!
//! The staff only needs one label per frame: the first candidate returned by
//! a [`ChordNamer`]. [`TemplateChordNamer`] is the built-in implementation;
//! anything else that maps spelled pitches to names can stand in for it.

use crate::pitch::SpelledPitch;

/// Capability: spelled pitches (lowest first, octave discarded) to chord names
pub trait ChordNamer {
    /// Candidate names, best first. May be empty.
    fn candidates(&self, pitches: &[SpelledPitch]) -> Vec<String>;

    /// The name to display, if any
    fn name(&self, pitches: &[SpelledPitch]) -> Option<String> {
        self.candidates(pitches).into_iter().next()
    }
}

/// A chord template: symbol suffix plus interval set from root (bitmask over 12 pitch classes)
pub struct ChordTemplate {
    pub suffix: &'static str,
    pub intervals: u16,
}

impl ChordTemplate {
    const fn new(suffix: &'static str, intervals: &[u8]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < intervals.len() {
            mask |= 1 << intervals[i];
            i += 1;
        }
        Self {
            suffix,
            intervals: mask,
        }
    }
}

/// Recognized templates, larger chords first
pub static TEMPLATES: &[ChordTemplate] = &[
    ChordTemplate::new("7", &[0, 4, 7, 10]),
    ChordTemplate::new("maj7", &[0, 4, 7, 11]),
    ChordTemplate::new("m7", &[0, 3, 7, 10]),
    ChordTemplate::new("m(maj7)", &[0, 3, 7, 11]),
    ChordTemplate::new("dim7", &[0, 3, 6, 9]),
    ChordTemplate::new("m7b5", &[0, 3, 6, 10]),
    ChordTemplate::new("6", &[0, 4, 7, 9]),
    ChordTemplate::new("m6", &[0, 3, 7, 9]),
    ChordTemplate::new("add9", &[0, 2, 4, 7]),
    ChordTemplate::new("", &[0, 4, 7]),
    ChordTemplate::new("m", &[0, 3, 7]),
    ChordTemplate::new("dim", &[0, 3, 6]),
    ChordTemplate::new("aug", &[0, 4, 8]),
    ChordTemplate::new("sus4", &[0, 5, 7]),
    ChordTemplate::new("sus2", &[0, 2, 7]),
    ChordTemplate::new("5", &[0, 7]),
];

/// Exact template matcher. Every distinct pitch is tried as the root;
/// inversions are written as slash chords over the lowest pitch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateChordNamer;

fn interval_mask(pitches: &[SpelledPitch], root: u8) -> u16 {
    pitches
        .iter()
        .fold(0u16, |mask, p| mask | 1 << ((p.pitch_class() + 12 - root) % 12))
}

impl ChordNamer for TemplateChordNamer {
    fn candidates(&self, pitches: &[SpelledPitch]) -> Vec<String> {
        let Some(bass) = pitches.first() else {
            return Vec::new();
        };
        if interval_mask(pitches, 0).count_ones() < 2 {
            return Vec::new();
        }

        let mut roots: Vec<&SpelledPitch> = Vec::new();
        for pitch in pitches {
            if !roots.iter().any(|r| r.pitch_class() == pitch.pitch_class()) {
                roots.push(pitch);
            }
        }

        // (inversion, template rank, symbol)
        let mut matches: Vec<(bool, usize, String)> = Vec::new();
        for root in roots {
            let mask = interval_mask(pitches, root.pitch_class());
            for (rank, template) in TEMPLATES.iter().enumerate() {
                if mask != template.intervals {
                    continue;
                }
                let inverted = root.pitch_class() != bass.pitch_class();
                let symbol = if inverted {
                    format!("{}{}/{}", root, template.suffix, bass)
                } else {
                    format!("{}{}", root, template.suffix)
                };
                matches.push((inverted, rank, symbol));
            }
        }

        matches.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        matches.into_iter().map(|(_, _, symbol)| symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(names: &[&str]) -> Vec<SpelledPitch> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn test_c_major_triad() {
        let namer = TemplateChordNamer;
        assert_eq!(namer.name(&pitches(&["C", "E", "G"])), Some("C".to_string()));
    }

    #[test]
    fn test_spelling_is_preserved() {
        let namer = TemplateChordNamer;
        assert_eq!(namer.name(&pitches(&["D", "F#", "A"])), Some("D".to_string()));
        assert_eq!(namer.name(&pitches(&["Bb", "D", "F"])), Some("Bb".to_string()));
        assert_eq!(namer.name(&pitches(&["C#", "E", "G#"])), Some("C#m".to_string()));
    }

    #[test]
    fn test_dominant_seventh() {
        let namer = TemplateChordNamer;
        assert_eq!(namer.name(&pitches(&["G", "B", "D", "F"])), Some("G7".to_string()));
    }

    #[test]
    fn test_inversion_is_slash_chord() {
        let namer = TemplateChordNamer;
        assert_eq!(namer.name(&pitches(&["E", "G", "C"])), Some("C/E".to_string()));
    }

    #[test]
    fn test_root_position_reading_first() {
        // A C E G is both Am7 and C6/A
        let namer = TemplateChordNamer;
        let candidates = namer.candidates(&pitches(&["A", "C", "E", "G"]));
        assert_eq!(candidates, vec!["Am7".to_string(), "C6/A".to_string()]);
    }

    #[test]
    fn test_octave_doublings_collapse() {
        let namer = TemplateChordNamer;
        assert_eq!(namer.name(&pitches(&["C", "E", "G", "C"])), Some("C".to_string()));
    }

    #[test]
    fn test_no_candidates() {
        let namer = TemplateChordNamer;
        assert!(namer.candidates(&[]).is_empty());
        assert!(namer.candidates(&pitches(&["C"])).is_empty());
        assert!(namer.candidates(&pitches(&["C", "C"])).is_empty());
        assert!(namer.candidates(&pitches(&["C", "C#", "D"])).is_empty());
    }
}
