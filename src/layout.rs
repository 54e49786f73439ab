//! # Chord Layout Engine
//!
//! Turns the set of held notes into ordered notation descriptors.
//!
//! ## Pipeline
//! 1. Sort ascending by MIDI number (this is the rendering order)
//! 2. Spell each note in the key
//! 3. Sequential second-interval flip pass
//! 4. Vertical staff offsets (computed while spelling)
//!
//! ## Flip Heuristic
//! Notes are visited left to right. Each note looks back at one reference
//! slot: `i - 1`, or slot 6 when `i == 0`. The reference is only looked up
//! among notes the pass has already visited, so the slot-6 wrap never
//! resolves and the lowest note never flips, however many notes are held.
//!
//! The current note flips when its letter is one diatonic step above the
//! reference letter (with the reference `B` counted as -1, so `B -> C` is a
//! step) and the reference did not flip. Octave is ignored. Of two
//! consecutive seconds only the first upper note flips, so flipped heads
//! never collide with each other.
//!
//! ## Example
//! ```rust
//! use chordstaff::{layout, ActiveNoteSet, KeySignatureTable, Letter, Mode};
//!
//! let table = KeySignatureTable::builtin().unwrap();
//! let key = table.lookup(Letter::C, Mode::Major).unwrap();
//! let notes = ActiveNoteSet::try_from(&[60, 62, 64][..]).unwrap();
//!
//! let flips: Vec<bool> = layout(&notes, key).iter().map(|n| n.flip).collect();
//! assert_eq!(flips, vec![false, true, false]);
//! ```

use tracing::{debug, warn};

use crate::active::ActiveNoteSet;
use crate::key::KeySignature;
use crate::pitch::{Letter, MidiNote};
use crate::speller::{spell, SpelledNote};

/// Reference slot for the first note of the flip pass
const WRAP_SLOT: usize = 6;

/// Lay out every held note. Total: an empty set yields an empty sequence.
pub fn layout(notes: &ActiveNoteSet, key: &KeySignature) -> Vec<SpelledNote> {
    let mut spelled: Vec<SpelledNote> = notes.iter().map(|n| spell(n, key)).collect();
    apply_flips(&mut spelled);
    debug!("Laid out {} notes in {}", spelled.len(), key.name());
    spelled
}

/// Lay out raw note numbers, skipping any outside 0-127.
///
/// Duplicates collapse and input order is irrelevant.
pub fn layout_numbers(values: &[i32], key: &KeySignature) -> Vec<SpelledNote> {
    let notes: ActiveNoteSet = values
        .iter()
        .filter_map(|&v| match MidiNote::new(v) {
            Ok(note) => Some(note),
            Err(e) => {
                warn!("Dropping note from layout: {}", e);
                None
            }
        })
        .collect();
    layout(&notes, key)
}

/// Letter index used for the reference note: B counts as -1
fn reference_index(letter: Letter) -> i32 {
    match letter {
        Letter::B => -1,
        other => other.index(),
    }
}

fn apply_flips(notes: &mut [SpelledNote]) {
    for i in 0..notes.len() {
        let previous = if i == 0 { WRAP_SLOT } else { i - 1 };
        let flip = match notes[..i].get(previous) {
            Some(reference) => {
                notes[i].letter.index() - reference_index(reference.letter) == 1
                    && !reference.flip
            }
            None => false,
        };
        notes[i].flip = flip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeySignatureTable, Mode};
    use crate::pitch::Accidental;
    use crate::speller::AccidentalGlyph;

    fn key(tonic: Letter) -> KeySignature {
        KeySignatureTable::builtin()
            .unwrap()
            .lookup(tonic, Mode::Major)
            .unwrap()
            .clone()
    }

    fn flips(values: &[i32], tonic: Letter) -> Vec<bool> {
        layout_numbers(values, &key(tonic))
            .iter()
            .map(|n| n.flip)
            .collect()
    }

    #[test]
    fn test_empty_set() {
        assert!(layout(&ActiveNoteSet::new(), &key(Letter::C)).is_empty());
    }

    #[test]
    fn test_sorted_ascending() {
        let notes = layout_numbers(&[67, 60, 64], &key(Letter::C));
        let midi: Vec<u8> = notes.iter().map(|n| n.midi_note.value()).collect();
        assert_eq!(midi, vec![60, 64, 67]);
    }

    #[test]
    fn test_second_flips_upper_note() {
        assert_eq!(flips(&[60, 62], Letter::C), vec![false, true]);
    }

    #[test]
    fn test_cluster_alternates() {
        assert_eq!(flips(&[60, 62, 64], Letter::C), vec![false, true, false]);
        assert_eq!(flips(&[60, 62, 64, 65], Letter::C), vec![false, true, false, true]);
    }

    #[test]
    fn test_third_does_not_flip() {
        assert_eq!(flips(&[60, 64, 67], Letter::C), vec![false, false, false]);
    }

    #[test]
    fn test_b_to_c_is_a_second() {
        assert_eq!(flips(&[59, 60], Letter::C), vec![false, true]);
    }

    #[test]
    fn test_letter_step_ignores_octave() {
        // C4 and D5 share adjacent letters, so D flips
        assert_eq!(flips(&[60, 74], Letter::C), vec![false, true]);
    }

    #[test]
    fn test_same_letter_with_accidental_does_not_flip() {
        // C and C# share a letter: difference 0
        assert_eq!(flips(&[60, 61], Letter::C), vec![false, false]);
    }

    #[test]
    fn test_flat_spelling_drives_adjacency() {
        // In F major, 61 is Db: C then Db is a letter step
        let notes = layout_numbers(&[60, 61], &key(Letter::F));
        assert_eq!(notes[1].letter, Letter::D);
        assert_eq!(notes[1].chromatic_accidental, Accidental::Flat);
        assert_eq!(notes[1].rendered_accidental, AccidentalGlyph::Flat);
        assert!(notes[1].flip);
    }

    #[test]
    fn test_first_note_ignores_unvisited_seventh_slot() {
        // Slot 6 is B (83) and C sits one step above it, but slot 6 has not
        // been laid out when the first note is visited.
        let values = [60, 64, 67, 71, 74, 77, 83];
        assert_eq!(flips(&values, Letter::C), vec![false; 7]);
    }

    #[test]
    fn test_first_note_never_flips() {
        assert!(!flips(&[60, 64, 67, 69, 70, 71], Letter::C)[0]);
        assert!(!flips(&[60, 62, 64, 65, 67, 69, 71, 72, 83], Letter::C)[0]);
    }

    #[test]
    fn test_vertical_offsets() {
        let notes = layout_numbers(&[60, 62, 72], &key(Letter::C));
        let offsets: Vec<i32> = notes.iter().map(|n| n.vertical_offset).collect();
        assert_eq!(offsets, vec![32, 22, -38]);
    }

    #[test]
    fn test_out_of_range_dropped() {
        let notes = layout_numbers(&[60, 128, -1, 64], &key(Letter::C));
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let d_major = key(Letter::D);
        let set = ActiveNoteSet::try_from(&[62, 65, 66, 69, 73][..]).unwrap();
        assert_eq!(layout(&set, &d_major), layout(&set, &d_major));
    }
}
