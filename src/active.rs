//! Set of currently held MIDI notes.
//!
//! Owned by the caller and mutated by note-on/note-off events; the layout
//! engine only reads it. Iteration is always ascending by note number, so
//! the order in which notes were pressed never affects the layout.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::NotationError;
use crate::pitch::MidiNote;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveNoteSet {
    notes: BTreeSet<MidiNote>,
}

impl ActiveNoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note-on. Returns `true` if the note was not already held.
    pub fn insert(&mut self, value: i32) -> Result<bool, NotationError> {
        Ok(self.notes.insert(MidiNote::new(value)?))
    }

    /// Note-off. Returns `true` if the note was held.
    pub fn remove(&mut self, value: i32) -> Result<bool, NotationError> {
        Ok(self.notes.remove(&MidiNote::new(value)?))
    }

    /// Press-to-hold, press-again-to-release. Returns whether the note is now held.
    pub fn toggle(&mut self, value: i32) -> Result<bool, NotationError> {
        let note = MidiNote::new(value)?;
        if self.notes.remove(&note) {
            Ok(false)
        } else {
            self.notes.insert(note);
            Ok(true)
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn contains(&self, note: MidiNote) -> bool {
        self.notes.contains(&note)
    }

    /// Held notes in ascending order
    pub fn iter(&self) -> impl Iterator<Item = MidiNote> + '_ {
        self.notes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromIterator<MidiNote> for ActiveNoteSet {
    fn from_iter<I: IntoIterator<Item = MidiNote>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<&[i32]> for ActiveNoteSet {
    type Error = NotationError;

    fn try_from(values: &[i32]) -> Result<Self, Self::Error> {
        values.iter().map(|&v| MidiNote::new(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut set = ActiveNoteSet::new();
        assert!(set.insert(64).unwrap());
        assert!(!set.insert(64).unwrap());
        assert!(set.insert(60).unwrap());
        assert_eq!(set.len(), 2);

        assert!(set.remove(64).unwrap());
        assert!(!set.remove(64).unwrap());
        assert_eq!(set.iter().map(MidiNote::value).collect::<Vec<_>>(), vec![60]);
    }

    #[test]
    fn test_out_of_range_rejected_without_mutation() {
        let mut set = ActiveNoteSet::new();
        set.insert(60).unwrap();
        assert!(matches!(set.insert(128), Err(NotationError::InvalidPitch(128))));
        assert!(set.remove(-3).is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut set = ActiveNoteSet::new();
        assert!(set.toggle(62).unwrap());
        assert!(set.contains(MidiNote::new(62).unwrap()));
        assert!(!set.toggle(62).unwrap());
        assert!(set.is_empty());
    }

    #[test]
    fn test_event_order_does_not_matter() {
        let mut a = ActiveNoteSet::new();
        for n in [72, 60, 67, 64] {
            a.insert(n).unwrap();
        }
        let b = ActiveNoteSet::try_from(&[60, 64, 67, 72][..]).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.iter().map(MidiNote::value).collect::<Vec<_>>(),
            vec![60, 64, 67, 72]
        );
    }
}
