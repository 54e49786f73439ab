//! # Notation Session
//!
//! Owns the mutable state around the pure engine: the key table, the selected
//! key, the held notes and the chord namer. Every event produces a fresh,
//! independent layout via [`NotationSession::frame`].
//!
//! ## Events
//! - `NoteOn` / `NoteOff` / `Toggle` - mutate the held-note set
//! - `SelectKey` - switch key; an unsupported key leaves the previous one active
//! - `Clear` - release everything
//!
//! ## Error Recovery
//! A rejected event returns its error and changes nothing, so the next frame
//! still lays out every valid held note in the last valid key.
//!
//! ## Example
//! ```rust
//! use chordstaff::{KeySignatureTable, Letter, Mode, NotationEvent, NotationSession};
//!
//! let table = KeySignatureTable::builtin().unwrap();
//! let mut session = NotationSession::new(table, Letter::D, Mode::Major).unwrap();
//! session.apply(NotationEvent::NoteOn(62)).unwrap();
//! session.apply(NotationEvent::NoteOn(66)).unwrap();
//! session.apply(NotationEvent::NoteOn(69)).unwrap();
//!
//! let frame = session.frame();
//! assert_eq!(frame.chord.as_deref(), Some("D"));
//! assert_eq!(frame.notes[1].name(), "F#");
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::active::ActiveNoteSet;
use crate::chord_name::{ChordNamer, TemplateChordNamer};
use crate::error::NotationError;
use crate::key::{KeySignature, KeySignatureTable, Mode};
use crate::layout::layout;
use crate::midi::{MidiFilter, NoteAction};
use crate::pitch::{Accidental, Letter, SpelledPitch};
use crate::speller::SpelledNote;

/// An input to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationEvent {
    NoteOn(i32),
    NoteOff(i32),
    Toggle(i32),
    SelectKey { tonic: Letter, mode: Mode },
    Clear,
}

impl From<NoteAction> for NotationEvent {
    fn from(action: NoteAction) -> Self {
        match action {
            NoteAction::Press(pitch) => NotationEvent::NoteOn(pitch as i32),
            NoteAction::Release(pitch) => NotationEvent::NoteOff(pitch as i32),
            NoteAction::Toggle(pitch) => NotationEvent::Toggle(pitch as i32),
        }
    }
}

/// Key signature drawing instructions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureGlyphs {
    pub accidental: Accidental,
    pub offsets: Vec<i32>,
}

/// Everything the renderer needs for one redraw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffFrame {
    pub key: String,
    pub fifths: i8,
    pub signature: SignatureGlyphs,
    pub notes: Vec<SpelledNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
}

impl StaffFrame {
    /// Lay out `notes` in `key` and name the result
    pub fn build(notes: &ActiveNoteSet, key: &KeySignature, namer: &dyn ChordNamer) -> Self {
        let notes = layout(notes, key);
        let pitches: Vec<SpelledPitch> = notes.iter().map(SpelledNote::pitch).collect();
        Self {
            key: key.name(),
            fifths: key.fifths(),
            signature: SignatureGlyphs {
                accidental: key.glyph(),
                offsets: key.glyph_offsets.clone(),
            },
            chord: namer.name(&pitches),
            notes,
        }
    }
}

pub struct NotationSession<N: ChordNamer = TemplateChordNamer> {
    table: KeySignatureTable,
    key: KeySignature,
    notes: ActiveNoteSet,
    namer: N,
}

impl NotationSession<TemplateChordNamer> {
    pub fn new(table: KeySignatureTable, tonic: Letter, mode: Mode) -> Result<Self, NotationError> {
        Self::with_namer(table, tonic, mode, TemplateChordNamer)
    }
}

impl<N: ChordNamer> NotationSession<N> {
    pub fn with_namer(
        table: KeySignatureTable,
        tonic: Letter,
        mode: Mode,
        namer: N,
    ) -> Result<Self, NotationError> {
        let key = table.lookup(tonic, mode)?.clone();
        Ok(Self {
            table,
            key,
            notes: ActiveNoteSet::new(),
            namer,
        })
    }

    pub fn key(&self) -> &KeySignature {
        &self.key
    }

    pub fn notes(&self) -> &ActiveNoteSet {
        &self.notes
    }

    pub fn table(&self) -> &KeySignatureTable {
        &self.table
    }

    /// Apply one event. Returns whether the held notes or the key changed.
    /// On error the session is unchanged.
    pub fn apply(&mut self, event: NotationEvent) -> Result<bool, NotationError> {
        debug!("Applying {:?}", event);
        match event {
            NotationEvent::NoteOn(pitch) => self.notes.insert(pitch),
            NotationEvent::NoteOff(pitch) => self.notes.remove(pitch),
            NotationEvent::Toggle(pitch) => self.notes.toggle(pitch).map(|_| true),
            NotationEvent::SelectKey { tonic, mode } => self.select_key(tonic, mode),
            NotationEvent::Clear => {
                let changed = !self.notes.is_empty();
                self.notes.clear();
                Ok(changed)
            }
        }
    }

    /// Decode raw device bytes and apply them. Returns whether anything changed;
    /// ignored messages change nothing.
    pub fn apply_midi(&mut self, data: &[u8], filter: &MidiFilter) -> Result<bool, NotationError> {
        match filter.action(data) {
            Some(action) => self.apply(action.into()),
            None => Ok(false),
        }
    }

    fn select_key(&mut self, tonic: Letter, mode: Mode) -> Result<bool, NotationError> {
        match self.table.lookup(tonic, mode) {
            Ok(key) => {
                if *key == self.key {
                    return Ok(false);
                }
                self.key = key.clone();
                info!("Key changed to {}", self.key.name());
                Ok(true)
            }
            Err(e) => {
                warn!("{}; keeping {}", e, self.key.name());
                Err(e)
            }
        }
    }

    /// Lay out the current state
    pub fn frame(&self) -> StaffFrame {
        StaffFrame::build(&self.notes, &self.key, &self.namer)
    }
}
