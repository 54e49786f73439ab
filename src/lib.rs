pub mod active;
pub mod chord_name;
pub mod config;
#[cfg(feature = "device")]
pub mod device;
pub mod error;
pub mod key;
pub mod layout;
pub mod midi;
pub mod musicxml;
pub mod pitch;
pub mod session;
pub mod speller;

pub use active::ActiveNoteSet;
pub use chord_name::{ChordNamer, TemplateChordNamer};
pub use config::Config;
pub use error::NotationError;
pub use key::{KeySignature, KeySignatureTable, Mode, PreferredAccidental};
pub use layout::{layout, layout_numbers};
pub use midi::{MidiFilter, MidiMessage, NoteOffConvention};
pub use musicxml::to_musicxml;
pub use pitch::{Accidental, Letter, MidiNote, SpelledPitch};
pub use session::{NotationEvent, NotationSession, StaffFrame};
pub use speller::{spell, AccidentalGlyph, SpelledNote};

/// Lay out raw MIDI note numbers in a major key and name the chord.
/// This is the one-shot entry point; live input goes through [`NotationSession`].
pub fn render(values: &[i32], tonic: Letter) -> Result<StaffFrame, NotationError> {
    let table = KeySignatureTable::builtin()?;
    let key = table.lookup(tonic, Mode::Major)?;
    let notes: ActiveNoteSet = values
        .iter()
        .map(|&v| MidiNote::new(v))
        .collect::<Result<_, _>>()?;
    Ok(StaffFrame::build(&notes, key, &TemplateChordNamer))
}
