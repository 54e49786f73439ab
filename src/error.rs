//! # Error Types
//!
//! This module defines all error types for the chordstaff engine.
//!
//! Errors are local and recoverable: a rejected key selection or an
//! out-of-range note never corrupts the layout of the remaining notes.
//!
//! ## Error Types
//! - `UnsupportedKey` - Key signature not present in the key table
//! - `InvalidPitch` - MIDI note number outside 0-127
//! - `InvalidPitchName` - Pitch text such as "F#" that cannot be parsed
//! - `KeyTable` - Key table entry that failed load-time validation
//! - `Config` - Malformed configuration content
//! - `Io` - Configuration or key table file could not be read
//! - `Device` - MIDI device layer failure
//!
//! ## Usage
//! ```rust
//! use chordstaff::{KeySignatureTable, Letter, Mode, NotationError};
//!
//! let table = KeySignatureTable::builtin().unwrap();
//! match table.lookup(Letter::D, Mode::Major) {
//!     Ok(key) => println!("Using {}", key.name()),
//!     Err(NotationError::UnsupportedKey { tonic, mode }) => {
//!         eprintln!("No table entry for {} {}", tonic, mode);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::key::Mode;
use crate::pitch::Letter;

#[derive(Error, Debug)]
pub enum NotationError {
    /// The requested (tonic, mode) pair is not catalogued.
    ///
    /// Callers should keep the previously valid key signature.
    ///
    /// # Example
    /// ```
    /// # use chordstaff::{Letter, Mode, NotationError};
    /// let err = NotationError::UnsupportedKey { tonic: Letter::F, mode: Mode::Major };
    /// assert_eq!(err.to_string(), "Unsupported key signature: F major");
    /// ```
    #[error("Unsupported key signature: {tonic} {mode}")]
    UnsupportedKey { tonic: Letter, mode: Mode },

    /// MIDI note number outside 0-127.
    ///
    /// # Example
    /// ```
    /// # use chordstaff::NotationError;
    /// let err = NotationError::InvalidPitch(128);
    /// assert_eq!(err.to_string(), "Invalid MIDI note number 128: expected 0-127");
    /// ```
    #[error("Invalid MIDI note number {0}: expected 0-127")]
    InvalidPitch(i32),

    /// A pitch name that is not a letter A-G optionally followed by `#` or `b`.
    #[error("Invalid pitch name '{0}'")]
    InvalidPitchName(String),

    /// A key table entry failed validation.
    ///
    /// # Example
    /// ```
    /// # use chordstaff::NotationError;
    /// let err = NotationError::KeyTable {
    ///     key: "D major".to_string(),
    ///     message: "expected 7 scale degrees, got 6".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid key table entry D major: expected 7 scale degrees, got 6"
    /// );
    /// ```
    #[error("Invalid key table entry {key}: {message}")]
    KeyTable { key: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("MIDI device error: {0}")]
    Device(String),
}
