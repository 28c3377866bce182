//! # Error Types
//!
//! This module defines all error types for level loading and timing derivation.
//!
//! Errors carry the location that triggered them (tile index, line/column, file
//! path) so a caller can point at the offending part of the level.
//!
//! ## Error Types
//! - `ParseError` - Level text is not valid JSON, with line and column
//! - `FormatError` - Level JSON has the wrong shape (missing keys, bad types)
//! - `UnknownTileCode` - `pathData` contains a character with no angle mapping
//! - `EventOutOfRange` - An event targets a floor that does not exist
//! - `DegenerateTempo` - The running tempo reached zero
//! - `Io` - Reading or writing a level file failed
//!
//! ## Usage
//! ```rust
//! use adofai_timing::{note_times, LevelError};
//!
//! let source = r#"{"angleData": [0, 0], "settings": {"bpm": 0, "pitch": 100}, "actions": []}"#;
//! match note_times(source) {
//!     Ok(times) => println!("{} timestamps", times.len()),
//!     Err(LevelError::DegenerateTempo { floor, .. }) => {
//!         eprintln!("Tempo dropped to zero at floor {}", floor);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LevelError {
    /// Malformed level text.
    ///
    /// # Example
    /// ```
    /// # use adofai_timing::LevelError;
    /// let err = LevelError::ParseError {
    ///     line: 3,
    ///     column: 14,
    ///     message: "expected value".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 3, column 14: expected value");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Level JSON parsed but does not have the expected structure.
    ///
    /// # Example
    /// ```
    /// # use adofai_timing::LevelError;
    /// let err = LevelError::FormatError("missing required setting 'bpm'".to_string());
    /// assert_eq!(err.to_string(), "Invalid level: missing required setting 'bpm'");
    /// ```
    #[error("Invalid level: {0}")]
    FormatError(String),

    /// A `pathData` character has no entry in the tile code table.
    ///
    /// # Example
    /// ```
    /// # use adofai_timing::LevelError;
    /// let err = LevelError::UnknownTileCode { code: '?', index: 4 };
    /// assert_eq!(err.to_string(), "Unknown tile code '?' at tile 4");
    /// ```
    #[error("Unknown tile code '{code}' at tile {index}")]
    UnknownTileCode { code: char, index: usize },

    /// An event references a floor outside `0..=tile_count`.
    ///
    /// The synthetic terminator tile (index `tile_count`) is addressable.
    ///
    /// # Example
    /// ```
    /// # use adofai_timing::LevelError;
    /// let err = LevelError::EventOutOfRange { floor: 12, tile_count: 10 };
    /// assert_eq!(err.to_string(), "Event on floor 12 is outside the level (0..=10)");
    /// ```
    #[error("Event on floor {floor} is outside the level (0..={tile_count})")]
    EventOutOfRange { floor: i64, tile_count: usize },

    /// The tempo in effect on a timed tile is zero, negative or not finite.
    ///
    /// # Example
    /// ```
    /// # use adofai_timing::LevelError;
    /// let err = LevelError::DegenerateTempo { floor: 7, tempo: 0.0 };
    /// assert_eq!(err.to_string(), "Degenerate tempo 0 bpm at floor 7");
    /// ```
    #[error("Degenerate tempo {tempo} bpm at floor {floor}")]
    DegenerateTempo { floor: usize, tempo: f64 },

    /// Level file could not be read or written.
    #[error("Error accessing '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LevelError {
    /// Map a serde_json error into a located `ParseError`.
    pub(crate) fn from_json(e: serde_json::Error) -> Self {
        LevelError::ParseError {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}
