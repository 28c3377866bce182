//! # Path Decoder
//!
//! Older level revisions store the track as `pathData`: one character per tile.
//! Each character names either an absolute heading or a turn relative to the
//! previous heading. This module resolves such a string into the absolute
//! angle sequence used everywhere else.
//!
//! ## Example
//! ```rust
//! use adofai_timing::path::decode_path;
//!
//! // Right, up, then a relative 60° turn
//! let angles = decode_path("RUt")?;
//! assert_eq!(angles[0], 0.0);
//! assert_eq!(angles[1], 90.0);
//! assert_eq!(angles[2], 210.0);
//! # Ok::<(), adofai_timing::LevelError>(())
//! ```

use crate::angle::{normalize, MIDSPIN};
use crate::error::LevelError;

/// Character reserved for mid-spin tiles.
pub const SKIP_CODE: char = '!';

/// One entry of the tile code table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCode {
    pub code: char,
    pub angle: f64,
    pub relative: bool,
}

const fn absolute(code: char, angle: f64) -> TileCode {
    TileCode { code, angle, relative: false }
}

const fn relative(code: char, angle: f64) -> TileCode {
    TileCode { code, angle, relative: true }
}

/// Every code the level format defines.
pub const TILE_CODES: [TileCode; 33] = [
    absolute('R', 0.0),
    absolute('p', 15.0),
    absolute('J', 30.0),
    absolute('E', 45.0),
    absolute('T', 60.0),
    absolute('o', 75.0),
    absolute('U', 90.0),
    absolute('q', 105.0),
    absolute('G', 120.0),
    absolute('Q', 135.0),
    absolute('H', 150.0),
    absolute('W', 165.0),
    absolute('L', 180.0),
    absolute('x', 195.0),
    absolute('N', 210.0),
    absolute('Z', 225.0),
    absolute('F', 240.0),
    absolute('V', 255.0),
    absolute('D', 270.0),
    absolute('Y', 285.0),
    absolute('B', 300.0),
    absolute('C', 315.0),
    absolute('M', 330.0),
    absolute('A', 345.0),
    // Pentagon and heptagon turns
    relative('5', 108.0),
    relative('6', 252.0),
    relative('7', 900.0 / 7.0),
    relative('8', 360.0 - 900.0 / 7.0),
    relative('t', 60.0),
    relative('h', 120.0),
    relative('j', 240.0),
    relative('y', 300.0),
    relative(SKIP_CODE, MIDSPIN),
];

/// Look up a single tile code.
pub fn tile_code(code: char) -> Option<TileCode> {
    TILE_CODES.iter().copied().find(|t| t.code == code)
}

/// Decode a `pathData` string into absolute angles, one per character.
///
/// The skip marker emits the mid-spin sentinel and leaves the running heading
/// untouched. Relative codes turn from the running heading:
/// `normalize(heading + 180 - angle)`.
///
/// # Errors
/// Returns [`LevelError::UnknownTileCode`] for a character outside the table.
pub fn decode_path(path: &str) -> Result<Vec<f64>, LevelError> {
    let mut angles = Vec::with_capacity(path.len());
    let mut heading = 0.0;

    for (index, c) in path.chars().enumerate() {
        let tile = tile_code(c).ok_or(LevelError::UnknownTileCode { code: c, index })?;

        if tile.code == SKIP_CODE {
            angles.push(tile.angle);
            continue;
        }

        heading = if tile.relative {
            normalize(heading + 180.0 - tile.angle)
        } else {
            tile.angle
        };
        angles.push(heading);
    }

    log::debug!("Decoded {} tiles from pathData", angles.len());
    Ok(angles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::is_midspin;

    #[test]
    fn test_table_codes_are_unique() {
        for (i, a) in TILE_CODES.iter().enumerate() {
            for b in &TILE_CODES[i + 1..] {
                assert_ne!(a.code, b.code, "duplicate tile code '{}'", a.code);
            }
        }
    }

    #[test]
    fn test_absolute_codes() {
        let angles = decode_path("RULD").unwrap();
        assert_eq!(angles, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_relative_codes_accumulate() {
        // From heading 0: t -> 0 + 180 - 60 = 120, then t -> 120 + 180 - 60 = 240
        let angles = decode_path("tt").unwrap();
        assert_eq!(angles, vec![120.0, 240.0]);

        // Relative after absolute starts from the absolute heading
        let angles = decode_path("Uh").unwrap();
        assert_eq!(angles, vec![90.0, 150.0]);
    }

    #[test]
    fn test_relative_wraps_floored() {
        // 270 + 180 - 60 = 390 -> 30
        let angles = decode_path("Dt").unwrap();
        assert_eq!(angles[1], 30.0);
    }

    #[test]
    fn test_heptagon_codes() {
        let angles = decode_path("7").unwrap();
        assert!((angles[0] - (180.0 - 900.0 / 7.0)).abs() < 1e-9);
        let angles = decode_path("8").unwrap();
        assert!((angles[0] - normalize(180.0 - (360.0 - 900.0 / 7.0))).abs() < 1e-9);
    }

    #[test]
    fn test_skip_marker_keeps_heading() {
        let angles = decode_path("U!t").unwrap();
        assert_eq!(angles[0], 90.0);
        assert!(is_midspin(angles[1]));
        // The relative turn continues from 90, not from the sentinel
        assert_eq!(angles[2], 210.0);
    }

    #[test]
    fn test_unknown_code_reports_position() {
        let err = decode_path("RR?R").unwrap_err();
        match err {
            LevelError::UnknownTileCode { code, index } => {
                assert_eq!(code, '?');
                assert_eq!(index, 2);
            }
            other => panic!("Expected UnknownTileCode but got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_path() {
        assert!(decode_path("").unwrap().is_empty());
    }
}
