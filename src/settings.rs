//! Typed view of the level's `settings` object.
//!
//! The settings object holds dozens of keys (song file, colors, camera
//! defaults, ...). Timing only needs three, which are read through
//! [`RawSettings`] and validated into [`Settings`]. The raw map stays on the
//! [`Level`](crate::Level) untouched.

use crate::error::LevelError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Settings keys that timing reads, straight from JSON
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    pub bpm: Option<f64>,
    pub pitch: Option<f64>,
    pub offset: Option<f64>,
}

/// Validated timing settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Starting tempo before pitch
    pub bpm: f64,
    /// Song speed in percent (100 = normal)
    pub pitch: f64,
    /// Milliseconds added to every note time when requested
    pub offset: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: 100.0,
            pitch: 100.0,
            offset: 0.0,
        }
    }
}

impl Settings {
    pub fn new(bpm: f64, pitch: f64) -> Self {
        Self {
            bpm,
            pitch,
            ..Self::default()
        }
    }

    pub fn with_offset(self, offset: f64) -> Self {
        Self { offset, ..self }
    }

    /// Pitch as a multiplier (`pitch / 100`).
    pub fn pitch_scalar(&self) -> f64 {
        self.pitch / 100.0
    }

    /// Tempo in effect on the first tile.
    pub fn initial_tempo(&self) -> f64 {
        self.bpm * self.pitch_scalar()
    }

    /// Read and validate the timing keys from a raw settings object.
    ///
    /// `bpm` and `pitch` are required; `offset` defaults to 0.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, LevelError> {
        let raw: RawSettings = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| LevelError::FormatError(format!("Invalid settings: {}", e)))?;

        let bpm = raw
            .bpm
            .ok_or_else(|| LevelError::FormatError("missing required setting 'bpm'".to_string()))?;
        let pitch = raw.pitch.ok_or_else(|| {
            LevelError::FormatError("missing required setting 'pitch'".to_string())
        })?;

        Ok(Self {
            bpm,
            pitch,
            offset: raw.offset.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test settings must be an object"),
        }
    }

    #[test]
    fn test_reads_timing_keys_and_ignores_the_rest() {
        let settings = Settings::from_map(&map(json!({
            "version": 13,
            "artist": "Someone",
            "songFilename": "song.ogg",
            "bpm": 150,
            "pitch": 120,
            "offset": 250,
            "trackColor": "debb7b"
        })))
        .unwrap();

        assert_eq!(settings.bpm, 150.0);
        assert_eq!(settings.pitch, 120.0);
        assert_eq!(settings.offset, 250.0);
        assert!((settings.initial_tempo() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_is_optional() {
        let settings = Settings::from_map(&map(json!({ "bpm": 100, "pitch": 100 }))).unwrap();
        assert_eq!(settings.offset, 0.0);
    }

    #[test]
    fn test_unread_keys_are_not_validated() {
        let settings = Settings::from_map(&map(json!({
            "version": "13-beta",
            "bpm": 100,
            "pitch": 100
        })))
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_bpm() {
        let result = Settings::from_map(&map(json!({ "pitch": 100 })));
        if let Err(LevelError::FormatError(message)) = result {
            assert!(message.contains("'bpm'"));
        } else {
            panic!("Expected FormatError but got: {:?}", result);
        }
    }

    #[test]
    fn test_missing_pitch() {
        let result = Settings::from_map(&map(json!({ "bpm": 100 })));
        assert!(matches!(result, Err(LevelError::FormatError(_))));
    }

    #[test]
    fn test_wrong_type() {
        let result = Settings::from_map(&map(json!({ "bpm": "fast", "pitch": 100 })));
        assert!(matches!(result, Err(LevelError::FormatError(_))));
    }
}
