//! Timing report
//!
//! Flat, serializable summary of a level's timeline for export to JSON or
//! YAML.

use crate::error::LevelError;
use crate::settings::Settings;
use crate::timing::{Direction, ResolvedTile, TimingResult};
use serde::Serialize;

/// Timing of a single tile
///
/// # Fields
/// - `floor`: tile index; the last row is the terminator
/// - `angle`: resolved heading in degrees
/// - `bpm`: tempo in effect on this tile (pitch applied)
/// - `time_ms`: absolute hit time
/// - `delta_ms`: time since the previous tile (or since the start)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileTiming {
    pub floor: usize,
    pub angle: f64,
    pub bpm: f64,
    pub direction: Direction,
    pub midspin: bool,
    pub time_ms: f64,
    pub delta_ms: f64,
}

/// Report header plus one row per tile and the terminator.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingReport {
    pub bpm: f64,
    pub pitch: f64,
    /// Offset applied to every `time_ms` (0 when not requested)
    pub offset_ms: f64,
    pub tile_count: usize,
    pub total_ms: f64,
    pub tiles: Vec<TileTiming>,
}

impl TimingReport {
    /// Zip resolved tiles with their hit times.
    pub fn build(
        tiles: &[ResolvedTile],
        times: &TimingResult,
        settings: &Settings,
        add_offset: bool,
    ) -> Result<Self, LevelError> {
        if tiles.len() != times.len() {
            return Err(LevelError::FormatError(format!(
                "{} resolved tiles but {} note times",
                tiles.len(),
                times.len()
            )));
        }

        let offset_ms = if add_offset { settings.offset } else { 0.0 };
        let deltas = times.deltas();
        let rows = tiles
            .iter()
            .zip(times.iter().zip(&deltas))
            .enumerate()
            .map(|(floor, (tile, (&time, &delta)))| TileTiming {
                floor,
                angle: tile.angle,
                bpm: tile.tempo,
                direction: tile.direction,
                midspin: tile.midspin,
                time_ms: time + offset_ms,
                delta_ms: delta,
            })
            .collect();

        Ok(Self {
            bpm: settings.bpm,
            pitch: settings.pitch,
            offset_ms,
            tile_count: tiles.len().saturating_sub(1),
            total_ms: times.last().copied().unwrap_or(0.0),
            tiles: rows,
        })
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LevelError::FormatError(format!("Cannot write JSON report: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, LevelError> {
        serde_yaml::to_string(self)
            .map_err(|e| LevelError::FormatError(format!("Cannot write YAML report: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::timing::{resolve, simulate};

    fn report(add_offset: bool) -> TimingReport {
        let settings = Settings::new(100.0, 100.0).with_offset(25.0);
        let events = [Event::multiply_bpm(1, 2.0), Event::twirl(2)];
        let tiles = resolve(&[0.0, 0.0, 0.0], &events, &settings).unwrap();
        let times = simulate(&tiles).unwrap();
        TimingReport::build(&tiles, &times, &settings, add_offset).unwrap()
    }

    #[test]
    fn test_rows_cover_tiles_and_terminator() {
        let report = report(false);
        assert_eq!(report.tile_count, 3);
        assert_eq!(report.tiles.len(), 4);
        assert_eq!(report.tiles[3].floor, 3);
        assert!((report.total_ms - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_carry_resolved_state() {
        let report = report(false);
        assert_eq!(report.tiles[0].bpm, 100.0);
        assert_eq!(report.tiles[1].bpm, 200.0);
        assert!((report.tiles[1].delta_ms - 300.0).abs() < 1e-9);
        assert_eq!(report.tiles[1].direction, Direction::Clockwise);
        assert_eq!(report.tiles[2].direction, Direction::CounterClockwise);
    }

    #[test]
    fn test_offset_shifts_times_not_deltas() {
        let plain = report(false);
        let shifted = report(true);
        assert_eq!(shifted.offset_ms, 25.0);
        for (a, b) in plain.tiles.iter().zip(&shifted.tiles) {
            assert!((b.time_ms - a.time_ms - 25.0).abs() < 1e-9);
            assert_eq!(a.delta_ms, b.delta_ms);
        }
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = report(false).to_json().unwrap();
        assert!(json.contains("\"tileCount\": 3"));
        assert!(json.contains("\"timeMs\""));
        assert!(json.contains("\"counterClockwise\""));
    }

    #[test]
    fn test_yaml_output() {
        let yaml = report(false).to_yaml().unwrap();
        assert!(yaml.contains("tileCount: 3"));
        assert!(yaml.contains("deltaMs:"));
    }

    #[test]
    fn test_length_mismatch() {
        let settings = Settings::default();
        let tiles = resolve(&[0.0], &[], &settings).unwrap();
        let times = TimingResult::new(vec![600.0]);
        assert!(TimingReport::build(&tiles, &times, &settings, false).is_err());
    }
}
