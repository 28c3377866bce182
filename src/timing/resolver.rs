//! Event effect resolution
//!
//! Turns the angle sequence and event list into one [`ResolvedTile`] per tile
//! (plus a terminator) in two passes:
//!
//! 1. [`build_records`] walks the events once and folds each timing event into
//!    the record of the tile it sits on. Events on the same tile apply in list
//!    order. Tempo is only written where a speed event occurs and twirls are
//!    only flagged.
//! 2. [`propagate`] walks the records front to back, flipping the running
//!    direction at flagged tiles and carrying the running tempo across tiles
//!    without a speed event.
//!
//! Both passes are pure and keep their running values in locals.

use super::types::{Direction, ResolvedTile, TempoTrace, TileRecord};
use crate::angle::{is_midspin, normalize};
use crate::error::LevelError;
use crate::event::{check_duration, Event, EventKind, SpeedType};
use crate::settings::Settings;

/// One record per angle with headings normalized, plus the terminator.
///
/// A mid-spin sentinel takes the previous tile's raw angle plus 180 (0 + 180
/// when it leads the level). A sentinel following another sentinel therefore
/// reads the raw 999.
pub fn tile_records(angles: &[f64]) -> Vec<TileRecord> {
    let mut records = Vec::with_capacity(angles.len() + 1);
    let mut previous = 0.0;

    for &angle in angles {
        let record = if is_midspin(angle) {
            TileRecord::new(normalize(previous + 180.0), true)
        } else {
            TileRecord::new(normalize(angle), false)
        };
        previous = angle;
        records.push(record);
    }

    records.push(TileRecord::new(0.0, false));
    records
}

/// First pass: fold every timing event into its tile's record.
///
/// # Errors
/// - [`LevelError::EventOutOfRange`] when an event's floor is negative or past
///   the terminator tile
/// - [`LevelError::FormatError`] for a negative or non-finite hold or pause
pub fn build_records(
    angles: &[f64],
    events: &[Event],
    settings: &Settings,
) -> Result<Vec<TileRecord>, LevelError> {
    let mut records = tile_records(angles);
    let tile_count = angles.len();
    let pitch = settings.pitch_scalar();
    let mut tempo = settings.initial_tempo();

    for event in events {
        let record = usize::try_from(event.floor)
            .ok()
            .and_then(|floor| records.get_mut(floor))
            .ok_or(LevelError::EventOutOfRange {
                floor: event.floor,
                tile_count,
            })?;

        match &event.kind {
            EventKind::SetSpeed {
                speed_type,
                beats_per_minute,
                bpm_multiplier,
            } => {
                tempo = match speed_type {
                    SpeedType::Multiplier => tempo * bpm_multiplier,
                    SpeedType::Bpm => beats_per_minute * pitch,
                };
                record.tempo = Some(tempo);
            }
            EventKind::Twirl => record.twirl = true,
            EventKind::Pause { duration } => {
                record.extra_hold += check_duration("Pause", *duration)? / 2.0
            }
            EventKind::Hold { duration } => record.extra_hold += check_duration("Hold", *duration)?,
            EventKind::MultiPlanet { planets } => record.planets = Some(*planets),
            EventKind::Unknown { event_type } => {
                log::trace!("Skipping {} on floor {}", event_type, event.floor);
            }
        }
    }

    Ok(records)
}

/// Second pass: carry tempo and direction forward.
pub fn propagate(records: &[TileRecord], initial_tempo: f64) -> Vec<ResolvedTile> {
    let mut direction = Direction::Clockwise;
    let mut tempo = initial_tempo;

    records
        .iter()
        .map(|record| {
            if record.twirl {
                direction = direction.reversed();
            }
            if let Some(t) = record.tempo {
                tempo = t;
            }
            ResolvedTile {
                angle: record.angle,
                tempo,
                direction,
                extra_hold: record.extra_hold,
                midspin: record.midspin,
                planets: record.planets,
            }
        })
        .collect()
}

/// Run both passes.
pub fn resolve(
    angles: &[f64],
    events: &[Event],
    settings: &Settings,
) -> Result<Vec<ResolvedTile>, LevelError> {
    let records = build_records(angles, events, settings)?;
    Ok(propagate(&records, settings.initial_tempo()))
}

/// Tempo on each tile, terminator excluded.
pub fn tempo_trace(
    angles: &[f64],
    events: &[Event],
    settings: &Settings,
) -> Result<TempoTrace, LevelError> {
    let tiles = resolve(angles, events, settings)?;
    Ok(TempoTrace::new(
        tiles.iter().take(angles.len()).map(|t| t.tempo).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PlanetCount;

    fn settings() -> Settings {
        Settings::new(100.0, 100.0)
    }

    #[test]
    fn test_records_get_terminator() {
        let records = tile_records(&[0.0, 90.0, 180.0]);
        assert_eq!(records.len(), 4);
        assert_eq!(records[3], TileRecord::new(0.0, false));
    }

    #[test]
    fn test_records_normalize_angles() {
        let records = tile_records(&[450.0, -90.0]);
        assert_eq!(records[0].angle, 90.0);
        assert_eq!(records[1].angle, 270.0);
    }

    #[test]
    fn test_midspin_takes_previous_plus_half_turn() {
        let records = tile_records(&[90.0, 999.0, 0.0]);
        assert!(records[1].midspin);
        assert_eq!(records[1].angle, 270.0);
        assert!(!records[2].midspin);

        let records = tile_records(&[270.0, 999.0]);
        assert_eq!(records[1].angle, 90.0);
    }

    #[test]
    fn test_consecutive_midspins_read_raw_previous_angle() {
        let records = tile_records(&[0.0, 999.0, 999.0, 90.0]);
        let angles: Vec<f64> = records.iter().map(|r| r.angle).collect();
        // 999 + 180 = 1179, which wraps to 99
        assert_eq!(angles, vec![0.0, 180.0, 99.0, 90.0, 0.0]);
        assert!(records[1].midspin && records[2].midspin);
    }

    #[test]
    fn test_negative_hold_built_in_code_is_rejected() {
        let events = vec![Event::hold(0, -1.0)];
        let result = build_records(&[0.0], &events, &settings());
        assert!(matches!(result, Err(LevelError::FormatError(_))));

        let events = vec![Event::pause(0, f64::NAN)];
        let result = build_records(&[0.0], &events, &settings());
        assert!(matches!(result, Err(LevelError::FormatError(_))));
    }

    #[test]
    fn test_leading_midspin() {
        let records = tile_records(&[999.0, 0.0]);
        assert!(records[0].midspin);
        assert_eq!(records[0].angle, 180.0);
    }

    #[test]
    fn test_multiplier_compounds_in_list_order() {
        let events = vec![Event::multiply_bpm(1, 2.0), Event::multiply_bpm(1, 1.5)];
        let records = build_records(&[0.0, 0.0, 0.0], &events, &settings()).unwrap();
        assert_eq!(records[0].tempo, None);
        assert_eq!(records[1].tempo, Some(300.0));
        assert_eq!(records[2].tempo, None);
    }

    #[test]
    fn test_absolute_bpm_applies_pitch() {
        let events = vec![Event::set_bpm(1, 200.0), Event::multiply_bpm(2, 0.5)];
        let records =
            build_records(&[0.0, 0.0, 0.0], &events, &Settings::new(100.0, 150.0)).unwrap();
        assert_eq!(records[1].tempo, Some(300.0));
        // Multiplier scales the already pitched tempo, not the pitch again
        assert_eq!(records[2].tempo, Some(150.0));
    }

    #[test]
    fn test_multiplier_before_any_bpm_uses_pitched_start() {
        let events = vec![Event::multiply_bpm(0, 2.0)];
        let records = build_records(&[0.0], &events, &Settings::new(100.0, 50.0)).unwrap();
        assert_eq!(records[0].tempo, Some(100.0));
    }

    #[test]
    fn test_holds_and_pauses_accumulate() {
        let events = vec![
            Event::hold(0, 1.0),
            Event::pause(0, 2.0),
            Event::pause(1, 3.0),
        ];
        let records = build_records(&[0.0, 0.0], &events, &settings()).unwrap();
        assert_eq!(records[0].extra_hold, 2.0);
        assert_eq!(records[1].extra_hold, 1.5);
    }

    #[test]
    fn test_last_planet_event_on_a_tile_wins() {
        let events = vec![
            Event::multi_planet(0, PlanetCount::Three),
            Event::multi_planet(0, PlanetCount::Two),
        ];
        let records = build_records(&[0.0], &events, &settings()).unwrap();
        assert_eq!(records[0].planets, Some(PlanetCount::Two));
    }

    #[test]
    fn test_unknown_events_are_inert() {
        let event = Event::new(0, EventKind::Unknown { event_type: "Flash".to_string() });
        let with = build_records(&[0.0, 90.0], &[event], &settings()).unwrap();
        let without = build_records(&[0.0, 90.0], &[], &settings()).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_event_on_terminator_is_allowed() {
        let events = vec![Event::multiply_bpm(2, 2.0)];
        let records = build_records(&[0.0, 0.0], &events, &settings()).unwrap();
        assert_eq!(records[2].tempo, Some(200.0));
    }

    #[test]
    fn test_event_past_terminator() {
        let events = vec![Event::twirl(3)];
        let result = build_records(&[0.0, 0.0], &events, &settings());
        match result {
            Err(LevelError::EventOutOfRange { floor, tile_count }) => {
                assert_eq!(floor, 3);
                assert_eq!(tile_count, 2);
            }
            other => panic!("Expected EventOutOfRange but got: {:?}", other),
        }
    }

    #[test]
    fn test_negative_floor() {
        let events = vec![Event::twirl(-1)];
        let result = build_records(&[0.0], &events, &settings());
        assert!(matches!(result, Err(LevelError::EventOutOfRange { floor: -1, .. })));
    }

    #[test]
    fn test_propagate_carries_tempo() {
        let events = vec![Event::set_bpm(2, 150.0)];
        let tiles = resolve(&[0.0; 5], &events, &settings()).unwrap();
        let tempos: Vec<f64> = tiles.iter().map(|t| t.tempo).collect();
        assert_eq!(tempos, vec![100.0, 100.0, 150.0, 150.0, 150.0, 150.0]);
    }

    #[test]
    fn test_propagate_flips_direction_at_twirls() {
        let events = vec![Event::twirl(1), Event::twirl(3)];
        let tiles = resolve(&[0.0; 4], &events, &settings()).unwrap();
        let directions: Vec<Direction> = tiles.iter().map(|t| t.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Clockwise,
                Direction::CounterClockwise,
                Direction::CounterClockwise,
                Direction::Clockwise,
                Direction::Clockwise,
            ]
        );
    }

    #[test]
    fn test_tempo_trace_excludes_terminator() {
        let events = vec![Event::multiply_bpm(1, 2.0)];
        let trace = tempo_trace(&[0.0, 0.0, 0.0], &events, &settings()).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(&trace[..], &[100.0, 200.0, 200.0]);
    }
}
