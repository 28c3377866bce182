//! Timing simulation
//!
//! Replays the planet's travel across the resolved tiles and accumulates the
//! absolute time at which each tile is reached.
//!
//! # Travel Model
//! The planet arriving on a tile leaves in the opposite heading, so before each
//! tile the reference heading turns by 180°. The angle travelled to the next
//! heading depends on the rotation direction:
//!
//! ```text
//! pAngle = normalize((reference - dest) * direction)
//! ```
//!
//! Identical headings need a full 360° revolution. Hold and pause events add
//! whole revolutions. With three planets the next planet already sits 60°
//! ahead, so the travelled angle shrinks by 60° (wrapping to +300° when that
//! would go below zero).
//!
//! 180° of travel is one beat: `ms = pAngle / 180 * 60 / bpm * 1000`.

use super::resolver::resolve;
use super::types::{ResolvedTile, TimingResult};
use crate::angle::{is_full_circle, normalize};
use crate::error::LevelError;
use crate::event::{Event, PlanetCount};
use crate::settings::Settings;

/// Milliseconds needed to travel `angle` degrees at `bpm`.
pub fn angle_to_ms(angle: f64, bpm: f64) -> f64 {
    (angle / 180.0) * (60.0 / bpm) * 1000.0
}

/// Travelled angle once a third planet shortens the approach.
pub fn three_planet_angle(angle: f64) -> f64 {
    if angle > 60.0 {
        angle - 60.0
    } else {
        angle + 300.0
    }
}

/// Running state of the simulation.
#[derive(Debug, Default)]
struct Traveler {
    reference: f64,
    elapsed: f64,
    three_planets: bool,
}

impl Traveler {
    /// Degrees travelled to reach `tile`, updating the planet mode.
    fn travel(&mut self, tile: &ResolvedTile) -> f64 {
        self.reference = normalize(self.reference - 180.0);

        let mut angle = if is_full_circle(tile.angle, self.reference) {
            360.0
        } else {
            normalize((self.reference - tile.angle) * tile.direction.sign())
        };
        angle += tile.extra_hold * 360.0;

        let raw = angle;
        if self.three_planets {
            angle = three_planet_angle(angle);
        }
        // A planet switch already applies to the tile it sits on
        if let Some(planets) = tile.planets {
            self.three_planets = planets == PlanetCount::Three;
            angle = if self.three_planets {
                three_planet_angle(raw)
            } else {
                raw
            };
        }

        self.reference = tile.angle;
        angle
    }
}

/// Accumulate hit times over resolved tiles.
///
/// # Errors
/// [`LevelError::DegenerateTempo`] if a timed tile has a tempo that is zero,
/// negative or not finite. Mid-spin tiles take no time and are not checked.
pub fn simulate(tiles: &[ResolvedTile]) -> Result<TimingResult, LevelError> {
    let mut traveler = Traveler::default();
    let mut times = Vec::with_capacity(tiles.len());

    for (floor, tile) in tiles.iter().enumerate() {
        let angle = traveler.travel(tile);

        let delta = if tile.midspin {
            0.0
        } else {
            if !(tile.tempo.is_finite() && tile.tempo > 0.0) {
                return Err(LevelError::DegenerateTempo {
                    floor,
                    tempo: tile.tempo,
                });
            }
            angle_to_ms(angle, tile.tempo)
        };

        traveler.elapsed += delta;
        times.push(traveler.elapsed);
    }

    Ok(TimingResult::new(times))
}

/// Hit time of every tile for raw level data.
///
/// # Example
/// ```rust
/// use adofai_timing::timing::compute_note_times;
/// use adofai_timing::Settings;
///
/// let times = compute_note_times(&[0.0, 0.0, 0.0], &[], &Settings::new(100.0, 100.0))?;
///
/// // Three tiles plus the terminator, each a half turn at 100 bpm
/// assert_eq!(times.len(), 4);
/// assert!((times[0] - 600.0).abs() < 1e-9);
/// assert!((times[3] - 2400.0).abs() < 1e-9);
/// # Ok::<(), adofai_timing::LevelError>(())
/// ```
pub fn compute_note_times(
    angles: &[f64],
    events: &[Event],
    settings: &Settings,
) -> Result<TimingResult, LevelError> {
    let tiles = resolve(angles, events, settings)?;
    simulate(&tiles)
}
