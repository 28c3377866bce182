//! Timing type definitions
//!
//! Per-tile records flowing between the resolver passes and the simulation,
//! plus the two derived outputs.

use crate::event::PlanetCount;
use serde::Serialize;
use std::ops::Deref;

/// Rotational sense of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// `+1` for clockwise, `-1` for counter-clockwise.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Per-tile state after the first resolver pass.
///
/// `tempo` is only set on tiles carrying a `SetSpeed` event and `twirl` only
/// marks that the direction flips here; the second pass fills in the rest.
///
/// # Fields
/// - `angle`: heading in `[0, 360)`; mid-spin tiles get previous heading + 180
/// - `tempo`: running tempo after this tile's speed events, if any
/// - `twirl`: a `Twirl` event sits on this tile
/// - `extra_hold`: revolutions added by `Hold`/`Pause` events
/// - `midspin`: zero-duration marker tile
/// - `planets`: planet count switched to on this tile, if any
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    pub angle: f64,
    pub tempo: Option<f64>,
    pub twirl: bool,
    pub extra_hold: f64,
    pub midspin: bool,
    pub planets: Option<PlanetCount>,
}

impl TileRecord {
    pub fn new(angle: f64, midspin: bool) -> Self {
        Self {
            angle,
            tempo: None,
            twirl: false,
            extra_hold: 0.0,
            midspin,
            planets: None,
        }
    }
}

/// Per-tile state after tempo and direction have been carried forward.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTile {
    pub angle: f64,
    pub tempo: f64,
    pub direction: Direction,
    pub extra_hold: f64,
    pub midspin: bool,
    pub planets: Option<PlanetCount>,
}

/// Absolute hit time in milliseconds for every tile plus the terminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimingResult(Vec<f64>);

impl TimingResult {
    pub fn new(times: Vec<f64>) -> Self {
        Self(times)
    }

    /// Time spent travelling to each tile.
    pub fn deltas(&self) -> Vec<f64> {
        let mut previous = 0.0;
        self.0
            .iter()
            .map(|&t| {
                let delta = t - previous;
                previous = t;
                delta
            })
            .collect()
    }

    /// Every time shifted by `offset_ms`.
    pub fn with_offset(&self, offset_ms: f64) -> Vec<f64> {
        self.0.iter().map(|t| t + offset_ms).collect()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for TimingResult {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Resolved tempo (bpm, pitch applied) on every tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TempoTrace(Vec<f64>);

impl TempoTrace {
    pub fn new(tempos: Vec<f64>) -> Self {
        Self(tempos)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for TempoTrace {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}
