//! # Timing Module
//!
//! Derive the absolute time (ms) at which the player reaches every tile.
//!
//! ## Pipeline
//! 1. [`build_records`] - one record per tile plus a terminator; timing events
//!    folded in (tempo, twirl flag, hold, planet count)
//! 2. [`propagate`] - tempo and direction carried forward across tiles
//! 3. [`simulate`] - travelled angle per tile converted to time and summed
//!
//! [`resolve`] runs steps 1-2 and [`compute_note_times`] runs all three.
//!
//! ## Outputs
//! - [`TimingResult`] - one timestamp per tile plus the terminator, so its
//!   length is always `angles.len() + 1`
//! - [`TempoTrace`] - resolved bpm per tile (terminator excluded)
//!
//! ## Example
//! ```rust
//! use adofai_timing::timing::{compute_note_times, tempo_trace};
//! use adofai_timing::{Event, Settings};
//!
//! let angles = [0.0, 0.0, 0.0];
//! let events = [Event::multiply_bpm(1, 2.0)];
//! let settings = Settings::new(100.0, 100.0);
//!
//! let times = compute_note_times(&angles, &events, &settings)?;
//! let deltas = times.deltas();
//! assert!((deltas[0] - 600.0).abs() < 1e-9);
//! assert!((deltas[1] - 300.0).abs() < 1e-9);
//!
//! let tempos = tempo_trace(&angles, &events, &settings)?;
//! assert_eq!(&tempos[..], &[100.0, 200.0, 200.0]);
//! # Ok::<(), adofai_timing::LevelError>(())
//! ```

mod engine;
mod resolver;
mod types;


pub use engine::{angle_to_ms, compute_note_times, simulate, three_planet_angle};
pub use resolver::{build_records, propagate, resolve, tempo_trace, tile_records};
pub use types::{Direction, ResolvedTile, TempoTrace, TileRecord, TimingResult};
