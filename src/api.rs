//! # Public API
//!
//! One-call entry points taking level text and returning derived timing.
//!
//! ## Functions
//!
//! - [`note_times()`] - hit time of every tile (recommended)
//! - [`note_times_with_offset()`] - same, shifted by the level's `offset`
//! - [`tempo_trace()`] - resolved bpm per tile
//! - [`timing_report()`] - per-tile summary ready for export
//!
//! For repeated queries or edits, load a [`Level`] once and use its methods;
//! it caches the timeline between calls.
//!
//! ## Typical Usage
//!
//! ```rust
//! use adofai_timing::note_times;
//!
//! let source = r#"{
//!     "angleData": [0, 0, 0],
//!     "settings": { "bpm": 100, "pitch": 100 },
//!     "actions": []
//! }"#;
//!
//! let times = note_times(source)?;
//! assert_eq!(times.len(), 4);
//! # Ok::<(), adofai_timing::LevelError>(())
//! ```

use crate::{Level, LevelError, TempoTrace, TimingReport, TimingResult};

/// Compute the hit time of every tile, in milliseconds.
///
/// # Pipeline
/// 1. Sanitize and parse the level JSON
/// 2. Decode `pathData` if needed and parse events
/// 3. Resolve tempo and direction per tile
/// 4. Simulate travel and accumulate times
///
/// # Errors
/// Returns [`LevelError`] if parsing or timing fails.
pub fn note_times(source: &str) -> Result<TimingResult, LevelError> {
    let level = source.parse::<Level>()?;
    level.timing().cloned()
}

/// Like [`note_times()`], with the level's `offset` setting added to every time.
///
/// # Example
/// ```rust
/// use adofai_timing::api::note_times_with_offset;
///
/// let source = r#"{"angleData": [0], "settings": {"bpm": 100, "pitch": 100, "offset": 40}, "actions": []}"#;
/// let times = note_times_with_offset(source)?;
/// assert!((times[0] - 640.0).abs() < 1e-9);
/// # Ok::<(), adofai_timing::LevelError>(())
/// ```
pub fn note_times_with_offset(source: &str) -> Result<Vec<f64>, LevelError> {
    source.parse::<Level>()?.note_times(true)
}

/// Resolved tempo on every tile (terminator excluded).
pub fn tempo_trace(source: &str) -> Result<TempoTrace, LevelError> {
    let level = source.parse::<Level>()?;
    level.tempo_trace().cloned()
}

/// Build the per-tile [`TimingReport`].
pub fn timing_report(source: &str, add_offset: bool) -> Result<TimingReport, LevelError> {
    source.parse::<Level>()?.report(add_offset)
}
