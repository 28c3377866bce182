pub mod angle;
pub mod api;
pub mod error;
pub mod event;
pub mod lenient;
pub mod level;
pub mod path;
pub mod report;
pub mod settings;
pub mod timing;

pub use api::{note_times, note_times_with_offset, tempo_trace, timing_report};
pub use error::*;
pub use event::{Event, EventKind, PlanetCount, SpeedType};
pub use level::Level;
pub use report::{TileTiming, TimingReport};
pub use settings::Settings;
pub use timing::{TempoTrace, TimingResult};
