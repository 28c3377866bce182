//! # Level
//!
//! A loaded level: angles, events and settings, plus every other key of the
//! file kept as-is so [`Level::to_json`] writes back what was read.
//!
//! ## File Shape
//! ```json
//! {
//!   "angleData": [0, 0, 90, 999, 180],
//!   "settings": { "version": 13, "bpm": 120, "pitch": 100, "offset": 0 },
//!   "actions": [
//!     { "floor": 2, "eventType": "SetSpeed", "speedType": "Multiplier", "bpmMultiplier": 2 }
//!   ],
//!   "decorations": []
//! }
//! ```
//! Older revisions store `"pathData": "RRUL"` instead of `angleData`; it is
//! decoded once on load and saved back as `angleData`.
//!
//! ## Derived Data
//! Note times and the tempo trace are computed on first request and cached on
//! this `Level`. Any mutation through `&mut self` clears the cache, so a
//! cached result always matches the current angles, events and settings.

use crate::error::LevelError;
use crate::event::Event;
use crate::lenient::sanitize;
use crate::path::decode_path;
use crate::report::TimingReport;
use crate::settings::Settings;
use crate::timing::{resolve, simulate, ResolvedTile, TempoTrace, TimingResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Event types with no effect besides visuals.
pub const VFX_EVENT_TYPES: &[&str] = &[
    "SetFilter",
    "SetFilterAdvanced",
    "MoveCamera",
    "Flash",
    "Bloom",
    "ScreenScroll",
    "ShakeScreen",
    "ScreenTile",
    "CustomBackground",
    "HallOfMirrors",
    "SetFrameRate",
];

/// Events that drive decorations.
pub const DECORATION_EVENT_TYPES: &[&str] = &[
    "EmitParticle",
    "SetParticle",
    "SetObject",
    "SetText",
    "SetDefaultText",
    "MoveDecorations",
];

/// Entries of the `decorations` list.
pub const DECORATION_KINDS: &[&str] = &["AddDecoration", "AddText", "AddObject", "AddParticle"];

pub const TRACK_EVENT_TYPES: &[&str] = &["MoveTrack", "RecolorTrack", "ColorTrack", "AnimateTrack"];

#[derive(Debug, Default)]
pub struct Level {
    /// Keys other than the ones below, untouched
    root: Map<String, Value>,
    angles: Vec<f64>,
    events: Vec<Event>,
    settings: Map<String, Value>,
    decorations: Option<Vec<Value>>,
    note_times: OnceLock<TimingResult>,
    tempo_trace: OnceLock<TempoTrace>,
}

impl Level {
    /// Empty level with the given starting tempo and pitch.
    pub fn new(bpm: f64, pitch: f64) -> Self {
        let mut settings = Map::new();
        settings.insert("bpm".to_string(), Value::from(bpm));
        settings.insert("pitch".to_string(), Value::from(pitch));
        settings.insert("offset".to_string(), Value::from(0));
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Read and parse a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&source)
    }

    /// Serialize the level, pretty-printed when `indent` is set.
    pub fn to_json(&self, indent: bool) -> Result<String, LevelError> {
        let mut root = self.root.clone();
        root.insert(
            "angleData".to_string(),
            Value::Array(self.angles.iter().map(|&a| Value::from(a)).collect()),
        );
        root.insert("settings".to_string(), Value::Object(self.settings.clone()));
        root.insert(
            "actions".to_string(),
            Value::Array(self.events.iter().map(Event::to_value).collect()),
        );
        if let Some(decorations) = &self.decorations {
            root.insert("decorations".to_string(), Value::Array(decorations.clone()));
        }

        let root = Value::Object(root);
        let text = if indent {
            serde_json::to_string_pretty(&root)
        } else {
            serde_json::to_string(&root)
        };
        text.map_err(|e| LevelError::FormatError(format!("Cannot serialize level: {}", e)))
    }

    /// Write the level to `path`.
    pub fn save(&self, path: impl AsRef<Path>, indent: bool) -> Result<(), LevelError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json(indent)?).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn invalidate(&mut self) {
        self.note_times.take();
        self.tempo_trace.take();
    }

    // --- Settings ---

    /// Validated timing settings.
    pub fn settings(&self) -> Result<Settings, LevelError> {
        Settings::from_map(&self.settings)
    }

    /// Read a setting as `T`.
    pub fn setting<T: DeserializeOwned>(&self, key: &str) -> Result<T, LevelError> {
        let value = self
            .settings
            .get(key)
            .ok_or_else(|| LevelError::FormatError(format!("missing setting '{}'", key)))?;
        serde_json::from_value(value.clone())
            .map_err(|e| LevelError::FormatError(format!("setting '{}': {}", key, e)))
    }

    pub fn put_setting<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), LevelError> {
        let value = serde_json::to_value(value)
            .map_err(|e| LevelError::FormatError(format!("setting '{}': {}", key, e)))?;
        self.settings.insert(key.to_string(), value);
        self.invalidate();
        Ok(())
    }

    pub fn has_setting(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn remove_settings(&mut self, keys: &[&str]) {
        for key in keys {
            self.settings.remove(*key);
        }
        self.invalidate();
    }

    // --- Angles ---

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn tile_count(&self) -> usize {
        self.angles.len()
    }

    pub fn push_angle(&mut self, angle: f64) {
        self.angles.push(angle);
        self.invalidate();
    }

    pub fn set_angles(&mut self, angles: Vec<f64>) {
        self.angles = angles;
        self.invalidate();
    }

    // --- Events ---

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
        self.invalidate();
    }

    /// Add an event from its type tag and extra JSON fields.
    ///
    /// `data` may carry any fields; timing fields are validated like on load.
    pub fn add_event(
        &mut self,
        floor: i64,
        event_type: &str,
        data: Map<String, Value>,
    ) -> Result<(), LevelError> {
        let mut fields = data;
        fields.insert("floor".to_string(), Value::from(floor));
        fields.insert("eventType".to_string(), Value::from(event_type));
        let event = Event::from_value(Value::Object(fields))?;
        self.push_event(event);
        Ok(())
    }

    pub fn events_where<F>(&self, predicate: F) -> Vec<&Event>
    where
        F: Fn(&Event) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).collect()
    }

    pub fn events_on(&self, floor: i64) -> Vec<&Event> {
        self.events_where(|e| e.floor == floor)
    }

    pub fn events_of(&self, event_type: &str) -> Vec<&Event> {
        self.events_where(|e| e.event_type() == event_type)
    }

    pub fn events_on_of(&self, floor: i64, event_type: &str) -> Vec<&Event> {
        self.events_where(|e| e.floor == floor && e.event_type() == event_type)
    }

    pub fn has_events(&self, floor: i64) -> bool {
        self.events.iter().any(|e| e.floor == floor)
    }

    pub fn has_events_of(&self, floor: i64, event_type: &str) -> bool {
        self.events
            .iter()
            .any(|e| e.floor == floor && e.event_type() == event_type)
    }

    /// Remove up to `count` events of `event_type` from `floor`, first ones
    /// first. Returns how many were removed.
    pub fn remove_floor_events(&mut self, floor: i64, event_type: &str, count: usize) -> usize {
        let mut removed = 0;
        self.events.retain(|e| {
            if removed < count && e.floor == floor && e.event_type() == event_type {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    /// Remove every event matching `predicate`. Returns how many were removed.
    pub fn remove_events_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Event) -> bool,
    {
        let before = self.events.len();
        self.events.retain(|e| !predicate(e));
        let removed = before - self.events.len();
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    /// Strip purely visual events, keeping everything that affects play.
    ///
    /// With `include_decorations` decoration events and the decorations list
    /// are cleared as well; with `include_tracks` track animation goes too.
    pub fn remove_vfx(&mut self, include_decorations: bool, include_tracks: bool) -> usize {
        let is_vfx = |e: &Event| {
            let tag = e.event_type();
            VFX_EVENT_TYPES.contains(&tag)
                || (include_decorations && DECORATION_EVENT_TYPES.contains(&tag))
                || (include_tracks && TRACK_EVENT_TYPES.contains(&tag))
        };
        let mut removed = self.remove_events_where(is_vfx);

        if include_decorations {
            if let Some(decorations) = &mut self.decorations {
                let before = decorations.len();
                decorations.retain(|d| {
                    !d.get("eventType")
                        .and_then(Value::as_str)
                        .is_some_and(|tag| DECORATION_KINDS.contains(&tag))
                });
                removed += before - decorations.len();
            }
        }
        log::debug!("Removed {} visual effects", removed);
        removed
    }

    pub fn decorations(&self) -> Option<&[Value]> {
        self.decorations.as_deref()
    }

    // --- Timing ---

    /// Per-tile state after both resolver passes (not cached).
    pub fn tile_records(&self) -> Result<Vec<ResolvedTile>, LevelError> {
        resolve(&self.angles, &self.events, &self.settings()?)
    }

    /// Hit time of every tile plus the terminator, in milliseconds.
    ///
    /// With `add_offset` every time is shifted by the `offset` setting.
    pub fn note_times(&self, add_offset: bool) -> Result<Vec<f64>, LevelError> {
        let times = self.timing()?;
        if add_offset {
            Ok(times.with_offset(self.settings()?.offset))
        } else {
            Ok(times.to_vec())
        }
    }

    /// Cached [`TimingResult`] without offset.
    pub fn timing(&self) -> Result<&TimingResult, LevelError> {
        if let Some(times) = self.note_times.get() {
            log::debug!("Note times served from cache");
            return Ok(times);
        }
        let times = simulate(&self.tile_records()?)?;
        log::info!("Computed note times for {} tiles", self.angles.len());
        Ok(self.note_times.get_or_init(|| times))
    }

    /// Cached resolved tempo per tile.
    pub fn tempo_trace(&self) -> Result<&TempoTrace, LevelError> {
        if let Some(trace) = self.tempo_trace.get() {
            return Ok(trace);
        }
        let trace = crate::timing::tempo_trace(&self.angles, &self.events, &self.settings()?)?;
        Ok(self.tempo_trace.get_or_init(|| trace))
    }

    /// Per-tile timing summary for export.
    pub fn report(&self, add_offset: bool) -> Result<TimingReport, LevelError> {
        let settings = self.settings()?;
        let tiles = self.tile_records()?;
        TimingReport::build(&tiles, self.timing()?, &settings, add_offset)
    }

    /// Whether any event on the level affects timing.
    pub fn has_timing_events(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.kind.affects_timing())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    /// Parse level text.
    ///
    /// # Errors
    /// - [`LevelError::ParseError`] for text that is not JSON even after the
    ///   lenient pre-pass
    /// - [`LevelError::FormatError`] for missing `actions`/`settings`, angle
    ///   data that is not numeric, or malformed events
    /// - [`LevelError::UnknownTileCode`] for an undecodable `pathData`
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(&sanitize(source)).map_err(LevelError::from_json)?;
        let mut root = match value {
            Value::Object(map) => map,
            _ => {
                return Err(LevelError::FormatError(
                    "Level root must be an object".to_string(),
                ))
            }
        };

        let path_data = root.remove("pathData");
        let angles = match (root.remove("angleData"), path_data) {
            (Some(angle_data), path_data) => {
                if path_data.is_some() {
                    log::warn!("Level has both angleData and pathData, ignoring pathData");
                }
                parse_angles(angle_data)?
            }
            (None, Some(Value::String(path))) => decode_path(&path)?,
            (None, Some(other)) => {
                return Err(LevelError::FormatError(format!(
                    "pathData must be a string, got {}",
                    other
                )))
            }
            (None, None) => {
                return Err(LevelError::FormatError(
                    "Level has neither angleData nor pathData".to_string(),
                ))
            }
        };

        let settings = match root.remove("settings") {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(LevelError::FormatError("settings must be an object".to_string())),
            None => return Err(LevelError::FormatError("Level is missing 'settings'".to_string())),
        };

        let events = match root.remove("actions") {
            Some(Value::Array(actions)) => actions
                .into_iter()
                .map(Event::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(LevelError::FormatError("actions must be an array".to_string())),
            None => return Err(LevelError::FormatError("Level is missing 'actions'".to_string())),
        };

        let decorations = match root.remove("decorations") {
            Some(Value::Array(items)) => Some(items),
            Some(_) => {
                return Err(LevelError::FormatError(
                    "decorations must be an array".to_string(),
                ))
            }
            None => None,
        };

        let version = settings.get("version").cloned().unwrap_or(Value::Null);
        log::info!(
            "Loaded level (version {}): {} tiles, {} events",
            version,
            angles.len(),
            events.len()
        );

        Ok(Self {
            root,
            angles,
            events,
            settings,
            decorations,
            ..Self::default()
        })
    }
}

fn parse_angles(value: Value) -> Result<Vec<f64>, LevelError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    LevelError::FormatError(format!("angleData[{}] is not a number: {}", i, v))
                })
            })
            .collect(),
        other => Err(LevelError::FormatError(format!(
            "angleData must be an array, got {}",
            other
        ))),
    }
}
