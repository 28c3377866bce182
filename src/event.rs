//! # Level Events
//!
//! Events are JSON objects in the level's `actions` array:
//!
//! ```json
//! { "floor": 12, "eventType": "SetSpeed", "speedType": "Multiplier", "bpmMultiplier": 2 }
//! ```
//!
//! Only five event types affect timing. They parse into dedicated
//! [`EventKind`] variants; every other type (camera moves, filters,
//! decorations, ...) becomes [`EventKind::Unknown`] and is carried along
//! untouched. Fields an event kind does not consume stay in
//! [`Event::extra`], so a level written back out loses nothing.
//!
//! Adding a timing event is a matter of one variant, one constructor and one
//! [`REGISTRY`] row.

use crate::error::LevelError;
use serde_json::{Map, Value};
use std::str::FromStr;

/// How a `SetSpeed` event changes the tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedType {
    /// Replace the tempo (scaled by pitch)
    Bpm,
    /// Multiply the running tempo
    Multiplier,
}

impl SpeedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedType::Bpm => "Bpm",
            SpeedType::Multiplier => "Multiplier",
        }
    }

}

impl FromStr for SpeedType {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bpm" => Ok(SpeedType::Bpm),
            "Multiplier" => Ok(SpeedType::Multiplier),
            _ => Err(LevelError::FormatError(format!(
                "Unknown speedType '{}' in SetSpeed event",
                s
            ))),
        }
    }
}

/// Number of planets orbiting the traveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetCount {
    Two,
    Three,
}

impl PlanetCount {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanetCount::Two => "TwoPlanets",
            PlanetCount::Three => "ThreePlanets",
        }
    }
}

/// Parsed payload of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    SetSpeed {
        speed_type: SpeedType,
        beats_per_minute: f64,
        bpm_multiplier: f64,
    },
    Twirl,
    /// Counts half of `duration` as extra hold
    Pause { duration: f64 },
    Hold { duration: f64 },
    MultiPlanet { planets: PlanetCount },
    /// Any event type without timing effect; its fields live in `Event::extra`
    Unknown { event_type: String },
}

impl EventKind {
    /// The `eventType` tag this kind serializes as.
    pub fn event_type(&self) -> &str {
        match self {
            EventKind::SetSpeed { .. } => "SetSpeed",
            EventKind::Twirl => "Twirl",
            EventKind::Pause { .. } => "Pause",
            EventKind::Hold { .. } => "Hold",
            EventKind::MultiPlanet { .. } => "MultiPlanet",
            EventKind::Unknown { event_type } => event_type,
        }
    }

    /// Whether this kind has any effect on note timing.
    pub fn affects_timing(&self) -> bool {
        !matches!(self, EventKind::Unknown { .. })
    }
}

/// An event attached to a floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub floor: i64,
    pub kind: EventKind,
    pub extra: Map<String, Value>,
}

type Constructor = fn(&mut Map<String, Value>) -> Result<EventKind, LevelError>;

/// Event types with timing effect, keyed by their `eventType` tag.
pub const REGISTRY: &[(&str, Constructor)] = &[
    ("SetSpeed", set_speed),
    ("Twirl", twirl),
    ("Pause", pause),
    ("Hold", hold),
    ("MultiPlanet", multi_planet),
];

fn set_speed(fields: &mut Map<String, Value>) -> Result<EventKind, LevelError> {
    // Old levels omit speedType and mean an absolute bpm
    let speed_type = match take_str(fields, "SetSpeed", "speedType")? {
        Some(s) => s.parse::<SpeedType>()?,
        None => SpeedType::Bpm,
    };
    Ok(EventKind::SetSpeed {
        speed_type,
        beats_per_minute: take_f64(fields, "SetSpeed", "beatsPerMinute", 100.0)?,
        bpm_multiplier: take_f64(fields, "SetSpeed", "bpmMultiplier", 1.0)?,
    })
}

fn twirl(_fields: &mut Map<String, Value>) -> Result<EventKind, LevelError> {
    Ok(EventKind::Twirl)
}

fn pause(fields: &mut Map<String, Value>) -> Result<EventKind, LevelError> {
    Ok(EventKind::Pause {
        duration: take_duration(fields, "Pause", 1.0)?,
    })
}

fn hold(fields: &mut Map<String, Value>) -> Result<EventKind, LevelError> {
    Ok(EventKind::Hold {
        duration: take_duration(fields, "Hold", 0.0)?,
    })
}

fn multi_planet(fields: &mut Map<String, Value>) -> Result<EventKind, LevelError> {
    let planets = match take_str(fields, "MultiPlanet", "planets")?.as_deref() {
        Some("ThreePlanets") => PlanetCount::Three,
        _ => PlanetCount::Two,
    };
    Ok(EventKind::MultiPlanet { planets })
}

fn take_f64(
    fields: &mut Map<String, Value>,
    event_type: &str,
    key: &str,
    default: f64,
) -> Result<f64, LevelError> {
    match fields.remove(key) {
        None => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| {
            LevelError::FormatError(format!(
                "'{}' of {} event must be a number, got {}",
                key, event_type, value
            ))
        }),
    }
}

fn take_duration(
    fields: &mut Map<String, Value>,
    event_type: &str,
    default: f64,
) -> Result<f64, LevelError> {
    check_duration(event_type, take_f64(fields, event_type, "duration", default)?)
}

/// Extra hold must never shorten travel.
pub(crate) fn check_duration(event_type: &str, duration: f64) -> Result<f64, LevelError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(duration)
    } else {
        Err(LevelError::FormatError(format!(
            "'duration' of {} event must be a non-negative number, got {}",
            event_type, duration
        )))
    }
}

fn take_str(
    fields: &mut Map<String, Value>,
    event_type: &str,
    key: &str,
) -> Result<Option<String>, LevelError> {
    match fields.remove(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(LevelError::FormatError(format!(
            "'{}' of {} event must be a string, got {}",
            key, event_type, other
        ))),
    }
}

impl Event {
    pub fn new(floor: i64, kind: EventKind) -> Self {
        Self {
            floor,
            kind,
            extra: Map::new(),
        }
    }

    pub fn set_bpm(floor: i64, beats_per_minute: f64) -> Self {
        Self::new(
            floor,
            EventKind::SetSpeed {
                speed_type: SpeedType::Bpm,
                beats_per_minute,
                bpm_multiplier: 1.0,
            },
        )
    }

    pub fn multiply_bpm(floor: i64, bpm_multiplier: f64) -> Self {
        Self::new(
            floor,
            EventKind::SetSpeed {
                speed_type: SpeedType::Multiplier,
                beats_per_minute: 100.0,
                bpm_multiplier,
            },
        )
    }

    pub fn twirl(floor: i64) -> Self {
        Self::new(floor, EventKind::Twirl)
    }

    pub fn pause(floor: i64, duration: f64) -> Self {
        Self::new(floor, EventKind::Pause { duration })
    }

    pub fn hold(floor: i64, duration: f64) -> Self {
        Self::new(floor, EventKind::Hold { duration })
    }

    pub fn multi_planet(floor: i64, planets: PlanetCount) -> Self {
        Self::new(floor, EventKind::MultiPlanet { planets })
    }

    pub fn event_type(&self) -> &str {
        self.kind.event_type()
    }

    /// Parse one entry of the `actions` array.
    ///
    /// # Errors
    /// [`LevelError::FormatError`] when the entry is not an object, lacks
    /// `floor`/`eventType`, or a timing field has the wrong type.
    pub fn from_value(value: Value) -> Result<Self, LevelError> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(LevelError::FormatError(format!(
                    "Event must be an object, got {}",
                    other
                )))
            }
        };

        let floor = match fields.remove("floor") {
            Some(v) => v.as_i64().ok_or_else(|| {
                LevelError::FormatError(format!("Event floor must be an integer, got {}", v))
            })?,
            None => return Err(LevelError::FormatError("Event is missing 'floor'".to_string())),
        };

        let event_type = match fields.remove("eventType") {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(LevelError::FormatError(format!(
                    "Event eventType must be a string, got {}",
                    other
                )))
            }
            None => {
                return Err(LevelError::FormatError(format!(
                    "Event on floor {} is missing 'eventType'",
                    floor
                )))
            }
        };

        let kind = match REGISTRY.iter().find(|(tag, _)| *tag == event_type) {
            Some((_, construct)) => construct(&mut fields)?,
            None => EventKind::Unknown { event_type },
        };

        Ok(Self {
            floor,
            kind,
            extra: fields,
        })
    }

    /// Serialize back to the level's JSON shape.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("floor".to_string(), Value::from(self.floor));
        map.insert("eventType".to_string(), Value::from(self.event_type()));

        match &self.kind {
            EventKind::SetSpeed {
                speed_type,
                beats_per_minute,
                bpm_multiplier,
            } => {
                map.insert("speedType".to_string(), Value::from(speed_type.as_str()));
                map.insert("beatsPerMinute".to_string(), Value::from(*beats_per_minute));
                map.insert("bpmMultiplier".to_string(), Value::from(*bpm_multiplier));
            }
            EventKind::Pause { duration } | EventKind::Hold { duration } => {
                map.insert("duration".to_string(), Value::from(*duration));
            }
            EventKind::MultiPlanet { planets } => {
                map.insert("planets".to_string(), Value::from(planets.as_str()));
            }
            EventKind::Twirl | EventKind::Unknown { .. } => {}
        }

        Value::Object(map)
    }
}
