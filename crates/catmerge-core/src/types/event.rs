//! Event, origin and derived measurement types.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pick::Pick;
use crate::error::{CatmergeError, CatmergeResult};

/// Opaque resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Association of a pick with an origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    pub resource_id: ResourceId,
    pub pick_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Travel-time residual in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_residual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_weight: Option<f64>,
    /// Epicentral distance in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
}

impl Arrival {
    /// Create an arrival for a pick.
    pub fn new(resource_id: impl Into<ResourceId>, pick_id: impl Into<ResourceId>) -> Self {
        Self {
            resource_id: resource_id.into(),
            pick_id: pick_id.into(),
            phase: None,
            time_residual: None,
            time_weight: None,
            distance: None,
            azimuth: None,
        }
    }
}

/// Amplitude measurement, usually tied to an amplitude-phase pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    pub resource_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_type: Option<String>,
    /// Period in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Amplitude {
    /// Create an amplitude for a pick.
    pub fn new(resource_id: impl Into<ResourceId>, pick_id: impl Into<ResourceId>) -> Self {
        Self {
            resource_id: resource_id.into(),
            pick_id: Some(pick_id.into()),
            generic_amplitude: None,
            amplitude_type: None,
            period: None,
            unit: None,
        }
    }

    /// Set the measured value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.generic_amplitude = Some(value);
        self
    }

    /// Whether this amplitude belongs to the given pick.
    pub fn references(&self, pick_id: &ResourceId) -> bool {
        self.pick_id.as_ref() == Some(pick_id)
    }
}

/// Spatio-temporal estimate of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Depth in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arrivals: Vec<Arrival>,
}

impl Origin {
    /// Create an origin at the given time and epicenter.
    pub fn new(time: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            time: Some(time),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    /// Set the depth in meters.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// Fully defined origin values needed for matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypocenter {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A catalog event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub resource_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_origin: Option<Origin>,
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amplitudes: Vec<Amplitude>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    /// Create an event with no origin and no records.
    pub fn new(resource_id: impl Into<ResourceId>) -> Self {
        Self {
            resource_id: resource_id.into(),
            preferred_origin: None,
            picks: Vec::new(),
            amplitudes: Vec::new(),
            description: None,
        }
    }

    /// Set the preferred origin.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.preferred_origin = Some(origin);
        self
    }

    /// Append a pick.
    pub fn with_pick(mut self, pick: Pick) -> Self {
        self.picks.push(pick);
        self
    }

    /// Append an arrival to the preferred origin, creating an empty origin if needed.
    pub fn with_arrival(mut self, arrival: Arrival) -> Self {
        self.preferred_origin
            .get_or_insert_with(Origin::default)
            .arrivals
            .push(arrival);
        self
    }

    /// Append an amplitude.
    pub fn with_amplitude(mut self, amplitude: Amplitude) -> Self {
        self.amplitudes.push(amplitude);
        self
    }

    /// Arrivals of the preferred origin (empty without an origin).
    pub fn arrivals(&self) -> &[Arrival] {
        self.preferred_origin
            .as_ref()
            .map(|o| o.arrivals.as_slice())
            .unwrap_or(&[])
    }

    /// Time and epicenter of the preferred origin.
    ///
    /// Fails with `MissingOrigin` if there is no preferred origin or it lacks a
    /// time, latitude or longitude.
    pub fn hypocenter(&self) -> CatmergeResult<Hypocenter> {
        let origin = self
            .preferred_origin
            .as_ref()
            .ok_or_else(|| CatmergeError::missing_origin(self.resource_id.as_str()))?;
        let time = origin
            .time
            .ok_or_else(|| CatmergeError::missing_origin_time(self.resource_id.as_str()))?;
        match (origin.latitude, origin.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Hypocenter {
                time,
                latitude,
                longitude,
            }),
            _ => Err(CatmergeError::missing_origin_location(self.resource_id.as_str())),
        }
    }

    /// Pick references of arrivals and amplitudes that do not resolve to a pick
    /// of this event. Empty for a consistent event.
    pub fn dangling_references(&self) -> Vec<ResourceId> {
        let pick_ids: HashSet<&ResourceId> = self.picks.iter().map(|p| &p.resource_id).collect();
        let arrival_refs = self.arrivals().iter().map(|a| &a.pick_id);
        let amplitude_refs = self.amplitudes.iter().filter_map(|a| a.pick_id.as_ref());

        arrival_refs
            .chain(amplitude_refs)
            .filter(|id| !pick_ids.contains(id))
            .cloned()
            .collect()
    }
}
