//! Pick types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::ResourceId;
use super::phase::{IdentityMode, PhaseCategory};

/// Ordinal used when a pick carries no readable weight.
pub const DEFAULT_WEIGHT: &str = "0";

/// Station/channel the pick was measured on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveformStreamId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_code: String,
    pub station_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_code: String,
}

impl WaveformStreamId {
    /// Stream id that only names a station.
    pub fn station(station_code: impl Into<String>) -> Self {
        Self {
            station_code: station_code.into(),
            ..Default::default()
        }
    }
}

/// Quality weight as stored in a catalog.
///
/// Catalog producers disagree on the representation: some write an ordinal
/// string, some a bare number, some a quantity object with a `value` field.
/// Any other shape is kept as [`Weight::Unreadable`] so the event still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Ordinal(String),
    Numeric(f64),
    Quantity(WeightQuantity),
    /// Reads as [`DEFAULT_WEIGHT`].
    Unreadable(serde_json::Value),
}

/// Composite weight; the ordinal lives in `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightQuantity {
    #[serde(default)]
    pub value: Option<Box<Weight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
}

impl Weight {
    /// Ordinal string of this weight, if it is readable.
    fn ordinal(&self) -> Option<String> {
        match self {
            Weight::Ordinal(text) => {
                let text = text.trim();
                match text.parse::<f64>() {
                    Ok(n) if n.is_finite() => Some(text.to_string()),
                    _ => None,
                }
            }
            Weight::Numeric(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Weight::Numeric(_) => None,
            Weight::Quantity(q) => q.value.as_ref().and_then(|v| v.ordinal()),
            Weight::Unreadable(_) => None,
        }
    }
}

impl From<&str> for Weight {
    fn from(value: &str) -> Self {
        Weight::Ordinal(value.to_string())
    }
}

/// A single station/phase detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Identity referenced by arrivals and amplitudes.
    pub resource_id: ResourceId,
    pub waveform_id: WaveformStreamId,
    /// Phase hint, e.g. "P", "Sg", "IAML".
    #[serde(default)]
    pub phase_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
}

impl Pick {
    /// Create a new pick.
    pub fn new(
        resource_id: impl Into<ResourceId>,
        station_code: impl Into<String>,
        phase_hint: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            waveform_id: WaveformStreamId::station(station_code),
            phase_hint: phase_hint.into(),
            time: None,
            weight: None,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Set the pick time.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the full waveform stream id.
    pub fn with_waveform_id(mut self, waveform_id: WaveformStreamId) -> Self {
        self.waveform_id = waveform_id;
        self
    }

    pub fn station_code(&self) -> &str {
        &self.waveform_id.station_code
    }

    /// Weight ordinal of this pick.
    ///
    /// Absent, malformed and empty composite weights all read as `"0"`; this
    /// accessor never fails.
    pub fn read_weight(&self) -> String {
        match self.weight.as_ref().and_then(Weight::ordinal) {
            Some(ordinal) => ordinal,
            None => {
                if self.weight.is_some() {
                    tracing::trace!(
                        pick = %self.resource_id,
                        weight = ?self.weight,
                        "Unreadable pick weight, using default"
                    );
                }
                DEFAULT_WEIGHT.to_string()
            }
        }
    }

    /// Numeric value of [`Pick::read_weight`] used for weight comparisons.
    pub fn weight_rank(&self) -> f64 {
        self.read_weight().parse().unwrap_or(0.0)
    }

    /// Identity string used for duplicate detection.
    pub fn identity(&self, mode: IdentityMode) -> String {
        match mode {
            IdentityMode::StationPhase => format!("{}_{}", self.station_code(), self.phase_hint),
            IdentityMode::StationPhaseWeight => format!(
                "{}_{}_{}",
                self.station_code(),
                self.phase_hint,
                self.read_weight()
            ),
        }
    }

    /// (station, phase) key the conflict resolver groups on.
    pub fn station_phase(&self) -> (&str, &str) {
        (self.station_code(), self.phase_hint.as_str())
    }

    pub fn category(&self) -> Option<PhaseCategory> {
        PhaseCategory::classify(&self.phase_hint)
    }
}
