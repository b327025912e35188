//! Proximity test deciding whether two events are the same physical event.

use crate::error::CatmergeResult;
use crate::geodesy::DistanceMeasure;
use crate::types::Event;

/// Time and epicenter offset between two events' preferred origins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginOffset {
    /// Absolute origin time difference in seconds.
    pub seconds: f64,
    /// Absolute epicentral distance in km.
    pub km: f64,
}

/// Offsets between the preferred origins of two events.
///
/// Both events need a preferred origin with time, latitude and longitude.
pub fn origin_offset(
    reference: &Event,
    compared: &Event,
    distance: &dyn DistanceMeasure,
) -> CatmergeResult<OriginOffset> {
    let a = reference.hypocenter()?;
    let b = compared.hypocenter()?;

    let seconds = (a.time - b.time)
        .num_microseconds()
        .map(|us| us as f64 * 1e-6)
        .unwrap_or(f64::INFINITY)
        .abs();
    let km = distance
        .distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
        .abs();

    Ok(OriginOffset { seconds, km })
}

/// Whether two events are within the time and distance thresholds.
///
/// Both comparisons are strict: an offset equal to its threshold is not a match.
pub fn matches(
    reference: &Event,
    compared: &Event,
    max_time_delta_secs: f64,
    max_distance_km: f64,
    distance: &dyn DistanceMeasure,
) -> CatmergeResult<bool> {
    let offset = origin_offset(reference, compared, distance)?;
    Ok(offset.seconds < max_time_delta_secs && offset.km < max_distance_km)
}

/// Thresholds bundled with the distance measure they apply to.
pub struct ProximityMatcher {
    max_time_delta_secs: f64,
    max_distance_km: f64,
    distance: Box<dyn DistanceMeasure>,
}

impl ProximityMatcher {
    /// Create a matcher.
    pub fn new(
        max_time_delta_secs: f64,
        max_distance_km: f64,
        distance: Box<dyn DistanceMeasure>,
    ) -> Self {
        Self {
            max_time_delta_secs,
            max_distance_km,
            distance,
        }
    }

    pub fn max_time_delta_secs(&self) -> f64 {
        self.max_time_delta_secs
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    /// See [`matches`].
    pub fn matches(&self, reference: &Event, compared: &Event) -> CatmergeResult<bool> {
        matches(
            reference,
            compared,
            self.max_time_delta_secs,
            self.max_distance_km,
            self.distance.as_ref(),
        )
    }

    /// See [`origin_offset`].
    pub fn offset(&self, reference: &Event, compared: &Event) -> CatmergeResult<OriginOffset> {
        origin_offset(reference, compared, self.distance.as_ref())
    }
}

impl std::fmt::Debug for ProximityMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityMatcher")
            .field("max_time_delta_secs", &self.max_time_delta_secs)
            .field("max_distance_km", &self.max_distance_km)
            .finish_non_exhaustive()
    }
}
