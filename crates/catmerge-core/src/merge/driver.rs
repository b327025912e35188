//! Catalog merge driver.
//!
//! Each reference event is compared against the comparison catalog in order and
//! merged with the first event that matches. Comparison events stay available
//! after a match, so one of them may enrich several reference events.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::apply::apply_new_records;
use super::dedup::find_new_records;
use super::matcher::ProximityMatcher;
use super::resolver::resolve;
use super::stats::{EventMerge, MergeStats};
use crate::config::MergeConfig;
use crate::error::{CatmergeError, CatmergeResult};
use crate::geodesy::DistanceMeasure;
use crate::types::{Catalog, Event, IdentityMode, PhaseFilter};

/// Algorithm options of a merge run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Origin time threshold in seconds (exclusive).
    pub max_time_delta_secs: f64,
    /// Epicentral distance threshold in km (exclusive).
    pub max_distance_km: f64,
    pub filter: PhaseFilter,
    pub identity_mode: IdentityMode,
    /// Run conflict resolution on every merged event.
    pub prefer_higher_weight: bool,
}

impl MergeOptions {
    /// Options with the given thresholds, every phase allowed and no
    /// conflict resolution.
    pub fn new(max_time_delta_secs: f64, max_distance_km: f64) -> Self {
        Self {
            max_time_delta_secs,
            max_distance_km,
            filter: PhaseFilter::all(),
            identity_mode: IdentityMode::default(),
            prefer_higher_weight: false,
        }
    }

    pub fn with_filter(mut self, filter: PhaseFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_identity_mode(mut self, mode: IdentityMode) -> Self {
        self.identity_mode = mode;
        self
    }

    pub fn with_higher_weight_preference(mut self, enabled: bool) -> Self {
        self.prefer_higher_weight = enabled;
        self
    }
}

/// Progress of a running merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeProgress {
    pub processed: usize,
    pub total: usize,
    pub common_events: usize,
}

/// Outcome of a merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Every reference event, in input order, enriched where matched.
    pub merged: Catalog,
    /// Only the matched reference events, as merged.
    pub common: Catalog,
    pub stats: MergeStats,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl MergeOutcome {
    /// Duration of the merge run.
    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}

/// Merges comparison picks into reference events.
#[derive(Debug)]
pub struct CatalogMerger {
    options: MergeOptions,
    matcher: ProximityMatcher,
}

impl CatalogMerger {
    /// Create a merger using `distance` for epicentral distances.
    pub fn new(options: MergeOptions, distance: Box<dyn DistanceMeasure>) -> Self {
        let matcher = ProximityMatcher::new(
            options.max_time_delta_secs,
            options.max_distance_km,
            distance,
        );
        Self { options, matcher }
    }

    /// Create a merger from a validated configuration.
    pub fn from_config(config: &MergeConfig) -> CatmergeResult<Self> {
        config.validate()?;
        Ok(Self::new(
            config.merge_options(),
            config.distance_method.measure(),
        ))
    }

    /// Get the options.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `reference` with the first matching event of `compared`.
    ///
    /// Fails with `MissingOrigin` when the reference event, or any comparison
    /// event scanned before a match, lacks a usable preferred origin.
    pub fn merge_event(
        &self,
        reference: &mut Event,
        compared: &Catalog,
    ) -> CatmergeResult<EventMerge> {
        let mut result = EventMerge::default();

        for (idx, candidate) in compared.iter().enumerate() {
            if !self.matcher.matches(reference, candidate)? {
                continue;
            }

            let new_records = find_new_records(
                &reference.picks,
                &candidate.picks,
                &self.options.filter,
                self.options.identity_mode,
            );
            result.matched = Some(idx);
            result.regarded = new_records.regarded;
            result.added = apply_new_records(reference, candidate, &new_records.indices);

            if self.options.prefer_higher_weight {
                result.pruned_picks = resolve(reference).removed_picks;
            }

            debug!(
                reference = %reference.resource_id,
                compared = %candidate.resource_id,
                new_p = result.added.p,
                new_s = result.added.s,
                new_amplitudes = result.added.amplitude,
                regarded = result.regarded,
                "Merged common event"
            );
            break;
        }

        Ok(result)
    }

    /// Merge every reference event. See [`CatalogMerger::merge_with_progress`].
    pub fn merge(
        &self,
        reference: Catalog,
        compared: &Catalog,
        cancel: &CancellationToken,
    ) -> CatmergeResult<MergeOutcome> {
        self.merge_with_progress(reference, compared, cancel, |_| {})
    }

    /// Merge every reference event, reporting progress after each one.
    ///
    /// The token is checked before each reference event; a cancelled run fails
    /// with `Cancelled` and produces no partial output.
    pub fn merge_with_progress<F>(
        &self,
        reference: Catalog,
        compared: &Catalog,
        cancel: &CancellationToken,
        mut progress: F,
    ) -> CatmergeResult<MergeOutcome>
    where
        F: FnMut(MergeProgress),
    {
        let started_at = Utc::now();
        let total = reference.len();
        let mut stats = MergeStats {
            compared_events: compared.len(),
            ..Default::default()
        };
        let mut merged = Catalog::new();
        let mut common = Catalog::new();

        info!(
            reference_events = total,
            compared_events = compared.len(),
            max_time_delta_secs = self.options.max_time_delta_secs,
            max_distance_km = self.options.max_distance_km,
            "Starting catalog merge"
        );

        for (processed, mut event) in reference.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(CatmergeError::Cancelled { processed });
            }

            let result = self.merge_event(&mut event, compared)?;
            stats.record(&result);
            if result.matched.is_some() {
                common.push(event.clone());
            }
            merged.push(event);

            progress(MergeProgress {
                processed: processed + 1,
                total,
                common_events: stats.common_events,
            });
        }

        info!(
            common_events = stats.common_events,
            new_p_phases = stats.new_p_phases,
            new_s_phases = stats.new_s_phases,
            new_amplitudes = stats.new_amplitudes,
            regarded_phases = stats.regarded_phases,
            "Catalog merge finished"
        );

        Ok(MergeOutcome {
            merged,
            common,
            stats,
            started_at,
            completed_at: Utc::now(),
        })
    }
}
