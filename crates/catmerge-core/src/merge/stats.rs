//! Counters accumulated over a merge run.

use std::ops::AddAssign;

use super::apply::PhaseCounts;

/// Result of merging one reference event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMerge {
    /// Index of the matched comparison event, if any.
    pub matched: Option<usize>,
    /// Donated picks per phase category.
    pub added: PhaseCounts,
    /// Comparison picks recognised as present, filtered or repeated.
    pub regarded: usize,
    /// Picks dropped by conflict resolution.
    pub pruned_picks: usize,
}

/// Counters of a merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Reference events processed.
    pub reference_events: usize,
    /// Events of the comparison catalog. The same for every event of a run, so
    /// combining stats takes the larger value instead of summing.
    pub compared_events: usize,
    /// Reference events that found a matching comparison event.
    pub common_events: usize,
    pub new_p_phases: usize,
    pub new_s_phases: usize,
    pub new_amplitudes: usize,
    /// Comparison picks not merged.
    pub regarded_phases: usize,
    /// Picks removed by the higher-weight preference.
    pub pruned_picks: usize,
}

impl MergeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reference event's result into the totals.
    pub fn record(&mut self, merge: &EventMerge) {
        self.reference_events += 1;
        if merge.matched.is_some() {
            self.common_events += 1;
        }
        self.new_p_phases += merge.added.p;
        self.new_s_phases += merge.added.s;
        self.new_amplitudes += merge.added.amplitude;
        self.regarded_phases += merge.regarded;
        self.pruned_picks += merge.pruned_picks;
    }

    /// Total number of donated picks that were counted.
    pub fn new_phases(&self) -> usize {
        self.new_p_phases + self.new_s_phases + self.new_amplitudes
    }
}

impl AddAssign for MergeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.reference_events += rhs.reference_events;
        self.compared_events = self.compared_events.max(rhs.compared_events);
        self.common_events += rhs.common_events;
        self.new_p_phases += rhs.new_p_phases;
        self.new_s_phases += rhs.new_s_phases;
        self.new_amplitudes += rhs.new_amplitudes;
        self.regarded_phases += rhs.regarded_phases;
        self.pruned_picks += rhs.pruned_picks;
    }
}
