//! Conflict resolution between picks sharing a station and phase.
//!
//! Every pair of distinct picks with the same (station, phase) is compared; a
//! pick is marked for removal when another pick of that key carries a strictly
//! greater weight. Equal weights never remove anything, so equal-weight
//! duplicates all survive.
//!
//! The removal set is computed before anything is dropped. Picks, arrivals and
//! amplitudes are then each retained in a single filtering pass.

use std::collections::HashSet;

use crate::types::{Event, ResourceId};

/// What a resolve pass removed from an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub removed_picks: usize,
    pub removed_arrivals: usize,
    pub removed_amplitudes: usize,
}

impl ResolveReport {
    pub fn is_empty(&self) -> bool {
        self.removed_picks == 0 && self.removed_arrivals == 0 && self.removed_amplitudes == 0
    }
}

/// Positions in `event.picks` that lose to a higher-weight pick of the same
/// station and phase.
///
/// Positions rather than ids: two catalogs written with local sequential ids can
/// donate a pick whose id collides with a reference pick.
pub fn removal_set(event: &Event) -> HashSet<usize> {
    let ranked: Vec<((&str, &str), f64)> = event
        .picks
        .iter()
        .map(|p| (p.station_phase(), p.weight_rank()))
        .collect();

    let mut marked = HashSet::new();
    for (i, (trial_key, trial_weight)) in ranked.iter().enumerate() {
        for (j, (candidate_key, candidate_weight)) in ranked.iter().enumerate() {
            if i != j && trial_key == candidate_key && candidate_weight > trial_weight {
                marked.insert(i);
                break;
            }
        }
    }
    marked
}

/// Keep only the highest-weight picks per (station, phase) in `event`.
///
/// An arrival or amplitude is dropped only when no surviving pick still
/// carries the id it references.
pub fn resolve(event: &mut Event) -> ResolveReport {
    let marked = removal_set(event);
    if marked.is_empty() {
        return ResolveReport::default();
    }

    let picks_before = event.picks.len();
    let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut event.picks)
        .into_iter()
        .enumerate()
        .partition(|(idx, _)| !marked.contains(idx));
    event.picks = kept.into_iter().map(|(_, pick)| pick).collect();

    let surviving: HashSet<&ResourceId> = event.picks.iter().map(|p| &p.resource_id).collect();
    let orphaned: HashSet<ResourceId> = removed
        .into_iter()
        .map(|(_, pick)| pick.resource_id)
        .filter(|id| !surviving.contains(id))
        .collect();

    let mut removed_arrivals = 0;
    if let Some(origin) = event.preferred_origin.as_mut() {
        let before = origin.arrivals.len();
        origin.arrivals.retain(|a| !orphaned.contains(&a.pick_id));
        removed_arrivals = before - origin.arrivals.len();
    }

    let amplitudes_before = event.amplitudes.len();
    event
        .amplitudes
        .retain(|a| a.pick_id.as_ref().map_or(true, |id| !orphaned.contains(id)));

    let report = ResolveReport {
        removed_picks: picks_before - event.picks.len(),
        removed_arrivals,
        removed_amplitudes: amplitudes_before - event.amplitudes.len(),
    };
    tracing::debug!(
        event = %event.resource_id,
        removed_picks = report.removed_picks,
        removed_arrivals = report.removed_arrivals,
        removed_amplitudes = report.removed_amplitudes,
        "Resolved conflicting picks"
    );
    report
}
