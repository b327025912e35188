//! Duplicate detection between a reference and a comparison pick list.
//!
//! A comparison pick is new when its identity string is absent from the
//! reference picks. Identities repeated inside the comparison list only count
//! once, at their first position.

use std::collections::HashSet;

use crate::types::{IdentityMode, PhaseFilter, Pick};

/// Comparison picks selected for merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecords {
    /// Indices into the comparison pick list, in list order.
    pub indices: Vec<usize>,
    /// Comparison picks not selected: already known, filtered out, or repeated.
    pub regarded: usize,
}

impl NewRecords {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Find the comparison picks that are new to the reference pick list.
pub fn find_new_records(
    reference: &[Pick],
    compared: &[Pick],
    filter: &PhaseFilter,
    mode: IdentityMode,
) -> NewRecords {
    let known: HashSet<String> = reference.iter().map(|p| p.identity(mode)).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(compared.len());
    let mut indices = Vec::new();

    for (idx, pick) in compared.iter().enumerate() {
        if !filter.allows(&pick.phase_hint) {
            continue;
        }
        let identity = pick.identity(mode);
        if known.contains(&identity) {
            continue;
        }
        if seen.insert(identity) {
            indices.push(idx);
        }
    }

    NewRecords {
        regarded: compared.len() - indices.len(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(id: &str, station: &str, phase: &str, weight: &str) -> Pick {
        Pick::new(id, station, phase).with_weight(weight)
    }

    #[test]
    fn test_no_overlap_keeps_everything_in_order() {
        let reference = vec![pick("r1", "STA1", "P", "0")];
        let compared = vec![
            pick("c1", "STA3", "S", "0"),
            pick("c2", "STA2", "P", "0"),
            pick("c3", "STA4", "AML", "0"),
        ];
        let found = find_new_records(
            &reference,
            &compared,
            &PhaseFilter::all(),
            IdentityMode::StationPhaseWeight,
        );
        assert_eq!(found.indices, vec![0, 1, 2]);
        assert_eq!(found.regarded, 0);
    }

    #[test]
    fn test_known_identity_is_regarded() {
        let reference = vec![pick("r1", "STA1", "P", "1")];
        let compared = vec![pick("c1", "STA1", "P", "1"), pick("c2", "STA2", "S", "0")];
        let found = find_new_records(
            &reference,
            &compared,
            &PhaseFilter::all(),
            IdentityMode::StationPhaseWeight,
        );
        assert_eq!(found.indices, vec![1]);
        assert_eq!(found.regarded, 1);
    }

    #[test]
    fn test_weight_changes_identity_only_in_weight_mode() {
        let reference = vec![pick("r1", "STA1", "P", "1")];
        let compared = vec![pick("c1", "STA1", "P", "2")];

        let weighted = find_new_records(
            &reference,
            &compared,
            &PhaseFilter::all(),
            IdentityMode::StationPhaseWeight,
        );
        assert_eq!(weighted.indices, vec![0]);

        let plain = find_new_records(
            &reference,
            &compared,
            &PhaseFilter::all(),
            IdentityMode::StationPhase,
        );
        assert!(plain.is_empty());
        assert_eq!(plain.regarded, 1);
    }

    #[test]
    fn test_filtered_picks_are_regarded() {
        let compared = vec![
            pick("c1", "STA1", "P", "0"),
            pick("c2", "STA1", "S", "0"),
            pick("c3", "STA1", "IAML", "0"),
            pick("c4", "STA1", "Lg", "0"),
        ];
        let filter = PhaseFilter {
            add_p: true,
            add_s: false,
            add_amplitude: false,
        };
        let found = find_new_records(&[], &compared, &filter, IdentityMode::StationPhaseWeight);
        assert_eq!(found.indices, vec![0, 3]);
        assert_eq!(found.regarded, 2);
    }

    #[test]
    fn test_repeated_comparison_identity_counts_once() {
        let compared = vec![
            pick("c1", "STA1", "P", "0"),
            pick("c2", "STA2", "P", "0"),
            pick("c3", "STA1", "P", "0"),
        ];
        let found = find_new_records(
            &[],
            &compared,
            &PhaseFilter::all(),
            IdentityMode::StationPhaseWeight,
        );
        assert_eq!(found.indices, vec![0, 1]);
        assert_eq!(found.regarded, 1);
    }

    #[test]
    fn test_self_comparison_is_idempotent() {
        let picks = vec![
            pick("p1", "STA1", "P", "0"),
            pick("p2", "STA1", "S", "2"),
            pick("p3", "STA2", "P", "1"),
        ];
        for mode in [IdentityMode::StationPhase, IdentityMode::StationPhaseWeight] {
            let found = find_new_records(&picks, &picks, &PhaseFilter::all(), mode);
            assert!(found.is_empty());
            assert_eq!(found.regarded, picks.len());
        }
    }
}
