//! Donating comparison picks, with their arrivals and amplitudes, to a
//! reference event.

use std::ops::AddAssign;

use crate::types::{Event, Origin, PhaseCategory};

/// Number of donated picks per phase category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    pub p: usize,
    pub s: usize,
    pub amplitude: usize,
}

impl PhaseCounts {
    pub fn total(&self) -> usize {
        self.p + self.s + self.amplitude
    }

    fn count(&mut self, category: Option<PhaseCategory>) {
        match category {
            Some(PhaseCategory::P) => self.p += 1,
            Some(PhaseCategory::S) => self.s += 1,
            Some(PhaseCategory::Amplitude) => self.amplitude += 1,
            None => {}
        }
    }
}

impl AddAssign for PhaseCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.p += rhs.p;
        self.s += rhs.s;
        self.amplitude += rhs.amplitude;
    }
}

/// Append the comparison picks at `indices` to `reference`.
///
/// Every comparison arrival and amplitude referencing a donated pick travels
/// with it. The comparison event is only read.
pub fn apply_new_records(
    reference: &mut Event,
    compared: &Event,
    indices: &[usize],
) -> PhaseCounts {
    let mut counts = PhaseCounts::default();

    for &idx in indices {
        let Some(pick) = compared.picks.get(idx) else {
            continue;
        };

        let arrivals = compared
            .arrivals()
            .iter()
            .filter(|a| a.pick_id == pick.resource_id)
            .cloned();
        reference
            .preferred_origin
            .get_or_insert_with(Origin::default)
            .arrivals
            .extend(arrivals);

        let amplitudes = compared
            .amplitudes
            .iter()
            .filter(|a| a.references(&pick.resource_id))
            .cloned();
        reference.amplitudes.extend(amplitudes);

        reference.picks.push(pick.clone());
        counts.count(pick.category());
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Amplitude, Arrival, Pick};
    use chrono::{TimeZone, Utc};

    fn reference() -> Event {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        Event::new("ref")
            .with_origin(Origin::new(t0, 10.0, 20.0))
            .with_pick(Pick::new("r1", "STA1", "P"))
            .with_arrival(Arrival::new("ra1", "r1"))
    }

    fn compared() -> Event {
        Event::new("com")
            .with_pick(Pick::new("c1", "STA2", "Pn"))
            .with_pick(Pick::new("c2", "STA2", "Sn"))
            .with_pick(Pick::new("c3", "STA2", "IAML"))
            .with_pick(Pick::new("c4", "STA3", "Lg"))
            .with_arrival(Arrival::new("ca1", "c1"))
            .with_arrival(Arrival::new("ca2", "c2"))
            .with_arrival(Arrival::new("ca2b", "c2"))
            .with_amplitude(Amplitude::new("amp3", "c3").with_value(1.5))
    }

    #[test]
    fn test_donates_picks_with_their_records() {
        let mut target = reference();
        let source = compared();
        let counts = apply_new_records(&mut target, &source, &[1, 2]);

        assert_eq!(counts, PhaseCounts { p: 0, s: 1, amplitude: 1 });
        let ids: Vec<&str> = target.picks.iter().map(|p| p.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "c2", "c3"]);
        let arrivals: Vec<&str> = target
            .arrivals()
            .iter()
            .map(|a| a.resource_id.as_str())
            .collect();
        assert_eq!(arrivals, vec!["ra1", "ca2", "ca2b"]);
        assert_eq!(target.amplitudes.len(), 1);
        assert!(target.dangling_references().is_empty());

        // Comparison side is untouched.
        assert_eq!(source, compared());
    }

    #[test]
    fn test_uncategorized_phase_is_added_but_not_counted() {
        let mut target = reference();
        let counts = apply_new_records(&mut target, &compared(), &[0, 3]);
        assert_eq!(counts, PhaseCounts { p: 1, s: 0, amplitude: 0 });
        assert_eq!(counts.total(), 1);
        assert_eq!(target.picks.len(), 3);
    }

    #[test]
    fn test_empty_indices_change_nothing() {
        let mut target = reference();
        let counts = apply_new_records(&mut target, &compared(), &[]);
        assert_eq!(counts, PhaseCounts::default());
        assert_eq!(target, reference());
    }
}
