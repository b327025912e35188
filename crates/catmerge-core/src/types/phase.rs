//! Phase categories, phase filtering and pick identity modes.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Category a phase hint falls into for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum PhaseCategory {
    #[strum(serialize = "P")]
    P,
    #[strum(serialize = "S")]
    S,
    #[strum(serialize = "amplitude")]
    Amplitude,
}

impl PhaseCategory {
    /// Classify a phase hint.
    ///
    /// Checked in order: a hint containing "P" is a P phase, then "S", then
    /// "AML". Anything else has no category.
    pub fn classify(phase_hint: &str) -> Option<Self> {
        if phase_hint.contains('P') {
            Some(Self::P)
        } else if phase_hint.contains('S') {
            Some(Self::S)
        } else if phase_hint.contains("AML") {
            Some(Self::Amplitude)
        } else {
            None
        }
    }
}

/// Which comparison picks may be donated to a reference event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseFilter {
    pub add_p: bool,
    pub add_s: bool,
    pub add_amplitude: bool,
}

impl Default for PhaseFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl PhaseFilter {
    /// Accept every phase.
    pub fn all() -> Self {
        Self {
            add_p: true,
            add_s: true,
            add_amplitude: true,
        }
    }

    /// Whether a phase hint passes the filter. Hints with no category always pass.
    pub fn allows(&self, phase_hint: &str) -> bool {
        match PhaseCategory::classify(phase_hint) {
            Some(PhaseCategory::P) => self.add_p,
            Some(PhaseCategory::S) => self.add_s,
            Some(PhaseCategory::Amplitude) => self.add_amplitude,
            None => true,
        }
    }
}

/// How pick identity strings are built for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdentityMode {
    /// Any weight of a known station/phase is a duplicate.
    StationPhase,
    /// A different weight makes the pick new.
    #[default]
    StationPhaseWeight,
}
