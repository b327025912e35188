//! Core types for catmerge.

pub mod catalog;
pub mod event;
pub mod phase;
pub mod pick;

pub use catalog::Catalog;
pub use event::{Amplitude, Arrival, Event, Hypocenter, Origin, ResourceId};
pub use phase::{IdentityMode, PhaseCategory, PhaseFilter};
pub use pick::{Pick, WaveformStreamId, Weight, WeightQuantity, DEFAULT_WEIGHT};
