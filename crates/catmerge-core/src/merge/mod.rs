//! Event matching and pick merging.
//!
//! Pipeline per reference event:
//! - [`matcher`]: find the first comparison event within the thresholds
//! - [`dedup`]: select the comparison picks the reference event lacks
//! - [`apply`]: donate them, with their arrivals and amplitudes
//! - [`resolver`]: optionally keep only the highest-weight pick per station/phase
//!
//! [`driver`] runs this over a whole catalog and accumulates [`MergeStats`].

pub mod apply;
pub mod dedup;
pub mod driver;
pub mod matcher;
pub mod resolver;
pub mod stats;

pub use apply::{apply_new_records, PhaseCounts};
pub use dedup::{find_new_records, NewRecords};
pub use driver::{CatalogMerger, MergeOptions, MergeOutcome, MergeProgress};
pub use matcher::{matches, origin_offset, OriginOffset, ProximityMatcher};
pub use resolver::{removal_set, resolve, ResolveReport};
pub use stats::{EventMerge, MergeStats};
