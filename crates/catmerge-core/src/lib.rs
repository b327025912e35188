//! catmerge-core - Core library for catmerge.
//!
//! This crate provides the event model, configuration, and the merge algorithm
//! that folds phase picks of a comparison seismic catalog into the matching
//! events of a reference catalog.
//!
//! # Example
//!
//! ```ignore
//! use catmerge_core::{CatalogMerger, MergeConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = MergeConfig::from_file("config.json")?;
//! let merger = CatalogMerger::from_config(&config)?;
//!
//! let outcome = merger.merge(reference, &compared, &CancellationToken::new())?;
//! println!("{} common events", outcome.stats.common_events);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod geodesy;
pub mod merge;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::MergeConfig;
pub use error::{CatmergeError, CatmergeResult, ErrorCode};
pub use geodesy::{DistanceMeasure, DistanceMethod, Haversine, Wgs84Geodesic};
pub use merge::{CatalogMerger, MergeOptions, MergeOutcome, MergeProgress, MergeStats};
pub use report::MergeSummary;
pub use types::{
    Amplitude, Arrival, Catalog, Event, IdentityMode, Origin, PhaseCategory, PhaseFilter, Pick,
    ResourceId, WaveformStreamId, Weight,
};
