//! Catalog reading and writing.
//!
//! # Example
//!
//! ```ignore
//! use catmerge_core::catalog::{read_catalog_file, write_catalog_file};
//!
//! let (catalog, stats) = read_catalog_file("cat1.jsonl").await?;
//! println!("Loaded {} events", stats.loaded);
//! write_catalog_file(&catalog, "copy.jsonl").await?;
//! ```

pub mod jsonl;

pub use jsonl::{
    read_catalog_file, read_catalog_jsonl, write_catalog_file, write_catalog_jsonl,
    CatalogReadStats, CatalogWriteStats,
};
