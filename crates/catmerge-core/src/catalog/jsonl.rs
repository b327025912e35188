//! JSON Lines catalog format.
//!
//! Each non-empty line holds one JSON-encoded [`Event`]. Reading records
//! malformed lines instead of aborting, so a caller can report every bad line at
//! once; writing stops at the first I/O failure.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::error::{CatmergeError, CatmergeResult};
use crate::types::{Catalog, Event};

/// Statistics from reading a catalog.
#[derive(Debug, Default, Clone)]
pub struct CatalogReadStats {
    /// Non-empty lines processed.
    pub total: u64,
    /// Events decoded.
    pub loaded: u64,
    /// Error messages for lines that could not be decoded.
    pub errors: Vec<String>,
}

impl CatalogReadStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every line decoded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Statistics from writing a catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogWriteStats {
    /// Events written.
    pub written: u64,
    /// Bytes written, newlines included.
    pub bytes: u64,
}

/// Read a catalog from JSON Lines.
///
/// Blank lines are skipped. A line that does not decode as an event is recorded
/// in the returned stats with its 1-based line number.
pub async fn read_catalog_jsonl<R>(reader: R) -> CatmergeResult<(Catalog, CatalogReadStats)>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = CatalogReadStats::new();
    let mut catalog = Catalog::new();
    let mut lines = reader.lines();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        stats.total += 1;
        match serde_json::from_str::<Event>(line) {
            Ok(event) => {
                catalog.push(event);
                stats.loaded += 1;
            }
            Err(e) => {
                stats
                    .errors
                    .push(CatmergeError::catalog_line(line_no, e.to_string()).to_string());
            }
        }
    }

    Ok((catalog, stats))
}

/// Write a catalog as JSON Lines.
pub async fn write_catalog_jsonl<W>(
    catalog: &Catalog,
    writer: W,
) -> CatmergeResult<CatalogWriteStats>
where
    W: AsyncWrite + Unpin,
{
    let mut stats = CatalogWriteStats::default();
    let mut writer = BufWriter::new(writer);

    for event in catalog {
        let json = serde_json::to_string(event)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        stats.written += 1;
        stats.bytes += json.len() as u64 + 1;
    }

    writer.flush().await?;
    Ok(stats)
}

/// Read a JSON Lines catalog file.
pub async fn read_catalog_file(
    path: impl AsRef<Path>,
) -> CatmergeResult<(Catalog, CatalogReadStats)> {
    let file = File::open(path.as_ref()).await?;
    read_catalog_jsonl(BufReader::new(file)).await
}

/// Write a JSON Lines catalog file, replacing any existing file.
pub async fn write_catalog_file(
    catalog: &Catalog,
    path: impl AsRef<Path>,
) -> CatmergeResult<CatalogWriteStats> {
    let file = File::create(path.as_ref()).await?;
    write_catalog_jsonl(catalog, file).await
}
