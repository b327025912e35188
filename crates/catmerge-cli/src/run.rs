//! Load both catalogs, merge them on a blocking task, write the outputs.

use std::path::Path;

use anyhow::{bail, Context, Result};
use catmerge_core::catalog::{read_catalog_file, write_catalog_file};
use catmerge_core::{Catalog, CatalogMerger, MergeConfig, MergeSummary};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::progress::merge_bar;

pub async fn run(
    config: &MergeConfig,
    show_progress: bool,
    cancel: CancellationToken,
) -> Result<MergeSummary> {
    let reference = load_catalog(&config.reference_catalog_file_name).await?;
    let compared = load_catalog(&config.compared_catalog_file_name).await?;
    let merger = CatalogMerger::from_config(config)?;

    let bar = merge_bar(reference.len(), show_progress);
    let outcome = tokio::task::spawn_blocking({
        let bar = bar.clone();
        move || {
            merger.merge_with_progress(reference, &compared, &cancel, |progress| {
                bar.set_position(progress.processed as u64);
                bar.set_message(format!("{} common", progress.common_events));
            })
        }
    })
    .await
    .context("merge task failed")??;
    bar.finish_and_clear();

    store_catalog(&outcome.merged, &config.updated_catalog_file_name).await?;
    if config.output_common_events_catalog {
        store_catalog(&outcome.common, &config.common_events_catalog_file_name).await?;
    }

    let duration_ms = outcome.duration_ms();
    let summary = MergeSummary::new(outcome.stats, config);
    ensure_parent(&config.summary_file_name).await?;
    tokio::fs::write(&config.summary_file_name, summary.to_string())
        .await
        .with_context(|| format!("failed to write {}", config.summary_file_name.display()))?;

    info!(
        duration_ms,
        common_events = summary.stats.common_events,
        summary = %config.summary_file_name.display(),
        "Merge complete"
    );
    Ok(summary)
}

/// Read a catalog, refusing one with malformed lines.
async fn load_catalog(path: &Path) -> Result<Catalog> {
    let (catalog, stats) = read_catalog_file(path)
        .await
        .with_context(|| format!("failed to read catalog {}", path.display()))?;

    for error in &stats.errors {
        warn!(path = %path.display(), "{}", error);
    }
    if !stats.is_success() {
        bail!(
            "{} has {} malformed line(s), not merging",
            path.display(),
            stats.errors.len()
        );
    }

    info!(path = %path.display(), events = stats.loaded, "Loaded catalog");
    Ok(catalog)
}

async fn store_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    ensure_parent(path).await?;
    let stats = write_catalog_file(catalog, path)
        .await
        .with_context(|| format!("failed to write catalog {}", path.display()))?;
    info!(path = %path.display(), events = stats.written, bytes = stats.bytes, "Wrote catalog");
    Ok(())
}

async fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display())),
        _ => Ok(()),
    }
}
