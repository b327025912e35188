//! catmerge - merge phase picks between two seismic catalogs.

mod progress;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use catmerge_core::MergeConfig;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "catmerge")]
#[command(about = "Merge phase picks of matching events from a comparison catalog into a reference catalog", long_about = None)]
struct Cli {
    /// Merge configuration file (.json, .toml or .yaml)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Reference catalog, overrides ReferenceCatalogFileName
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Comparison catalog, overrides ComparedCatalogFileName
    #[arg(long)]
    compared: Option<PathBuf>,

    /// Directory for relative output file names
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Config file, then `CATMERGE_*` variables, then command-line flags.
    fn load_config(&self) -> Result<MergeConfig> {
        let mut config = MergeConfig::from_file(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?
            .with_env_overrides()
            .context("invalid CATMERGE_* environment override")?;

        if let Some(path) = &self.reference {
            config.reference_catalog_file_name = path.clone();
        }
        if let Some(path) = &self.compared {
            config.compared_catalog_file_name = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Cancel `token` on Ctrl+C.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling merge");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for the summary
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let summary = run::run(&config, !cli.no_progress, cancel).await?;
    print!("{summary}");
    Ok(())
}
