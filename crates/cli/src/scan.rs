use crate::progress::LogProgress;
use assetscope_core::host::MemoryHost;
use assetscope_core::{AssetGraphBuilder, ScanConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ScanArgs {
    pub manifest: PathBuf,
    pub assets: Vec<String>,
    pub config: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub output: Option<PathBuf>,
}

pub fn run(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let host = Arc::new(MemoryHost::load(&args.manifest)?);

    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }

    let paths = if args.assets.is_empty() {
        host.asset_paths()
    } else {
        args.assets
    };
    info!(
        "Scanning {} assets from {} with {} job(s)...",
        paths.len(),
        args.manifest.display(),
        config.jobs
    );

    let builder = AssetGraphBuilder::new(host, config)?;
    let mut records = Vec::new();
    let failures = builder.build(&paths, &LogProgress, |scanned| records = scanned);

    for failure in &failures {
        warn!("{}: {}", failure.path, failure.error);
    }

    let json = serde_json::to_string_pretty(&records)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Wrote {} records to {}", records.len(), path.display());
        }
        None => println!("{json}"),
    }

    if !failures.is_empty() {
        warn!("{} of {} assets were scanned partially", failures.len(), paths.len());
    }
    Ok(())
}
