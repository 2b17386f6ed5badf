mod lookup;
mod progress;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "assetscope",
    version,
    about = "Extracts the asset reference graph of a content tree",
    long_about = "Assetscope walks every asset of a content tree (structures, scenes, state machines \
                  and plain data objects) and records, for each one, the canonical ids of the assets \
                  it references."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan assets described by a content manifest
    #[command(
        long_about = "Loads a JSON content manifest, scans the given asset paths (all manifest assets \
                      by default) and writes one record per path, in input order, as JSON."
    )]
    Scan {
        /// Content manifest describing kinds, assets, objects and scenes
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Asset paths to scan, in order
        #[arg(value_name = "ASSET_PATH")]
        assets: Vec<String>,
        /// JSON scan configuration (ignore rules, script bases, suffixes)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Number of assets scanned in parallel
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
        /// Write records here instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List the assets referencing ID
    Dependents {
        /// Records written by `scan`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List the assets ID references
    Dependencies {
        /// Records written by `scan`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = assetscope_core::logging::init_logging("cli", true);

    match cli.command {
        Commands::Scan {
            manifest,
            assets,
            config,
            jobs,
            output,
        } => scan::run(scan::ScanArgs {
            manifest,
            assets,
            config,
            jobs,
            output,
        }),
        Commands::Dependents { records, id } => {
            lookup::run(&records, &id, lookup::Lookup::Dependents)
        }
        Commands::Dependencies { records, id } => {
            lookup::run(&records, &id, lookup::Lookup::Dependencies)
        }
    }
}
