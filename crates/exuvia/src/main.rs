use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exuvia::{Config, Snapshot, emit_stub_tree};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "exuvia",
    version,
    about = "Generate a documentation-safe stub tree from a Python module graph"
)]
struct Cli {
    /// Output base directory for the stub tree
    output_dir: PathBuf,

    /// Module-graph snapshot exported from the live process (JSON)
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Emission config (TOML); defaults are derived from the snapshot's
    /// root package when omitted
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let snapshot = Snapshot::from_file(&cli.snapshot)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => {
            let root = snapshot
                .infer_root_package()
                .context("snapshot contains no top-level module; pass --config instead")?;
            Config::for_package(root)
        }
    };

    let graph = snapshot.into_graph()?;
    emit_stub_tree(&graph, &config, &cli.output_dir)?;
    Ok(())
}
