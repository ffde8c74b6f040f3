//! Command-line driver comparing the three discretizations.
//!
//! ```bash
//! # run the default 2024-point setup and report dispersion against the exact solution
//! psfd-wave run
//!
//! # custom setup, keep every snapshot as JSON
//! psfd-wave run --config air.toml --snapshots frames.json
//!
//! # print the default configuration
//! psfd-wave config > air.toml
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use psfd_wave::analysis::{green_reference, max_abs, relative_misfit};
use psfd_wave::{Config, Observer, Snapshot, SnapshotRecorder};

/// Pseudospectral vs finite-difference 1D acoustic wave solver
#[derive(Parser)]
#[command(name = "psfd-wave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation and compare the methods
    Run {
        /// TOML configuration (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write every snapshot to this JSON file
        #[arg(short, long)]
        snapshots: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    Config,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run(config_path: Option<PathBuf>, snapshots_path: Option<PathBuf>) -> Result<()> {
    let config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    let mut sim = config.build_simulation().context("invalid simulation setup")?;

    let nt = sim.params().nt;
    let mut recorder = snapshots_path.as_ref().map(|_| SnapshotRecorder::new());
    sim.run_with(|snap: &Snapshot<'_>| {
        if let Some(rec) = recorder.as_mut() {
            rec.observe(snap);
        }
        let peak = snap
            .fields
            .iter()
            .map(|(_, f)| max_abs(f.view()))
            .fold(0., f64::max);
        info!("step {}/{} (t={:.4}s) max |p| = {:.3e}", snap.step, nt, snap.time, peak);
    });

    let reference = green_reference(
        sim.grid(),
        sim.source(),
        sim.params().velocity,
        sim.params().dt,
        sim.current_step(),
    );
    println!("{:<10} {:>14} {:>14}", "method", "max |p|", "misfit");
    for method in sim.methods() {
        if let Some(p) = sim.propagator(method) {
            println!(
                "{:<10} {:>14.6e} {:>14.6}",
                method.to_string(),
                max_abs(p.current()),
                relative_misfit(p.current(), reference.view())
            );
        }
    }

    if let (Some(path), Some(rec)) = (snapshots_path, recorder) {
        let file = File::create(&path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &rec.snapshots)
            .with_context(|| format!("failed to write snapshots to '{}'", path.display()))?;
        info!("{} snapshots written to {}", rec.snapshots.len(), path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run { config, snapshots } => run(config, snapshots),
        Commands::Config => Config::default()
            .to_toml_string()
            .map(|text| print!("{}", text))
            .map_err(anyhow::Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
