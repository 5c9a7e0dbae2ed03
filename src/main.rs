//! Telescope simulation - main binary.
//!
//! Builds the detector geometry once, then runs the requested event count
//! across parallel workers. Each worker owns a recording pipeline that
//! accumulates per-event channel deposits and writes a Parquet file pair
//! at end of run:
//!
//! ```text
//! <output>/eDep/workerN.parquet      per-hit table
//! <output>/evtInfo/worker_N.parquet  per-event table
//! <output>/run_manifest.json         effective config + row counts
//! ```

mod config;

use clap::Parser;
use geometry::Detector;
use recorder::{RecorderConfig, RecordingActions};
use serde::Serialize;
use simulation::{PrimaryGenerator, RunConfig, RunSummary, Transport};
use std::path::PathBuf;

pub use config::SimConfig;

/// Telescope simulation - batch Monte Carlo with Parquet output
#[derive(Parser, Debug)]
#[command(name = "telescope-sim")]
#[command(about = "Silicon-strip telescope simulation with per-worker Parquet output")]
#[command(version)]
struct Args {
    /// Total events to simulate
    #[arg(long, env = "SIM_EVENTS")]
    events: Option<u64>,

    /// Number of parallel workers
    #[arg(long, env = "SIM_WORKERS")]
    workers: Option<usize>,

    /// Base RNG seed
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Output directory for the tables
    #[arg(long, env = "SIM_OUTPUT")]
    output: Option<PathBuf>,

    /// Mean beam energy in MeV
    #[arg(long, env = "SIM_BEAM_ENERGY")]
    beam_energy: Option<f64>,

    /// Gaussian beam energy spread in MeV
    #[arg(long, env = "SIM_BEAM_SIGMA")]
    beam_sigma: Option<f64>,

    /// Per-worker progress reports
    #[arg(long, env = "SIM_VERBOSE")]
    verbose: bool,

    /// Use the quick demo preset as the baseline
    #[arg(long)]
    demo: bool,
}

/// Everything recorded about one run, dumped next to the tables.
#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    config: &'a SimConfig,
    summary: &'a RunSummary,
}

fn build_config(args: &Args) -> SimConfig {
    let mut config = if args.demo {
        SimConfig::demo()
    } else {
        SimConfig::default()
    };

    if let Some(events) = args.events {
        config.total_events = events;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(output) = &args.output {
        config.output_prefix = output.clone();
    }
    if let Some(e) = args.beam_energy {
        config.beam.mean_energy = e;
    }
    if let Some(sigma) = args.beam_sigma {
        config.beam.energy_sigma = sigma;
    }
    if args.verbose {
        config.verbose = true;
    }
    config
}

fn print_banner(config: &SimConfig) {
    eprintln!("╔════════════════════════════════════════════════════╗");
    eprintln!("║  Telescope Simulation                              ║");
    eprintln!("╠════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Events: {:9}  │  Workers: {:2}                   ║",
        config.total_events, config.workers
    );
    eprintln!(
        "║  Beam:   {:6.1} MeV │  sigma: {:5.2} MeV            ║",
        config.beam.mean_energy, config.beam.energy_sigma
    );
    eprintln!(
        "║  Output: {:40} ║",
        config.output_prefix.display().to_string()
    );
    eprintln!("╚════════════════════════════════════════════════════╝");
}

fn print_final_report(summary: &RunSummary) {
    eprintln!();
    eprintln!("----------------------End of Run----------------------");
    for outcome in &summary.workers {
        match (&outcome.artifacts, &outcome.error) {
            (Some(artifacts), _) => eprintln!(
                " {}: {} events, {} hit rows, {} event rows",
                outcome.worker_id, artifacts.events, artifacts.hit_rows, artifacts.event_rows
            ),
            (None, Some(error)) => {
                eprintln!(" {}: FAILED: {}", outcome.worker_id, error)
            }
            (None, None) => eprintln!(" {}: no output", outcome.worker_id),
        }
    }
    eprintln!(
        " Total: {} hit rows, {} event rows",
        summary.hit_rows(),
        summary.event_rows()
    );
}

fn write_manifest(config: &SimConfig, summary: &RunSummary) -> std::io::Result<()> {
    let manifest = RunManifest { config, summary };
    let path = config.output_prefix.join("run_manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(&path, json)?;
    eprintln!(" Manifest: {}", path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    let config = build_config(&args);

    print_banner(&config);

    let detector = Detector::build(&config.geometry);
    let generator = PrimaryGenerator::new(config.beam);
    let transport = Transport::new(config.transport);

    let run_config = RunConfig::default()
        .with_events(config.total_events)
        .with_workers(config.workers)
        .with_seed(config.seed)
        .with_verbose(config.verbose);

    let output_prefix = config.output_prefix.clone();
    let result = simulation::run(&run_config, &detector, &generator, &transport, |_| {
        RecordingActions::new(RecorderConfig::new(&output_prefix))
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("[Main] run aborted: {}", e);
            std::process::exit(2);
        }
    };

    print_final_report(&summary);

    // No events recorded means no output directory; skip the manifest too.
    if summary.event_rows() > 0 {
        if let Err(e) = write_manifest(&config, &summary) {
            eprintln!("[Main] failed to write manifest: {}", e);
        }
    }

    if summary.failures() > 0 {
        eprintln!("[Main] {} worker(s) failed", summary.failures());
        std::process::exit(1);
    }
}
