//! Central configuration for the telescope simulation binary.
//!
//! All tunable parameters live here; the CLI only overrides fields.

use geometry::GeometryConfig;
use serde::Serialize;
use simulation::{PrimaryConfig, TransportConfig};
use std::path::PathBuf;

/// Master configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Total events across all workers.
    pub total_events: u64,
    /// Number of parallel workers.
    pub workers: usize,
    /// Base RNG seed.
    pub seed: u64,
    /// Root directory for the output tables.
    pub output_prefix: PathBuf,
    /// Primary beam parameters.
    pub beam: PrimaryConfig,
    /// Geometry parameters.
    pub geometry: GeometryConfig,
    /// Transport stepping parameters.
    pub transport: TransportConfig,
    /// Per-worker progress reports.
    pub verbose: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_events: 10_000,
            workers: 4,
            seed: 42,
            output_prefix: PathBuf::from("data"),
            beam: PrimaryConfig::default(),
            geometry: GeometryConfig::default(),
            transport: TransportConfig::default(),
            verbose: false,
        }
    }
}

impl SimConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total event count.
    pub fn events(mut self, total: u64) -> Self {
        self.total_events = total;
        self
    }

    /// Set the worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the output root directory.
    pub fn output(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Set the mean beam energy (MeV).
    pub fn beam_energy(mut self, e: f64) -> Self {
        self.beam.mean_energy = e;
        self
    }

    /// Events each worker handles under floor division.
    pub fn events_per_worker(&self) -> u64 {
        if self.workers == 0 {
            0
        } else {
            self.total_events / self.workers as u64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl SimConfig {
    /// Quick demo: few events, chatty.
    pub fn demo() -> Self {
        let mut config = Self::default().events(1_000);
        config.verbose = true;
        config
    }

    /// Production-sized statistics run.
    pub fn high_statistics() -> Self {
        Self::default().events(1_000_000).workers(8)
    }
}
