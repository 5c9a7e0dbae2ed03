//! Per-worker run orchestration.
//!
//! The run splits the requested event count into contiguous per-worker
//! slices and executes each slice on its own thread. Every worker owns its
//! `UserActions` value outright for the whole run; outcomes flow back over
//! a channel and are reported per worker, so one worker's failure never
//! aborts its siblings.

use crate::actions::{RunArtifacts, UserActions};
use crate::primary::PrimaryGenerator;
use crate::transport::Transport;
use crossbeam_channel::unbounded;
use geometry::Detector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::thread;
use types::{PartitionError, RunPartition, WorkerId};

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Total events across all workers.
    pub total_events: u64,
    /// Number of parallel workers.
    pub workers: usize,
    /// Base RNG seed; worker `i` uses `seed + i`.
    pub seed: u64,
    /// Per-worker completion reports on stderr.
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_events: 10_000,
            workers: 4,
            seed: 42,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Set the total event count.
    pub fn with_events(mut self, total: u64) -> Self {
        self.total_events = total;
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable per-worker reports.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Errors that abort the whole run before or outside the worker loops.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The partition parameters are unusable (e.g., zero workers).
    #[error("invalid run configuration: {0}")]
    Config(#[from] PartitionError),

    /// A worker thread died without reporting an outcome.
    #[error("worker thread panicked before reporting")]
    WorkerPanic,
}

/// One worker's result.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerOutcome {
    /// Worker identity.
    pub worker_id: WorkerId,
    /// Events the worker processed.
    pub events: u64,
    /// Artifacts from a successful `on_run_end`.
    pub artifacts: Option<RunArtifacts>,
    /// Error message if the worker's run failed.
    pub error: Option<String>,
}

impl WorkerOutcome {
    /// Whether the worker completed and flushed successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated run result, one outcome per worker in worker order.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Total events requested.
    pub total_events: u64,
    /// Per-worker outcomes.
    pub workers: Vec<WorkerOutcome>,
}

impl RunSummary {
    /// Number of workers whose run failed.
    pub fn failures(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_ok()).count()
    }

    /// Total hit rows written across workers.
    pub fn hit_rows(&self) -> u64 {
        self.workers
            .iter()
            .filter_map(|w| w.artifacts.as_ref())
            .map(|a| a.hit_rows)
            .sum()
    }

    /// Total event rows written across workers.
    pub fn event_rows(&self) -> u64 {
        self.workers
            .iter()
            .filter_map(|w| w.artifacts.as_ref())
            .map(|a| a.event_rows)
            .sum()
    }
}

/// Execute one worker's full lifecycle.
fn run_worker<A: UserActions>(
    partition: RunPartition,
    detector: &Detector,
    generator: &PrimaryGenerator,
    transport: &Transport,
    mut actions: A,
    seed: u64,
) -> WorkerOutcome {
    let worker_id = partition.worker_id();

    if let Err(e) = actions.on_run_start(&partition) {
        return WorkerOutcome {
            worker_id,
            events: 0,
            artifacts: None,
            error: Some(e.to_string()),
        };
    }

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(partition.worker_index as u64));
    let events = partition.slice_len();
    for _ in 0..events {
        actions.on_event_start();
        let primary = generator.sample(&mut rng);
        transport.trace(detector, &primary, &mut actions);
        actions.on_event_end(primary.summary());
    }

    match actions.on_run_end() {
        Ok(artifacts) => WorkerOutcome {
            worker_id,
            events,
            artifacts: Some(artifacts),
            error: None,
        },
        Err(e) => WorkerOutcome {
            worker_id,
            events,
            artifacts: None,
            error: Some(e.to_string()),
        },
    }
}

/// Run the full simulation: one thread per worker, each with its own
/// actions from `factory` and its own seeded RNG.
pub fn run<A, F>(
    config: &RunConfig,
    detector: &Detector,
    generator: &PrimaryGenerator,
    transport: &Transport,
    factory: F,
) -> Result<RunSummary, RunError>
where
    A: UserActions + Send,
    F: Fn(&RunPartition) -> A + Sync,
{
    // Validate every worker's partition before any thread starts.
    let partitions = (0..config.workers.max(1))
        .map(|i| RunPartition::new(config.total_events, config.workers, i))
        .collect::<Result<Vec<_>, _>>()?;

    let (tx, rx) = unbounded::<WorkerOutcome>();

    thread::scope(|scope| {
        for partition in &partitions {
            let tx = tx.clone();
            let factory = &factory;
            scope.spawn(move || {
                let actions = factory(partition);
                let outcome = run_worker(
                    *partition,
                    detector,
                    generator,
                    transport,
                    actions,
                    config.seed,
                );
                if config.verbose {
                    match &outcome.error {
                        None => eprintln!(
                            "[Run] {} finished {} events",
                            outcome.worker_id, outcome.events
                        ),
                        Some(e) => {
                            eprintln!("[Run] {} failed: {}", outcome.worker_id, e)
                        }
                    }
                }
                let _ = tx.send(outcome);
            });
        }
    });
    drop(tx);

    let mut workers: Vec<WorkerOutcome> = rx.iter().collect();
    if workers.len() != partitions.len() {
        return Err(RunError::WorkerPanic);
    }
    workers.sort_by_key(|w| w.worker_id.0);

    Ok(RunSummary {
        total_events: config.total_events,
        workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::NoOpActions;
    use crate::primary::PrimaryConfig;
    use geometry::GeometryConfig;

    fn fixtures() -> (Detector, PrimaryGenerator, Transport) {
        (
            Detector::build(&GeometryConfig::default()),
            PrimaryGenerator::new(PrimaryConfig::default()),
            Transport::default(),
        )
    }

    #[test]
    fn test_run_splits_events_across_workers() {
        let (detector, generator, transport) = fixtures();
        let config = RunConfig::default().with_events(10).with_workers(2);

        let summary = run(&config, &detector, &generator, &transport, |_| {
            NoOpActions::new()
        })
        .unwrap();

        assert_eq!(summary.workers.len(), 2);
        assert!(summary.workers.iter().all(|w| w.is_ok()));
        assert_eq!(summary.workers[0].events, 5);
        assert_eq!(summary.workers[1].events, 5);
    }

    #[test]
    fn test_run_remainder_goes_to_last_worker() {
        let (detector, generator, transport) = fixtures();
        let config = RunConfig::default().with_events(10).with_workers(3);

        let summary = run(&config, &detector, &generator, &transport, |_| {
            NoOpActions::new()
        })
        .unwrap();

        let events: Vec<u64> = summary.workers.iter().map(|w| w.events).collect();
        assert_eq!(events, vec![3, 3, 4]);
    }

    #[test]
    fn test_run_rejects_zero_workers() {
        let (detector, generator, transport) = fixtures();
        let config = RunConfig::default().with_events(10).with_workers(0);

        let err = run(&config, &detector, &generator, &transport, |_| {
            NoOpActions::new()
        })
        .unwrap_err();
        assert!(matches!(err, RunError::Config(PartitionError::NoWorkers)));
    }
}
