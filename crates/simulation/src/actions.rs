//! User actions: the interface the transport host drives.
//!
//! An implementation owns all per-event and per-run bookkeeping for exactly
//! one worker. The host guarantees a strict call sequence per worker
//! (`on_run_start`, then repeated `on_event_start` / zero-or-more
//! `on_deposit` / `on_event_end` cycles, then `on_run_end`) and never
//! shares an implementation across workers, so implementations take
//! `&mut self` and need no interior locking.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use types::{ChannelKey, EventSummary, RunPartition};

/// What a worker's run produced, reported from `on_run_end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunArtifacts {
    /// Events processed by this worker.
    pub events: u64,
    /// Rows written to the hit table.
    pub hit_rows: u64,
    /// Rows written to the event table.
    pub event_rows: u64,
    /// Paths of the files written, empty for a zero-event run.
    pub files: Vec<String>,
}

/// Per-worker lifecycle callbacks invoked by the transport host.
pub trait UserActions {
    /// Failure type for the fallible run boundaries.
    type Error: std::error::Error + Send + 'static;

    /// Called once before any event, with this worker's validated partition.
    fn on_run_start(&mut self, partition: &RunPartition) -> Result<(), Self::Error>;

    /// Called exactly once before each event's deposits. Clears any state
    /// left over from the previous event.
    fn on_event_start(&mut self);

    /// Called zero or more times per event, once per transport step that
    /// deposits energy inside a sensitive volume.
    fn on_deposit(&mut self, key: &ChannelKey, e_dep: f64);

    /// Called exactly once after each event's deposits, with the event's
    /// kinematic summary.
    fn on_event_end(&mut self, summary: EventSummary);

    /// Called once after the last event. The single point where buffered
    /// data becomes durable.
    fn on_run_end(&mut self) -> Result<RunArtifacts, Self::Error>;
}

/// Actions that record nothing. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct NoOpActions {
    events: u64,
}

impl NoOpActions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserActions for NoOpActions {
    type Error = Infallible;

    fn on_run_start(&mut self, _partition: &RunPartition) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_event_start(&mut self) {}

    fn on_deposit(&mut self, _key: &ChannelKey, _e_dep: f64) {}

    fn on_event_end(&mut self, _summary: EventSummary) {
        self.events += 1;
    }

    fn on_run_end(&mut self) -> Result<RunArtifacts, Self::Error> {
        Ok(RunArtifacts {
            events: self.events,
            ..RunArtifacts::default()
        })
    }
}
