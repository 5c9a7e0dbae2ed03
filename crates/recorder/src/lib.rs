//! Recording layer for the telescope simulation.
//!
//! Two pieces form one pipeline, both owned by exactly one worker:
//!
//! - `EventAccumulator`: per-event scratch state summing channel deposits
//! - `RunRecorder`: run-long append-only column buffers, serialized to a
//!   per-worker Parquet file pair exactly once at end of run
//!
//! `RecordingActions` wires them behind the `simulation::UserActions`
//! interface, so the transport host never sees the storage machinery.
//!
//! Output layout, per worker N under the configured prefix:
//!
//! - `eDep/workerN.parquet`: one row per fired channel per event
//! - `evtInfo/worker_N.parquet`: one row per event

mod accumulator;
mod actions;
mod error;
mod recorder;

pub use accumulator::EventAccumulator;
pub use actions::RecordingActions;
pub use error::RecorderError;
pub use recorder::{event_schema, hit_schema, RecorderConfig, RunRecorder, TableSet};
