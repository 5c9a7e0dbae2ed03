//! Simulation crate: the event loop for the telescope simulation.
//!
//! This crate owns the host side of the pipeline:
//! - the `UserActions` trait, the seam between transport and bookkeeping
//! - primary proton generation
//! - a deliberately simple straight-line transport driver
//! - per-worker run orchestration
//!
//! # Lifecycle
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  per worker (one thread, exclusively owned state)    │
//! │                                                      │
//! │  on_run_start(partition)                             │
//! │  loop over event slice:                              │
//! │      on_event_start()                                │
//! │      sample primary ──► transport ──► on_deposit()*  │
//! │      on_event_end(summary)                           │
//! │  on_run_end() ──► artifacts                          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Workers never share mutable state: each receives its own `UserActions`
//! value from a factory and its own seeded RNG. Coordination is limited to
//! a result channel back to the caller.

mod actions;
mod primary;
mod run;
mod transport;

pub use actions::{NoOpActions, RunArtifacts, UserActions};
pub use primary::{Primary, PrimaryConfig, PrimaryGenerator};
pub use run::{run, RunConfig, RunError, RunSummary, WorkerOutcome};
pub use transport::{Transport, TransportConfig};
