//! Core types for the telescope simulation.
//!
//! This crate provides the shared data types used across the simulation:
//! detector channel keys, per-event kinematic summaries, the two output row
//! types, and the per-worker run partition arithmetic.

use derive_more::{Add, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Detector Channel Types
// =============================================================================

/// Name of a logical detector group (e.g., "Si", "CsI", "front").
pub type DetectorName = String;

/// Copy number of a placed sensitive volume within its detector group.
pub type CopyId = i32;

/// Composite key identifying one sensitive channel within one event.
///
/// Ordered so that per-event emission is deterministic: hits drain in
/// (detector, copy) order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelKey {
    /// Detector group name.
    pub det: DetectorName,
    /// Copy number within the group.
    pub copy: CopyId,
}

impl ChannelKey {
    /// Create a channel key.
    pub fn new(det: impl Into<DetectorName>, copy: CopyId) -> Self {
        Self {
            det: det.into(),
            copy,
        }
    }

    /// The singleton front-silicon channel.
    pub fn front() -> Self {
        Self::new("front", 0)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.det, self.copy)
    }
}

// =============================================================================
// Worker / Event Identifiers
// =============================================================================

/// Index of one parallel simulation worker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default, From,
    Into,
)]
pub struct WorkerId(pub i32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker#{}", self.0)
    }
}

/// Per-worker monotonically assigned event identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct EventId(pub i32);

impl EventId {
    /// The id following this one.
    #[inline]
    pub fn next(self) -> Self {
        EventId(self.0 + 1)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

// =============================================================================
// Per-Event Kinematics
// =============================================================================

/// Kinematic summary of one primary, captured once per event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EventSummary {
    /// Primary proton kinetic energy (MeV).
    pub e_proton: f64,
    /// Polar angle of the primary in the lab frame (rad).
    pub theta: f64,
    /// Azimuthal angle of the primary in the lab frame (rad).
    pub phi: f64,
}

impl EventSummary {
    /// Create an event summary.
    pub fn new(e_proton: f64, theta: f64, phi: f64) -> Self {
        Self {
            e_proton,
            theta,
            phi,
        }
    }
}

// =============================================================================
// Output Row Types
// =============================================================================

/// One row of the per-hit output table: a single channel's accumulated
/// deposit for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Worker that produced the row.
    pub worker_id: WorkerId,
    /// Event the deposit belongs to.
    pub event_id: EventId,
    /// Detector group name.
    pub det_name: DetectorName,
    /// Copy number within the group.
    pub copy_id: CopyId,
    /// Accumulated energy deposit (MeV), strictly positive.
    pub e_dep: f64,
}

/// One row of the per-event output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Worker that produced the row.
    pub worker_id: WorkerId,
    /// Event identifier.
    pub event_id: EventId,
    /// Primary proton kinetic energy (MeV).
    pub e_proton: f64,
    /// Lab-frame polar angle (rad).
    pub theta: f64,
    /// Lab-frame azimuthal angle (rad).
    pub phi: f64,
}

impl EventRecord {
    /// Build an event record from a summary plus worker/event identity.
    pub fn from_summary(worker_id: WorkerId, event_id: EventId, summary: &EventSummary) -> Self {
        Self {
            worker_id,
            event_id,
            e_proton: summary.e_proton,
            theta: summary.theta,
            phi: summary.phi,
        }
    }
}

// =============================================================================
// Run Partition
// =============================================================================

/// Errors in the run partition parameters, caught before any worker starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    /// Worker count of zero would divide by zero in the id-offset formula.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// Worker index outside the configured worker count.
    #[error("worker index {index} out of range for {count} workers")]
    IndexOutOfRange { index: usize, count: usize },
}

/// One worker's view of the run-wide event split.
///
/// Event ids start at `floor(total / workers) * index` and increase by one
/// per processed event. When `total` is not divisible by `workers` the
/// remainder gets no id slice of its own; the formula is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPartition {
    /// Total events requested for the whole run.
    pub total_events: u64,
    /// Number of parallel workers.
    pub worker_count: usize,
    /// This worker's index in `0..worker_count`.
    pub worker_index: usize,
}

impl RunPartition {
    /// Create a validated partition.
    pub fn new(
        total_events: u64,
        worker_count: usize,
        worker_index: usize,
    ) -> Result<Self, PartitionError> {
        if worker_count == 0 {
            return Err(PartitionError::NoWorkers);
        }
        if worker_index >= worker_count {
            return Err(PartitionError::IndexOutOfRange {
                index: worker_index,
                count: worker_count,
            });
        }
        Ok(Self {
            total_events,
            worker_count,
            worker_index,
        })
    }

    /// Events per worker under floor division.
    #[inline]
    pub fn events_per_worker(&self) -> u64 {
        self.total_events / self.worker_count as u64
    }

    /// First event id assigned to this worker.
    #[inline]
    pub fn start_event_id(&self) -> EventId {
        EventId((self.events_per_worker() * self.worker_index as u64) as i32)
    }

    /// Number of events this worker processes: the floor-sized slice, with
    /// the division remainder absorbed by the final worker.
    #[inline]
    pub fn slice_len(&self) -> u64 {
        let per = self.events_per_worker();
        if self.worker_index + 1 == self.worker_count {
            per + self.total_events % self.worker_count as u64
        } else {
            per
        }
    }

    /// This worker's identity as recorded in output rows.
    #[inline]
    pub fn worker_id(&self) -> WorkerId {
        WorkerId(self.worker_index as i32)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_key_ordering() {
        let a = ChannelKey::new("CsI", 1);
        let b = ChannelKey::new("Si", 0);
        let c = ChannelKey::new("Si", 3);

        // Lexicographic on detector name, then copy number
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_front_channel_is_singleton_zero() {
        let front = ChannelKey::front();
        assert_eq!(front.det, "front");
        assert_eq!(front.copy, 0);
    }

    #[test]
    fn test_partition_start_id() {
        // Worker 0 of 4, total=1000 => start id 0
        let p = RunPartition::new(1000, 4, 0).unwrap();
        assert_eq!(p.start_event_id(), EventId(0));

        // Worker 2 of 4, total=1000 => 250 * 2 = 500
        let p = RunPartition::new(1000, 4, 2).unwrap();
        assert_eq!(p.start_event_id(), EventId(500));
    }

    #[test]
    fn test_partition_uneven_division_keeps_floor_offsets() {
        // 10 events over 3 workers: floor slice is 3
        let offsets: Vec<i32> = (0..3)
            .map(|i| RunPartition::new(10, 3, i).unwrap().start_event_id().0)
            .collect();
        assert_eq!(offsets, vec![0, 3, 6]);

        // The final worker absorbs the remainder
        assert_eq!(RunPartition::new(10, 3, 0).unwrap().slice_len(), 3);
        assert_eq!(RunPartition::new(10, 3, 2).unwrap().slice_len(), 4);
    }

    #[test]
    fn test_partition_rejects_zero_workers() {
        assert_eq!(
            RunPartition::new(100, 0, 0).unwrap_err(),
            PartitionError::NoWorkers
        );
    }

    #[test]
    fn test_partition_rejects_out_of_range_index() {
        assert_eq!(
            RunPartition::new(100, 2, 2).unwrap_err(),
            PartitionError::IndexOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn test_event_record_from_summary() {
        let summary = EventSummary::new(30.0, 0.1, 1.5);
        let record = EventRecord::from_summary(WorkerId(1), EventId(42), &summary);

        assert_eq!(record.worker_id, WorkerId(1));
        assert_eq!(record.event_id, EventId(42));
        assert_eq!(record.e_proton, 30.0);
        assert_eq!(record.theta, 0.1);
        assert_eq!(record.phi, 1.5);
    }

    #[test]
    fn test_event_id_next() {
        assert_eq!(EventId(7).next(), EventId(8));
    }
}
