//! Per-event channel deposit accumulation.

use std::collections::BTreeMap;
use types::ChannelKey;

/// Scratch state for exactly one in-flight event.
///
/// Deposits are summed per channel; draining yields only channels whose
/// accumulated energy is strictly positive, in key order. `begin_event`
/// must be called before the first deposit of each event; without it the
/// previous event's deposits leak into the next.
#[derive(Debug, Default)]
pub struct EventAccumulator {
    deposits: BTreeMap<ChannelKey, f64>,
}

impl EventAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new event.
    pub fn begin_event(&mut self) {
        self.deposits.clear();
    }

    /// Add a deposit for `key`. Negative energies indicate an upstream
    /// defect and are rejected with a warning rather than summed.
    pub fn add(&mut self, key: &ChannelKey, e_dep: f64) {
        if e_dep < 0.0 {
            eprintln!(
                "[Recorder] rejecting negative deposit {:.6} MeV in {}",
                e_dep, key
            );
            return;
        }
        *self.deposits.entry(key.clone()).or_insert(0.0) += e_dep;
    }

    /// Number of channels touched this event (including zero-sum ones).
    pub fn touched(&self) -> usize {
        self.deposits.len()
    }

    /// Take this event's accumulated deposits, keeping only strictly
    /// positive sums, in channel-key order. Leaves the accumulator empty.
    pub fn drain(&mut self) -> Vec<(ChannelKey, f64)> {
        std::mem::take(&mut self.deposits)
            .into_iter()
            .filter(|(_, e)| *e > 0.0)
            .collect()
    }
}
