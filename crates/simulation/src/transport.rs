//! Straight-line transport with per-material energy loss.
//!
//! The driver ray-marches a primary from the target centre in fixed steps.
//! Each step loses `stopping_power * step` of energy to whatever volume
//! contains the step's midpoint; losses inside sensitive volumes are
//! forwarded to the user actions under that volume's channel. The march
//! stops when the primary's energy is exhausted or it leaves the world.
//!
//! This is a driver for the bookkeeping pipeline, not a physics model: no
//! scattering, no secondaries, no straggling.

use crate::actions::UserActions;
use crate::primary::Primary;
use geometry::{Detector, Point};
use serde::{Deserialize, Serialize};

/// Transport stepping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Step length (mm). Must resolve the thinnest sensitive volume.
    pub step: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { step: 0.02 }
    }
}

impl TransportConfig {
    /// Set the step length.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

/// The transport driver.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    config: TransportConfig,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// March one primary through the detector, reporting sensitive-volume
    /// deposits to `actions`. Returns the total energy left in the setup.
    pub fn trace<A: UserActions>(
        &self,
        detector: &Detector,
        primary: &Primary,
        actions: &mut A,
    ) -> f64 {
        let step = self.config.step;
        let dir = primary.direction();
        let mut pos = Point::ORIGIN;
        let mut energy = primary.energy;
        let mut deposited = 0.0;

        while energy > 0.0 {
            // Midpoint sampling so thin volumes are charged for the step
            // that crosses them.
            let mid = pos + dir * (0.5 * step);
            if !detector.in_world(mid) {
                break;
            }

            let loss = (detector.material_at(mid).stopping_power * step).min(energy);
            if loss > 0.0 {
                if let Some(channel) = detector.channel_at(mid) {
                    actions.on_deposit(channel, loss);
                }
                energy -= loss;
                deposited += loss;
            }

            pos = pos + dir * step;
        }

        deposited
    }
}
