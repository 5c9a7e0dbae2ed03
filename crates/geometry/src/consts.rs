//! Dimensional constants of the experimental setup.

use crate::units::{CM, M, MM};

/// Full extent of the cubic world volume.
pub const WORLD_SIZE: f64 = 1.0 * M;

/// Target disc radius.
pub const TARGET_RADIUS: f64 = 1.0 * CM;

/// Target thickness along the beam axis.
pub const TARGET_THICKNESS: f64 = 0.1 * MM;

/// Transverse size of the square strip detector.
pub const SI_SIZE: f64 = 5.0 * CM;

/// Number of strips the silicon detector is segmented into.
pub const N_SI_STRIPS: i32 = 16;

/// Strip detector thickness.
pub const SI_THICKNESS: f64 = 0.3 * MM;

/// Thin front silicon wafer thickness.
pub const FRONT_SI_THICKNESS: f64 = 0.02 * MM;

/// Transverse size of one square crystal block.
pub const CSI_SIZE: f64 = 2.5 * CM;

/// Crystal block depth along the beam axis.
pub const CSI_THICKNESS: f64 = 3.0 * CM;

/// Gap between the strip detector and the crystal front faces.
pub const CSI_Z_OFFSET: f64 = 2.0 * MM;

/// Distance from the target centre to the strip detector plane.
pub const DETECTOR_Z: f64 = 15.0 * CM;
