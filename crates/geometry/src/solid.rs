//! Solid shapes, each defined in its own local frame centred on the origin.

use crate::Vector;
use serde::{Deserialize, Serialize};

/// A solid shape in local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with the given half-extents.
    Box { half: (f64, f64, f64) },
    /// Tube along the local z axis.
    Tube { r_min: f64, r_max: f64, half_z: f64 },
}

impl Shape {
    /// Box from full extents.
    pub fn box_full(x: f64, y: f64, z: f64) -> Self {
        Shape::Box {
            half: (0.5 * x, 0.5 * y, 0.5 * z),
        }
    }

    /// Solid tube (no inner bore) from radius and full thickness.
    pub fn tube(r_max: f64, thickness: f64) -> Self {
        Shape::Tube {
            r_min: 0.0,
            r_max,
            half_z: 0.5 * thickness,
        }
    }

    /// Whether the local-frame offset `v` from the shape centre lies inside.
    pub fn contains(&self, v: Vector) -> bool {
        match self {
            Shape::Box { half } => {
                v.dx.abs() <= half.0 && v.dy.abs() <= half.1 && v.dz.abs() <= half.2
            }
            Shape::Tube {
                r_min,
                r_max,
                half_z,
            } => {
                let r = (v.dx * v.dx + v.dy * v.dy).sqrt();
                r >= *r_min && r <= *r_max && v.dz.abs() <= *half_z
            }
        }
    }
}
