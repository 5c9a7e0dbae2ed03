//! Named, copy-numbered placements of solids in the world frame.

use crate::{Material, Point, Shape, Vector};
use types::ChannelKey;

/// One placed volume: a shape and material at a position, optionally mapped
/// to a sensitive readout channel.
///
/// The (name, copy) pair is the framework-facing identity of the placement;
/// `channel` is how deposits inside it are keyed by the readout. Placements
/// without a channel (world, target) absorb energy without recording it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Volume name.
    pub name: String,
    /// Copy number distinguishing repeated placements of the same name.
    pub copy: i32,
    /// Solid shape in the placement's local frame.
    pub shape: Shape,
    /// Bulk material.
    pub material: Material,
    /// Centre position in the world frame.
    pub position: Point,
    /// Sensitive channel deposits are recorded under, if any.
    pub channel: Option<ChannelKey>,
}

impl Placement {
    /// Create a passive (non-sensitive) placement.
    pub fn passive(
        name: impl Into<String>,
        copy: i32,
        shape: Shape,
        material: Material,
        position: Point,
    ) -> Self {
        Self {
            name: name.into(),
            copy,
            shape,
            material,
            position,
            channel: None,
        }
    }

    /// Mark this placement sensitive, recording deposits under `channel`.
    pub fn with_channel(mut self, channel: ChannelKey) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Whether a world-frame point lies inside this placement.
    pub fn contains(&self, p: Point) -> bool {
        let local = Vector::new(
            p.x - self.position.x,
            p.y - self.position.y,
            p.z - self.position.z,
        );
        self.shape.contains(local)
    }
}
