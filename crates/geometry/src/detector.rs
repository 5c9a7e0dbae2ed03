//! Construction of the fixed detector hierarchy.
//!
//! Mirrors the beamline layout: target at the origin, then downstream along
//! +z a thin front silicon wafer, the 16-strip silicon detector, and four
//! crystal blocks arranged 2x2 behind it. Built once per process, before
//! any worker starts.

use crate::consts;
use crate::{Material, Placement, Point, Shape};
use serde::{Deserialize, Serialize};
use types::ChannelKey;

/// Tunable geometry parameters. Everything else is fixed in `consts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Number of strips in the silicon detector.
    pub n_strips: i32,
    /// Distance from the target to the strip detector plane (mm).
    pub detector_z: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            n_strips: consts::N_SI_STRIPS,
            detector_z: consts::DETECTOR_Z,
        }
    }
}

impl GeometryConfig {
    /// Set the strip count.
    pub fn with_strips(mut self, n: i32) -> Self {
        self.n_strips = n;
        self
    }

    /// Set the target-to-detector distance.
    pub fn with_detector_z(mut self, z: f64) -> Self {
        self.detector_z = z;
        self
    }
}

/// The built geometry: a world volume and its placed daughters.
#[derive(Debug, Clone)]
pub struct Detector {
    world: Placement,
    daughters: Vec<Placement>,
}

impl Detector {
    /// Build the full hierarchy from the configuration.
    pub fn build(config: &GeometryConfig) -> Self {
        let world = Placement::passive(
            "World",
            0,
            Shape::box_full(consts::WORLD_SIZE, consts::WORLD_SIZE, consts::WORLD_SIZE),
            Material::air(),
            Point::ORIGIN,
        );

        let mut daughters = Vec::new();

        // Target disc at the origin, beam along +z.
        daughters.push(Placement::passive(
            "target",
            0,
            Shape::tube(consts::TARGET_RADIUS, consts::TARGET_THICKNESS),
            Material::polyethylene(),
            Point::ORIGIN,
        ));

        // Thin front silicon wafer just upstream of the strips.
        daughters.push(
            Placement::passive(
                "Si",
                0,
                Shape::box_full(consts::SI_SIZE, consts::SI_SIZE, consts::FRONT_SI_THICKNESS),
                Material::silicon(),
                Point::new(0.0, 0.0, config.detector_z - 2.0 * consts::SI_THICKNESS),
            )
            .with_channel(ChannelKey::front()),
        );

        // Strip detector: n_strips equal y-slices of a SI_SIZE square.
        let pitch = consts::SI_SIZE / config.n_strips as f64;
        for i in 0..config.n_strips {
            let y = -0.5 * consts::SI_SIZE + pitch * (i as f64 + 0.5);
            daughters.push(
                Placement::passive(
                    "SiStrip",
                    i,
                    Shape::box_full(consts::SI_SIZE, pitch, consts::SI_THICKNESS),
                    Material::silicon(),
                    Point::new(0.0, y, config.detector_z),
                )
                .with_channel(ChannelKey::new("Si", i)),
            );
        }

        // Four crystal blocks, 2x2, behind the strips.
        let half = 0.5 * consts::CSI_SIZE;
        let z = config.detector_z + consts::CSI_Z_OFFSET + 0.5 * consts::CSI_THICKNESS;
        let quadrants = [(half, half), (-half, half), (half, -half), (-half, -half)];
        for (i, (x, y)) in quadrants.iter().enumerate() {
            daughters.push(
                Placement::passive(
                    "CsI",
                    i as i32,
                    Shape::box_full(consts::CSI_SIZE, consts::CSI_SIZE, consts::CSI_THICKNESS),
                    Material::lagps(),
                    Point::new(*x, *y, z),
                )
                .with_channel(ChannelKey::new("CsI", i as i32)),
            );
        }

        Self { world, daughters }
    }

    /// Whether a point is still inside the world volume.
    pub fn in_world(&self, p: Point) -> bool {
        self.world.contains(p)
    }

    /// The innermost daughter placement containing `p`, if any.
    ///
    /// Daughters do not overlap, so the first match is the only match.
    pub fn locate(&self, p: Point) -> Option<&Placement> {
        self.daughters.iter().find(|d| d.contains(p))
    }

    /// The material at `p`: a daughter's, or the world's filler.
    pub fn material_at(&self, p: Point) -> &Material {
        self.locate(p)
            .map(|d| &d.material)
            .unwrap_or(&self.world.material)
    }

    /// The sensitive channel at `p`, if the point is inside a readout volume.
    pub fn channel_at(&self, p: Point) -> Option<&ChannelKey> {
        self.locate(p).and_then(|d| d.channel.as_ref())
    }

    /// All placed daughters.
    pub fn placements(&self) -> &[Placement] {
        &self.daughters
    }

    /// Number of sensitive channels in the setup.
    pub fn n_channels(&self) -> usize {
        self.daughters.iter().filter(|d| d.channel.is_some()).count()
    }
}
