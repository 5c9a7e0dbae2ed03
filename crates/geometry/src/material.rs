//! Materials assigned to placed volumes.
//!
//! Only the properties the transport driver consumes are carried: a name, a
//! bulk density, the element composition for reference, and an effective
//! stopping power used for straight-line energy loss.

use crate::units::{G_PER_CM3, KEV, MEV, MM};
use serde::{Deserialize, Serialize};

/// One element of a material's composition: (symbol, atoms per formula unit).
pub type ElementCount = (&'static str, u32);

/// A bulk material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (e.g., "G4_Si", "LaGPS").
    pub name: String,
    /// Density in g/cm3.
    pub density: f64,
    /// Element composition, empty for elemental/compound presets taken as-is.
    #[serde(skip)]
    pub composition: Vec<ElementCount>,
    /// Effective energy loss per unit path length (MeV/mm) for the primary.
    pub stopping_power: f64,
}

impl Material {
    /// Air filling the world volume.
    pub fn air() -> Self {
        Self {
            name: "G4_AIR".to_string(),
            density: 1.205e-3 * G_PER_CM3,
            composition: vec![("N", 4), ("O", 1)],
            stopping_power: 2.0 * KEV / MM,
        }
    }

    /// Interstellar-grade vacuum for the detector mother volume.
    pub fn vacuum() -> Self {
        Self {
            name: "G4_Galactic".to_string(),
            density: 1.0e-25 * G_PER_CM3,
            composition: vec![("H", 1)],
            stopping_power: 0.0,
        }
    }

    /// Polyethylene target.
    pub fn polyethylene() -> Self {
        Self {
            name: "G4_POLYETHYLENE".to_string(),
            density: 0.94 * G_PER_CM3,
            composition: vec![("C", 2), ("H", 4)],
            stopping_power: 6.0 * MEV / MM,
        }
    }

    /// Silicon for the strip detector and the front wafer.
    pub fn silicon() -> Self {
        Self {
            name: "G4_Si".to_string(),
            density: 2.33 * G_PER_CM3,
            composition: vec![("Si", 1)],
            stopping_power: 14.0 * MEV / MM,
        }
    }

    /// Gd2Si2O7 scintillator, used for the crystal blocks.
    pub fn lagps() -> Self {
        Self {
            name: "LaGPS".to_string(),
            density: 5.3 * G_PER_CM3,
            composition: vec![("Gd", 2), ("Si", 2), ("O", 7)],
            stopping_power: 28.0 * MEV / MM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vacuum_does_not_stop_anything() {
        assert_eq!(Material::vacuum().stopping_power, 0.0);
    }

    #[test]
    fn test_densities_increase_with_z() {
        let air = Material::air();
        let si = Material::silicon();
        let lagps = Material::lagps();
        assert!(air.density < si.density);
        assert!(si.density < lagps.density);
    }
}
