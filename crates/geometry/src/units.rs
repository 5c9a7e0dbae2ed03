//! Unit constants, Geant4 convention: lengths in mm, energies in MeV.
//!
//! Multiply a literal by its unit when defining a dimension, e.g.
//! `10.0 * units::CM`.

/// Millimetre (base length unit).
pub const MM: f64 = 1.0;

/// Centimetre.
pub const CM: f64 = 10.0 * MM;

/// Metre.
pub const M: f64 = 1000.0 * MM;

/// Mega-electronvolt (base energy unit).
pub const MEV: f64 = 1.0;

/// Kilo-electronvolt.
pub const KEV: f64 = 1.0e-3 * MEV;

/// Gram per cubic centimetre (density unit).
pub const G_PER_CM3: f64 = 1.0;
