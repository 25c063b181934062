//! Physical constants and unit scalings, all in SI.

use std::f64::consts::TAU;

// constants
pub const AMU: f64 = 1.66053906660e-27; // kg
pub const E_CHARGE: f64 = 1.602176634e-19; // C
pub const MU_B: f64 = 9.2740100657e-24; // J / T
pub const HBAR: f64 = 1.054571817e-34; // J s
pub const H: f64 = TAU * HBAR; // J s
pub const EPSILON_0: f64 = 8.8541878128e-12; // F / m
pub const C: f64 = 299_792_458.0; // m / s

// length
pub const CM: f64 = 1e-2;
pub const MM: f64 = 1e-3;
pub const UM: f64 = 1e-6;
pub const NM: f64 = 1e-9;

// frequency
pub const KHZ: f64 = 1e3;
pub const MHZ: f64 = 1e6;
pub const GHZ: f64 = 1e9;
pub const THZ: f64 = 1e12;

// magnetic field
pub const GAUSS: f64 = 1e-4; // T

// energy
pub const EV: f64 = E_CHARGE; // J
pub const MEV: f64 = 1e-3 * EV;
