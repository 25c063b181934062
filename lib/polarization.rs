//! Laser polarization resolved into the spherical basis relative to a fixed
//! quantization axis (z).

use std::f64::consts::FRAC_1_SQRT_2;
use nalgebra::Vector3;
use num_complex::Complex64 as C64;
use crate::error::{ IonError, IonResult };

/// Tolerance below which a propagation direction is treated as parallel to
/// the quantization axis.
const PARALLEL_TOL: f64 = 1e-12;

/// Polarization of a plane wave.
///
/// The field is `ε₀ ê₀ + ε₁ ê₁` where `(ê₀, ê₁)` is an orthonormal basis of the
/// plane transverse to the propagation direction `k̂`. If `k̂` is not parallel
/// to z, `ê₀` is the (normalized) component of z transverse to `k̂` and
/// `ê₁ = k̂ × ê₀`; otherwise `(ê₀, ê₁) = (x̂, ŷ)`.
///
/// The spherical components are stored in the order `q = -1, 0, +1`:
/// ```text
/// ε₋₁ = (εx - i εy) / √2
/// ε₀  = εz
/// ε₊₁ = -(εx + i εy) / √2
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Polarization {
    direction: Vector3<f64>,
    amplitudes: [C64; 2],
    basis: [Vector3<f64>; 2],
    cartesian: Vector3<C64>,
    spherical: [C64; 3],
}

/// Return an orthonormal pair spanning the plane transverse to `k` (assumed
/// normalized).
pub fn transverse_basis(k: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let z = Vector3::z();
    if k.cross(&z).norm() < PARALLEL_TOL {
        return (Vector3::x(), Vector3::y());
    }
    let e0 = (z - k * k.dot(&z)).normalize();
    let e1 = k.cross(&e0);
    (e0, e1)
}

/// Convert a cartesian field vector to spherical components in `q = -1, 0, +1`
/// order.
pub fn to_spherical(field: &Vector3<C64>) -> [C64; 3] {
    let i = C64::i();
    [
        (field.x - i * field.y) * FRAC_1_SQRT_2,
        field.z,
        -(field.x + i * field.y) * FRAC_1_SQRT_2,
    ]
}

impl Polarization {
    /// Create a new polarization from a propagation direction and two complex
    /// transverse amplitudes.
    ///
    /// Neither input needs to be normalized, but neither may vanish; the
    /// amplitudes are rescaled so that the field vector has unit norm.
    pub fn new(direction: Vector3<f64>, eps0: C64, eps1: C64)
        -> IonResult<Self>
    {
        let k_norm = direction.norm();
        if !k_norm.is_finite() || k_norm == 0.0 {
            return Err(IonError::InvalidPolarization("zero propagation direction"));
        }
        let a_norm = (eps0.norm_sqr() + eps1.norm_sqr()).sqrt();
        if !a_norm.is_finite() || a_norm == 0.0 {
            return Err(IonError::InvalidPolarization("zero field amplitudes"));
        }
        let direction = direction / k_norm;
        let amplitudes = [eps0 / a_norm, eps1 / a_norm];
        let (e0, e1) = transverse_basis(&direction);
        let cartesian: Vector3<C64>
            = e0.map(|x| C64::from(x)) * amplitudes[0]
            + e1.map(|x| C64::from(x)) * amplitudes[1];
        let spherical = to_spherical(&cartesian);
        Ok(Self { direction, amplitudes, basis: [e0, e1], cartesian, spherical })
    }

    /// Linear polarization at angle `angle` (radians) from `ê₀` towards `ê₁`.
    pub fn linear(direction: Vector3<f64>, angle: f64) -> IonResult<Self> {
        Self::new(direction, C64::from(angle.cos()), C64::from(angle.sin()))
    }

    /// Circular polarization that is pure σ+ (`q = +1`) when propagating
    /// along +z.
    pub fn sigma_plus(direction: Vector3<f64>) -> IonResult<Self> {
        Self::new(
            direction,
            C64::from(-FRAC_1_SQRT_2),
            C64::i() * FRAC_1_SQRT_2,
        )
    }

    /// Circular polarization that is pure σ- (`q = -1`) when propagating
    /// along +z.
    pub fn sigma_minus(direction: Vector3<f64>) -> IonResult<Self> {
        Self::new(
            direction,
            C64::from(FRAC_1_SQRT_2),
            C64::i() * FRAC_1_SQRT_2,
        )
    }

    /// Linear polarization along `ê₀`; pure π (`q = 0`) when propagating
    /// perpendicular to z.
    pub fn pi(direction: Vector3<f64>) -> IonResult<Self> {
        Self::linear(direction, 0.0)
    }

    /// Unit propagation direction.
    pub fn direction(&self) -> &Vector3<f64> { &self.direction }

    /// Normalized transverse amplitudes `(ε₀, ε₁)`.
    pub fn amplitudes(&self) -> [C64; 2] { self.amplitudes }

    /// Transverse basis vectors `(ê₀, ê₁)`.
    pub fn basis(&self) -> &[Vector3<f64>; 2] { &self.basis }

    /// Unit field vector in cartesian coordinates.
    pub fn cartesian(&self) -> &Vector3<C64> { &self.cartesian }

    /// Spherical components in `q = -1, 0, +1` order.
    pub fn spherical(&self) -> [C64; 3] { self.spherical }

    /// Spherical component `q` (one of -1, 0, +1).
    pub fn component(&self, q: i32) -> Option<C64> {
        match q {
            -1 => Some(self.spherical[0]),
            0 => Some(self.spherical[1]),
            1 => Some(self.spherical[2]),
            _ => None,
        }
    }
}
