//! Laser-driven transitions between Zeeman sublevels and their Rabi
//! frequencies.

use std::f64::consts::PI;
use itertools::Itertools;
use num_complex::Complex64 as C64;
use crate::{
    consts::{ EPSILON_0, HBAR },
    error::{ IonError, IonResult },
    laser::Laser,
    level::{ Level, Structure, ZeemanLevel },
    spin::{ self, Spin },
};

/// Multipole order of a transition, classified by `|ΔL|`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionOrder {
    /// Electric dipole, `|ΔL| = 1`.
    Dipole,
    /// Electric quadrupole, `|ΔL| = 2`.
    Quadrupole,
}

impl TransitionOrder {
    /// Classify a transition from the orbital angular momenta of its levels.
    pub fn from_orbitals(L_lower: u32, L_upper: u32) -> IonResult<Self> {
        match L_upper.abs_diff(L_lower) {
            1 => Ok(Self::Dipole),
            2 => Ok(Self::Quadrupole),
            dL => Err(IonError::UnsupportedTransitionOrder(dL)),
        }
    }
}

/// Compute the electric dipole Rabi frequency (rad/s) for driving
/// `lower -> upper` with `laser`.
///
/// ```text
/// Ω = (-1)^(J_l + J_u + max(J_l, J_u) - m_u)
///     * E / ħ * sqrt(3 ε₀ ħ λ³ b Γ / (8π²)) * sqrt(2 J_u + 1)
///     * Σ_q ε_q (J_u 1 J_l; -m_u q m_l)
/// ```
/// where `b` is the branching ratio, `Γ` the transition linewidth, and the sum
/// runs over `q = -1, 0, +1` in the same order as
/// [`Polarization::spherical`][crate::polarization::Polarization::spherical].
/// For hyperfine sublevels, `J` and `m` are the sublevel's `F` and `m_F`.
pub fn dipole_rabi_frequency(
    lower: &ZeemanLevel,
    upper: &ZeemanLevel,
    laser: &Laser,
    branching_ratio: f64,
    linewidth: f64,
) -> IonResult<C64>
{
    let sl = lower.spin();
    let su = upper.spin();
    let (jl, ml) = sl.halves();
    let (ju, mu) = su.halves();
    let exponent
        = i64::from(jl) + i64::from(ju) + i64::from(jl.max(ju)) - i64::from(mu);
    let sign = spin::phase_halves(exponent)
        .ok_or(IonError::InvalidAngularMomentum(exponent as f64 / 2.0))?;

    let lambda = laser.wavelength();
    let coefficient
        = laser.field_amplitude() / HBAR
        * (
            3.0 * EPSILON_0 * HBAR * lambda.powi(3) * branching_ratio * linewidth
            / (8.0 * PI * PI)
        ).sqrt()
        * (f64::from(ju) + 1.0).sqrt();

    let eps = laser.polarization().spherical();
    let amplitude: C64
        = (-1..=1_i32).zip(eps)
        .map(|(q, eps_q)| {
            Spin::new(2, 2 * q)
                .map(|photon| eps_q * spin::w3j(su.reflected(), photon, sl))
                .ok_or(IonError::InvalidAngularMomentum(f64::from(q)))
        })
        .sum::<IonResult<C64>>()?;
    log::trace!(
        "dipole coupling {} -> {}: ml = {}, mu = {}, amplitude = {}",
        lower.name(), upper.name(), ml, mu, amplitude,
    );
    Ok(sign * coefficient * amplitude)
}

/// Compute the Rabi frequency for a transition of the given order.
///
/// Only dipole transitions are implemented; quadrupole transitions return
/// [`IonError::UnimplementedTransitionOrder`].
pub fn rabi_frequency(
    order: TransitionOrder,
    lower: &ZeemanLevel,
    upper: &ZeemanLevel,
    laser: &Laser,
    branching_ratio: f64,
    linewidth: f64,
) -> IonResult<C64>
{
    match order {
        TransitionOrder::Dipole
            => dipole_rabi_frequency(lower, upper, laser, branching_ratio, linewidth),
        TransitionOrder::Quadrupole
            => Err(IonError::UnimplementedTransitionOrder(order)),
    }
}

fn is_hyperfine(level: &ZeemanLevel) -> bool {
    matches!(level.info().structure, Structure::Hyperfine { .. })
}

/// A laser-driven transition between two Zeeman sublevels.
///
/// All derived quantities are computed on construction.
#[derive(Clone, Debug)]
pub struct Transition<'a> {
    lower: &'a ZeemanLevel,
    upper: &'a ZeemanLevel,
    laser: &'a Laser,
    B: f64,
    order: TransitionOrder,
    linewidth: f64,
    branching_ratio: f64,
    rabi_frequency: C64,
}

impl<'a> Transition<'a> {
    /// Create a new transition between two sublevels in a magnetic field `B`
    /// (tesla).
    ///
    /// The sublevels may be given in either order; they are sorted by their
    /// energies at `B`, which must differ. Both must be fine-structure or
    /// both hyperfine-structure sublevels.
    pub fn new(
        a: &'a ZeemanLevel,
        b: &'a ZeemanLevel,
        laser: &'a Laser,
        B: f64,
    ) -> IonResult<Self>
    {
        let (ea, eb) = (a.energy_at(B), b.energy_at(B));
        let (lower, upper)
            = if ea < eb {
                (a, b)
            } else if eb < ea {
                (b, a)
            } else {
                return Err(IonError::DegenerateEnergyOrdering {
                    a: a.name().to_string(),
                    b: b.name().to_string(),
                });
            };
        match (is_hyperfine(lower), is_hyperfine(upper)) {
            (false, true) => {
                return Err(IonError::MixedStructure {
                    fine: lower.name().to_string(),
                    hyperfine: upper.name().to_string(),
                });
            },
            (true, false) => {
                return Err(IonError::MixedStructure {
                    fine: upper.name().to_string(),
                    hyperfine: lower.name().to_string(),
                });
            },
            _ => { },
        }
        let order = TransitionOrder::from_orbitals(lower.L(), upper.L())?;
        let linewidth = lower.linewidth() + upper.linewidth() + laser.linewidth();
        let branching_ratio = upper.branching_ratio(lower.manifold())?;
        let rabi_frequency
            = rabi_frequency(order, lower, upper, laser, branching_ratio, linewidth)?;
        Ok(Self {
            lower,
            upper,
            laser,
            B,
            order,
            linewidth,
            branching_ratio,
            rabi_frequency,
        })
    }

    pub fn lower(&self) -> &'a ZeemanLevel { self.lower }

    pub fn upper(&self) -> &'a ZeemanLevel { self.upper }

    pub fn laser(&self) -> &'a Laser { self.laser }

    /// Magnetic field in tesla.
    pub fn field(&self) -> f64 { self.B }

    pub fn order(&self) -> TransitionOrder { self.order }

    /// Sum of both levels' and the laser's linewidths, in rad/s.
    pub fn linewidth(&self) -> f64 { self.linewidth }

    /// Branching ratio for decay from the upper to the lower level.
    pub fn branching_ratio(&self) -> f64 { self.branching_ratio }

    /// Complex Rabi frequency in rad/s.
    pub fn rabi_frequency(&self) -> C64 { self.rabi_frequency }

    /// Transition angular frequency `(E_u - E_l) / ħ` at the transition's
    /// field.
    pub fn resonance(&self) -> f64 {
        (self.upper.energy_at(self.B) - self.lower.energy_at(self.B)) / HBAR
    }

    /// Laser detuning from resonance, `ω_L - ω_0`, in rad/s.
    pub fn detuning(&self) -> f64 {
        self.laser.angular_frequency() - self.resonance()
    }
}

/// Construct one transition for every pair of elementary sublevels drawn from
/// `a` and `b`.
///
/// Each argument may be composite or elementary; pairs are generated in the
/// order of `a`'s sublevels, then `b`'s. The first failing pair aborts the
/// expansion.
pub fn transitions_between<'a>(
    a: &'a dyn Level,
    b: &'a dyn Level,
    laser: &'a Laser,
    B: f64,
) -> IonResult<Vec<Transition<'a>>>
{
    let transitions: Vec<Transition<'a>>
        = a.elementary().into_iter()
        .cartesian_product(b.elementary())
        .map(|(za, zb)| Transition::new(za, zb, laser, B))
        .collect::<IonResult<_>>()?;
    log::debug!(
        "expanded {} x {} into {} elementary transitions",
        a.name(), b.name(), transitions.len(),
    );
    Ok(transitions)
}
