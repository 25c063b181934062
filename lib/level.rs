//! Fine- and hyperfine-structure energy levels and their Zeeman sublevels.
//!
//! A composite [`EnergyLevel`] owns one [`ZeemanLevel`] per magnetic quantum
//! number. Both implement [`Level`], whose [`Level::zeeman_levels`] method
//! distinguishes the composite case from the elementary one.

use std::fmt;
use indexmap::IndexMap;
use crate::{
    consts::MU_B,
    error::{ IonError, IonResult },
    gfactors::{ lande_g_f, lande_g_j },
    spin::{ Spin, SpinProj, SpinTotal },
};

/* Orbital labels *************************************************************/

const ORBITAL_LABELS: [char; 8] = ['S', 'P', 'D', 'F', 'G', 'H', 'I', 'K'];

/// Convert a spectroscopic orbital letter to the orbital angular momentum
/// quantum number L.
pub fn orbital_from_label(label: &str) -> IonResult<u32> {
    let mut chars = label.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            ORBITAL_LABELS.iter()
                .position(|l| *l == c.to_ascii_uppercase())
                .map(|L| L as u32)
                .ok_or_else(|| IonError::InvalidOrbitalLabel(label.to_string()))
        },
        _ => Err(IonError::InvalidOrbitalLabel(label.to_string())),
    }
}

/// Convert an orbital angular momentum quantum number to its spectroscopic
/// letter.
pub fn orbital_label(L: u32) -> Option<char> {
    ORBITAL_LABELS.get(L as usize).copied()
}

/* Level data *****************************************************************/

/// Coupling scheme of a level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Structure {
    /// Labeled by J; sublevels indexed by m_J.
    Fine,
    /// Labeled by F, from coupling J to the nuclear spin I; sublevels indexed
    /// by m_F.
    Hyperfine { F: SpinTotal },
}

impl Structure {
    /// Return the angular momentum whose projections label the Zeeman
    /// sublevels.
    pub fn sublevel_total(&self, J: SpinTotal) -> SpinTotal {
        match *self {
            Self::Fine => J,
            Self::Hyperfine { F } => F,
        }
    }
}

/// Slack allowed when checking that branching ratios sum to at most 1.
pub const BRANCHING_SUM_TOL: f64 = 1e-9;

/// Decay target → branching ratio, keyed by level name.
pub type BranchingTable = IndexMap<String, f64>;

/// Field-free quantum numbers and properties shared by a level and all of its
/// Zeeman sublevels.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelInfo {
    /// Principal quantum number.
    pub n: u32,
    /// Orbital angular momentum.
    pub L: u32,
    /// Total electronic angular momentum.
    pub J: SpinTotal,
    /// Nuclear spin.
    pub I: SpinTotal,
    pub structure: Structure,
    /// Field-free energy in joules.
    pub energy: f64,
    /// Natural linewidth in rad/s.
    pub linewidth: f64,
    /// Landé g-factor (g_J or g_F); `None` when the relevant total angular
    /// momentum is zero.
    pub g_factor: Option<f64>,
    /// Branching ratios for decay out of this level.
    pub branching: BranchingTable,
}

/// Synthesize the name of a fine- or hyperfine-structure level, e.g. `6S1/2`
/// or `6S1/2 F=1`.
pub fn level_name(n: u32, L: u32, J: SpinTotal, structure: Structure)
    -> IonResult<String>
{
    let label = orbital_label(L)
        .ok_or_else(|| IonError::InvalidOrbitalLabel(L.to_string()))?;
    Ok(
        match structure {
            Structure::Fine => format!("{}{}{}", n, label, J),
            Structure::Hyperfine { F } => format!("{}{}{} F={}", n, label, J, F),
        }
    )
}

/// Name of a Zeeman sublevel of the level `parent`.
pub fn sublevel_name(parent: &str, m: SpinProj) -> String {
    format!("{} m={}", parent, m)
}

/* Capability trait ***********************************************************/

/// Common interface to composite and elementary levels.
pub trait Level {
    /// Unique name of this level.
    fn name(&self) -> &str;

    /// Name of the fine- or hyperfine-structure level this level belongs to.
    ///
    /// Branching ratios are keyed by this name.
    fn manifold(&self) -> &str;

    /// Field-free properties.
    fn info(&self) -> &LevelInfo;

    /// Energy in joules, including any Zeeman shift.
    fn energy(&self) -> f64;

    /// Return the owned Zeeman sublevels if `self` is composite.
    fn zeeman_levels(&self) -> Option<&[ZeemanLevel]>;

    /// Flatten `self` to its elementary sublevels.
    ///
    /// A composite level gives its Zeeman sublevels in ascending m; an
    /// elementary level gives itself.
    fn elementary(&self) -> Vec<&ZeemanLevel>;

    fn has_zeeman_levels(&self) -> bool { self.zeeman_levels().is_some() }

    fn n(&self) -> u32 { self.info().n }

    fn L(&self) -> u32 { self.info().L }

    fn J(&self) -> SpinTotal { self.info().J }

    fn I(&self) -> SpinTotal { self.info().I }

    fn linewidth(&self) -> f64 { self.info().linewidth }

    fn g_factor(&self) -> Option<f64> { self.info().g_factor }

    /// Look up the branching ratio for decay from `self` to the level named
    /// `lower`.
    ///
    /// An absent entry is an error, distinct from a present ratio of zero.
    fn branching_ratio(&self, lower: &str) -> IonResult<f64> {
        self.info().branching.get(lower)
            .copied()
            .ok_or_else(|| IonError::MissingBranchingRatio {
                upper: self.manifold().to_string(),
                lower: lower.to_string(),
            })
    }
}

/* Zeeman sublevels ***********************************************************/

/// A single magnetic sublevel of a fine- or hyperfine-structure level.
///
/// The field-free energy is fixed at construction; the energy in the applied
/// field is computed on read.
#[derive(Clone, Debug, PartialEq)]
pub struct ZeemanLevel {
    name: String,
    parent: String,
    info: LevelInfo,
    spin: Spin,
    B: f64,
}

impl ZeemanLevel {
    /// Magnetic quantum number (m_J or m_F).
    pub fn m(&self) -> SpinProj { self.spin.proj() }

    /// `(total, projection)` pair for the sublevel's angular momentum, i.e.
    /// `(J, m_J)` or `(F, m_F)`.
    pub fn spin(&self) -> Spin { self.spin }

    /// Applied magnetic field in tesla.
    pub fn field(&self) -> f64 { self.B }

    /// Field-free energy in joules.
    pub fn base_energy(&self) -> f64 { self.info.energy }

    /// Energy shift `g m μ_B B` in joules at field `B`.
    pub fn zeeman_shift(&self, B: f64) -> f64 {
        self.info.g_factor.unwrap_or(0.0) * self.m().f() * MU_B * B
    }

    /// Energy in joules at an arbitrary field, independent of the stored one.
    pub fn energy_at(&self, B: f64) -> f64 {
        self.info.energy + self.zeeman_shift(B)
    }

    pub(crate) fn set_field(&mut self, B: f64) { self.B = B; }
}

impl Level for ZeemanLevel {
    fn name(&self) -> &str { &self.name }

    fn manifold(&self) -> &str { &self.parent }

    fn info(&self) -> &LevelInfo { &self.info }

    fn energy(&self) -> f64 { self.energy_at(self.B) }

    fn zeeman_levels(&self) -> Option<&[ZeemanLevel]> { None }

    fn elementary(&self) -> Vec<&ZeemanLevel> { vec![self] }
}

impl fmt::Display for ZeemanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/* Composite levels ***********************************************************/

/// A fine- or hyperfine-structure level owning its Zeeman sublevels.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyLevel {
    name: String,
    info: LevelInfo,
    B: f64,
    sublevels: Vec<ZeemanLevel>,
}

impl EnergyLevel {
    /// Create a new fine-structure level with `2J + 1` sublevels.
    ///
    /// `energy` is in joules and `linewidth` in rad/s. J must satisfy
    /// `|L - 1/2| <= J <= L + 1/2`.
    pub fn fine_structure(
        n: u32,
        L: u32,
        J: SpinTotal,
        I: SpinTotal,
        energy: f64,
        linewidth: f64,
    ) -> IonResult<Self>
    {
        let two_l = 2 * i64::from(L);
        let two_j = i64::from(J.halves());
        if two_j < (two_l - 1).abs() || two_j > two_l + 1 {
            return Err(IonError::InvalidAngularMomentum(J.f()));
        }
        let g_factor = lande_g_j(L, J);
        Self::build(n, L, J, I, Structure::Fine, energy, linewidth, g_factor)
    }

    /// Create a new hyperfine-structure level with `2F + 1` sublevels.
    ///
    /// F must be reachable by coupling J and I.
    #[allow(clippy::too_many_arguments)]
    pub fn hyperfine_structure(
        n: u32,
        L: u32,
        J: SpinTotal,
        I: SpinTotal,
        F: SpinTotal,
        energy: f64,
        linewidth: f64,
    ) -> IonResult<Self>
    {
        let (j, i, f)
            = (i64::from(J.halves()), i64::from(I.halves()), i64::from(F.halves()));
        if f < (j - i).abs() || f > j + i || (j + i - f) % 2 != 0 {
            return Err(IonError::InvalidAngularMomentum(F.f()));
        }
        let g_factor = lande_g_f(J, I, F);
        Self::build(
            n, L, J, I, Structure::Hyperfine { F }, energy, linewidth, g_factor)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        n: u32,
        L: u32,
        J: SpinTotal,
        I: SpinTotal,
        structure: Structure,
        energy: f64,
        linewidth: f64,
        g_factor: Option<f64>,
    ) -> IonResult<Self>
    {
        let name = level_name(n, L, J, structure)?;
        let info = LevelInfo {
            n, L, J, I, structure, energy, linewidth, g_factor,
            branching: BranchingTable::new(),
        };
        let sublevels: Vec<ZeemanLevel>
            = structure.sublevel_total(J).projections()
            .map(|spin| ZeemanLevel {
                name: sublevel_name(&name, spin.proj()),
                parent: name.clone(),
                info: info.clone(),
                spin,
                B: 0.0,
            })
            .collect();
        Ok(Self { name, info, B: 0.0, sublevels })
    }

    pub fn structure(&self) -> Structure { self.info.structure }

    /// Total angular momentum F for hyperfine levels.
    pub fn F(&self) -> Option<SpinTotal> {
        match self.info.structure {
            Structure::Fine => None,
            Structure::Hyperfine { F } => Some(F),
        }
    }

    /// Number of Zeeman sublevels.
    pub fn num_sublevels(&self) -> usize { self.sublevels.len() }

    /// Get the Zeeman sublevel with magnetic quantum number `m`.
    pub fn zeeman_level(&self, m: SpinProj) -> Option<&ZeemanLevel> {
        self.sublevels.iter().find(|z| z.m() == m)
    }

    /// Get the index of the Zeeman sublevel with magnetic quantum number `m`.
    pub fn zeeman_index(&self, m: SpinProj) -> Option<usize> {
        self.sublevels.iter().position(|z| z.m() == m)
    }

    /// Currently applied magnetic field in tesla.
    pub fn field(&self) -> f64 { self.B }

    /// Apply a magnetic field `B` (tesla) to every owned Zeeman sublevel.
    ///
    /// Sublevel energies are always derived from the field-free energy, so
    /// repeated application is idempotent.
    pub fn apply_magnetic_field(&mut self, B: f64) {
        self.B = B;
        self.sublevels.iter_mut().for_each(|z| z.set_field(B));
    }

    /// Set the branching ratio for decay to the level named `lower`,
    /// replacing any previous entry for it.
    ///
    /// Fails without modifying the table if `ratio` is outside `[0, 1]` or
    /// if the ratios out of this level would then sum to more than 1.
    pub fn set_branching_ratio(&mut self, lower: &str, ratio: f64)
        -> IonResult<()>
    {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(IonError::InvalidBranchingRatio {
                upper: self.name.clone(),
                lower: lower.to_string(),
                ratio,
            });
        }
        let replaced = self.info.branching.get(lower).copied().unwrap_or(0.0);
        let total = self.branching_total() - replaced + ratio;
        if total > 1.0 + BRANCHING_SUM_TOL {
            return Err(IonError::BranchingRatioOverflow {
                upper: self.name.clone(),
                total,
            });
        }
        self.info.branching.insert(lower.to_string(), ratio);
        self.sublevels.iter_mut()
            .for_each(|z| { z.info.branching.insert(lower.to_string(), ratio); });
        Ok(())
    }

    /// Sum of all branching ratios out of this level.
    pub fn branching_total(&self) -> f64 {
        self.info.branching.values().sum()
    }
}

impl Level for EnergyLevel {
    fn name(&self) -> &str { &self.name }

    fn manifold(&self) -> &str { &self.name }

    fn info(&self) -> &LevelInfo { &self.info }

    fn energy(&self) -> f64 { self.info.energy }

    fn zeeman_levels(&self) -> Option<&[ZeemanLevel]> { Some(&self.sublevels) }

    fn elementary(&self) -> Vec<&ZeemanLevel> { self.sublevels.iter().collect() }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
