//! Assembly of lasers and driven transitions on a single ion, and the
//! hand-off to a dynamics solver.
//!
//! An [`Experiment`] owns its [`Ion`] and lasers, and stores each driven
//! sublevel pair by name so that every coupling can be re-derived when the
//! magnetic field changes.

use std::{ fmt, ptr, str::FromStr, sync::OnceLock };
use ndarray::{ self as nd, s };
use num_complex::Complex64 as C64;
use regex::Regex;
use rustc_hash::FxHashSet as HashSet;
use crate::{
    consts::HBAR,
    error::{ IonError, IonResult },
    hilbert::Basis,
    ion::Ion,
    laser::Laser,
    level::{ sublevel_name, EnergyLevel, Level, ZeemanLevel },
    spin::SpinProj,
    transition::{ transitions_between, Transition, TransitionOrder },
};

/* Level selection ************************************************************/

const SUBLEVEL_PATTERN: &str = r"^(?P<level>.+?)\s+m=(?P<m>[+-]?\d+(?:/2)?)$";

static SUBLEVEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn sublevel_regex() -> &'static Regex {
    SUBLEVEL_REGEX.get_or_init(|| {
        Regex::new(SUBLEVEL_PATTERN).expect("sublevel selector pattern is valid")
    })
}

fn parse_proj(m: &str) -> Option<SpinProj> {
    match m.strip_suffix("/2") {
        Some(halves) => halves.parse::<i32>().ok().map(SpinProj::new),
        None => m.parse::<i32>().ok()
            .and_then(|whole| whole.checked_mul(2))
            .map(SpinProj::new),
    }
}

/// Reference to either a composite level or a single Zeeman sublevel of an
/// ion, by name.
///
/// As a string, `"<level>"` selects a composite level (e.g. `"6S1/2"` or
/// `"2S1/2 F=1"`) and `"<level> m=<m>"` selects one of its sublevels (e.g.
/// `"6S1/2 m=-1/2"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LevelSelector {
    Level(String),
    Sublevel(String, SpinProj),
}

impl LevelSelector {
    /// Parse a selector string.
    pub fn parse(selector: &str) -> IonResult<Self> {
        let malformed = || IonError::MalformedSelector(selector.to_string());
        let trimmed = selector.trim();
        if trimmed.is_empty() { return Err(malformed()); }
        if let Some(caps) = sublevel_regex().captures(trimmed) {
            let m = parse_proj(&caps["m"]).ok_or_else(malformed)?;
            Ok(Self::Sublevel(caps["level"].to_string(), m))
        } else if trimmed.contains("m=") {
            Err(malformed())
        } else {
            Ok(Self::Level(trimmed.to_string()))
        }
    }

    /// Name of the composite level being referenced.
    pub fn level_name(&self) -> &str {
        match self {
            Self::Level(name) => name,
            Self::Sublevel(name, _) => name,
        }
    }

    /// Look up the referenced level in `ion`.
    pub fn resolve<'a>(&self, ion: &'a Ion) -> IonResult<&'a dyn Level> {
        match self {
            Self::Level(name) => Ok(ion.level(name)? as &dyn Level),
            Self::Sublevel(name, m) => Ok(ion.zeeman_level(name, *m)? as &dyn Level),
        }
    }
}

impl fmt::Display for LevelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(name) => write!(f, "{}", name),
            Self::Sublevel(name, m) => write!(f, "{}", sublevel_name(name, *m)),
        }
    }
}

impl FromStr for LevelSelector {
    type Err = IonError;

    fn from_str(s: &str) -> IonResult<Self> { Self::parse(s) }
}

impl TryFrom<&str> for LevelSelector {
    type Error = IonError;

    fn try_from(s: &str) -> IonResult<Self> { Self::parse(s) }
}

impl TryFrom<&String> for LevelSelector {
    type Error = IonError;

    fn try_from(s: &String) -> IonResult<Self> { Self::parse(s) }
}

impl From<&EnergyLevel> for LevelSelector {
    fn from(level: &EnergyLevel) -> Self { Self::Level(level.name().to_string()) }
}

impl From<&ZeemanLevel> for LevelSelector {
    fn from(level: &ZeemanLevel) -> Self {
        Self::Sublevel(level.manifold().to_string(), level.m())
    }
}

impl From<SublevelKey> for LevelSelector {
    fn from(key: SublevelKey) -> Self { Self::Sublevel(key.level, key.m) }
}

/// Name-based key for a single Zeeman sublevel of an ion.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SublevelKey {
    pub level: String,
    pub m: SpinProj,
}

impl SublevelKey {
    pub fn new(level: &str, m: SpinProj) -> Self {
        Self { level: level.to_string(), m }
    }

    /// Look up the referenced sublevel in `ion`.
    pub fn resolve<'a>(&self, ion: &'a Ion) -> IonResult<&'a ZeemanLevel> {
        ion.zeeman_level(&self.level, self.m)
    }
}

impl From<&ZeemanLevel> for SublevelKey {
    fn from(level: &ZeemanLevel) -> Self { Self::new(level.manifold(), level.m()) }
}

impl fmt::Display for SublevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", sublevel_name(&self.level, self.m))
    }
}

/* Couplings ******************************************************************/

/// Owned record of a single laser-driven transition, with the sublevels given
/// as indices into [`Experiment::basis`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coupling {
    pub lower: usize,
    pub upper: usize,
    pub laser: usize,
    pub order: TransitionOrder,
    /// rad/s
    pub linewidth: f64,
    pub branching_ratio: f64,
    /// rad/s
    pub rabi_frequency: C64,
    /// `ω_L - ω_0` in rad/s.
    pub detuning: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct DrivenPair {
    laser: usize,
    lower: SublevelKey,
    upper: SublevelKey,
}

impl DrivenPair {
    // order-independent identity of a pair
    fn tag(&self) -> (usize, SublevelKey, SublevelKey) {
        if self.lower <= self.upper {
            (self.laser, self.lower.clone(), self.upper.clone())
        } else {
            (self.laser, self.upper.clone(), self.lower.clone())
        }
    }
}

/* Experiments ****************************************************************/

/// A set of lasers driving transitions between the sublevels of one ion.
#[derive(Clone, Debug)]
pub struct Experiment {
    ion: Ion,
    lasers: Vec<Laser>,
    driven: Vec<DrivenPair>,
    seen: HashSet<(usize, SublevelKey, SublevelKey)>,
    basis: Basis<SublevelKey>,
    couplings: Vec<Coupling>,
}

impl Experiment {
    /// Create a new experiment, applying the field `B` (tesla) to `ion`.
    pub fn new(mut ion: Ion, B: f64) -> Self {
        ion.apply_magnetic_field(B);
        Self {
            ion,
            lasers: Vec::new(),
            driven: Vec::new(),
            seen: HashSet::default(),
            basis: Basis::new(),
            couplings: Vec::new(),
        }
    }

    pub fn ion(&self) -> &Ion { &self.ion }

    /// Applied magnetic field in tesla.
    pub fn field(&self) -> f64 { self.ion.field() }

    /// Register a laser, returning its index.
    pub fn add_laser(&mut self, laser: Laser) -> usize {
        self.lasers.push(laser);
        self.lasers.len() - 1
    }

    pub fn lasers(&self) -> &[Laser] { &self.lasers }

    pub fn laser(&self, index: usize) -> IonResult<&Laser> {
        self.lasers.get(index).ok_or(IonError::UnknownLaser(index))
    }

    /// Drive every pair of elementary sublevels drawn from `a` and `b` with
    /// the laser at index `laser`.
    ///
    /// Pairs already driven by the same laser are skipped. Either every new
    /// pair is registered or, on error, none are. Returns the number of pairs
    /// added.
    pub fn add_transition<SA, SB>(&mut self, laser: usize, a: SA, b: SB)
        -> IonResult<usize>
    where
        SA: TryInto<LevelSelector>,
        SB: TryInto<LevelSelector>,
        IonError: From<SA::Error> + From<SB::Error>,
    {
        let a: LevelSelector = a.try_into()?;
        let b: LevelSelector = b.try_into()?;
        let laser_ref = self.lasers.get(laser).ok_or(IonError::UnknownLaser(laser))?;
        let level_a = a.resolve(&self.ion)?;
        let level_b = b.resolve(&self.ion)?;
        let expanded
            = transitions_between(level_a, level_b, laser_ref, self.ion.field())?;

        let mut seen = self.seen.clone();
        let mut added: Vec<DrivenPair> = Vec::new();
        for transition in expanded.iter() {
            let pair = DrivenPair {
                laser,
                lower: SublevelKey::from(transition.lower()),
                upper: SublevelKey::from(transition.upper()),
            };
            if !seen.insert(pair.tag()) {
                log::warn!(
                    "skipping duplicate transition {} -> {} (laser {})",
                    pair.lower, pair.upper, laser,
                );
                continue;
            }
            if transition.branching_ratio() == 0.0 {
                log::warn!(
                    "transition {} -> {} has zero branching ratio; its Rabi frequency vanishes",
                    pair.lower, pair.upper,
                );
            }
            added.push(pair);
        }

        let num_added = added.len();
        let mut driven = self.driven.clone();
        driven.extend(added);
        let (basis, couplings) = derive_couplings(&self.ion, &self.lasers, &driven)?;
        self.driven = driven;
        self.seen = seen;
        self.basis = basis;
        self.couplings = couplings;
        log::debug!(
            "added {} transitions between {} and {} (laser {}); {} couplings over {} sublevels",
            num_added, a, b, laser, self.couplings.len(), self.basis.len(),
        );
        Ok(num_added)
    }

    /// Change the applied magnetic field and re-derive every coupling.
    ///
    /// On error the previous field and couplings are left in place.
    pub fn set_magnetic_field(&mut self, B: f64) -> IonResult<()> {
        let prev = self.ion.field();
        self.ion.apply_magnetic_field(B);
        match derive_couplings(&self.ion, &self.lasers, &self.driven) {
            Ok((basis, couplings)) => {
                self.basis = basis;
                self.couplings = couplings;
                Ok(())
            },
            Err(err) => {
                self.ion.apply_magnetic_field(prev);
                Err(err)
            },
        }
    }

    /// Iterate over the driven sublevels in basis order.
    pub fn levels(&self) -> impl Iterator<Item = &SublevelKey> + '_ {
        self.basis.keys()
    }

    pub fn num_levels(&self) -> usize { self.basis.len() }

    /// Index of a sublevel in basis order.
    pub fn level_index(&self, key: &SublevelKey) -> Option<usize> {
        self.basis.get_index_of(key)
    }

    /// The driven sublevels with their energies in angular frequency (E/ħ).
    pub fn basis(&self) -> &Basis<SublevelKey> { &self.basis }

    pub fn couplings(&self) -> &[Coupling] { &self.couplings }

    /// Rebuild borrowed [`Transition`]s for every coupling, in the same order
    /// as [`Self::couplings`].
    pub fn transitions(&self) -> IonResult<Vec<Transition<'_>>> {
        self.driven.iter()
            .map(|pair| {
                Transition::new(
                    pair.lower.resolve(&self.ion)?,
                    pair.upper.resolve(&self.ion)?,
                    self.laser(pair.laser)?,
                    self.ion.field(),
                )
            })
            .collect()
    }

    /// Compute the interaction-picture Hamiltonian (ħ = 1) at time `t` in the
    /// rotating-wave approximation.
    ///
    /// Each coupling contributes `Ω/2 exp(-iΔt)` at `[upper, lower]` and its
    /// conjugate at `[lower, upper]`; the diagonal is zero.
    pub fn hamiltonian_at(&self, t: f64) -> nd::Array2<C64> {
        let n = self.basis.len();
        let mut H: nd::Array2<C64> = nd::Array2::zeros((n, n));
        let mut drive: C64;
        for c in self.couplings.iter() {
            drive = 0.5 * c.rabi_frequency * (-C64::i() * c.detuning * t).exp();
            H[[c.upper, c.lower]] += drive;
            H[[c.lower, c.upper]] += drive.conj();
        }
        H
    }

    /// Compute the interaction-picture Hamiltonian as a 3D array, with the
    /// last axis corresponding to time.
    pub fn hamiltonian(&self, time: &nd::Array1<f64>) -> nd::Array3<C64> {
        let n = self.basis.len();
        let nt = time.len();
        let mut H: nd::Array3<C64> = nd::Array3::zeros((n, n, nt));
        let mut drive: nd::Array1<C64>;
        for c in self.couplings.iter() {
            drive
                = time.mapv(|t| {
                    0.5 * c.rabi_frequency * (-C64::i() * c.detuning * t).exp()
                });
            H.slice_mut(s![c.upper, c.lower, ..])
                .zip_mut_with(&drive, |h, d| *h += *d);
            H.slice_mut(s![c.lower, c.upper, ..])
                .zip_mut_with(&drive, |h, d| *h += d.conj());
        }
        H
    }
}

fn derive_couplings(ion: &Ion, lasers: &[Laser], driven: &[DrivenPair])
    -> IonResult<(Basis<SublevelKey>, Vec<Coupling>)>
{
    let B = ion.field();
    let mut basis: Basis<SublevelKey> = Basis::new();
    let mut couplings: Vec<Coupling> = Vec::with_capacity(driven.len());
    for pair in driven.iter() {
        let laser = lasers.get(pair.laser)
            .ok_or(IonError::UnknownLaser(pair.laser))?;
        let za = pair.lower.resolve(ion)?;
        let zb = pair.upper.resolve(ion)?;
        let (ia, _) = basis.insert_full(pair.lower.clone(), za.energy() / HBAR);
        let (ib, _) = basis.insert_full(pair.upper.clone(), zb.energy() / HBAR);
        let transition = Transition::new(za, zb, laser, B)?;
        let (lower, upper)
            = if ptr::eq(transition.lower(), za) { (ia, ib) } else { (ib, ia) };
        couplings.push(Coupling {
            lower,
            upper,
            laser: pair.laser,
            order: transition.order(),
            linewidth: transition.linewidth(),
            branching_ratio: transition.branching_ratio(),
            rabi_frequency: transition.rabi_frequency(),
            detuning: transition.detuning(),
        });
    }
    Ok((basis, couplings))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::TAU;
    use assert_approx_eq::assert_approx_eq;
    use nalgebra::Vector3;
    use num_traits::Zero;
    use crate::{
        consts::{ GAUSS, H as PLANCK, THZ },
        polarization::Polarization,
    };

    const ION: &str = r#"{
        "nuclear_spin": 0,
        "energy_levels": [
            {"order": "FineStructure", "n": 6, "L": "S", "J": 0.5,
             "energy_Hz": 0.0, "line_width_2pi_Hz": 0.0},
            {"order": "FineStructure", "n": 6, "L": "P", "J": 0.5,
             "energy_Hz": 607.0e12, "line_width_2pi_Hz": 2.0e7}
        ],
        "branching_ratios": [
            {"upper_level": "6P1/2", "lower_level": "6S1/2", "branching_ratio": 1.0}
        ]
    }"#;

    fn experiment(B: f64) -> Experiment {
        let ion = Ion::from_json_str("Ba", 138, ION).unwrap();
        let mut exp = Experiment::new(ion, B);
        let pol = Polarization::sigma_plus(Vector3::z()).unwrap();
        exp.add_laser(Laser::new(607.0 * THZ, 100.0, 0.0, pol).unwrap());
        exp
    }

    fn half(m: i32) -> SpinProj { SpinProj::new(m) }

    #[test]
    fn selector_parsing() {
        assert_eq!(
            LevelSelector::parse("6S1/2").unwrap(),
            LevelSelector::Level("6S1/2".into()),
        );
        assert_eq!(
            "  6S1/2 m=-1/2 ".parse::<LevelSelector>().unwrap(),
            LevelSelector::Sublevel("6S1/2".into(), half(-1)),
        );
        assert_eq!(
            LevelSelector::parse("2S1/2 F=1 m=+1").unwrap(),
            LevelSelector::Sublevel("2S1/2 F=1".into(), half(2)),
        );
        assert_eq!(
            LevelSelector::parse("2S1/2 F=1").unwrap(),
            LevelSelector::Level("2S1/2 F=1".into()),
        );
        for bad in ["", "   ", "6S1/2 m=x", "6S1/2 m=1/3"] {
            assert!(matches!(
                LevelSelector::parse(bad),
                Err(IonError::MalformedSelector(_))
            ));
        }
        let sel = LevelSelector::Sublevel("6P1/2".into(), half(1));
        assert_eq!(sel.to_string(), "6P1/2 m=1/2");
        assert_eq!(LevelSelector::parse(&sel.to_string()).unwrap(), sel);
        assert!(ptr::eq(sublevel_regex(), sublevel_regex()));
    }

    #[test]
    fn selector_resolution() {
        let ion = Ion::from_json_str("Ba", 138, ION).unwrap();
        let level = LevelSelector::parse("6P1/2").unwrap().resolve(&ion).unwrap();
        assert!(level.has_zeeman_levels());
        let sub = LevelSelector::parse("6P1/2 m=-1/2").unwrap().resolve(&ion).unwrap();
        assert!(!sub.has_zeeman_levels());
        assert_eq!(sub.name(), "6P1/2 m=-1/2");
        assert!(matches!(
            LevelSelector::parse("5D3/2").unwrap().resolve(&ion),
            Err(IonError::UnknownLevel(_))
        ));
        assert!(matches!(
            LevelSelector::parse("6P1/2 m=3/2").unwrap().resolve(&ion),
            Err(IonError::UnknownSublevel { .. })
        ));
    }

    #[test]
    fn composite_expansion() {
        let mut exp = experiment(0.0);
        assert_eq!(exp.add_transition(0, "6S1/2", "6P1/2").unwrap(), 4);
        assert_eq!(exp.num_levels(), 4);
        assert_eq!(exp.couplings().len(), 4);
        for c in exp.couplings() {
            let lower = exp.basis().get_index(c.lower).unwrap().0;
            let upper = exp.basis().get_index(c.upper).unwrap().0;
            assert_eq!(lower.level, "6S1/2");
            assert_eq!(upper.level, "6P1/2");
            if upper.m.halves() - lower.m.halves() == 2 {
                assert!(c.rabi_frequency.norm() > 0.0);
            } else {
                assert_eq!(c.rabi_frequency, C64::zero());
            }
        }
        let ts = exp.transitions().unwrap();
        assert_eq!(ts.len(), 4);
        assert_eq!(ts[1].rabi_frequency(), exp.couplings()[1].rabi_frequency);
    }

    #[test]
    fn duplicates_are_skipped() {
        let mut exp = experiment(0.0);
        let ion = Ion::from_json_str("Ba", 138, ION).unwrap();
        exp.add_transition(0, "6S1/2 m=-1/2", "6P1/2 m=1/2").unwrap();
        assert_eq!(exp.add_transition(0, "6P1/2 m=1/2", "6S1/2 m=-1/2").unwrap(), 0);
        let s = ion.level("6S1/2").unwrap();
        let p_up = ion.zeeman_level("6P1/2", half(1)).unwrap();
        assert_eq!(exp.add_transition(0, s, p_up).unwrap(), 1);
        assert_eq!(exp.couplings().len(), 2);
        assert_eq!(exp.add_transition(0, "6S1/2", "6P1/2").unwrap(), 2);
        assert_eq!(exp.couplings().len(), 4);
        // same pair, different laser
        let laser = exp.laser(0).unwrap().clone();
        let second = exp.add_laser(laser);
        assert_eq!(exp.add_transition(second, "6S1/2 m=-1/2", "6P1/2 m=1/2").unwrap(), 1);
        assert_eq!(exp.couplings().len(), 5);
        assert_eq!(exp.num_levels(), 4);
    }

    #[test]
    fn failed_additions_change_nothing() {
        let mut exp = experiment(0.0);
        exp.add_transition(0, "6S1/2 m=-1/2", "6P1/2 m=1/2").unwrap();
        let before = exp.couplings().to_vec();
        assert!(matches!(
            exp.add_transition(1, "6S1/2", "6P1/2"),
            Err(IonError::UnknownLaser(1))
        ));
        assert!(matches!(
            exp.add_transition(0, "6S1/2", "5D3/2"),
            Err(IonError::UnknownLevel(_))
        ));
        assert!(exp.add_transition(0, "6S1/2", "6S1/2").is_err());
        assert!(matches!(
            exp.add_transition(0, "6S1/2 m=", "6P1/2"),
            Err(IonError::MalformedSelector(_))
        ));
        assert_eq!(exp.couplings(), before.as_slice());
        assert_eq!(exp.num_levels(), 2);
    }

    #[test]
    fn field_changes_rederive_couplings() {
        let mut exp = experiment(0.0);
        exp.add_transition(0, "6S1/2 m=-1/2", "6P1/2 m=1/2").unwrap();
        let at_zero = exp.couplings()[0];
        let basis_zero = exp.basis().clone();
        assert_approx_eq!(at_zero.detuning / TAU, 0.0, 1.0);

        let B = 10.0 * GAUSS;
        exp.set_magnetic_field(B).unwrap();
        assert_eq!(exp.field(), B);
        let lower = exp.ion().zeeman_level("6S1/2", half(-1)).unwrap();
        let upper = exp.ion().zeeman_level("6P1/2", half(1)).unwrap();
        let laser = exp.laser(0).unwrap();
        let expected = laser.angular_frequency() - (upper.energy() - lower.energy()) / HBAR;
        let c = exp.couplings()[0];
        assert_approx_eq!(c.detuning, expected, 1.0);
        assert!(c.detuning < at_zero.detuning);
        assert_eq!(c.rabi_frequency, at_zero.rabi_frequency);
        let k = exp.level_index(&SublevelKey::new("6P1/2", half(1))).unwrap();
        assert_approx_eq!(exp.basis().energy_at(k).unwrap(), upper.energy() / HBAR, 1.0);

        exp.set_magnetic_field(0.0).unwrap();
        assert_eq!(exp.couplings()[0], at_zero);
        assert_eq!(exp.basis(), &basis_zero);
    }

    #[test]
    fn failed_field_change_restores_previous_state() {
        let json = ION.replace("607.0e12", "0.0");
        let ion = Ion::from_json_str("Ba", 138, &json).unwrap();
        let B = 1.0 * GAUSS;
        let mut exp = Experiment::new(ion, B);
        exp.add_laser(Laser::new(
            1.0 * THZ, 1.0, 0.0, Polarization::pi(Vector3::x()).unwrap()).unwrap());
        exp.add_transition(0, "6S1/2 m=-1/2", "6P1/2 m=1/2").unwrap();
        let before = exp.couplings().to_vec();
        assert!(matches!(
            exp.set_magnetic_field(0.0),
            Err(IonError::DegenerateEnergyOrdering { .. })
        ));
        assert_eq!(exp.field(), B);
        assert!(exp.ion().levels().flat_map(|l| l.elementary()).all(|z| z.field() == B));
        assert_eq!(exp.couplings(), before.as_slice());
    }

    #[test]
    fn hamiltonian_structure() {
        let mut exp = experiment(5.0 * GAUSS);
        exp.add_transition(0, "6S1/2", "6P1/2").unwrap();
        let n = exp.num_levels();
        let H0 = exp.hamiltonian_at(0.0);
        assert_eq!(H0.dim(), (n, n));
        for i in 0..n {
            assert_eq!(H0[[i, i]], C64::zero());
            for j in 0..n {
                assert_eq!(H0[[i, j]], H0[[j, i]].conj());
            }
        }
        let c = exp.couplings().iter().find(|c| c.rabi_frequency.norm() > 0.0).unwrap();
        assert_eq!(H0[[c.upper, c.lower]], 0.5 * c.rabi_frequency);

        let time = nd::Array1::linspace(0.0, 1e-6, 5);
        let H = exp.hamiltonian(&time);
        assert_eq!(H.dim(), (n, n, 5));
        for (k, t) in time.iter().enumerate() {
            let Ht = exp.hamiltonian_at(*t);
            for ((i, j), h) in Ht.indexed_iter() {
                assert_approx_eq!(H[[i, j, k]].re, h.re, 1e-6 * c.rabi_frequency.norm());
                assert_approx_eq!(H[[i, j, k]].im, h.im, 1e-6 * c.rabi_frequency.norm());
            }
        }
        // energies are E / ħ
        let key = exp.levels().next().unwrap().clone();
        let z = exp.ion().zeeman_level(&key.level, key.m).unwrap();
        assert_approx_eq!(exp.basis()[&key] * HBAR / PLANCK, z.energy() / PLANCK, 1e-3);
    }
}
