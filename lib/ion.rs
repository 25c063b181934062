//! Ions, their level structure, and the on-disk ion library format.
//!
//! Library files live at `{library}/{species}_II/{species}-{mass}.json` and are
//! deserialized into an [`IonRecord`].

use std::{
    f64::consts::TAU,
    fs,
    path::{ Path, PathBuf },
};
use indexmap::IndexMap;
use serde::{ Deserialize, Serialize };
use crate::{
    consts::H,
    error::{ IonError, IonResult },
    level::{ orbital_from_label, EnergyLevel, Level, ZeemanLevel },
    spin::{ SpinProj, SpinTotal },
};

pub use crate::level::BRANCHING_SUM_TOL;

/* Library records ************************************************************/

/// Coupling scheme of a level record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum LevelOrder {
    FineStructure,
    HyperfineStructure,
}

/// A single energy level as stored in the ion library.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LevelRecord {
    pub order: LevelOrder,
    pub n: u32,
    /// Orbital letter (`S`, `P`, `D`, ...).
    pub L: String,
    pub J: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub F: Option<f64>,
    /// Field-free energy above the ground state, in Hz.
    #[serde(rename = "energy_Hz")]
    pub energy_hz: f64,
    /// Natural linewidth, in units of 2π Hz.
    #[serde(rename = "line_width_2pi_Hz", alias = "line_width_2π_Hz")]
    pub line_width: f64,
}

/// A branching ratio as stored in the ion library.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BranchingRecord {
    pub upper_level: String,
    pub lower_level: String,
    pub branching_ratio: f64,
}

/// Contents of one ion-library file.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IonRecord {
    #[serde(default)]
    pub nuclear_spin: f64,
    pub energy_levels: Vec<LevelRecord>,
    #[serde(default)]
    pub branching_ratios: Vec<BranchingRecord>,
}

impl LevelRecord {
    /// Convert to an [`EnergyLevel`] for an ion with nuclear spin `I`.
    pub fn to_level(&self, I: SpinTotal) -> IonResult<EnergyLevel> {
        let L = orbital_from_label(&self.L)?;
        let J = SpinTotal::try_from_f64(self.J)?;
        let energy = H * self.energy_hz;
        let linewidth = TAU * self.line_width;
        match self.order {
            LevelOrder::FineStructure => {
                EnergyLevel::fine_structure(self.n, L, J, I, energy, linewidth)
            },
            LevelOrder::HyperfineStructure => {
                let F = self.F
                    .ok_or_else(|| {
                        IonError::MissingHyperfineNumber(
                            format!("{}{}{}", self.n, self.L, J))
                    })
                    .and_then(SpinTotal::try_from_f64)?;
                EnergyLevel::hyperfine_structure(
                    self.n, L, J, I, F, energy, linewidth)
            },
        }
    }
}

/// Path of the library file for a given isotope.
pub fn library_path<P>(library: P, species: &str, mass_number: u32) -> PathBuf
where P: AsRef<Path>
{
    library.as_ref()
        .join(format!("{}_II", species))
        .join(format!("{}-{}.json", species, mass_number))
}

/* Ions ***********************************************************************/

/// A singly charged ion of a particular isotope.
///
/// The ion exclusively owns its levels (and, through them, the branching-ratio
/// table) and is the only place the applied magnetic field is changed.
#[derive(Clone, Debug, PartialEq)]
pub struct Ion {
    species: String,
    mass_number: u32,
    I: SpinTotal,
    levels: IndexMap<String, EnergyLevel>,
    B: f64,
}

impl Ion {
    /// Create a new ion with no levels.
    pub fn new(species: &str, mass_number: u32, I: SpinTotal) -> Self {
        Self {
            species: species.to_string(),
            mass_number,
            I,
            levels: IndexMap::new(),
            B: 0.0,
        }
    }

    /// Build an ion from a library record.
    pub fn from_record(species: &str, mass_number: u32, record: &IonRecord)
        -> IonResult<Self>
    {
        let I = SpinTotal::try_from_f64(record.nuclear_spin)?;
        let mut ion = Self::new(species, mass_number, I);
        for level_rec in record.energy_levels.iter() {
            ion.add_level(level_rec.to_level(I)?)?;
        }
        for br in record.branching_ratios.iter() {
            let seen = ion.level(&br.upper_level)?
                .info().branching.contains_key(&br.lower_level);
            if seen {
                return Err(IonError::DuplicateBranchingRatio {
                    upper: br.upper_level.clone(),
                    lower: br.lower_level.clone(),
                });
            }
            ion.set_branching_ratio(
                &br.upper_level, &br.lower_level, br.branching_ratio)?;
        }
        ion.check_branching()?;
        log::debug!(
            "loaded {}-{}: {} levels, {} branching ratios",
            species, mass_number, ion.levels.len(), record.branching_ratios.len(),
        );
        Ok(ion)
    }

    /// Build an ion from the JSON contents of a library file.
    pub fn from_json_str(species: &str, mass_number: u32, json: &str)
        -> IonResult<Self>
    {
        let record: IonRecord = serde_json::from_str(json)?;
        Self::from_record(species, mass_number, &record)
    }

    /// Load an ion from the library directory `library`.
    pub fn load<P>(library: P, species: &str, mass_number: u32)
        -> IonResult<Self>
    where P: AsRef<Path>
    {
        let path = library_path(library, species, mass_number);
        log::debug!("reading ion library file {}", path.display());
        let json = fs::read_to_string(&path)?;
        Self::from_json_str(species, mass_number, &json)
    }

    pub fn species(&self) -> &str { &self.species }

    pub fn mass_number(&self) -> u32 { self.mass_number }

    /// Nuclear spin.
    pub fn I(&self) -> SpinTotal { self.I }

    /// Currently applied magnetic field in tesla.
    pub fn field(&self) -> f64 { self.B }

    /// Add a level, which immediately sees the ion's applied field.
    pub fn add_level(&mut self, mut level: EnergyLevel) -> IonResult<()> {
        if self.levels.contains_key(level.name()) {
            return Err(IonError::DuplicateLevel(level.name().to_string()));
        }
        level.apply_magnetic_field(self.B);
        self.levels.insert(level.name().to_string(), level);
        Ok(())
    }

    /// Set the branching ratio for decay from `upper` to `lower`.
    ///
    /// Both levels must exist, and the ratios out of `upper` must still sum to
    /// at most 1 afterwards; on failure nothing is changed.
    pub fn set_branching_ratio(&mut self, upper: &str, lower: &str, ratio: f64)
        -> IonResult<()>
    {
        if !self.levels.contains_key(lower) {
            return Err(IonError::UnknownLevel(lower.to_string()));
        }
        self.levels.get_mut(upper)
            .ok_or_else(|| IonError::UnknownLevel(upper.to_string()))?
            .set_branching_ratio(lower, ratio)
    }

    /// Check that branching ratios out of every level sum to at most 1.
    pub fn check_branching(&self) -> IonResult<()> {
        self.levels.values()
            .map(|level| (level, level.branching_total()))
            .find(|(_, total)| *total > 1.0 + BRANCHING_SUM_TOL)
            .map_or(Ok(()), |(level, total)| {
                Err(IonError::BranchingRatioOverflow {
                    upper: level.name().to_string(),
                    total,
                })
            })
    }

    /// Iterate over all levels in insertion order.
    pub fn levels(&self) -> impl Iterator<Item = &EnergyLevel> + '_ {
        self.levels.values()
    }

    pub fn num_levels(&self) -> usize { self.levels.len() }

    /// Get a level by name.
    pub fn level(&self, name: &str) -> IonResult<&EnergyLevel> {
        self.levels.get(name)
            .ok_or_else(|| IonError::UnknownLevel(name.to_string()))
    }

    /// Get a level by insertion index.
    pub fn level_index(&self, index: usize) -> Option<&EnergyLevel> {
        self.levels.get_index(index).map(|(_, level)| level)
    }

    /// Get the Zeeman sublevel `m` of the level `name`.
    pub fn zeeman_level(&self, name: &str, m: SpinProj)
        -> IonResult<&ZeemanLevel>
    {
        self.level(name)?
            .zeeman_level(m)
            .ok_or_else(|| IonError::UnknownSublevel {
                level: name.to_string(),
                m: m.to_string(),
            })
    }

    /// Apply a magnetic field `B` (tesla) to every level and its sublevels.
    pub fn apply_magnetic_field(&mut self, B: f64) {
        self.B = B;
        self.levels.values_mut()
            .for_each(|level| level.apply_magnetic_field(B));
        log::debug!("applied B = {:e} T to {}-{}", B, self.species, self.mass_number);
    }
}
