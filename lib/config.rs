//! TOML description of an experiment.
//!
//! ```toml
//! magnetic_field = 5.0e-4
//!
//! [ion]
//! species = "Ba"
//! mass_number = 138
//! library = "ion_library"
//!
//! [[lasers]]
//! wavelength = 493.5e-9
//! intensity = 1.0e3
//! direction = [0.0, 0.0, 1.0]
//! amplitudes = [[-0.7071, 0.0], [0.0, 0.7071]]
//!
//! [[transitions]]
//! laser = 0
//! lower = "6S1/2"
//! upper = "6P1/2 m=1/2"
//! ```

use std::{ fs, path::{ Path, PathBuf } };
use nalgebra::Vector3;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ IonError, IonResult },
    experiment::Experiment,
    ion::Ion,
    laser::Laser,
    polarization::Polarization,
};

/// Which isotope to load, and from where.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IonConfig {
    pub species: String,
    pub mass_number: u32,
    /// Root of the ion library; relative paths are resolved against the
    /// directory of the configuration file when loaded with
    /// [`ExperimentConfig::from_file`].
    #[serde(default = "default_library")]
    pub library: PathBuf,
}

fn default_library() -> PathBuf { PathBuf::from("ion_library") }

/// A single laser. Exactly one of `frequency` (Hz) and `wavelength` (m) must
/// be given.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LaserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wavelength: Option<f64>,
    /// W/m^2
    pub intensity: f64,
    /// rad/s
    #[serde(default)]
    pub linewidth: f64,
    pub direction: [f64; 3],
    /// Transverse field amplitudes as `(re, im)` pairs.
    pub amplitudes: [[f64; 2]; 2],
}

impl LaserConfig {
    pub fn to_laser(&self) -> IonResult<Laser> {
        let [[re0, im0], [re1, im1]] = self.amplitudes;
        let polarization = Polarization::new(
            Vector3::from(self.direction),
            C64::new(re0, im0),
            C64::new(re1, im1),
        )?;
        match (self.frequency, self.wavelength) {
            (Some(f), None) if f > 0.0 => {
                Laser::new(f, self.intensity, self.linewidth, polarization)
            },
            (None, Some(w)) if w > 0.0 => {
                Laser::from_wavelength(w, self.intensity, self.linewidth, polarization)
            },
            (Some(_), Some(_)) => Err(IonError::InvalidConfig(
                "laser has both frequency and wavelength".into())),
            (None, None) => Err(IonError::InvalidConfig(
                "laser has neither frequency nor wavelength".into())),
            _ => Err(IonError::InvalidConfig(
                "laser frequency and wavelength must be positive".into())),
        }
    }
}

/// A transition driven by the laser at index `laser`, between two level
/// selectors (see [`LevelSelector`][crate::experiment::LevelSelector]).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TransitionConfig {
    pub laser: usize,
    pub lower: String,
    pub upper: String,
}

/// Top-level experiment description.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExperimentConfig {
    /// tesla
    #[serde(default)]
    pub magnetic_field: f64,
    pub ion: IonConfig,
    #[serde(default)]
    pub lasers: Vec<LaserConfig>,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

impl ExperimentConfig {
    pub fn from_toml_str(text: &str) -> IonResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn from_file<P>(path: P) -> IonResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        log::debug!("reading experiment configuration {}", path.display());
        let mut config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        if config.ion.library.is_relative() {
            if let Some(dir) = path.parent() {
                config.ion.library = dir.join(&config.ion.library);
            }
        }
        Ok(config)
    }

    /// Load the ion from its library and assemble the experiment.
    pub fn build(&self) -> IonResult<Experiment> {
        let ion = Ion::load(
            &self.ion.library, &self.ion.species, self.ion.mass_number)?;
        self.build_with_ion(ion)
    }

    /// Assemble the experiment around an already loaded ion.
    pub fn build_with_ion(&self, ion: Ion) -> IonResult<Experiment> {
        if ion.species() != self.ion.species
            || ion.mass_number() != self.ion.mass_number
        {
            return Err(IonError::InvalidConfig(format!(
                "configured for {}-{} but given {}-{}",
                self.ion.species, self.ion.mass_number,
                ion.species(), ion.mass_number(),
            )));
        }
        let mut experiment = Experiment::new(ion, self.magnetic_field);
        for laser in self.lasers.iter() {
            experiment.add_laser(laser.to_laser()?);
        }
        for transition in self.transitions.iter() {
            experiment.add_transition(
                transition.laser, &transition.lower, &transition.upper)?;
        }
        log::debug!(
            "built experiment: {} lasers, {} couplings, {} sublevels",
            experiment.lasers().len(),
            experiment.couplings().len(),
            experiment.num_levels(),
        );
        Ok(experiment)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use crate::consts::{ GAUSS, NM };

    const ION: &str = r#"{
        "energy_levels": [
            {"order": "FineStructure", "n": 6, "L": "S", "J": 0.5,
             "energy_Hz": 0.0, "line_width_2pi_Hz": 0.0},
            {"order": "FineStructure", "n": 6, "L": "P", "J": 0.5,
             "energy_Hz": 607.426e12, "line_width_2pi_Hz": 2.01e7}
        ],
        "branching_ratios": [
            {"upper_level": "6P1/2", "lower_level": "6S1/2", "branching_ratio": 0.731}
        ]
    }"#;

    const CONFIG: &str = r#"
        magnetic_field = 5.0e-4

        [ion]
        species = "Ba"
        mass_number = 138

        [[lasers]]
        wavelength = 493.545e-9
        intensity = 1.0e3
        direction = [0.0, 0.0, 1.0]
        amplitudes = [[-0.7071067811865476, 0.0], [0.0, 0.7071067811865476]]

        [[transitions]]
        laser = 0
        lower = "6S1/2"
        upper = "6P1/2"

        [[transitions]]
        laser = 0
        lower = "6S1/2 m=-1/2"
        upper = "6P1/2 m=1/2"
    "#;

    fn ion() -> Ion { Ion::from_json_str("Ba", 138, ION).unwrap() }

    #[test]
    fn parse_and_build() {
        let config = ExperimentConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.ion.library, PathBuf::from("ion_library"));
        assert_eq!(config.lasers[0].linewidth, 0.0);
        let exp = config.build_with_ion(ion()).unwrap();
        assert_approx_eq!(exp.field() / GAUSS, 5.0, 1e-12);
        assert_approx_eq!(exp.laser(0).unwrap().wavelength() / NM, 493.545, 1e-9);
        // second transition is already covered by the first
        assert_eq!(exp.couplings().len(), 4);
        assert_eq!(exp.num_levels(), 4);
    }

    #[test]
    fn laser_frequency_or_wavelength() {
        let mut config = ExperimentConfig::from_toml_str(CONFIG).unwrap();
        config.lasers[0].frequency = Some(607.426e12);
        assert!(matches!(
            config.build_with_ion(ion()),
            Err(IonError::InvalidConfig(_))
        ));
        config.lasers[0].wavelength = None;
        assert!(config.build_with_ion(ion()).is_ok());
        config.lasers[0].frequency = None;
        assert!(matches!(
            config.build_with_ion(ion()),
            Err(IonError::InvalidConfig(_))
        ));
        config.lasers[0].frequency = Some(-1.0);
        assert!(matches!(
            config.build_with_ion(ion()),
            Err(IonError::InvalidConfig(_))
        ));
    }

    #[test]
    fn build_errors() {
        let bad_laser = CONFIG.replace("direction = [0.0, 0.0, 1.0]", "direction = [0.0, 0.0, 0.0]");
        let config = ExperimentConfig::from_toml_str(&bad_laser).unwrap();
        assert!(matches!(
            config.build_with_ion(ion()),
            Err(IonError::InvalidPolarization(_))
        ));

        let bad_index = CONFIG.replacen("laser = 0", "laser = 2", 1);
        let config = ExperimentConfig::from_toml_str(&bad_index).unwrap();
        assert!(matches!(
            config.build_with_ion(ion()),
            Err(IonError::UnknownLaser(2))
        ));

        let wrong_ion = Ion::from_json_str("Yb", 171, ION).unwrap();
        let config = ExperimentConfig::from_toml_str(CONFIG).unwrap();
        assert!(matches!(
            config.build_with_ion(wrong_ion),
            Err(IonError::InvalidConfig(_))
        ));

        assert!(matches!(
            ExperimentConfig::from_toml_str("magnetic_field = 1.0"),
            Err(IonError::Toml(_))
        ));
    }
}
