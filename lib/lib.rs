#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Energy-level structure of trapped ions and the laser couplings between
//! their Zeeman sublevels.

pub mod error;
pub mod consts;
pub mod spin;
pub mod gfactors;
pub mod level;
pub mod polarization;
pub mod laser;
pub mod transition;
pub mod ion;
pub mod hilbert;
pub mod experiment;
pub mod config;

pub use error::{ IonError, IonResult };
pub use level::{ EnergyLevel, Level, ZeemanLevel };
pub use polarization::Polarization;
pub use laser::Laser;
pub use transition::{ Transition, TransitionOrder };
pub use ion::Ion;
pub use experiment::{ Coupling, Experiment, LevelSelector, SublevelKey };
pub use config::ExperimentConfig;
