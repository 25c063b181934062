//! Monochromatic driving beams.

use std::f64::consts::TAU;
use crate::{
    consts::{ C, EPSILON_0 },
    error::{ IonError, IonResult },
    polarization::Polarization,
};

/// A plane-wave laser beam.
#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    frequency: f64,
    wavelength: f64,
    intensity: f64,
    linewidth: f64,
    polarization: Polarization,
}

impl Laser {
    /// Create a new laser.
    ///
    /// - `frequency`: Hz, finite and positive
    /// - `intensity`: W/m^2, finite and non-negative
    /// - `linewidth`: rad/s, finite and non-negative
    pub fn new(
        frequency: f64,
        intensity: f64,
        linewidth: f64,
        polarization: Polarization,
    ) -> IonResult<Self>
    {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(IonError::InvalidLaser("frequency must be finite and positive"));
        }
        if !(intensity.is_finite() && intensity >= 0.0) {
            return Err(IonError::InvalidLaser("intensity must be finite and non-negative"));
        }
        if !(linewidth.is_finite() && linewidth >= 0.0) {
            return Err(IonError::InvalidLaser("linewidth must be finite and non-negative"));
        }
        Ok(Self {
            frequency,
            wavelength: C / frequency,
            intensity,
            linewidth,
            polarization,
        })
    }

    /// Create a new laser from its vacuum wavelength in meters, which must be
    /// finite and positive.
    pub fn from_wavelength(
        wavelength: f64,
        intensity: f64,
        linewidth: f64,
        polarization: Polarization,
    ) -> IonResult<Self>
    {
        if !(wavelength.is_finite() && wavelength > 0.0) {
            return Err(IonError::InvalidLaser("wavelength must be finite and positive"));
        }
        Self::new(C / wavelength, intensity, linewidth, polarization)
    }

    /// Frequency in Hz.
    pub fn frequency(&self) -> f64 { self.frequency }

    /// Angular frequency in rad/s.
    pub fn angular_frequency(&self) -> f64 { TAU * self.frequency }

    /// Vacuum wavelength in meters.
    pub fn wavelength(&self) -> f64 { self.wavelength }

    /// Intensity in W/m^2.
    pub fn intensity(&self) -> f64 { self.intensity }

    /// Linewidth in rad/s.
    pub fn linewidth(&self) -> f64 { self.linewidth }

    pub fn polarization(&self) -> &Polarization { &self.polarization }

    /// Peak electric field amplitude `sqrt(2 I / (c ε₀))` in V/m.
    pub fn field_amplitude(&self) -> f64 {
        (2.0 * self.intensity / (C * EPSILON_0)).sqrt()
    }
}
