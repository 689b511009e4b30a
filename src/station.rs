use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::{enu_velocity_to_ecef, GeodeticPoint, Velocity},
    sector::AngularSector,
    signal::FrequencyBand,
};

/// Receiving (sensing) platform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    /// Station name, used in validation diagnostics
    pub name: String,
    /// Geodetic position
    pub position: GeodeticPoint,
    /// Platform velocity. Must be [Velocity::ZERO] for stationary platforms.
    pub velocity: Velocity,
    /// Fixed (non-moving) platform
    pub stationary: bool,
    /// Reception frequency band
    pub band: FrequencyBand,
    /// Reception angular sector
    pub reception_sector: AngularSector,
    /// Receiver noise power spectral density (dBm/Hz)
    pub noise_psd_dbm_hz: f64,
    /// Sample rate (GHz)
    pub sample_rate_ghz: f64,
    /// Interferometer baseline length (meters)
    pub baseline_length_m: f64,
}

impl Station {
    /// Creates a new stationary [Station] with omnidirectional reception.
    /// Refine with the `with_*` builders.
    pub fn new(name: &str, position: GeodeticPoint, band: FrequencyBand) -> Self {
        Self {
            name: name.to_string(),
            position,
            band,
            velocity: Velocity::ZERO,
            stationary: true,
            reception_sector: AngularSector::full(),
            noise_psd_dbm_hz: -160.0,
            sample_rate_ghz: 1.0,
            baseline_length_m: 10.0,
        }
    }

    /// Copies and defines platform motion, clearing the stationary flag.
    pub fn with_velocity(&self, velocity: Velocity) -> Self {
        let mut s = self.clone();
        s.velocity = velocity;
        s.stationary = velocity.is_zero();
        s
    }

    /// Copies and restricts the reception sector.
    pub fn with_reception_sector(&self, sector: AngularSector) -> Self {
        let mut s = self.clone();
        s.reception_sector = sector;
        s
    }

    /// Copies and redefines the receiver noise power spectral density.
    pub fn with_noise_psd_dbm_hz(&self, noise_psd_dbm_hz: f64) -> Self {
        let mut s = self.clone();
        s.noise_psd_dbm_hz = noise_psd_dbm_hz;
        s
    }

    /// Copies and redefines the sample rate.
    pub fn with_sample_rate_ghz(&self, sample_rate_ghz: f64) -> Self {
        let mut s = self.clone();
        s.sample_rate_ghz = sample_rate_ghz;
        s
    }

    /// Copies and redefines the interferometer baseline length.
    pub fn with_baseline_length_m(&self, baseline_length_m: f64) -> Self {
        let mut s = self.clone();
        s.baseline_length_m = baseline_length_m;
        s
    }

    /// Verifies the stationary/velocity invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if self.stationary && !self.velocity.is_zero() {
            return Err(Error::ZeroVelocityRequired(self.name.clone()));
        }
        Ok(())
    }

    /// ECEF position (meters).
    pub fn ecef_m(&self) -> Vector3<f64> {
        self.position.to_ecef()
    }

    /// ECEF velocity components (m.s⁻¹).
    pub fn ecef_velocity_m_s(&self) -> Vector3<f64> {
        enu_velocity_to_ecef(
            self.position.longitude_deg,
            self.position.latitude_deg,
            &self.velocity,
        )
    }
}
