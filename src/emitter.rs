use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::{enu_velocity_to_ecef, GeodeticPoint, Velocity},
    sector::AngularSector,
};

/// Radiating source to geolocate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Emitter {
    /// Emitter name, used in validation diagnostics
    pub name: String,
    /// Geodetic position (ground truth, only accessed by the simulator)
    pub position: GeodeticPoint,
    /// Platform velocity. Must be [Velocity::ZERO] for stationary emitters.
    pub velocity: Velocity,
    /// Fixed (non-moving) emitter
    pub stationary: bool,
    /// Transmit power (kW)
    pub transmit_power_kw: f64,
    /// Carrier frequency (GHz)
    pub carrier_frequency_ghz: f64,
    /// Working sector the antenna radiates into
    pub working_sector: AngularSector,
}

impl Emitter {
    /// Creates a new stationary [Emitter] radiating omnidirectionally.
    pub fn new(
        name: &str,
        position: GeodeticPoint,
        transmit_power_kw: f64,
        carrier_frequency_ghz: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            position,
            transmit_power_kw,
            carrier_frequency_ghz,
            velocity: Velocity::ZERO,
            stationary: true,
            working_sector: AngularSector::full(),
        }
    }

    /// Copies and defines emitter motion, clearing the stationary flag.
    pub fn with_velocity(&self, velocity: Velocity) -> Self {
        let mut e = self.clone();
        e.velocity = velocity;
        e.stationary = velocity.is_zero();
        e
    }

    /// Copies and restricts the working sector.
    pub fn with_working_sector(&self, sector: AngularSector) -> Self {
        let mut e = self.clone();
        e.working_sector = sector;
        e
    }

    /// Verifies the stationary/velocity invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if self.stationary && !self.velocity.is_zero() {
            return Err(Error::ZeroVelocityRequired(self.name.clone()));
        }
        Ok(())
    }

    /// Carrier frequency in Hz.
    pub fn carrier_frequency_hz(&self) -> f64 {
        self.carrier_frequency_ghz * 1.0e9
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
