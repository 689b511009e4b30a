//! Geodetic ↔ ECEF transforms on the CGCS2000 ellipsoid, ENU velocity
//! decomposition and the shared ECEF bearing math.
use log::warn;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        CGCS2000_ECCENTRICITY_SQ, CGCS2000_SEMI_MAJOR_AXIS_M, LATITUDE_MAX_ITER,
        LATITUDE_TOLERANCE_RAD,
    },
    error::Error,
};

/// Geodetic position on the CGCS2000 ellipsoid.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPoint {
    /// Longitude in decimal degrees, [-180, 180]
    pub longitude_deg: f64,
    /// Latitude in decimal degrees, [-90, 90]
    pub latitude_deg: f64,
    /// Altitude above the ellipsoid (meters)
    pub altitude_m: f64,
}

impl GeodeticPoint {
    /// Creates a new [GeodeticPoint], validating coordinate bounds.
    pub fn new(longitude_deg: f64, latitude_deg: f64, altitude_m: f64) -> Result<Self, Error> {
        if !(-180.0..=180.0).contains(&longitude_deg) || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(Error::InvalidCoordinates(longitude_deg, latitude_deg));
        }
        Ok(Self {
            longitude_deg,
            latitude_deg,
            altitude_m,
        })
    }

    /// ECEF coordinates of this point, in meters.
    pub fn to_ecef(&self) -> Vector3<f64> {
        geodetic_to_ecef(self)
    }
}

/// ENU-decomposed platform velocity.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    /// Ground speed (m.s⁻¹)
    pub speed_m_s: f64,
    /// Course over ground, degrees clockwise from North, [0, 360)
    pub azimuth_deg: f64,
    /// Climb angle, degrees above the horizontal plane, [-90, 90]
    pub elevation_deg: f64,
}

impl Velocity {
    pub const ZERO: Self = Self {
        speed_m_s: 0.0,
        azimuth_deg: 0.0,
        elevation_deg: 0.0,
    };

    pub fn new(speed_m_s: f64, azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            speed_m_s,
            azimuth_deg,
            elevation_deg,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.speed_m_s == 0.0
    }
}

/// Geodetic to ECEF transform (meters).
pub fn geodetic_to_ecef(point: &GeodeticPoint) -> Vector3<f64> {
    let l = point.longitude_deg.to_radians();
    let b = point.latitude_deg.to_radians();
    let h = point.altitude_m;

    let (sin_b, cos_b) = b.sin_cos();
    let (sin_l, cos_l) = l.sin_cos();

    // prime vertical radius of curvature
    let n = CGCS2000_SEMI_MAJOR_AXIS_M / (1.0 - CGCS2000_ECCENTRICITY_SQ * sin_b * sin_b).sqrt();

    Vector3::new(
        (n + h) * cos_b * cos_l,
        (n + h) * cos_b * sin_l,
        (n * (1.0 - CGCS2000_ECCENTRICITY_SQ) + h) * sin_b,
    )
}

/// ECEF to geodetic transform. Latitude is solved iteratively to 0.0001″,
/// capped at [LATITUDE_MAX_ITER] rounds (last iterate is returned past the
/// cap, which no real-Earth input reaches).
pub fn ecef_to_geodetic(ecef_m: &Vector3<f64>) -> GeodeticPoint {
    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);
    let r = (x * x + y * y).sqrt();

    let mut b0 = z.atan2(r);
    let mut n = CGCS2000_SEMI_MAJOR_AXIS_M;

    let mut converged = false;
    for _ in 0..LATITUDE_MAX_ITER {
        let sin_b0 = b0.sin();
        n = CGCS2000_SEMI_MAJOR_AXIS_M / (1.0 - CGCS2000_ECCENTRICITY_SQ * sin_b0 * sin_b0).sqrt();
        let b = (z + n * CGCS2000_ECCENTRICITY_SQ * sin_b0).atan2(r);
        let err = b - b0;
        b0 = b;
        if err.abs() <= LATITUDE_TOLERANCE_RAD {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!("latitude iteration cap reached for ({:.1}, {:.1}, {:.1}) m", x, y, z);
    }

    GeodeticPoint {
        longitude_deg: y.atan2(x).to_degrees(),
        latitude_deg: b0.to_degrees(),
        altitude_m: r / b0.cos() - n,
    }
}

/// Rotates an ENU-decomposed [Velocity] at (lon, lat) into ECEF components
/// (m.s⁻¹).
pub fn enu_velocity_to_ecef(
    longitude_deg: f64,
    latitude_deg: f64,
    velocity: &Velocity,
) -> Vector3<f64> {
    let azimuth = velocity.azimuth_deg.to_radians();
    let elevation = velocity.elevation_deg.to_radians();

    let v_e = velocity.speed_m_s * elevation.cos() * azimuth.sin();
    let v_n = velocity.speed_m_s * elevation.cos() * azimuth.cos();
    let v_u = velocity.speed_m_s * elevation.sin();

    let (sin_l, cos_l) = longitude_deg.to_radians().sin_cos();
    let (sin_b, cos_b) = latitude_deg.to_radians().sin_cos();

    Vector3::new(
        -sin_l * v_e - sin_b * cos_l * v_n + cos_b * cos_l * v_u,
        cos_l * v_e - sin_b * sin_l * v_n + cos_b * sin_l * v_u,
        cos_b * v_n + sin_b * v_u,
    )
}

/// Projects ECEF velocity components back onto the local ENU frame at
/// (lon, lat) and recovers the speed / azimuth / elevation decomposition.
pub fn ecef_velocity_to_enu(
    longitude_deg: f64,
    latitude_deg: f64,
    velocity_m_s: &Vector3<f64>,
) -> Velocity {
    let (sin_l, cos_l) = longitude_deg.to_radians().sin_cos();
    let (sin_b, cos_b) = latitude_deg.to_radians().sin_cos();

    let (vx, vy, vz) = (velocity_m_s[0], velocity_m_s[1], velocity_m_s[2]);

    // transpose of the ENU → ECEF rotation
    let v_e = -sin_l * vx + cos_l * vy;
    let v_n = -sin_b * cos_l * vx - sin_b * sin_l * vy + cos_b * vz;
    let v_u = cos_b * cos_l * vx + cos_b * sin_l * vy + sin_b * vz;

    let speed = (v_e * v_e + v_n * v_n + v_u * v_u).sqrt();

    let mut azimuth_deg = v_e.atan2(v_n).to_degrees();
    if azimuth_deg < 0.0 {
        azimuth_deg += 360.0;
    }

    let elevation_deg = if speed > 1.0e-10 {
        (v_u / speed).asin().to_degrees()
    } else {
        0.0
    };

    Velocity {
        speed_m_s: speed,
        azimuth_deg,
        elevation_deg,
    }
}

/// Euclidean distance between two geodetic points, in meters.
pub fn distance(a: &GeodeticPoint, b: &GeodeticPoint) -> f64 {
    ecef_distance(&a.to_ecef(), &b.to_ecef())
}

/// Euclidean distance between two ECEF points, in meters.
pub fn ecef_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (b - a).norm()
}

/// Bearing from one ECEF point towards another: azimuth in [0, 360) and
/// elevation in [-90, 90], both in degrees. Azimuth is measured in the
/// (x, y) plane with `atan2(dx, dy)`, elevation against the horizontal
/// distance, matching the observation model of every solver.
pub fn azimuth_elevation_deg(from: &Vector3<f64>, to: &Vector3<f64>) -> (f64, f64) {
    let d = to - from;
    let horizontal = (d[0] * d[0] + d[1] * d[1]).sqrt();

    let mut azimuth_deg = d[0].atan2(d[1]).to_degrees();
    if azimuth_deg < 0.0 {
        azimuth_deg += 360.0;
    }

    let elevation_deg = d[2].atan2(horizontal).to_degrees();

    (azimuth_deg, elevation_deg)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ecef_round_trip() {
        for (lon, lat, alt) in [
            (118.78, 32.07, 50.0),
            (119.97, 31.71, 100.0),
            (-73.5, 45.2, 300.0),
            (0.0, 0.0, 0.0),
            (10.0, -85.0, 12000.0),
        ] {
            let p = GeodeticPoint::new(lon, lat, alt).unwrap();
            let back = ecef_to_geodetic(&p.to_ecef());
            assert!((back.longitude_deg - lon).abs() < 1e-6, "lon {}", lon);
            assert!((back.latitude_deg - lat).abs() < 1e-6, "lat {}", lat);
            assert!((back.altitude_m - alt).abs() < 1e-3, "alt {}", alt);
        }
    }

    #[test]
    fn distance_symmetry() {
        let a = GeodeticPoint::new(118.78, 32.07, 50.0).unwrap();
        let b = GeodeticPoint::new(119.97, 31.71, 100.0).unwrap();
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert!(distance(&a, &b) > 100_000.0);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn velocity_round_trip() {
        let v = Velocity::new(120.0, 35.0, 5.0);
        let ecef = enu_velocity_to_ecef(118.78, 32.07, &v);
        let back = ecef_velocity_to_enu(118.78, 32.07, &ecef);
        assert!((back.speed_m_s - v.speed_m_s).abs() < 1e-9);
        assert!((back.azimuth_deg - v.azimuth_deg).abs() < 1e-9);
        assert!((back.elevation_deg - v.elevation_deg).abs() < 1e-9);
    }

    #[test]
    fn invalid_coordinates_rejected() {
        assert!(GeodeticPoint::new(181.0, 0.0, 0.0).is_err());
        assert!(GeodeticPoint::new(0.0, 91.0, 0.0).is_err());
    }
}
