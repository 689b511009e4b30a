#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angular coverage sector: azimuth and elevation spans in degrees.
/// An azimuth span whose lower bound exceeds its upper bound wraps
/// across 0° (e.g. [350, 10] covers 20° centered on North).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngularSector {
    /// Azimuth span (degrees, [0, 360))
    pub azimuth_min_deg: f64,
    pub azimuth_max_deg: f64,
    /// Elevation span (degrees, [-90, 90])
    pub elevation_min_deg: f64,
    pub elevation_max_deg: f64,
}

impl AngularSector {
    pub fn new(
        azimuth_min_deg: f64,
        azimuth_max_deg: f64,
        elevation_min_deg: f64,
        elevation_max_deg: f64,
    ) -> Self {
        Self {
            azimuth_min_deg,
            azimuth_max_deg,
            elevation_min_deg,
            elevation_max_deg,
        }
    }

    /// Omnidirectional coverage: [0, 360] × [-90, 90].
    pub fn full() -> Self {
        Self::new(0.0, 360.0, -90.0, 90.0)
    }

    /// True if the (azimuth, elevation) bearing falls inside the sector.
    pub fn contains(&self, azimuth_deg: f64, elevation_deg: f64) -> bool {
        angle_in_range(azimuth_deg, self.azimuth_min_deg, self.azimuth_max_deg)
            && angle_in_range(
                elevation_deg,
                self.elevation_min_deg,
                self.elevation_max_deg,
            )
    }
}

impl Default for AngularSector {
    fn default() -> Self {
        Self::full()
    }
}

/// Span containment, wrapping across 0° when min > max.
pub(crate) fn angle_in_range(angle_deg: f64, min_deg: f64, max_deg: f64) -> bool {
    if min_deg > max_deg {
        angle_deg >= min_deg || angle_deg <= max_deg
    } else {
        angle_deg >= min_deg && angle_deg <= max_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_span() {
        assert!(angle_in_range(45.0, 0.0, 90.0));
        assert!(angle_in_range(0.0, 0.0, 90.0));
        assert!(angle_in_range(90.0, 0.0, 90.0));
        assert!(!angle_in_range(90.1, 0.0, 90.0));
    }

    #[test]
    fn wrapped_span() {
        // [350, 10] wraps across North
        assert!(angle_in_range(355.0, 350.0, 10.0));
        assert!(angle_in_range(5.0, 350.0, 10.0));
        assert!(angle_in_range(0.0, 350.0, 10.0));
        assert!(!angle_in_range(180.0, 350.0, 10.0));
    }

    #[test]
    fn sector_containment() {
        let sector = AngularSector::new(350.0, 10.0, -5.0, 30.0);
        assert!(sector.contains(0.0, 10.0));
        assert!(!sector.contains(0.0, 45.0));
        assert!(!sector.contains(100.0, 10.0));
        assert!(AngularSector::full().contains(123.4, -67.8));
    }
}
