//! Empirical interferometer error budget: alignment, attitude (inertial
//! reference), cone effect and antenna-array phase error. The cone-effect
//! bound table is keyed by elevation × azimuth buckets and kept as plain
//! data so the model stays auditable and testable on its own.
use std::f64::consts::PI;

/// Baseline alignment (boresight) error, 1σ (degrees)
pub const ALIGNMENT_ERROR_DEG: f64 = 0.1;

/// Inertial attitude reference error, 1σ (degrees)
pub const ATTITUDE_ERROR_DEG: f64 = 0.2;

/// Interferometer phase measurement error, 1σ (degrees of phase)
pub const PHASE_ERROR_DEG: f64 = 35.0;

/// Cone-effect elevation bucket upper bounds (degrees)
pub const CONE_EFFECT_ELEVATION_BOUNDS_DEG: [f64; 6] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];

/// Cone-effect azimuth bucket upper bounds (degrees, folded to [0, 90])
pub const CONE_EFFECT_AZIMUTH_BOUNDS_DEG: [f64; 6] = [15.0, 30.0, 45.0, 60.0, 75.0, 90.0];

/// Cone-effect error bounds (degrees), elevation buckets × azimuth
/// buckets. Grows towards the cone axis: steep elevations and bearings
/// far off broadside degrade the phase-to-angle inversion.
pub const CONE_EFFECT_ERROR_TABLE_DEG: [[f64; 6]; 6] = [
    [0.02, 0.04, 0.06, 0.08, 0.10, 0.12],
    [0.05, 0.09, 0.14, 0.18, 0.22, 0.26],
    [0.09, 0.17, 0.25, 0.33, 0.40, 0.47],
    [0.15, 0.28, 0.41, 0.53, 0.64, 0.74],
    [0.24, 0.44, 0.63, 0.80, 0.95, 1.08],
    [0.36, 0.65, 0.92, 1.15, 1.34, 1.50],
];

/// Interferometer error budget for one station/emitter bearing,
/// all figures in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InterferometerErrorBudget {
    /// Baseline alignment error
    pub alignment_deg: f64,
    /// Attitude reference error
    pub attitude_deg: f64,
    /// Cone-effect error from the bound table
    pub cone_effect_deg: f64,
    /// Antenna-array error λ/(2πd·cosθ)·σφ
    pub antenna_array_deg: f64,
    /// Root sum square of the four terms
    pub composite_deg: f64,
}

fn bucket_index(value: f64, bounds: &[f64]) -> usize {
    bounds
        .iter()
        .position(|bound| value <= *bound)
        .unwrap_or(bounds.len() - 1)
}

/// Cone-effect error bound (degrees) for a bearing. Azimuth is folded to
/// [0, 90] by symmetry; angles past the table edge take the edge value
/// scaled proportionally, ratio capped at 2.
pub fn cone_effect_error_deg(azimuth_deg: f64, elevation_deg: f64) -> f64 {
    let elevation = elevation_deg.abs();

    let mut azimuth = azimuth_deg.abs() % 180.0;
    if azimuth > 90.0 {
        azimuth = 180.0 - azimuth;
    }

    let elevation_edge = CONE_EFFECT_ELEVATION_BOUNDS_DEG[CONE_EFFECT_ELEVATION_BOUNDS_DEG.len() - 1];
    let azimuth_edge = CONE_EFFECT_AZIMUTH_BOUNDS_DEG[CONE_EFFECT_AZIMUTH_BOUNDS_DEG.len() - 1];

    let elevation_lookup = elevation.min(elevation_edge);
    let azimuth_lookup = azimuth.min(azimuth_edge);

    let row = bucket_index(elevation_lookup, &CONE_EFFECT_ELEVATION_BOUNDS_DEG);
    let col = bucket_index(azimuth_lookup, &CONE_EFFECT_AZIMUTH_BOUNDS_DEG);

    let mut error = CONE_EFFECT_ERROR_TABLE_DEG[row][col];

    // past-edge bearings: proportional growth, capped
    if elevation > elevation_edge {
        error *= (elevation / elevation_edge).min(2.0);
    }
    if azimuth > azimuth_edge {
        error *= (azimuth / azimuth_edge).min(2.0);
    }

    error
}

/// Antenna-array direction error (degrees): `λ/(2πd·cosθ)·σφ`.
pub fn antenna_array_error_deg(
    wavelength_m: f64,
    baseline_length_m: f64,
    azimuth_deg: f64,
) -> f64 {
    let baseline_m = baseline_length_m.max(0.001);

    let mut cos_theta = azimuth_deg.to_radians().cos();
    if cos_theta.abs() < 1.0e-6 {
        cos_theta = 1.0e-6;
    }

    let sigma_phi_rad = PHASE_ERROR_DEG.to_radians();
    let sigma_theta_rad = wavelength_m / (2.0 * PI * baseline_m * cos_theta) * sigma_phi_rad;

    sigma_theta_rad.abs().to_degrees()
}

/// Full interferometer error budget for a bearing observed over a
/// baseline at a given wavelength.
pub fn interferometer_error_budget(
    wavelength_m: f64,
    baseline_length_m: f64,
    azimuth_deg: f64,
    elevation_deg: f64,
) -> InterferometerErrorBudget {
    let alignment_deg = ALIGNMENT_ERROR_DEG;
    let attitude_deg = ATTITUDE_ERROR_DEG;
    let cone_effect_deg = cone_effect_error_deg(azimuth_deg, elevation_deg);
    let antenna_array_deg = antenna_array_error_deg(wavelength_m, baseline_length_m, azimuth_deg);

    let composite_deg = (alignment_deg.powi(2)
        + attitude_deg.powi(2)
        + cone_effect_deg.powi(2)
        + antenna_array_deg.powi(2))
    .sqrt();

    InterferometerErrorBudget {
        alignment_deg,
        attitude_deg,
        cone_effect_deg,
        antenna_array_deg,
        composite_deg,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cone_effect_grows_with_angles() {
        let shallow = cone_effect_error_deg(10.0, 5.0);
        let steep = cone_effect_error_deg(80.0, 55.0);
        assert!(shallow < steep);
        assert_eq!(shallow, CONE_EFFECT_ERROR_TABLE_DEG[0][0]);
    }

    #[test]
    fn cone_effect_azimuth_symmetry() {
        // 80° and 100° fold onto the same bucket
        assert_eq!(cone_effect_error_deg(80.0, 25.0), cone_effect_error_deg(100.0, 25.0));
    }

    #[test]
    fn cone_effect_past_edge_is_scaled_and_capped() {
        let edge = cone_effect_error_deg(90.0, 60.0);
        let beyond = cone_effect_error_deg(90.0, 89.0);
        assert!(beyond > edge);
        assert!(beyond <= edge * 2.0);
    }

    #[test]
    fn antenna_array_error_shrinks_with_baseline() {
        let short = antenna_array_error_deg(0.2, 1.0, 30.0);
        let long = antenna_array_error_deg(0.2, 10.0, 30.0);
        assert!(long < short);
    }

    #[test]
    fn composite_is_rss() {
        let budget = interferometer_error_budget(0.2, 10.0, 30.0, 20.0);
        let rss = (budget.alignment_deg.powi(2)
            + budget.attitude_deg.powi(2)
            + budget.cone_effect_deg.powi(2)
            + budget.antenna_array_deg.powi(2))
        .sqrt();
        assert!((budget.composite_deg - rss).abs() < 1e-12);
    }
}
