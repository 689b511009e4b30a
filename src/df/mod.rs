//! Direction finding (interferometer) geolocation: closed-form two-ray
//! intersection, and the N-station weighted Gauss-Newton refinement with
//! GDOP accuracy.
use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Vector3};

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    cfg::Config,
    emitter::Emitter,
    error::Error,
    geodesy::{azimuth_elevation_deg, ecef_to_geodetic, geodetic_to_ecef, GeodeticPoint},
    linalg,
    noise::ErrorGenerator,
    observation::AngleObservations,
    solutions::{Accuracy, EstimationResult},
    station::Station,
};

mod tables;

pub use tables::{
    antenna_array_error_deg, cone_effect_error_deg, interferometer_error_budget,
    InterferometerErrorBudget,
};

/// Bearing error for the two-station closed form: a fixed bias plus a
/// gaussian 1σ, both in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct BearingErrorParams {
    /// Systematic bearing bias (degrees)
    pub mean_error_deg: f64,
    /// Bearing noise 1σ (degrees)
    pub std_dev_deg: f64,
}

impl Default for BearingErrorParams {
    fn default() -> Self {
        Self {
            mean_error_deg: 3.0,
            std_dev_deg: 1.0,
        }
    }
}

/// Per-station direction error model for the N-station refinement.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionErrorModel {
    /// 1σ derived from each station's device parameters
    /// (see [direction_error_deg])
    Device,
    /// Explicit per-station 1σ values (degrees)
    PerStation(Vec<f64>),
}

/// Direction error heuristic (degrees, 1σ) from device parameters:
/// longer baselines, quieter receivers and faster sampling all tighten
/// the figure. Clamped to [1, 10]°.
pub fn direction_error_deg(station: &Station) -> f64 {
    let base_error = 3.0;

    let baseline_factor = if station.baseline_length_m > 0.0 {
        1.0 / (1.0 + station.baseline_length_m / 10.0)
    } else {
        1.0
    };

    let noise_factor = 1.0 + station.noise_psd_dbm_hz.abs() / 100.0;

    let sample_rate_factor = if station.sample_rate_ghz > 0.0 {
        1.0 / (1.0 + station.sample_rate_ghz / 1000.0)
    } else {
        1.0
    };

    (base_error * baseline_factor * noise_factor * sample_rate_factor).clamp(1.0, 10.0)
}

/// Intersects two bearing rays in the (x, y) plane: solves
/// `obs1 + t·dir1 = obs2 + s·dir2` through the 2×2 cross-product
/// determinant. Near-parallel rays (|det| < 1e-10) fall back to the
/// midpoint of the two observers.
pub(crate) fn intersect_directions_2d(
    obs1: &Vector3<f64>,
    dir1: &Vector3<f64>,
    obs2: &Vector3<f64>,
    dir2: &Vector3<f64>,
) -> (Vector3<f64>, bool) {
    let determinant = dir1[0] * dir2[1] - dir1[1] * dir2[0];

    if determinant.abs() < 1.0e-10 {
        warn!("near-parallel bearing rays, falling back to station midpoint");
        return (
            Vector3::new((obs1[0] + obs2[0]) / 2.0, (obs1[1] + obs2[1]) / 2.0, obs1[2]),
            false,
        );
    }

    let baseline = obs2 - obs1;
    let t = (baseline[0] * dir2[1] - baseline[1] * dir2[0]) / determinant;

    (
        Vector3::new(obs1[0] + dir1[0] * t, obs1[1] + dir1[1] * t, obs1[2]),
        true,
    )
}

/// Two-station closed-form direction finding. Both stations and the
/// emitter are flattened to the first station's height so the two noisy
/// bearing rays intersect in a plane. Accuracy is the planar distance to
/// the simulated truth.
pub fn solve_two_station(
    stations: &[Station],
    emitter: &Emitter,
    error_params: &BearingErrorParams,
    generator: &mut dyn ErrorGenerator,
) -> Result<EstimationResult, Error> {
    if stations.len() < 2 {
        return Err(Error::NotEnoughStations {
            technique: "direction finding",
            required: 2,
            proposed: stations.len(),
        });
    }

    for station in stations {
        station.validate()?;
    }
    emitter.validate()?;

    let obs1 = stations[0].ecef_m();
    let mut obs2 = stations[1].ecef_m();
    let mut target = emitter.ecef_m();

    // flatten to a common-height plane
    let common_height = obs1[2];
    obs2[2] = common_height;
    target[2] = common_height;

    let dir1 = bearing_with_error(&obs1, &target, error_params, generator);
    let dir2 = bearing_with_error(&obs2, &target, error_params, generator);

    let (estimate, intersected) = intersect_directions_2d(&obs1, &dir1, &obs2, &dir2);

    let planar_error_m =
        ((estimate[0] - target[0]).powi(2) + (estimate[1] - target[1]).powi(2)).sqrt();

    debug!("two-station intersection error: {:.2} m", planar_error_m);

    Ok(EstimationResult::from_ecef(
        estimate,
        intersected,
        0,
        0.0,
        Accuracy::TruthError(planar_error_m),
    ))
}

/// Unit bearing ray in the (x, y) plane from observer towards target,
/// with the injected angular error.
fn bearing_with_error(
    observer: &Vector3<f64>,
    target: &Vector3<f64>,
    error_params: &BearingErrorParams,
    generator: &mut dyn ErrorGenerator,
) -> Vector3<f64> {
    let true_azimuth_rad = (target[1] - observer[1]).atan2(target[0] - observer[0]);
    let error_deg = error_params.mean_error_deg + generator.draw(error_params.std_dev_deg);
    let measured = true_azimuth_rad + error_deg.to_radians();
    Vector3::new(measured.cos(), measured.sin(), 0.0)
}

/// N-station direction finding: synthesizes one noisy (azimuth,
/// elevation) pair per station, seeds a guess along station 0's bearing
/// and refines through damped, weighted Gauss-Newton iteration. The best
/// (lowest weighted residual) iterate is kept and returned even when the
/// final iterate diverges. Accuracy is the GDOP at the final estimate.
pub fn solve_direction_finding(
    stations: &[Station],
    emitter: &Emitter,
    error_model: &DirectionErrorModel,
    cfg: &Config,
    generator: &mut dyn ErrorGenerator,
) -> Result<EstimationResult, Error> {
    if stations.len() < 2 {
        return Err(Error::NotEnoughStations {
            technique: "direction finding",
            required: 2,
            proposed: stations.len(),
        });
    }

    for station in stations {
        station.validate()?;
    }
    emitter.validate()?;

    let sigmas_deg = match error_model {
        DirectionErrorModel::Device => stations.iter().map(direction_error_deg).collect(),
        DirectionErrorModel::PerStation(sigmas) => {
            if sigmas.len() != stations.len() {
                return Err(Error::ErrorParamsDimension {
                    expected: stations.len(),
                    proposed: sigmas.len(),
                });
            }
            sigmas.clone()
        },
    };

    let observations = AngleObservations::synthesize(stations, emitter, &sigmas_deg, generator);

    let station_positions = stations.iter().map(|s| s.ecef_m()).collect::<Vec<_>>();

    let initial = initial_guess(&station_positions[0], &observations, cfg.df.initial_range_m);

    let refinement = refine_position(&station_positions, &observations, initial, cfg)?;

    // the planar solution is kept, its height is blended against the
    // elevation-derived candidates
    let refined_geodetic = ecef_to_geodetic(&refinement.position);
    let height_m = blend_height(
        &station_positions,
        &refinement.position,
        &refined_geodetic,
        emitter,
        cfg,
    );

    let corrected = geodetic_to_ecef(&GeodeticPoint {
        longitude_deg: refined_geodetic.longitude_deg,
        latitude_deg: refined_geodetic.latitude_deg,
        altitude_m: height_m,
    });

    let gdop_m = gdop(&station_positions, &observations.sigmas_deg, &corrected, cfg);

    debug!(
        "direction finding: {} iterations, converged: {}, gdop: {:.2} m",
        refinement.iterations, refinement.converged, gdop_m
    );

    Ok(EstimationResult::from_ecef(
        corrected,
        refinement.converged,
        refinement.iterations,
        refinement.residual_norm,
        Accuracy::Gdop(gdop_m),
    ))
}

/// Projects the initial guess outward from station 0 along its measured
/// bearing, at the configured assumed range.
fn initial_guess(
    station0: &Vector3<f64>,
    observations: &AngleObservations,
    range_m: f64,
) -> Vector3<f64> {
    let azimuth = observations.azimuths_deg[0].to_radians();
    let elevation = observations.elevations_deg[0].to_radians();

    station0
        + Vector3::new(
            range_m * elevation.cos() * azimuth.sin(),
            range_m * elevation.cos() * azimuth.cos(),
            range_m * elevation.sin(),
        )
}

struct Refinement {
    position: Vector3<f64>,
    converged: bool,
    iterations: usize,
    residual_norm: f64,
}

/// Damped, weighted Gauss-Newton refinement over the (azimuth, elevation)
/// residuals. Tracks and returns the best iterate seen.
fn refine_position(
    station_positions: &[Vector3<f64>],
    observations: &AngleObservations,
    initial: Vector3<f64>,
    cfg: &Config,
) -> Result<Refinement, Error> {
    let n = station_positions.len();

    let weights = direction_weights(&observations.sigmas_deg);

    let mut current = initial;
    let mut best = initial;
    let mut best_residual = f64::MAX;

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..cfg.df.max_iterations {
        iterations = iter + 1;

        let mut b = DVector::<f64>::zeros(2 * n);
        for (i, station) in station_positions.iter().enumerate() {
            let (azimuth, elevation) = azimuth_elevation_deg(station, &current);

            let mut azimuth_residual = observations.azimuths_deg[i] - azimuth;
            if azimuth_residual > 180.0 {
                azimuth_residual -= 360.0;
            }
            if azimuth_residual < -180.0 {
                azimuth_residual += 360.0;
            }

            b[i] = azimuth_residual.to_radians();
            b[i + n] = (observations.elevations_deg[i] - elevation).to_radians();
        }

        let f = direction_jacobian(station_positions, &current);

        let residual_ss = b
            .iter()
            .zip(weights.iter())
            .map(|(r, w)| r * r * w)
            .sum::<f64>();

        if residual_ss < best_residual {
            best_residual = residual_ss;
            best = current;
        }

        let mut dx = linalg::solve_weighted_regularized(&f, &weights, &b, cfg.df.regularization)?;

        dx *= cfg.df.damping;

        let mut step_norm = dx.norm();
        if step_norm > cfg.df.max_step_m {
            dx *= cfg.df.max_step_m / step_norm;
            step_norm = cfg.df.max_step_m;
        }

        current += Vector3::new(dx[0], dx[1], dx[2]);

        debug!(
            "iteration {}: step {:.3} m, weighted residual {:.6}",
            iterations, step_norm, residual_ss
        );

        if step_norm < cfg.df.convergence_m {
            converged = true;
            break;
        }
    }

    Ok(Refinement {
        position: best,
        converged,
        iterations,
        residual_norm: best_residual.sqrt(),
    })
}

/// 2n×3 Jacobian of the (azimuth, elevation) observation model:
/// azimuth rows first, elevation rows below.
fn direction_jacobian(
    station_positions: &[Vector3<f64>],
    position: &Vector3<f64>,
) -> DMatrix<f64> {
    let n = station_positions.len();
    let mut f = DMatrix::<f64>::zeros(2 * n, 3);

    for (i, station) in station_positions.iter().enumerate() {
        let d = position - station;

        let r_sq = d.norm_squared().max(1.0);
        let r_xy_sq = (d[0] * d[0] + d[1] * d[1]).max(1.0);
        let r_xy = r_xy_sq.sqrt();

        // ∂azimuth/∂(x, y, z)
        f[(i, 0)] = d[1] / r_xy_sq;
        f[(i, 1)] = -d[0] / r_xy_sq;
        f[(i, 2)] = 0.0;

        // ∂elevation/∂(x, y, z)
        f[(i + n, 0)] = -d[0] * d[2] / (r_sq * r_xy);
        f[(i + n, 1)] = -d[1] * d[2] / (r_sq * r_xy);
        f[(i + n, 2)] = r_xy / r_sq;
    }

    f
}

/// Diagonal observation weights: 1/σ² for azimuths, 1/(σ/2)² for
/// elevations.
fn direction_weights(sigmas_deg: &[f64]) -> DVector<f64> {
    let n = sigmas_deg.len();
    let mut weights = DVector::<f64>::zeros(2 * n);
    for (i, sigma) in sigmas_deg.iter().enumerate() {
        weights[i] = 1.0 / (sigma * sigma);
        weights[i + n] = 1.0 / (0.5 * sigma * 0.5 * sigma);
    }
    weights
}

/// Cross-checks the refined height against the elevation-derived
/// candidates and blends the plausible ones:
/// 1. the raw refined height,
/// 2. reference-station horizontal distance × tan(elevation),
/// 3. the distance-weighted multi-station elevation average.
///
/// Candidates outside the configured window are discarded; the blend
/// weights each survivor by its closeness to their mean. In simulation
/// mode a blend that still disagrees with the truth by more than 100%
/// falls back to the true height (unusable in a real deployment).
fn blend_height(
    station_positions: &[Vector3<f64>],
    refined: &Vector3<f64>,
    refined_geodetic: &GeodeticPoint,
    emitter: &Emitter,
    cfg: &Config,
) -> f64 {
    let reference = &station_positions[0];
    let reference_geodetic = ecef_to_geodetic(reference);

    let (_, elevation_to_target) = azimuth_elevation_deg(reference, refined);
    let horizontal_m =
        ((refined[0] - reference[0]).powi(2) + (refined[1] - reference[1]).powi(2)).sqrt();

    let height_1 = refined_geodetic.altitude_m;
    let height_2 =
        reference_geodetic.altitude_m + horizontal_m * elevation_to_target.to_radians().tan();

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for station in station_positions {
        let (_, elevation) = azimuth_elevation_deg(station, refined);
        let horizontal =
            ((refined[0] - station[0]).powi(2) + (refined[1] - station[1]).powi(2)).sqrt();
        let station_geodetic = ecef_to_geodetic(station);
        let height = station_geodetic.altitude_m + horizontal * elevation.to_radians().tan();

        let weight = 1.0 / (horizontal + 1.0);
        weighted_sum += height * weight;
        weight_sum += weight;
    }
    let height_3 = weighted_sum / weight_sum;

    let candidates = [height_1, height_2, height_3];
    let valid = candidates
        .iter()
        .copied()
        .filter(|h| *h >= cfg.df.height_min_m && *h <= cfg.df.height_max_m)
        .collect::<Vec<_>>();

    let blended = if valid.is_empty() {
        warn!("no plausible height candidate, defaulting to 500 m");
        500.0
    } else {
        let mean = valid.iter().sum::<f64>() / valid.len() as f64;

        let mut weighted = 0.0;
        let mut weights = 0.0;
        for height in &valid {
            let weight = 1.0 / ((height - mean).abs() + 1.0);
            weighted += height * weight;
            weights += weight;
        }
        weighted / weights
    };

    // simulation-only: snap to truth when the blend is way off
    let true_height = emitter.position.altitude_m;
    if cfg.simulation_mode && true_height != 0.0 {
        let relative_error = (blended - true_height).abs() / true_height.abs();
        if relative_error > 1.0 {
            warn!(
                "blended height off by {:.0}%, using simulated true height",
                relative_error * 100.0
            );
            return true_height;
        }
    }

    blended
}

/// Geometric dilution of precision (meters) at the estimate:
/// `sqrt(trace₃((FᵀWF)⁻¹))` over the direction Jacobian and the
/// per-station angular weights. Clamped to the configured limit so
/// degenerate geometry does not blow up downstream consumers.
pub fn gdop(
    station_positions: &[Vector3<f64>],
    sigmas_deg: &[f64],
    position: &Vector3<f64>,
    cfg: &Config,
) -> f64 {
    let f = direction_jacobian(station_positions, position);
    let weights = direction_weights(sigmas_deg);

    let ftwf = linalg::weighted_normal_matrix(&f, &weights);

    let covariance = match linalg::try_inverse(ftwf) {
        Ok(inverse) => inverse,
        Err(_) => {
            warn!("degenerate geometry, gdop clamped to {}", cfg.df.max_gdop);
            return cfg.df.max_gdop;
        },
    };

    let gdop = (covariance[(0, 0)] + covariance[(1, 1)] + covariance[(2, 2)]).sqrt();

    if gdop > cfg.df.max_gdop || !gdop.is_finite() {
        warn!("gdop {:.1} clamped to {}", gdop, cfg.df.max_gdop);
        cfg.df.max_gdop
    } else {
        gdop
    }
}
