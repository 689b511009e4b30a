//! TDOA multilateration: Chan's closed-form initialization from the
//! linearized range-difference equations, then the height-constrained
//! planar Taylor refinement.
use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Vector3};

use crate::{
    cfg::Config,
    constants::SPEED_OF_LIGHT_M_S,
    emitter::Emitter,
    error::Error,
    geodesy::{ecef_distance, ecef_to_geodetic, geodetic_to_ecef, GeodeticPoint},
    linalg,
    noise::ErrorGenerator,
    observation::TdoaObservations,
    solutions::{Accuracy, EstimationResult},
    station::Station,
};

/// Timing error parametrization for one TDOA solve.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TdoaErrorParams {
    /// RMS error applied to each non-reference TDOA (seconds)
    pub tdoa_rms_error_s: f64,
    /// Systematic bias on the reference station TOA (seconds)
    pub toa_systematic_error_s: f64,
}

/// TDOA geolocation. Requires at least 4 stations (the 3D multilateration
/// minimum); station 0 is the time reference. Accuracy is the distance to
/// the simulated truth (a simulation-only metric).
pub fn solve_tdoa(
    stations: &[Station],
    emitter: &Emitter,
    error_params: &TdoaErrorParams,
    cfg: &Config,
    generator: &mut dyn ErrorGenerator,
) -> Result<EstimationResult, Error> {
    if stations.len() < 4 {
        return Err(Error::NotEnoughStations {
            technique: "TDOA",
            required: 4,
            proposed: stations.len(),
        });
    }

    for station in stations {
        station.validate()?;
    }
    emitter.validate()?;

    let observations = TdoaObservations::synthesize(
        stations,
        emitter,
        error_params.tdoa_rms_error_s,
        error_params.toa_systematic_error_s,
        generator,
    );

    let station_positions = stations.iter().map(|s| s.ecef_m()).collect::<Vec<_>>();

    let initial = chan_initial(&station_positions, &observations)?;
    debug!(
        "chan initial estimate: ({:.1}, {:.1}, {:.1}) m",
        initial[0], initial[1], initial[2]
    );

    // the planar refinement needs a pinned height: the true altitude in
    // simulation mode, the closed-form altitude otherwise
    let pinned = if cfg.simulation_mode {
        let initial_geodetic = ecef_to_geodetic(&initial);
        geodetic_to_ecef(&GeodeticPoint {
            longitude_deg: initial_geodetic.longitude_deg,
            latitude_deg: initial_geodetic.latitude_deg,
            altitude_m: emitter.position.altitude_m,
        })
    } else {
        initial
    };

    let refinement = taylor_refine(&station_positions, &observations, pinned, cfg);

    let truth_error_m = ecef_distance(&refinement.position, &emitter.ecef_m());
    debug!("tdoa truth error: {:.3} m", truth_error_m);

    Ok(EstimationResult::from_ecef(
        refinement.position,
        refinement.converged,
        refinement.iterations,
        refinement.residual_norm,
        Accuracy::TruthError(truth_error_m),
    ))
}

/// Chan's closed-form estimate: for each non-reference station, one
/// linearized range-difference row
/// `[x_i - x_0, y_i - y_0, z_i - z_0, d_i0] · [x, y, z, R0]ᵀ = h_i`,
/// `h_i = ½(|Δp_i|² - d_i0²)`, solved in the least-squares sense.
/// Coordinates are relative to station 0.
fn chan_initial(
    station_positions: &[Vector3<f64>],
    observations: &TdoaObservations,
) -> Result<Vector3<f64>, Error> {
    let m = station_positions.len() - 1;
    let reference = &station_positions[0];

    let mut ga = DMatrix::<f64>::zeros(m, 4);
    let mut h = DVector::<f64>::zeros(m);

    for i in 0..m {
        let relative = station_positions[i + 1] - reference;
        let d_i0 = SPEED_OF_LIGHT_M_S * observations.tdoas_s[i + 1];

        ga[(i, 0)] = relative[0];
        ga[(i, 1)] = relative[1];
        ga[(i, 2)] = relative[2];
        ga[(i, 3)] = d_i0;

        h[i] = 0.5 * (relative.norm_squared() - d_i0 * d_i0);
    }

    // SVD least-squares: over-determined with 6+ stations, minimum-norm
    // on the minimal 4-station set (the refinement absorbs the rest)
    let solution = ga
        .svd(true, true)
        .solve(&h, 1.0e-10)
        .map_err(|_| Error::SingularGeometry)?;

    Ok(Vector3::new(
        solution[0] + reference[0],
        solution[1] + reference[1],
        solution[2] + reference[2],
    ))
}

struct Refinement {
    position: Vector3<f64>,
    converged: bool,
    iterations: usize,
    residual_norm: f64,
}

/// Height-constrained Taylor refinement: iterates the 2×2 normal
/// equations over the (x, y) components only, keeping the pinned height.
/// Jacobian rows are the range-difference gradients, residuals the TDOA
/// mismatches. A failed step returns the current iterate un-converged.
fn taylor_refine(
    station_positions: &[Vector3<f64>],
    observations: &TdoaObservations,
    initial: Vector3<f64>,
    cfg: &Config,
) -> Refinement {
    let m = station_positions.len() - 1;
    let reference = &station_positions[0];

    let mut current = initial;
    let mut converged = false;
    let mut iterations = 0;
    let mut residual_norm = 0.0;

    for iter in 0..cfg.tdoa.max_iterations {
        iterations = iter + 1;

        let r0 = ecef_distance(&current, reference).max(1.0);

        let mut h = DMatrix::<f64>::zeros(m, 2);
        let mut delta_rho = DVector::<f64>::zeros(m);

        for i in 0..m {
            let station = &station_positions[i + 1];
            let ri = ecef_distance(&current, station).max(1.0);

            h[(i, 0)] = (current[0] - station[0]) / ri - (current[0] - reference[0]) / r0;
            h[(i, 1)] = (current[1] - station[1]) / ri - (current[1] - reference[1]) / r0;

            let estimated_tdoa_s = (ri - r0) / SPEED_OF_LIGHT_M_S;
            delta_rho[i] = observations.tdoas_s[i + 1] - estimated_tdoa_s;
        }

        residual_norm = delta_rho.norm() * SPEED_OF_LIGHT_M_S;

        // residuals in meters
        let weights = DVector::from_element(m, 1.0);
        let b = delta_rho * SPEED_OF_LIGHT_M_S;

        let correction = match linalg::solve_weighted_regularized(
            &h,
            &weights,
            &b,
            cfg.tdoa.regularization,
        ) {
            Ok(dx) => dx,
            Err(e) => {
                warn!("taylor iteration {} failed: {}, keeping last iterate", iterations, e);
                return Refinement {
                    position: current,
                    converged: false,
                    iterations,
                    residual_norm,
                };
            },
        };

        current[0] += correction[0];
        current[1] += correction[1];

        let step_norm = correction.norm();

        debug!(
            "taylor iteration {}: step {:.6} m, residual {:.6} m",
            iterations, step_norm, residual_norm
        );

        if step_norm < cfg.tdoa.tolerance_m {
            converged = true;
            break;
        }
    }

    Refinement {
        position: current,
        converged,
        iterations,
        residual_norm,
    }
}
