//! FDOA (Doppler-difference) geolocation: observation-window validation,
//! 6-parameter Levenberg-Marquardt position/velocity solve, CRLB
//! accuracy.
use log::{debug, warn};
use nalgebra::{DMatrix, DVector, SVector, Vector3};

use crate::{
    cfg::Config,
    constants::{DOPPLER_FFT_LENGTH, SPEED_OF_LIGHT_M_S},
    emitter::Emitter,
    error::Error,
    feasibility::{common_bandwidth, max_detection_range_m, FeasibilityFailure},
    geodesy::{ecef_velocity_to_enu, geodetic_to_ecef, GeodeticPoint, Velocity},
    noise::ErrorGenerator,
    observation::{doppler_shift_hz, DopplerObservations},
    solutions::{Accuracy, EstimationResult},
    station::Station,
};

mod crlb;

pub use crlb::{crlb_composite_m, fisher_information};

/// Usable observation window for one FDOA run, in seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObservationWindow {
    /// Shortest run resolving one frequency-resolution cell
    pub min_s: f64,
    /// Longest run before the emitter exits some station's detection range
    pub max_s: f64,
}

impl ObservationWindow {
    /// True when the proposed simulation time is usable: within
    /// `[min, 3·max]`, bounds included.
    pub fn admits(&self, simulation_time_s: f64) -> bool {
        simulation_time_s >= self.min_s && simulation_time_s <= 3.0 * self.max_s
    }
}

/// 6-parameter estimation state: geodetic position (degrees, meters) and
/// ECEF velocity (m.s⁻¹). Degrees keep the numerical differentiation step
/// meaningful across all six components.
type State = SVector<f64, 6>;

fn state_position_ecef(state: &State) -> Vector3<f64> {
    geodetic_to_ecef(&GeodeticPoint {
        longitude_deg: state[0],
        latitude_deg: state[1],
        altitude_m: state[2],
    })
}

fn state_velocity(state: &State) -> Vector3<f64> {
    Vector3::new(state[3], state[4], state[5])
}

/// Minimum usable observation time: the run must be long enough for the
/// Doppler drift between station 0 and the emitter to cross one
/// frequency-resolution cell.
pub fn minimum_observation_time_s(station: &Station, emitter: &Emitter) -> f64 {
    let relative_velocity = emitter.ecef_velocity_m_s() - station.ecef_velocity_m_s();
    let range = emitter.ecef_m() - station.ecef_m();
    let distance = range.norm();

    let speed_sq = relative_velocity.norm_squared();
    let projection = range.dot(&relative_velocity);

    // radial-velocity rate of change (m.s⁻²)
    let radial_rate =
        ((speed_sq * distance * distance - projection * projection) / distance.powi(3)).abs();

    if radial_rate <= 0.0 {
        return f64::INFINITY;
    }

    let frequency_resolution_hz = station.sample_rate_ghz * 1.0e9 / DOPPLER_FFT_LENGTH;

    frequency_resolution_hz * SPEED_OF_LIGHT_M_S / (radial_rate * emitter.carrier_frequency_hz())
}

/// Maximum usable observation time: smallest positive root, across
/// stations, of the quadratic `A·t² + B·t + C = 0` bounding when the
/// emitter exits that station's maximum detection range.
pub fn maximum_observation_time_s(
    stations: &[Station],
    emitter: &Emitter,
    bandwidth_ghz: f64,
) -> Result<f64, Error> {
    let mut min_max_time = f64::INFINITY;

    for station in stations {
        let relative_velocity = emitter.ecef_velocity_m_s() - station.ecef_velocity_m_s();
        let range = emitter.ecef_m() - station.ecef_m();

        let detection_range_m = max_detection_range_m(
            emitter.transmit_power_kw,
            emitter.carrier_frequency_ghz,
            station.noise_psd_dbm_hz,
            bandwidth_ghz,
        );

        let a = relative_velocity.norm_squared();
        let b = 2.0 * range.dot(&relative_velocity);
        let c = range.norm_squared() - detection_range_m * detection_range_m;

        let Some(exit_time) = solve_quadratic(a, b, c)
            .into_iter()
            .filter(|root| *root > 0.0)
            .fold(None, |min: Option<f64>, root| {
                Some(min.map_or(root, |m| m.min(root)))
            })
        else {
            continue;
        };

        min_max_time = min_max_time.min(exit_time);
    }

    if min_max_time.is_finite() {
        Ok(min_max_time)
    } else {
        Err(Error::NoPositiveTimeWindowRoot)
    }
}

/// Real roots of `a·t² + b·t + c = 0` (degrades to linear when a = 0).
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b != 0.0 {
            return vec![-c / b];
        }
        return vec![];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return vec![];
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    let sqrt_d = discriminant.sqrt();
    vec![(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)]
}

/// Computes and checks the usable observation window for a run.
pub fn observation_window(
    stations: &[Station],
    emitter: &Emitter,
) -> Result<ObservationWindow, Error> {
    if stations.is_empty() {
        return Err(Error::NotEnoughStations {
            technique: "FDOA",
            required: 2,
            proposed: 0,
        });
    }

    let bandwidth_ghz = common_bandwidth(stations)
        .ok_or(Error::Feasibility(FeasibilityFailure::EmptyBandIntersection))?
        .bandwidth_ghz();

    let min_s = minimum_observation_time_s(&stations[0], emitter);
    let max_s = maximum_observation_time_s(stations, emitter, bandwidth_ghz)?;

    debug!("observation window: [{:.3}, {:.3}] s", min_s, max_s);

    Ok(ObservationWindow { min_s, max_s })
}

/// FDOA geolocation over `[x, y, z, vx, vy, vz]`. The simulation time
/// must fall inside the usable observation window; observations are the
/// per-station Doppler shifts at `{0, T/2, T}`. In simulation mode the
/// initial state is the gaussian-perturbed truth (a deployment would
/// supply a prior instead). Accuracy is the CRLB composite.
pub fn solve_fdoa(
    stations: &[Station],
    emitter: &Emitter,
    simulation_time_s: f64,
    cfg: &Config,
    generator: &mut dyn ErrorGenerator,
) -> Result<EstimationResult, Error> {
    if stations.len() < 2 {
        return Err(Error::NotEnoughStations {
            technique: "FDOA",
            required: 2,
            proposed: stations.len(),
        });
    }

    for station in stations {
        station.validate()?;
    }
    emitter.validate()?;

    let window = observation_window(stations, emitter)?;
    if !window.admits(simulation_time_s) {
        return Err(Error::TimeWindowOutOfBounds(
            simulation_time_s,
            window.min_s,
            3.0 * window.max_s,
        ));
    }

    let observations = DopplerObservations::synthesize(
        stations,
        emitter,
        simulation_time_s,
        cfg.fdoa.doppler_sigma_hz,
        generator,
    );

    if !cfg.simulation_mode {
        // no ground truth to seed from outside the simulator
        return Err(Error::MissingApriori);
    }

    let initial = seed_state(emitter, cfg, generator);
    let expected_velocity = state_velocity(&initial);

    let velocity_weight = if emitter.stationary {
        cfg.fdoa.stationary_velocity_weight
    } else {
        cfg.fdoa.moving_velocity_weight
    };

    let solve = levenberg_marquardt(
        stations,
        emitter.carrier_frequency_hz(),
        &observations,
        initial,
        &expected_velocity,
        velocity_weight,
        cfg,
    );

    let position_ecef = state_position_ecef(&solve.state);
    let mut velocity_ecef = state_velocity(&solve.state);

    // stationary emitters: a solved residual speed below 1 µm/s is noise
    if emitter.stationary && velocity_ecef.norm() < 1.0e-6 {
        velocity_ecef = Vector3::zeros();
    }

    let accuracy_m = match crlb_composite_m(
        stations,
        &position_ecef,
        &velocity_ecef,
        emitter.carrier_frequency_hz(),
        &observations.times_s,
        cfg.fdoa.doppler_sigma_hz,
    ) {
        Ok(composite) => composite,
        Err(e) => {
            warn!("crlb not computable ({}), geometry too weak", e);
            f64::INFINITY
        },
    };

    let velocity = ecef_velocity_to_enu(solve.state[0], solve.state[1], &velocity_ecef);

    debug!(
        "fdoa: {} iterations, converged: {}, residual {:.3e}, crlb {:.2} m",
        solve.iterations, solve.converged, solve.residual_norm, accuracy_m
    );

    Ok(EstimationResult::from_ecef(
        position_ecef,
        solve.converged,
        solve.iterations,
        solve.residual_norm,
        Accuracy::Crlb(accuracy_m),
    )
    .with_velocity(velocity))
}

/// Gaussian-perturbed truth: position σ 10 m (degrees at 111 km/°),
/// speed σ 0.1 m.s⁻¹, course σ 0.5°. Stationary emitters keep zero
/// velocity.
fn seed_state(emitter: &Emitter, cfg: &Config, generator: &mut dyn ErrorGenerator) -> State {
    let position_sigma_deg = cfg.fdoa.seed_position_sigma_m / 111_000.0;

    let longitude = emitter.position.longitude_deg + generator.draw(position_sigma_deg);
    let latitude = emitter.position.latitude_deg + generator.draw(position_sigma_deg);
    let altitude = emitter.position.altitude_m + generator.draw(cfg.fdoa.seed_position_sigma_m);

    let velocity = if emitter.stationary {
        Vector3::zeros()
    } else {
        let perturbed = Velocity {
            speed_m_s: emitter.velocity.speed_m_s + generator.draw(cfg.fdoa.seed_speed_sigma_m_s),
            azimuth_deg: emitter.velocity.azimuth_deg + generator.draw(cfg.fdoa.seed_angle_sigma_deg),
            elevation_deg: emitter.velocity.elevation_deg
                + generator.draw(cfg.fdoa.seed_angle_sigma_deg),
        };
        crate::geodesy::enu_velocity_to_ecef(longitude, latitude, &perturbed)
    };

    SVector::from([longitude, latitude, altitude, velocity[0], velocity[1], velocity[2]])
}

struct LmSolve {
    state: State,
    converged: bool,
    iterations: usize,
    residual_norm: f64,
}

/// Residual vector: one Doppler mismatch per (station, instant), then the
/// three weighted velocity-regularization rows.
fn residuals(
    stations: &[Station],
    carrier_hz: f64,
    observations: &DopplerObservations,
    state: &State,
    expected_velocity: &Vector3<f64>,
    velocity_weight: f64,
) -> DVector<f64> {
    let n = stations.len();
    let mut r = DVector::<f64>::zeros(3 * n + 3);

    let position = state_position_ecef(state);
    let velocity = state_velocity(state);

    for (i, station) in stations.iter().enumerate() {
        let station_pos = station.ecef_m();
        let station_vel = station.ecef_velocity_m_s();

        for (j, t) in observations.times_s.iter().enumerate() {
            let theoretical = doppler_shift_hz(
                &station_pos,
                &station_vel,
                &position,
                &velocity,
                carrier_hz,
                *t,
            );
            r[i * 3 + j] = observations.shifts_hz[i][j] - theoretical;
        }
    }

    for k in 0..3 {
        r[3 * n + k] = velocity_weight * (expected_velocity[k] - velocity[k]);
    }

    r
}

/// Levenberg-Marquardt over the 6-parameter state. Doppler rows of the
/// Jacobian come from central differences, the velocity-regularization
/// rows are analytic. Damping multiplies by 10 on a rejected step and
/// divides by 10 on an accepted one.
fn levenberg_marquardt(
    stations: &[Station],
    carrier_hz: f64,
    observations: &DopplerObservations,
    initial: State,
    expected_velocity: &Vector3<f64>,
    velocity_weight: f64,
    cfg: &Config,
) -> LmSolve {
    let n = stations.len();
    let rows = 3 * n + 3;

    let mut state = initial;
    let mut damping = cfg.fdoa.initial_damping;

    let mut r = residuals(
        stations,
        carrier_hz,
        observations,
        &state,
        expected_velocity,
        velocity_weight,
    );
    let mut residual_norm = r.norm();

    let mut converged = residual_norm < cfg.fdoa.convergence;
    let mut iterations = 0;

    for iter in 0..cfg.fdoa.max_iterations {
        if converged {
            break;
        }
        iterations = iter + 1;

        // numerical Jacobian of the model (= -∂r/∂x), analytic velocity
        // regularization block
        let mut jacobian = DMatrix::<f64>::zeros(rows, 6);
        let h = cfg.fdoa.diff_step;

        for p in 0..6 {
            let mut forward = state;
            let mut backward = state;
            forward[p] += h;
            backward[p] -= h;

            let rf = residuals(
                stations,
                carrier_hz,
                observations,
                &forward,
                expected_velocity,
                velocity_weight,
            );
            let rb = residuals(
                stations,
                carrier_hz,
                observations,
                &backward,
                expected_velocity,
                velocity_weight,
            );

            for row in 0..3 * n {
                jacobian[(row, p)] = -(rf[row] - rb[row]) / (2.0 * h);
            }
        }

        for k in 0..3 {
            jacobian[(3 * n + k, 3 + k)] = velocity_weight;
        }

        let jt = jacobian.transpose();
        let mut jtj = &jt * &jacobian;
        for d in 0..6 {
            jtj[(d, d)] += damping;
        }

        let jtr = &jt * &r;

        let Some(delta) = jtj.lu().solve(&jtr) else {
            warn!("lm iteration {}: singular step, keeping best state", iterations);
            return LmSolve {
                state,
                converged: false,
                iterations,
                residual_norm,
            };
        };

        let mut candidate = state;
        for p in 0..6 {
            candidate[p] += delta[p];
        }

        let candidate_r = residuals(
            stations,
            carrier_hz,
            observations,
            &candidate,
            expected_velocity,
            velocity_weight,
        );
        let candidate_norm = candidate_r.norm();

        if candidate_norm < residual_norm {
            state = candidate;
            r = candidate_r;
            residual_norm = candidate_norm;
            damping /= 10.0;

            debug!(
                "lm iteration {}: accepted, residual {:.6e}, damping {:.1e}",
                iterations, residual_norm, damping
            );

            if delta.norm() < cfg.fdoa.convergence || residual_norm < cfg.fdoa.convergence {
                converged = true;
            }
        } else {
            damping *= 10.0;
            debug!(
                "lm iteration {}: rejected, damping raised to {:.1e}",
                iterations, damping
            );
        }
    }

    LmSolve {
        state,
        converged,
        iterations,
        residual_norm,
    }
}
