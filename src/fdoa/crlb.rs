//! Cramér-Rao lower bound for the FDOA solve: Fisher information
//! accumulated from the analytic Doppler-difference gradients over all
//! station pairs and sample instants, inverted for the error covariance
//! bound.
use itertools::Itertools;
use nalgebra::{SMatrix, SVector, Vector3};

use crate::{constants::SPEED_OF_LIGHT_M_S, error::Error, station::Station};

type Matrix6 = SMatrix<f64, 6, 6>;
type Vector6 = SVector<f64, 6>;

/// Analytic gradient of one station's Doppler shift w.r.t. the emitter
/// state `[x, y, z, vx, vy, vz]` (ECEF), both platforms propagated
/// linearly to `t`.
fn doppler_gradient(
    station_pos_m: &Vector3<f64>,
    station_vel_m_s: &Vector3<f64>,
    emitter_pos_m: &Vector3<f64>,
    emitter_vel_m_s: &Vector3<f64>,
    carrier_hz: f64,
    t_s: f64,
) -> Vector6 {
    let range = (emitter_pos_m + emitter_vel_m_s * t_s) - (station_pos_m + station_vel_m_s * t_s);
    let distance = range.norm().max(1.0);

    let relative_velocity = emitter_vel_m_s - station_vel_m_s;
    let radial = range.dot(&relative_velocity) / distance;

    let scale = carrier_hz / SPEED_OF_LIGHT_M_S;

    // ∂(radial)/∂p = v/d - (r·v)·r/d³
    let d_radial_d_pos = relative_velocity / distance - range * (radial / (distance * distance));

    // ∂(radial)/∂v picks up the t-propagated position term
    let d_radial_d_vel = d_radial_d_pos * t_s + range / distance;

    let mut gradient = Vector6::zeros();
    for k in 0..3 {
        gradient[k] = scale * d_radial_d_pos[k];
        gradient[3 + k] = scale * d_radial_d_vel[k];
    }
    gradient
}

/// 6×6 Fisher information matrix: sum of `g·gᵀ/σ²` over every station
/// pair and sample instant, `g` the Doppler-difference gradient.
pub fn fisher_information(
    stations: &[Station],
    emitter_pos_m: &Vector3<f64>,
    emitter_vel_m_s: &Vector3<f64>,
    carrier_hz: f64,
    times_s: &[f64; 3],
    doppler_sigma_hz: f64,
) -> Matrix6 {
    let inv_variance = 1.0 / (doppler_sigma_hz * doppler_sigma_hz);

    let mut fim = Matrix6::zeros();

    for (a, b) in stations.iter().tuple_combinations() {
        let (pos_a, vel_a) = (a.ecef_m(), a.ecef_velocity_m_s());
        let (pos_b, vel_b) = (b.ecef_m(), b.ecef_velocity_m_s());

        for t in times_s {
            let gradient = doppler_gradient(
                &pos_a,
                &vel_a,
                emitter_pos_m,
                emitter_vel_m_s,
                carrier_hz,
                *t,
            ) - doppler_gradient(
                &pos_b,
                &vel_b,
                emitter_pos_m,
                emitter_vel_m_s,
                carrier_hz,
                *t,
            );

            fim += gradient * gradient.transpose() * inv_variance;
        }
    }

    fim
}

/// CRLB composite accuracy (meters): the Fisher information inverse,
/// position diagonal plus the velocity diagonal down-weighted 0.5×,
/// square-rooted.
pub fn crlb_composite_m(
    stations: &[Station],
    emitter_pos_m: &Vector3<f64>,
    emitter_vel_m_s: &Vector3<f64>,
    carrier_hz: f64,
    times_s: &[f64; 3],
    doppler_sigma_hz: f64,
) -> Result<f64, Error> {
    let fim = fisher_information(
        stations,
        emitter_pos_m,
        emitter_vel_m_s,
        carrier_hz,
        times_s,
        doppler_sigma_hz,
    );

    let covariance = fim.try_inverse().ok_or(Error::MatrixInversion)?;

    let position_trace = covariance[(0, 0)] + covariance[(1, 1)] + covariance[(2, 2)];
    let velocity_trace = covariance[(3, 3)] + covariance[(4, 4)] + covariance[(5, 5)];

    Ok((position_trace + 0.5 * velocity_trace).sqrt())
}
