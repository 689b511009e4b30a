//! Synthetic per-technique observation sets: true geometry plus injected
//! measurement error. Built fresh for every solve, never persisted.
use nalgebra::Vector3;

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    emitter::Emitter,
    geodesy::{azimuth_elevation_deg, ecef_distance},
    noise::ErrorGenerator,
    station::Station,
};

/// Per-station (azimuth, elevation) measurements for the direction
/// finding technique, with their 1σ figures.
#[derive(Debug, Clone)]
pub struct AngleObservations {
    /// Measured azimuths (degrees, [0, 360))
    pub azimuths_deg: Vec<f64>,
    /// Measured elevations (degrees, [-90, 90])
    pub elevations_deg: Vec<f64>,
    /// Per-station azimuth 1σ (degrees); elevation 1σ is half of it
    pub sigmas_deg: Vec<f64>,
}

impl AngleObservations {
    /// Synthesizes one measurement per station from the true geometry,
    /// drawing azimuth error at σ and elevation error at σ/2.
    pub fn synthesize(
        stations: &[Station],
        emitter: &Emitter,
        sigmas_deg: &[f64],
        generator: &mut dyn ErrorGenerator,
    ) -> Self {
        let emitter_ecef = emitter.ecef_m();

        let mut azimuths_deg = Vec::with_capacity(stations.len());
        let mut elevations_deg = Vec::with_capacity(stations.len());

        for (station, sigma) in stations.iter().zip(sigmas_deg.iter()) {
            let (true_azimuth, true_elevation) =
                azimuth_elevation_deg(&station.ecef_m(), &emitter_ecef);

            let mut azimuth = true_azimuth + generator.draw(*sigma);
            let mut elevation = true_elevation + generator.draw(*sigma * 0.5);

            if azimuth < 0.0 {
                azimuth += 360.0;
            }
            if azimuth >= 360.0 {
                azimuth -= 360.0;
            }
            elevation = elevation.clamp(-90.0, 90.0);

            azimuths_deg.push(azimuth);
            elevations_deg.push(elevation);
        }

        Self {
            azimuths_deg,
            elevations_deg,
            sigmas_deg: sigmas_deg.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.azimuths_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.azimuths_deg.is_empty()
    }
}

/// Time differences of arrival relative to station 0 (the time
/// reference), in seconds. Entry 0 is zero by construction.
#[derive(Debug, Clone)]
pub struct TdoaObservations {
    /// Per-station TDOA w.r.t. station 0 (seconds)
    pub tdoas_s: Vec<f64>,
}

impl TdoaObservations {
    /// Synthesizes TDOAs from the true geometry. The reference TOA takes
    /// the fixed systematic bias; each non-reference TDOA takes one RMS
    /// error draw (the historical model alternates ±rms by station index).
    pub fn synthesize(
        stations: &[Station],
        emitter: &Emitter,
        tdoa_rms_error_s: f64,
        toa_systematic_error_s: f64,
        generator: &mut dyn ErrorGenerator,
    ) -> Self {
        let emitter_ecef = emitter.ecef_m();

        let toas_s = stations
            .iter()
            .map(|s| ecef_distance(&s.ecef_m(), &emitter_ecef) / SPEED_OF_LIGHT_M_S)
            .collect::<Vec<_>>();

        let reference_toa_s = toas_s[0] + toa_systematic_error_s;

        let mut tdoas_s = vec![0.0; stations.len()];
        for (i, toa) in toas_s.iter().enumerate().skip(1) {
            tdoas_s[i] = toa - reference_toa_s + generator.draw(tdoa_rms_error_s);
        }

        Self { tdoas_s }
    }

    pub fn len(&self) -> usize {
        self.tdoas_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tdoas_s.is_empty()
    }
}

/// Doppler-shift observations: one shift per (station, instant) pair,
/// sampled at the three instants {0, T/2, T}.
#[derive(Debug, Clone)]
pub struct DopplerObservations {
    /// Sample instants (seconds into the run)
    pub times_s: [f64; 3],
    /// Per-station shifts at each instant (Hz)
    pub shifts_hz: Vec<[f64; 3]>,
}

/// Theoretical Doppler shift (Hz) seen by a station from an emitter, both
/// propagated linearly to `t`: range-rate over c times the carrier.
pub(crate) fn doppler_shift_hz(
    station_pos_m: &Vector3<f64>,
    station_vel_m_s: &Vector3<f64>,
    emitter_pos_m: &Vector3<f64>,
    emitter_vel_m_s: &Vector3<f64>,
    carrier_hz: f64,
    t_s: f64,
) -> f64 {
    let station_at_t = station_pos_m + station_vel_m_s * t_s;
    let emitter_at_t = emitter_pos_m + emitter_vel_m_s * t_s;

    let range = emitter_at_t - station_at_t;
    let range_norm = range.norm().max(1.0);

    let relative_velocity = emitter_vel_m_s - station_vel_m_s;
    let radial_velocity = range.dot(&relative_velocity) / range_norm;

    radial_velocity / SPEED_OF_LIGHT_M_S * carrier_hz
}

impl DopplerObservations {
    /// Synthesizes the per-station shift matrix over `{0, T/2, T}`, each
    /// sample taking one σ_doppler error draw.
    pub fn synthesize(
        stations: &[Station],
        emitter: &Emitter,
        simulation_time_s: f64,
        doppler_sigma_hz: f64,
        generator: &mut dyn ErrorGenerator,
    ) -> Self {
        let times_s = [0.0, simulation_time_s / 2.0, simulation_time_s];

        let emitter_pos = emitter.ecef_m();
        let emitter_vel = emitter.ecef_velocity_m_s();
        let carrier_hz = emitter.carrier_frequency_hz();

        let shifts_hz = stations
            .iter()
            .map(|station| {
                let station_pos = station.ecef_m();
                let station_vel = station.ecef_velocity_m_s();
                times_s.map(|t| {
                    doppler_shift_hz(
                        &station_pos,
                        &station_vel,
                        &emitter_pos,
                        &emitter_vel,
                        carrier_hz,
                        t,
                    ) + generator.draw(doppler_sigma_hz)
                })
            })
            .collect();

        Self { times_s, shifts_hz }
    }
}
