use std::f64::consts::PI;

use log::debug;

use crate::{
    constants::{SNR_THRESHOLD_DB, SPEED_OF_LIGHT_M_S},
    emitter::Emitter,
    feasibility::FeasibilityFailure,
    geodesy::distance,
    station::Station,
};

/// Free-space link budget SNR, in dB:
/// `10·log10( Pt·(λ/(4π·d))² / (N0·B) )`.
///
/// ## Input
/// - distance_m: station-emitter distance (meters)
/// - transmit_power_kw: emitter power (kW)
/// - carrier_ghz: carrier frequency (GHz)
/// - noise_psd_dbm_hz: receiver noise power spectral density (dBm/Hz)
/// - bandwidth_ghz: sampled (common) bandwidth (GHz)
pub fn snr_db(
    distance_m: f64,
    transmit_power_kw: f64,
    carrier_ghz: f64,
    noise_psd_dbm_hz: f64,
    bandwidth_ghz: f64,
) -> f64 {
    let pt_w = transmit_power_kw * 1000.0;
    let carrier_hz = carrier_ghz * 1.0e9;
    let bandwidth_hz = bandwidth_ghz * 1.0e9;

    let lambda_m = SPEED_OF_LIGHT_M_S / carrier_hz;

    let received_w = pt_w * (lambda_m / (4.0 * PI * distance_m)).powi(2);

    let n0_w_hz = 10.0_f64.powf(noise_psd_dbm_hz / 10.0) / 1000.0;
    let noise_w = n0_w_hz * bandwidth_hz;

    10.0 * (received_w / noise_w).log10()
}

/// Maximum detection range (meters): the distance at which the link
/// budget hits [SNR_THRESHOLD_DB], the algebraic inverse of [snr_db]:
/// `d = (λ/4π)·sqrt(Pt/(SNR·N0·B))`.
pub fn max_detection_range_m(
    transmit_power_kw: f64,
    carrier_ghz: f64,
    noise_psd_dbm_hz: f64,
    bandwidth_ghz: f64,
) -> f64 {
    let pt_w = transmit_power_kw * 1000.0;
    let carrier_hz = carrier_ghz * 1.0e9;
    let bandwidth_hz = bandwidth_ghz * 1.0e9;

    let lambda_m = SPEED_OF_LIGHT_M_S / carrier_hz;

    let n0_w_hz = 10.0_f64.powf(noise_psd_dbm_hz / 10.0) / 1000.0;
    let noise_w = n0_w_hz * bandwidth_hz;

    let min_snr_linear = 10.0_f64.powf(SNR_THRESHOLD_DB / 10.0);

    (lambda_m / (4.0 * PI)) * (pt_w / (min_snr_linear * noise_w)).sqrt()
}

/// Verifies every station receives the emitter above the SNR threshold,
/// over the common bandwidth.
pub fn validate_snr(
    stations: &[Station],
    emitter: &Emitter,
    bandwidth_ghz: f64,
) -> Result<(), FeasibilityFailure> {
    for station in stations {
        let distance_m = distance(&station.position, &emitter.position);

        let snr = snr_db(
            distance_m,
            emitter.transmit_power_kw,
            emitter.carrier_frequency_ghz,
            station.noise_psd_dbm_hz,
            bandwidth_ghz,
        );

        debug!(
            "\"{}\" -> \"{}\": d={:.1} m snr={:.2} dB",
            emitter.name, station.name, distance_m, snr
        );

        if snr < SNR_THRESHOLD_DB {
            let max_range_m = max_detection_range_m(
                emitter.transmit_power_kw,
                emitter.carrier_frequency_ghz,
                station.noise_psd_dbm_hz,
                bandwidth_ghz,
            );
            return Err(FeasibilityFailure::SnrBelowThreshold {
                station: station.name.clone(),
                emitter: emitter.name.clone(),
                distance_m,
                max_range_m,
                snr_db: snr,
                threshold_db: SNR_THRESHOLD_DB,
            });
        }
    }

    Ok(())
}
