//! Pre-solve feasibility gates: frequency overlap, two-way angular
//! coverage, link-budget SNR. Every solver expects a passing verdict
//! before it runs.
use thiserror::Error;

use log::debug;

use crate::{emitter::Emitter, signal::FrequencyBand, station::Station};

mod angle;
mod frequency;
mod snr;

pub use angle::validate_angles;
pub use frequency::{common_bandwidth, validate_frequency};
pub use snr::{max_detection_range_m, snr_db, validate_snr};

/// Reason a simulation request is infeasible. Display strings name the
/// offending station and emitter so they can be surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeasibilityFailure {
    /// Emitter carrier outside a station's reception band.
    #[error("station \"{station}\" receives {band}, cannot receive emitter \"{emitter}\" at {carrier_ghz} GHz")]
    FrequencyOutOfBand {
        station: String,
        emitter: String,
        band: FrequencyBand,
        carrier_ghz: f64,
    },

    /// The proposed stations' reception bands share no common bandwidth.
    #[error("station reception bands share no common bandwidth")]
    EmptyBandIntersection,

    /// Emitter bearing falls outside a station's reception sector.
    #[error("station \"{station}\" reception sector azimuth [{azimuth_min}°, {azimuth_max}°] × elevation [{elevation_min}°, {elevation_max}°] does not cover emitter \"{emitter}\" at azimuth {azimuth:.2}°, elevation {elevation:.2}°")]
    OutsideReceptionSector {
        station: String,
        emitter: String,
        azimuth_min: f64,
        azimuth_max: f64,
        elevation_min: f64,
        elevation_max: f64,
        azimuth: f64,
        elevation: f64,
    },

    /// Station reverse bearing falls outside the emitter working sector.
    #[error("emitter \"{emitter}\" working sector azimuth [{azimuth_min}°, {azimuth_max}°] × elevation [{elevation_min}°, {elevation_max}°] does not cover station \"{station}\" at azimuth {azimuth:.2}°, elevation {elevation:.2}°")]
    OutsideWorkingSector {
        station: String,
        emitter: String,
        azimuth_min: f64,
        azimuth_max: f64,
        elevation_min: f64,
        elevation_max: f64,
        azimuth: f64,
        elevation: f64,
    },

    /// Received SNR below the reception threshold.
    #[error("emitter \"{emitter}\" to station \"{station}\": distance {distance_m:.2} m exceeds maximum detection range {max_range_m:.2} m, SNR {snr_db:.2} dB below the {threshold_db} dB threshold")]
    SnrBelowThreshold {
        station: String,
        emitter: String,
        distance_m: f64,
        max_range_m: f64,
        snr_db: f64,
        threshold_db: f64,
    },
}

/// Pre-solve feasibility verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityVerdict {
    /// True when every gate passed
    pub passed: bool,
    /// First gate failure encountered, when any
    pub failure: Option<FeasibilityFailure>,
}

impl FeasibilityVerdict {
    fn pass() -> Self {
        Self {
            passed: true,
            failure: None,
        }
    }

    fn fail(failure: FeasibilityFailure) -> Self {
        Self {
            passed: false,
            failure: Some(failure),
        }
    }
}

/// Runs all feasibility gates for a station set against one emitter,
/// short-circuiting on the first failure: per-station frequency
/// containment, common-bandwidth existence, two-way angular coverage,
/// then link-budget SNR at the 1 dB threshold.
///
/// This is the single gate a caller must pass before invoking any solver.
pub fn validate_feasibility(stations: &[Station], emitter: &Emitter) -> FeasibilityVerdict {
    if let Err(failure) = validate_frequency(stations, emitter) {
        return FeasibilityVerdict::fail(failure);
    }

    let bandwidth_ghz = match common_bandwidth(stations) {
        Some(band) => band.bandwidth_ghz(),
        None => return FeasibilityVerdict::fail(FeasibilityFailure::EmptyBandIntersection),
    };

    debug!("common reception bandwidth: {:.3} GHz", bandwidth_ghz);

    if let Err(failure) = validate_angles(stations, emitter) {
        return FeasibilityVerdict::fail(failure);
    }

    if let Err(failure) = validate_snr(stations, emitter, bandwidth_ghz) {
        return FeasibilityVerdict::fail(failure);
    }

    FeasibilityVerdict::pass()
}
