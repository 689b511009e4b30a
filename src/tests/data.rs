//! Shared scenario fixtures. The two-entity scenario is the reference
//! configuration every validator is checked against: one station on the
//! Nanjing plain facing a high-power emitter 115 km east, well inside
//! band and detection range.
use crate::prelude::*;

/// Reference station: (118.78°E, 32.07°N, 50 m), stationary,
/// band [1, 2] GHz, omnidirectional.
pub fn reference_station() -> Station {
    Station::new(
        "station-1",
        GeodeticPoint::new(118.78, 32.07, 50.0).unwrap(),
        FrequencyBand::new(1.0, 2.0).unwrap(),
    )
    .with_noise_psd_dbm_hz(-160.0)
}

/// Reference emitter: (119.97°E, 31.71°N, 100 m), stationary, 1.5 GHz
/// carrier, 100 kW, full working sector.
pub fn reference_emitter() -> Emitter {
    Emitter::new(
        "emitter-1",
        GeodeticPoint::new(119.97, 31.71, 100.0).unwrap(),
        100.0,
        1.5,
    )
}

/// Three-station direction-finding set with the emitter roughly 10 km
/// from station 0, so the assumed-range initial projection lands near
/// the truth.
pub fn df_stations() -> Vec<Station> {
    vec![
        Station::new(
            "df-1",
            GeodeticPoint::new(119.00, 31.90, 80.0).unwrap(),
            FrequencyBand::new(1.0, 2.0).unwrap(),
        ),
        Station::new(
            "df-2",
            GeodeticPoint::new(119.16, 31.82, 120.0).unwrap(),
            FrequencyBand::new(1.0, 2.0).unwrap(),
        ),
        Station::new(
            "df-3",
            GeodeticPoint::new(119.02, 31.78, 60.0).unwrap(),
            FrequencyBand::new(1.0, 2.0).unwrap(),
        ),
    ]
}

/// Emitter for the direction-finding set: ~10 km east of df-1.
pub fn df_emitter() -> Emitter {
    Emitter::new(
        "df-emitter",
        GeodeticPoint::new(119.10, 31.88, 400.0).unwrap(),
        100.0,
        1.5,
    )
}

/// Five non-coplanar TDOA stations surrounding the emitter.
pub fn tdoa_stations() -> Vec<Station> {
    let band = FrequencyBand::new(1.0, 2.0).unwrap();
    vec![
        Station::new("tdoa-1", GeodeticPoint::new(118.80, 31.90, 100.0).unwrap(), band),
        Station::new("tdoa-2", GeodeticPoint::new(119.40, 31.90, 3000.0).unwrap(), band),
        Station::new("tdoa-3", GeodeticPoint::new(119.10, 32.30, 600.0).unwrap(), band),
        Station::new("tdoa-4", GeodeticPoint::new(119.10, 31.50, 1500.0).unwrap(), band),
        Station::new("tdoa-5", GeodeticPoint::new(118.90, 32.10, 2500.0).unwrap(), band),
    ]
}

/// Emitter inside the TDOA station hull.
pub fn tdoa_emitter() -> Emitter {
    Emitter::new(
        "tdoa-emitter",
        GeodeticPoint::new(119.10, 31.90, 500.0).unwrap(),
        100.0,
        1.5,
    )
}

/// Three airborne FDOA stations on diverging courses around a ground
/// emitter. The narrowband Doppler channel (1 kHz sampling) keeps the
/// frequency-resolution cell, and with it the minimum observation time,
/// small.
pub fn fdoa_stations() -> Vec<Station> {
    let band = FrequencyBand::new(1.0, 2.0).unwrap();
    vec![
        Station::new("fdoa-1", GeodeticPoint::new(118.60, 31.90, 8000.0).unwrap(), band)
            .with_sample_rate_ghz(1.0e-6)
            .with_velocity(Velocity::new(150.0, 90.0, 0.0)),
        Station::new("fdoa-2", GeodeticPoint::new(119.00, 32.25, 9000.0).unwrap(), band)
            .with_sample_rate_ghz(1.0e-6)
            .with_velocity(Velocity::new(150.0, 180.0, 0.0)),
        Station::new("fdoa-3", GeodeticPoint::new(119.00, 31.55, 10000.0).unwrap(), band)
            .with_sample_rate_ghz(1.0e-6)
            .with_velocity(Velocity::new(150.0, 0.0, 0.0)),
    ]
}

/// Stationary ground emitter for the FDOA set.
pub fn fdoa_emitter() -> Emitter {
    Emitter::new(
        "fdoa-emitter",
        GeodeticPoint::new(119.10, 31.90, 100.0).unwrap(),
        100.0,
        1.5,
    )
}
