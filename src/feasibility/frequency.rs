use crate::{
    emitter::Emitter,
    feasibility::FeasibilityFailure,
    signal::{common_band, FrequencyBand},
    station::Station,
};

/// Verifies the emitter carrier lies within every station's reception
/// band. Fails naming the first offending station and its band.
pub fn validate_frequency(
    stations: &[Station],
    emitter: &Emitter,
) -> Result<(), FeasibilityFailure> {
    for station in stations {
        if !station.band.contains(emitter.carrier_frequency_ghz) {
            return Err(FeasibilityFailure::FrequencyOutOfBand {
                station: station.name.clone(),
                emitter: emitter.name.clone(),
                band: station.band,
                carrier_ghz: emitter.carrier_frequency_ghz,
            });
        }
    }
    Ok(())
}

/// Intersection of all station reception bands: the common bandwidth
/// every station can sample, used as the SNR noise bandwidth. None when
/// the bands do not overlap.
pub fn common_bandwidth(stations: &[Station]) -> Option<FrequencyBand> {
    let bands = stations.iter().map(|s| s.band).collect::<Vec<_>>();
    common_band(&bands)
}
