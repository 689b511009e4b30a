use crate::{
    emitter::Emitter, feasibility::FeasibilityFailure, geodesy::azimuth_elevation_deg,
    station::Station,
};

/// Verifies two-way angular coverage for every station: the station's
/// reception sector must contain the emitter bearing AND the emitter's
/// working sector must contain the reverse bearing.
pub fn validate_angles(stations: &[Station], emitter: &Emitter) -> Result<(), FeasibilityFailure> {
    let emitter_ecef = emitter.ecef_m();

    for station in stations {
        let station_ecef = station.ecef_m();

        let (azimuth_to_emitter, elevation_to_emitter) =
            azimuth_elevation_deg(&station_ecef, &emitter_ecef);
        let (azimuth_to_station, elevation_to_station) =
            azimuth_elevation_deg(&emitter_ecef, &station_ecef);

        if !station
            .reception_sector
            .contains(azimuth_to_emitter, elevation_to_emitter)
        {
            return Err(FeasibilityFailure::OutsideReceptionSector {
                station: station.name.clone(),
                emitter: emitter.name.clone(),
                azimuth_min: station.reception_sector.azimuth_min_deg,
                azimuth_max: station.reception_sector.azimuth_max_deg,
                elevation_min: station.reception_sector.elevation_min_deg,
                elevation_max: station.reception_sector.elevation_max_deg,
                azimuth: azimuth_to_emitter,
                elevation: elevation_to_emitter,
            });
        }

        if !emitter
            .working_sector
            .contains(azimuth_to_station, elevation_to_station)
        {
            return Err(FeasibilityFailure::OutsideWorkingSector {
                station: station.name.clone(),
                emitter: emitter.name.clone(),
                azimuth_min: emitter.working_sector.azimuth_min_deg,
                azimuth_max: emitter.working_sector.azimuth_max_deg,
                elevation_min: emitter.working_sector.elevation_min_deg,
                elevation_max: emitter.working_sector.elevation_max_deg,
                azimuth: azimuth_to_station,
                elevation: elevation_to_station,
            });
        }
    }

    Ok(())
}
