#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod df;
mod emitter;
mod error;
mod fdoa;
mod feasibility;
mod geodesy;
mod linalg;
mod noise;
mod observation;
mod sector;
mod signal;
mod solutions;
mod station;
mod tdoa;
mod vector;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, DfConfig, FdoaConfig, TdoaConfig};
    pub use crate::df::{
        antenna_array_error_deg, cone_effect_error_deg, direction_error_deg, gdop,
        interferometer_error_budget, solve_direction_finding, solve_two_station,
        BearingErrorParams, DirectionErrorModel, InterferometerErrorBudget,
    };
    pub use crate::emitter::Emitter;
    pub use crate::fdoa::{
        crlb_composite_m, fisher_information, maximum_observation_time_s,
        minimum_observation_time_s, observation_window, solve_fdoa, ObservationWindow,
    };
    pub use crate::feasibility::{
        max_detection_range_m, snr_db, validate_feasibility, FeasibilityFailure,
        FeasibilityVerdict,
    };
    pub use crate::geodesy::{
        azimuth_elevation_deg, distance, ecef_distance, ecef_to_geodetic, ecef_velocity_to_enu,
        enu_velocity_to_ecef, geodetic_to_ecef, GeodeticPoint, Velocity,
    };
    pub use crate::noise::{AlternatingErrors, ErrorGenerator, GaussianErrors, NoErrors};
    pub use crate::observation::{AngleObservations, DopplerObservations, TdoaObservations};
    pub use crate::sector::AngularSector;
    pub use crate::signal::FrequencyBand;
    pub use crate::solutions::{Accuracy, EstimationResult};
    pub use crate::station::Station;
    pub use crate::tdoa::{solve_tdoa, TdoaErrorParams};
    pub use crate::vector::Vector3D;
    // re-export
    pub use nalgebra::Vector3;
}

// pub export
pub use constants::{
    FREQUENCY_RESOLUTION_HZ, SNR_THRESHOLD_DB, SPEED_OF_LIGHT_M_S,
};
pub use error::Error;
