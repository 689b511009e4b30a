use thiserror::Error;

use crate::feasibility::FeasibilityFailure;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Each technique has a minimal station count (DF: 2, TDOA: 4, FDOA: 2).
    /// Requests below that minimum are rejected before any math runs.
    #[error("{technique} requires at least {required} stations, {proposed} proposed")]
    NotEnoughStations {
        technique: &'static str,
        required: usize,
        proposed: usize,
    },

    /// Per-station error parameters must match the station count.
    #[error("expected {expected} per-station error parameters, {proposed} proposed")]
    ErrorParamsDimension { expected: usize, proposed: usize },

    /// A platform flagged stationary carried a non-zero velocity.
    #[error("stationary platform \"{0}\" must have zero velocity")]
    ZeroVelocityRequired(String),

    /// Longitude outside [-180, 180] or latitude outside [-90, 90].
    #[error("invalid geodetic coordinates ({0}°, {1}°)")]
    InvalidCoordinates(f64, f64),

    /// Emitter frequency band upper bound at or below the lower bound.
    #[error("invalid frequency band [{0}, {1}] GHz")]
    InvalidFrequencyBand(f64, f64),

    /// Pre-solve feasibility gate failed. The cause names the offending
    /// station/emitter and is surfaced verbatim to the caller.
    #[error("feasibility: {0}")]
    Feasibility(FeasibilityFailure),

    /// Singular or near-singular normal equations: degenerate station
    /// geometry, or near-parallel bearing rays.
    #[error("failed to invert matrix")]
    MatrixInversion,

    /// Closed-form initialization failed (Chan linear system is singular).
    #[error("degenerate station geometry: closed-form initialization failed")]
    SingularGeometry,

    /// FDOA observation window: the range-exit quadratic has no positive
    /// real root for any station.
    #[error("observation window: no positive range-exit solution")]
    NoPositiveTimeWindowRoot,

    /// Configured simulation time falls outside the usable FDOA window.
    #[error("simulation time {0:.3} s outside usable window [{1:.3}, {2:.3}] s")]
    TimeWindowOutOfBounds(f64, f64, f64),

    /// FDOA without simulation mode requires a caller-supplied apriori
    /// state, ground truth is not accessible.
    #[error("missing apriori state (simulation mode disabled)")]
    MissingApriori,
}
