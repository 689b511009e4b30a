use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    geodesy::{ecef_to_geodetic, GeodeticPoint, Velocity},
    vector::Vector3D,
};

/// Accuracy figure attached to an [EstimationResult]. The variant tells
/// the caller which metric it is looking at: GDOP and CRLB are computable
/// in a deployment, the truth-distance only exists inside the simulator.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Accuracy {
    /// Geometric dilution of precision (meters)
    Gdop(f64),
    /// Cramér-Rao lower bound composite (meters)
    Crlb(f64),
    /// Euclidean distance to the simulated ground truth (meters)
    TruthError(f64),
}

impl Accuracy {
    /// Accuracy figure, in meters, regardless of the metric.
    pub fn value(&self) -> f64 {
        match self {
            Self::Gdop(v) | Self::Crlb(v) | Self::TruthError(v) => *v,
        }
    }
}

/// One geolocation estimate. Produced once per solve, immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EstimationResult {
    /// Estimated position (ECEF, meters)
    pub position_ecef_m: Vector3D,
    /// Estimated position (geodetic)
    pub position: GeodeticPoint,
    /// Estimated emitter velocity, for techniques that solve it (FDOA)
    pub velocity: Option<Velocity>,
    /// False when an iterative refinement exited on divergence or its
    /// iteration cap: the estimate is the best intermediate found and the
    /// residual tells how much to trust it.
    pub converged: bool,
    /// Refinement iterations spent
    pub iterations: usize,
    /// Final (weighted) residual norm
    pub residual_norm: f64,
    /// Accuracy figure
    pub accuracy: Accuracy,
}

impl EstimationResult {
    /// Builds a result from an ECEF estimate.
    pub(crate) fn from_ecef(
        ecef_m: Vector3<f64>,
        converged: bool,
        iterations: usize,
        residual_norm: f64,
        accuracy: Accuracy,
    ) -> Self {
        Self {
            position: ecef_to_geodetic(&ecef_m),
            position_ecef_m: ecef_m.into(),
            velocity: None,
            converged,
            iterations,
            residual_norm,
            accuracy,
        }
    }

    /// Copies, attaching a solved velocity.
    pub(crate) fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }
}
