//! Engine configuration: the simulation-mode gate plus per-technique
//! solver parametrization.
#[cfg(feature = "serde")]
use serde::Deserialize;

fn default_simulation_mode() -> bool {
    true
}

fn default_df_max_iterations() -> usize {
    10
}

fn default_df_convergence_m() -> f64 {
    1.0e-3
}

fn default_df_damping() -> f64 {
    0.5
}

fn default_df_max_step_m() -> f64 {
    100_000.0
}

fn default_regularization() -> f64 {
    1.0e-6
}

fn default_df_initial_range_m() -> f64 {
    10_000.0
}

fn default_df_height_min_m() -> f64 {
    0.0
}

fn default_df_height_max_m() -> f64 {
    5000.0
}

fn default_df_max_gdop() -> f64 {
    1000.0
}

fn default_tdoa_max_iterations() -> usize {
    10
}

fn default_tdoa_tolerance_m() -> f64 {
    1.0e-4
}

fn default_fdoa_max_iterations() -> usize {
    100
}

fn default_fdoa_damping() -> f64 {
    1.0e-3
}

fn default_fdoa_convergence() -> f64 {
    1.0e-6
}

fn default_fdoa_diff_step() -> f64 {
    1.0e-7
}

fn default_doppler_sigma_hz() -> f64 {
    1.0
}

fn default_stationary_weight() -> f64 {
    1.0e6
}

fn default_moving_weight() -> f64 {
    1.0e3
}

fn default_seed_position_sigma_m() -> f64 {
    10.0
}

fn default_seed_speed_sigma_m_s() -> f64 {
    0.1
}

fn default_seed_angle_sigma_deg() -> f64 {
    0.5
}

/// Direction-finding (interferometer) refinement parametrization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct DfConfig {
    /// Gauss-Newton iteration cap
    #[cfg_attr(feature = "serde", serde(default = "default_df_max_iterations"))]
    pub max_iterations: usize,

    /// Step-norm convergence threshold (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_df_convergence_m"))]
    pub convergence_m: f64,

    /// Step damping factor
    #[cfg_attr(feature = "serde", serde(default = "default_df_damping"))]
    pub damping: f64,

    /// Per-iteration step cap (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_df_max_step_m"))]
    pub max_step_m: f64,

    /// Normal-equations diagonal regularization
    #[cfg_attr(feature = "serde", serde(default = "default_regularization"))]
    pub regularization: f64,

    /// Range assumed when projecting the initial guess from station 0
    #[cfg_attr(feature = "serde", serde(default = "default_df_initial_range_m"))]
    pub initial_range_m: f64,

    /// Plausible emitter height window used by the height blend (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_df_height_min_m"))]
    pub height_min_m: f64,

    #[cfg_attr(feature = "serde", serde(default = "default_df_height_max_m"))]
    pub height_max_m: f64,

    /// GDOP clamp protecting downstream consumers from degenerate geometry
    #[cfg_attr(feature = "serde", serde(default = "default_df_max_gdop"))]
    pub max_gdop: f64,
}

impl Default for DfConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_df_max_iterations(),
            convergence_m: default_df_convergence_m(),
            damping: default_df_damping(),
            max_step_m: default_df_max_step_m(),
            regularization: default_regularization(),
            initial_range_m: default_df_initial_range_m(),
            height_min_m: default_df_height_min_m(),
            height_max_m: default_df_height_max_m(),
            max_gdop: default_df_max_gdop(),
        }
    }
}

/// TDOA refinement parametrization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct TdoaConfig {
    /// Taylor iteration cap
    #[cfg_attr(feature = "serde", serde(default = "default_tdoa_max_iterations"))]
    pub max_iterations: usize,

    /// Step-norm convergence threshold (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_tdoa_tolerance_m"))]
    pub tolerance_m: f64,

    /// Normal-equations diagonal regularization
    #[cfg_attr(feature = "serde", serde(default = "default_regularization"))]
    pub regularization: f64,
}

impl Default for TdoaConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_tdoa_max_iterations(),
            tolerance_m: default_tdoa_tolerance_m(),
            regularization: default_regularization(),
        }
    }
}

/// FDOA Levenberg-Marquardt parametrization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FdoaConfig {
    /// LM iteration cap
    #[cfg_attr(feature = "serde", serde(default = "default_fdoa_max_iterations"))]
    pub max_iterations: usize,

    /// Initial LM damping factor λ₀
    #[cfg_attr(feature = "serde", serde(default = "default_fdoa_damping"))]
    pub initial_damping: f64,

    /// Convergence threshold on step norm and residual norm
    #[cfg_attr(feature = "serde", serde(default = "default_fdoa_convergence"))]
    pub convergence: f64,

    /// Central-difference step for the numerical Jacobian
    #[cfg_attr(feature = "serde", serde(default = "default_fdoa_diff_step"))]
    pub diff_step: f64,

    /// Doppler-shift measurement noise, 1σ (Hz)
    #[cfg_attr(feature = "serde", serde(default = "default_doppler_sigma_hz"))]
    pub doppler_sigma_hz: f64,

    /// Velocity regularization weight for stationary emitters
    #[cfg_attr(feature = "serde", serde(default = "default_stationary_weight"))]
    pub stationary_velocity_weight: f64,

    /// Velocity regularization weight for moving emitters
    #[cfg_attr(feature = "serde", serde(default = "default_moving_weight"))]
    pub moving_velocity_weight: f64,

    /// Initial-guess position perturbation, 1σ (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_seed_position_sigma_m"))]
    pub seed_position_sigma_m: f64,

    /// Initial-guess speed perturbation, 1σ (m.s⁻¹)
    #[cfg_attr(feature = "serde", serde(default = "default_seed_speed_sigma_m_s"))]
    pub seed_speed_sigma_m_s: f64,

    /// Initial-guess course perturbation, 1σ (degrees)
    #[cfg_attr(feature = "serde", serde(default = "default_seed_angle_sigma_deg"))]
    pub seed_angle_sigma_deg: f64,
}

impl Default for FdoaConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_fdoa_max_iterations(),
            initial_damping: default_fdoa_damping(),
            convergence: default_fdoa_convergence(),
            diff_step: default_fdoa_diff_step(),
            doppler_sigma_hz: default_doppler_sigma_hz(),
            stationary_velocity_weight: default_stationary_weight(),
            moving_velocity_weight: default_moving_weight(),
            seed_position_sigma_m: default_seed_position_sigma_m(),
            seed_speed_sigma_m_s: default_seed_speed_sigma_m_s(),
            seed_angle_sigma_deg: default_seed_angle_sigma_deg(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Simulation mode unlocks the ground-truth shortcuts (TDOA height pin,
    /// DF height fallback, FDOA truth-seeded initial state). A deployed
    /// engine has no ground truth: disable this flag and provide aprioris.
    #[cfg_attr(feature = "serde", serde(default = "default_simulation_mode"))]
    pub simulation_mode: bool,

    /// Direction-finding parametrization
    #[cfg_attr(feature = "serde", serde(default))]
    pub df: DfConfig,

    /// TDOA parametrization
    #[cfg_attr(feature = "serde", serde(default))]
    pub tdoa: TdoaConfig,

    /// FDOA parametrization
    #[cfg_attr(feature = "serde", serde(default))]
    pub fdoa: FdoaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation_mode: default_simulation_mode(),
            df: Default::default(),
            tdoa: Default::default(),
            fdoa: Default::default(),
        }
    }
}

impl Config {
    /// Default simulator preset.
    pub fn simulation() -> Self {
        Self::default()
    }

    /// Copies and toggles simulation mode.
    pub fn with_simulation_mode(&self, simulation_mode: bool) -> Self {
        let mut c = self.clone();
        c.simulation_mode = simulation_mode;
        c
    }
}
