/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// CGCS2000 ellipsoid semi-major axis (meters)
pub const CGCS2000_SEMI_MAJOR_AXIS_M: f64 = 6378137.0_f64;

/// CGCS2000 first eccentricity squared
pub const CGCS2000_ECCENTRICITY_SQ: f64 = 0.00669438002290_f64;

/// Minimum SNR for a station to receive an emitter, in dB.
/// Link budget validation fails below this figure.
pub const SNR_THRESHOLD_DB: f64 = 1.0;

/// Doppler-difference frequency resolution (Hz)
pub const FREQUENCY_RESOLUTION_HZ: f64 = 100.0;

/// FFT length assumed by the Doppler frequency-resolution model
pub const DOPPLER_FFT_LENGTH: f64 = 4096.0;

/// Latitude iteration tolerance in [ecef_to_geodetic](crate::geodesy::ecef_to_geodetic):
/// 0.0001 arc seconds, in radians.
pub const LATITUDE_TOLERANCE_RAD: f64 = 0.0001 / 3600.0 * core::f64::consts::PI / 180.0;

/// Iteration cap for the geodetic latitude solve. The 0.0001″ tolerance
/// converges within a handful of rounds for any point near the ellipsoid,
/// the cap guards pathological inputs.
pub const LATITUDE_MAX_ITER: usize = 16;
