//! Pluggable measurement-error injection. Every synthetic observation
//! builder draws its error samples through [ErrorGenerator], so a given
//! technique's noise model is explicit and tests can swap in [NoErrors]
//! or a seeded RNG.
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Synthetic measurement error source.
pub trait ErrorGenerator {
    /// Draws one error sample scaled to the proposed 1σ magnitude.
    fn draw(&mut self, sigma: f64) -> f64;
}

/// Zero-mean gaussian error sampling. The default model for angle and
/// Doppler observations.
pub struct GaussianErrors<R: Rng> {
    rng: R,
}

impl<R: Rng> GaussianErrors<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ErrorGenerator for GaussianErrors<R> {
    fn draw(&mut self, sigma: f64) -> f64 {
        match Normal::new(0.0, sigma) {
            Ok(normal) => normal.sample(&mut self.rng),
            // negative or non-finite σ: ideal measurement
            Err(_) => 0.0,
        }
    }
}

/// Deterministic ±σ alternation: the first draw is +σ, the second -σ and
/// so on. The historical timing-bias model of the TDOA technique.
#[derive(Debug, Default)]
pub struct AlternatingErrors {
    draws: usize,
}

impl AlternatingErrors {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorGenerator for AlternatingErrors {
    fn draw(&mut self, sigma: f64) -> f64 {
        let sign = if self.draws % 2 == 0 { 1.0 } else { -1.0 };
        self.draws += 1;
        sign * sigma
    }
}

/// Ideal (error free) observations.
#[derive(Debug, Default)]
pub struct NoErrors;

impl ErrorGenerator for NoErrors {
    fn draw(&mut self, _sigma: f64) -> f64 {
        0.0
    }
}
