use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Reception frequency band, bounds in GHz.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrequencyBand {
    /// Lower bound (GHz)
    pub min_ghz: f64,
    /// Upper bound (GHz)
    pub max_ghz: f64,
}

impl FrequencyBand {
    /// Creates a new [FrequencyBand]. The upper bound must lie strictly
    /// above the lower bound.
    pub fn new(min_ghz: f64, max_ghz: f64) -> Result<Self, Error> {
        if max_ghz <= min_ghz {
            return Err(Error::InvalidFrequencyBand(min_ghz, max_ghz));
        }
        Ok(Self { min_ghz, max_ghz })
    }

    /// True if the carrier lies within this band (bounds included).
    pub fn contains(&self, frequency_ghz: f64) -> bool {
        frequency_ghz >= self.min_ghz && frequency_ghz <= self.max_ghz
    }

    /// Bandwidth in GHz.
    pub fn bandwidth_ghz(&self) -> f64 {
        self.max_ghz - self.min_ghz
    }

    /// Intersection of all proposed bands: the common bandwidth every
    /// station can sample. None when the bands do not overlap.
    pub fn intersection<'a>(bands: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        let (min_ghz, max_ghz) = bands
            .into_iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(min, max), band| {
                (min.max(band.min_ghz), max.min(band.max_ghz))
            });

        if min_ghz < max_ghz && min_ghz.is_finite() {
            Some(Self { min_ghz, max_ghz })
        } else {
            None
        }
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}] GHz", self.min_ghz, self.max_ghz)
    }
}

/// Widest common band across stations, sorted narrow bands first for a
/// deterministic fold order.
pub(crate) fn common_band(bands: &[FrequencyBand]) -> Option<FrequencyBand> {
    let sorted = bands
        .iter()
        .sorted_by(|a, b| a.min_ghz.total_cmp(&b.min_ghz))
        .collect::<Vec<_>>();
    FrequencyBand::intersection(sorted)
}
