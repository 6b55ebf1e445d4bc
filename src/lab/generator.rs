//! Synthetic lab value generator.
//!
//! Each value is drawn from a two-component Gaussian mixture: with
//! probability `abnormal_probability` from the test's abnormal population,
//! otherwise from its normal population. Values are clamped to be
//! non-negative and rounded to two decimals. Unknown test types fall back
//! to a uniform draw in [0, 100].

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use super::reference::{self, Gaussian, TestProfile};
use crate::models::LabResult;

/// Mixture weight used when none is configured.
pub const DEFAULT_ABNORMAL_PROBABILITY: f64 = 0.3;

/// Upper bound of the uniform fallback for unknown test types.
const UNKNOWN_TEST_MAX: f64 = 100.0;

/// Lab order ids are `LAB-` followed by a number in this range.
const LAB_ID_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// One generated value and the population it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub abnormal: bool,
}

/// Generates synthetic lab values from the reference table.
///
/// Generic over the random source so tests can inject a seeded RNG.
pub struct LabGenerator<R = StdRng> {
    rng: R,
    abnormal_probability: f64,
}

impl LabGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator: equal seeds yield equal sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LabGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            abnormal_probability: DEFAULT_ABNORMAL_PROBABILITY,
        }
    }

    /// Set the mixture weight. Out-of-range values are clamped to [0, 1].
    pub fn with_abnormal_probability(mut self, probability: f64) -> Self {
        self.abnormal_probability = if probability.is_nan() {
            DEFAULT_ABNORMAL_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn abnormal_probability(&self) -> f64 {
        self.abnormal_probability
    }

    /// Generate a value for `test_type` with the configured mixture weight.
    pub fn generate(&mut self, test_type: &str) -> f64 {
        self.generate_with(test_type, self.abnormal_probability)
    }

    /// Generate a value for `test_type` with an explicit mixture weight.
    pub fn generate_with(&mut self, test_type: &str, abnormal_probability: f64) -> f64 {
        match reference::lookup(test_type) {
            Some(profile) => self.sample(profile, abnormal_probability).value,
            None => round2(self.rng.gen_range(0.0..=UNKNOWN_TEST_MAX)),
        }
    }

    /// Draw one value from `profile`, reporting which population was used.
    pub fn sample(&mut self, profile: &TestProfile, abnormal_probability: f64) -> Sample {
        let abnormal = self.rng.gen::<f64>() < abnormal_probability;
        let population = if abnormal {
            &profile.abnormal
        } else {
            &profile.normal
        };
        let raw = draw(&mut self.rng, population);
        Sample {
            value: round2(raw.max(0.0)),
            abnormal,
        }
    }

    /// Build a timestamped result for `profile`.
    pub fn result_for(&mut self, profile: &TestProfile) -> LabResult {
        let value = self.sample(profile, self.abnormal_probability).value;
        LabResult {
            test_type: profile.test_type.to_string(),
            value,
            unit: profile.unit.to_string(),
            reference_min: profile.min,
            reference_max: profile.max,
            timestamp: Utc::now(),
        }
    }

    /// Fresh lab order id, e.g. `LAB-482913`.
    pub fn lab_id(&mut self) -> String {
        format!("LAB-{}", self.rng.gen_range(LAB_ID_RANGE))
    }
}

fn draw<R: Rng>(rng: &mut R, population: &Gaussian) -> f64 {
    use rand::distributions::Distribution;

    match Normal::new(population.mean, population.std_dev) {
        Ok(normal) => normal.sample(rng),
        // Zero spread: the population is a point mass at its mean.
        Err(_) => population.mean,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
