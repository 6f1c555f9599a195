//! The Bernoulli distribution over {false, true}.

use crate::dist::{DistSpec, Distribution};
use crate::ProbError;
use rand::Rng;

/// A single biased coin flip: `true` with probability `probs`.
///
/// `true` stands for outcome 1 and `false` for outcome 0.
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{Bernoulli, Distribution};
///
/// let cloudy = Bernoulli::new(0.3).unwrap();
/// assert!((cloudy.log_prob(true) - 0.3_f64.ln()).abs() < 1e-12);
/// assert!((cloudy.log_prob(false) - 0.7_f64.ln()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    probs: f64,
}

impl Bernoulli {
    /// Create a Bernoulli distribution with success probability `probs`.
    ///
    /// # Errors
    /// Returns an error unless `probs` is in [0, 1].
    pub fn new(probs: f64) -> Result<Self, ProbError> {
        if !(0.0..=1.0).contains(&probs) {
            return Err(ProbError::invalid(
                "probs",
                "probability must lie in [0, 1]",
            ));
        }
        Ok(Self { probs })
    }

    /// Probability of `true`.
    pub fn probs(&self) -> f64 {
        self.probs
    }

    /// The mean, equal to `probs`.
    pub fn mean(&self) -> f64 {
        self.probs
    }

    /// The variance p(1-p).
    pub fn variance(&self) -> f64 {
        self.probs * (1.0 - self.probs)
    }
}

impl Distribution for Bernoulli {
    type Value = bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.probs)
    }

    fn log_prob(&self, value: bool) -> f64 {
        if value {
            self.probs.ln()
        } else {
            (1.0 - self.probs).ln()
        }
    }

    fn spec(&self) -> DistSpec {
        DistSpec::Bernoulli { probs: self.probs }
    }
}
