//! The univariate Normal distribution.
//!
//! # Example
//!
//! ```rust
//! use stochastic_prob::Normal;
//!
//! // Temperature on a sunny day: N(75, 15²)
//! let sunny = Normal::new(75.0, 15.0).unwrap();
//! assert_eq!(sunny.variance(), 225.0);
//!
//! // The density peaks at the mean
//! assert!(sunny.pdf(75.0) > sunny.pdf(90.0));
//! ```

use crate::dist::{DistSpec, Distribution, RSample, Reparameterized};
use crate::ProbError;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::{E, PI};

/// A univariate Normal distribution N(loc, scale²).
///
/// - `loc` (μ) is the center of the distribution
/// - `scale` (σ) is the standard deviation, strictly positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    loc: f64,
    scale: f64,
}

impl Normal {
    /// Create a new Normal distribution N(loc, scale²).
    ///
    /// # Errors
    /// Returns an error if `loc` is not finite, or `scale` is not finite and
    /// strictly positive.
    pub fn new(loc: f64, scale: f64) -> Result<Self, ProbError> {
        if !loc.is_finite() {
            return Err(ProbError::invalid("loc", "location must be finite"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ProbError::invalid(
                "scale",
                "scale must be finite and strictly positive",
            ));
        }
        Ok(Self { loc, scale })
    }

    /// The standard normal distribution N(0, 1).
    pub fn standard() -> Self {
        Self {
            loc: 0.0,
            scale: 1.0,
        }
    }

    /// Location parameter μ.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale parameter σ.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The mean, equal to `loc`.
    pub fn mean(&self) -> f64 {
        self.loc
    }

    /// The variance σ².
    pub fn variance(&self) -> f64 {
        self.scale * self.scale
    }

    /// Probability density function at x.
    ///
    /// pdf(x) = (1/√(2πσ²)) exp(-(x-μ)²/(2σ²))
    pub fn pdf(&self, x: f64) -> f64 {
        self.log_prob(x).exp()
    }

    /// Differential entropy: H(X) = 0.5 * log(2πeσ²)
    pub fn entropy(&self) -> f64 {
        0.5 * (2.0 * PI * E * self.variance()).ln()
    }
}

impl Distribution for Normal {
    type Value = f64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.rsample(rng).value
    }

    /// log pdf(x) = -0.5 * log(2π) - log σ - (x-μ)²/(2σ²)
    fn log_prob(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        -0.5 * (2.0 * PI).ln() - self.scale.ln() - 0.5 * z * z
    }

    fn spec(&self) -> DistSpec {
        DistSpec::Normal {
            loc: self.loc,
            scale: self.scale,
        }
    }
}

impl Reparameterized for Normal {
    /// Given ε ~ N(0,1), returns μ + σε.
    fn reparameterize(&self, noise: f64) -> f64 {
        self.loc + self.scale * noise
    }

    fn rsample<R: Rng + ?Sized>(&self, rng: &mut R) -> RSample<f64> {
        let noise: f64 = rng.sample(StandardNormal);
        RSample {
            value: self.reparameterize(noise),
            noise,
        }
    }
}
