//! The distribution interface shared by every primitive stochastic function.
//!
//! A distribution is an opaque capability with two operations:
//!
//! - `sample`: draw a value using a caller-supplied random generator
//! - `log_prob`: score a value under the distribution
//!
//! Parameters are fixed at construction. Drawing never mutates the
//! distribution, so one value can be sampled from any number of times.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive stochastic function.
///
/// # Example
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use stochastic_prob::{Distribution, Normal};
///
/// let mut rng = StdRng::seed_from_u64(101);
/// let normal = Normal::standard();
/// let x = normal.sample(&mut rng);
/// assert!(normal.log_prob(x).is_finite());
/// ```
pub trait Distribution: fmt::Debug {
    /// The type of value this distribution produces.
    type Value: Choice;

    /// Draw one value.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value;

    /// Log density (continuous) or log mass (discrete) of `value`.
    fn log_prob(&self, value: Self::Value) -> f64;

    /// The family and parameters, as recorded in a trace.
    fn spec(&self) -> DistSpec;
}

/// Distributions that can be sampled by transforming parameter-free noise.
///
/// `rsample` and `reparameterize` together expose the noise path: the drawn
/// value is a deterministic function of the parameters and the noise.
pub trait Reparameterized: Distribution {
    /// Apply the deterministic transform to a noise value.
    fn reparameterize(&self, noise: f64) -> Self::Value;

    /// Draw noise and transform it.
    fn rsample<R: Rng + ?Sized>(&self, rng: &mut R) -> RSample<Self::Value>;
}

/// The result of a reparameterized draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RSample<T> {
    /// The transformed value
    pub value: T,
    /// The parameter-free noise it was computed from
    pub noise: f64,
}

/// Family and parameters of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistSpec {
    /// Normal(loc, scale)
    Normal { loc: f64, scale: f64 },
    /// Bernoulli(probs)
    Bernoulli { probs: f64 },
}

impl fmt::Display for DistSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistSpec::Normal { loc, scale } => write!(f, "Normal({}, {})", loc, scale),
            DistSpec::Bernoulli { probs } => write!(f, "Bernoulli({})", probs),
        }
    }
}

// ============================================================================
// Recorded values
// ============================================================================

/// A value stored at a sample site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// Outcome of a binary draw
    Bool(bool),
    /// Outcome of a real-valued draw
    Real(f64),
}

impl ChoiceValue {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ChoiceValue::Bool(_) => bool::KIND,
            ChoiceValue::Real(_) => f64::KIND,
        }
    }

    /// Numeric view of the value. Booleans map to 0.0 and 1.0.
    pub fn as_f64(&self) -> f64 {
        match *self {
            ChoiceValue::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            ChoiceValue::Real(x) => x,
        }
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Bool(b) => write!(f, "{}", b),
            ChoiceValue::Real(x) => write!(f, "{}", x),
        }
    }
}

/// Value types a distribution may produce.
pub trait Choice: Copy + fmt::Debug {
    /// Name used in error messages.
    const KIND: &'static str;

    /// Wrap into a recorded value.
    fn into_choice(self) -> ChoiceValue;

    /// Unwrap a recorded value, or `None` if it holds another kind.
    fn from_choice(value: &ChoiceValue) -> Option<Self>;
}

impl Choice for bool {
    const KIND: &'static str = "bool";

    fn into_choice(self) -> ChoiceValue {
        ChoiceValue::Bool(self)
    }

    fn from_choice(value: &ChoiceValue) -> Option<Self> {
        match *value {
            ChoiceValue::Bool(b) => Some(b),
            ChoiceValue::Real(_) => None,
        }
    }
}

impl Choice for f64 {
    const KIND: &'static str = "real";

    fn into_choice(self) -> ChoiceValue {
        ChoiceValue::Real(self)
    }

    fn from_choice(value: &ChoiceValue) -> Option<Self> {
        match *value {
            ChoiceValue::Real(x) => Some(x),
            ChoiceValue::Bool(_) => None,
        }
    }
}
