//! The named sample primitive and the recorders it reports to.
//!
//! ## The Problem
//!
//! Drawing straight from a distribution gives a value and nothing else:
//! there is no way to refer back to that particular random choice.
//!
//! ## The Solution
//!
//! [`sample_with`] takes a label alongside the distribution. It draws (or is
//! handed) a value, scores it, and reports a [`SampleSite`] to a [`Recorder`]
//! passed in by the caller. What happens to the site depends on the recorder:
//!
//! | Recorder      | Behavior                                             |
//! |---------------|------------------------------------------------------|
//! | [`Trace`]     | keeps every site, rejects reused addresses           |
//! | [`Untraced`]  | drops every site, plain sampling                     |
//! | [`Replay`]    | returns values from an earlier trace where present   |
//! | [`Condition`] | returns fixed observations and scores them           |

use crate::dist::{Choice, ChoiceValue, Distribution};
use crate::trace::{Address, SampleSite, SiteOrigin, Trace};
use crate::ProbError;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// The capability a named sample reports to.
pub trait Recorder {
    /// Check that `address` may be used. Called before any value is drawn.
    fn admit(&self, _address: &Address) -> Result<(), ProbError> {
        Ok(())
    }

    /// A value to return instead of drawing, with its origin.
    fn lookup(&self, _address: &Address) -> Option<(ChoiceValue, SiteOrigin)> {
        None
    }

    /// Store a completed site.
    fn record(&mut self, site: SampleSite) -> Result<(), ProbError>;
}

/// Draw a named sample from `dist`, report it to `recorder`, and return the value.
///
/// # Errors
///
/// - [`ProbError::EmptyAddress`] if `label` is empty
/// - any error from [`Recorder::admit`], e.g. a duplicate address in a [`Trace`]
/// - [`ProbError::ReplayTypeMismatch`] if the recorder supplies a value of the
///   wrong kind
///
/// Nothing is drawn from `rng` when the call fails before sampling.
pub fn sample_with<D, R, T>(
    rng: &mut R,
    recorder: &mut T,
    label: &str,
    dist: &D,
) -> Result<D::Value, ProbError>
where
    D: Distribution,
    R: Rng + ?Sized,
    T: Recorder + ?Sized,
{
    let address = Address::new(label)?;
    recorder.admit(&address)?;

    let (value, origin) = match recorder.lookup(&address) {
        Some((fixed, origin)) => {
            let value = <D::Value as Choice>::from_choice(&fixed).ok_or_else(|| {
                ProbError::ReplayTypeMismatch {
                    address: address.to_string(),
                    expected: <D::Value as Choice>::KIND,
                    got: fixed.kind(),
                }
            })?;
            (value, origin)
        }
        None => (dist.sample(rng), SiteOrigin::Sampled),
    };

    let log_prob = dist.log_prob(value);
    debug!(address = %address, value = ?value, log_prob, origin = %origin, "sample site");

    recorder.record(SampleSite {
        address,
        value: value.into_choice(),
        log_prob,
        dist: dist.spec(),
        origin,
    })?;
    Ok(value)
}

// ============================================================================
// Recorders
// ============================================================================

impl Recorder for Trace {
    fn admit(&self, address: &Address) -> Result<(), ProbError> {
        if self.contains(address.as_str()) {
            return Err(ProbError::DuplicateAddress {
                address: address.to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, site: SampleSite) -> Result<(), ProbError> {
        self.insert(site)
    }
}

/// Discards every site. Address reuse goes unnoticed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untraced;

impl Recorder for Untraced {
    fn record(&mut self, _site: SampleSite) -> Result<(), ProbError> {
        Ok(())
    }
}

/// Re-runs a model against an earlier trace.
///
/// Addresses present in the source trace return their recorded value;
/// all others are sampled fresh. Every site lands in a new trace.
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{weather, Replay, SampleContext, Trace};
///
/// let mut ctx = SampleContext::seeded(101);
/// let mut original = Trace::new();
/// let first = weather(&mut ctx, &mut original).unwrap();
///
/// let mut replay = Replay::new(&original);
/// let again = weather(&mut ctx, &mut replay).unwrap();
/// assert_eq!(first, again);
/// ```
#[derive(Debug)]
pub struct Replay<'a> {
    source: &'a Trace,
    trace: Trace,
}

impl<'a> Replay<'a> {
    /// Replay against `source`.
    pub fn new(source: &'a Trace) -> Self {
        Self {
            source,
            trace: Trace::new(),
        }
    }

    /// The sites recorded so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Consume the recorder, returning the new trace.
    pub fn into_trace(self) -> Trace {
        self.trace
    }
}

impl Recorder for Replay<'_> {
    fn admit(&self, address: &Address) -> Result<(), ProbError> {
        self.trace.admit(address)
    }

    fn lookup(&self, address: &Address) -> Option<(ChoiceValue, SiteOrigin)> {
        self.source
            .get(address.as_str())
            .map(|site| (site.value, SiteOrigin::Replayed))
    }

    fn record(&mut self, site: SampleSite) -> Result<(), ProbError> {
        self.trace.insert(site)
    }
}

/// Fixes chosen addresses to observed values.
///
/// Observed sites are scored under their distribution and marked
/// [`SiteOrigin::Observed`], so [`Trace::log_likelihood`] of the resulting
/// trace is the log-likelihood of the observations.
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{weather, Condition, SampleContext, Weather};
///
/// let mut ctx = SampleContext::seeded(101);
/// let mut cond = Condition::new().observe("cloudy", true).unwrap();
/// let (w, _) = weather(&mut ctx, &mut cond).unwrap();
/// assert_eq!(w, Weather::Cloudy);
/// assert!((cond.trace().log_likelihood() - 0.3_f64.ln()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Condition {
    observations: HashMap<Address, ChoiceValue>,
    trace: Trace,
}

impl Condition {
    /// A recorder with no observations yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix `label` to `value`.
    ///
    /// # Errors
    /// Returns [`ProbError::EmptyAddress`] if `label` is empty.
    pub fn observe<V: Choice>(mut self, label: &str, value: V) -> Result<Self, ProbError> {
        let address = Address::new(label)?;
        self.observations.insert(address, value.into_choice());
        Ok(self)
    }

    /// Number of fixed addresses.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// The sites recorded so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Consume the recorder, returning the trace.
    pub fn into_trace(self) -> Trace {
        self.trace
    }
}

impl Recorder for Condition {
    fn admit(&self, address: &Address) -> Result<(), ProbError> {
        self.trace.admit(address)
    }

    fn lookup(&self, address: &Address) -> Option<(ChoiceValue, SiteOrigin)> {
        self.observations
            .get(address)
            .map(|&value| (value, SiteOrigin::Observed))
    }

    fn record(&mut self, site: SampleSite) -> Result<(), ProbError> {
        self.trace.insert(site)
    }
}
