//! Small stochastic models built from named samples.
//!
//! - [`weather`]: a Bernoulli draw picks the sky, which picks the parameters
//!   of a Normal temperature draw
//! - [`geometric`]: random control flow, flipping until the first success;
//!   [`geometric_bounded`] caps the number of flips

use crate::context::SampleContext;
use crate::sample::Recorder;
use crate::trace::Address;
use crate::{Bernoulli, Normal, ProbError};
use std::fmt;
use tracing::debug;

/// Probability that a day is cloudy.
pub const CLOUDY_PROB: f64 = 0.3;

/// The sky on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Cloudy,
    Sunny,
}

/// Parameters of the temperature distribution for one kind of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureParams {
    pub mean: f64,
    pub scale: f64,
}

impl Weather {
    /// Map the outcome of the cloudy coin: `true` is cloudy.
    pub fn from_indicator(cloudy: bool) -> Self {
        if cloudy {
            Weather::Cloudy
        } else {
            Weather::Sunny
        }
    }

    /// `"cloudy"` or `"sunny"`.
    pub fn label(&self) -> &'static str {
        match self {
            Weather::Cloudy => "cloudy",
            Weather::Sunny => "sunny",
        }
    }

    /// Temperature parameters for this kind of day.
    pub fn temperature(&self) -> TemperatureParams {
        match self {
            Weather::Cloudy => TemperatureParams {
                mean: 55.0,
                scale: 10.0,
            },
            Weather::Sunny => TemperatureParams {
                mean: 75.0,
                scale: 15.0,
            },
        }
    }

    /// The temperature distribution for this kind of day.
    pub fn temperature_dist(&self) -> Result<Normal, ProbError> {
        let TemperatureParams { mean, scale } = self.temperature();
        Normal::new(mean, scale)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generate one day of weather.
///
/// Draws `Bernoulli(0.3)` at `"cloudy"`, then a temperature at `"temp"` from
/// the Normal picked by the sky. With [`Untraced`](crate::Untraced) this is
/// plain sampling; with a [`Trace`](crate::Trace) both choices are recorded.
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{weather, SampleContext, Trace};
///
/// let mut ctx = SampleContext::seeded(101);
/// let mut trace = Trace::new();
/// let (sky, temp) = weather(&mut ctx, &mut trace).unwrap();
///
/// assert!(sky.label() == "cloudy" || sky.label() == "sunny");
/// assert_eq!(trace.value("temp").unwrap().as_f64(), temp);
/// ```
pub fn weather<T: Recorder + ?Sized>(
    ctx: &mut SampleContext,
    recorder: &mut T,
) -> Result<(Weather, f64), ProbError> {
    let cloudy = ctx.sample(recorder, "cloudy", &Bernoulli::new(CLOUDY_PROB)?)?;
    let sky = Weather::from_indicator(cloudy);
    let temp = ctx.sample(recorder, "temp", &sky.temperature_dist()?)?;
    Ok((sky, temp))
}

/// Count failures before the first success of a `Bernoulli(p)` coin.
///
/// Flip `t` is recorded at `x_t`, so each step of the recursion has its own
/// address. Runs as a loop, so small `p` cannot exhaust the stack.
///
/// # Errors
/// Returns [`ProbError::InvalidParameter`] unless `p` is in (0, 1].
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{geometric, SampleContext, Trace};
///
/// let mut ctx = SampleContext::seeded(101);
/// let mut trace = Trace::new();
/// let failures = geometric(&mut ctx, &mut trace, 0.5).unwrap();
///
/// // One flip per failure plus the final success
/// assert_eq!(trace.len() as u64, failures + 1);
/// ```
pub fn geometric<T: Recorder + ?Sized>(
    ctx: &mut SampleContext,
    recorder: &mut T,
    p: f64,
) -> Result<u64, ProbError> {
    geometric_bounded(ctx, recorder, p, usize::MAX)
}

/// [`geometric`] with at most `max_flips` flips.
///
/// Every flip adds a site to a [`Trace`](crate::Trace), so a tiny `p` would
/// otherwise grow the trace without bound.
///
/// # Errors
/// Returns [`ProbError::InvalidParameter`] unless `p` is in (0, 1] and
/// `max_flips` is at least 1, and [`ProbError::StepLimit`] when `max_flips`
/// flips all fail.
pub fn geometric_bounded<T: Recorder + ?Sized>(
    ctx: &mut SampleContext,
    recorder: &mut T,
    p: f64,
    max_flips: usize,
) -> Result<u64, ProbError> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(ProbError::invalid("p", "success probability must lie in (0, 1]"));
    }
    if max_flips == 0 {
        return Err(ProbError::invalid("max_flips", "must be at least 1"));
    }
    let coin = Bernoulli::new(p)?;

    for t in 0..max_flips {
        let address = Address::indexed("x", t)?;
        if ctx.sample(recorder, address.as_str(), &coin)? {
            debug!(failures = t, "geometric finished");
            return Ok(t as u64);
        }
    }
    debug!(max_flips, "geometric hit the flip limit");
    Err(ProbError::StepLimit { limit: max_flips })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceValue, Condition, DistSpec, Trace, Untraced};

    #[test]
    fn test_weather_from_indicator() {
        assert_eq!(Weather::from_indicator(true), Weather::Cloudy);
        assert_eq!(Weather::from_indicator(false), Weather::Sunny);
    }

    #[test]
    fn test_weather_table() {
        assert_eq!(
            Weather::Cloudy.temperature(),
            TemperatureParams {
                mean: 55.0,
                scale: 10.0
            }
        );
        assert_eq!(
            Weather::Sunny.temperature(),
            TemperatureParams {
                mean: 75.0,
                scale: 15.0
            }
        );
        assert_eq!(Weather::Sunny.temperature_dist().unwrap().scale(), 15.0);
    }

    #[test]
    fn test_weather_labels() {
        assert_eq!(Weather::Cloudy.to_string(), "cloudy");
        assert_eq!(Weather::Sunny.label(), "sunny");
    }

    #[test]
    fn test_weather_records_two_sites() {
        let mut ctx = SampleContext::seeded(101);
        let mut trace = Trace::new();
        let (sky, temp) = weather(&mut ctx, &mut trace).unwrap();

        let order: Vec<&str> = trace.addresses().map(|a| a.as_str()).collect();
        assert_eq!(order, vec!["cloudy", "temp"]);
        assert_eq!(
            trace.value("cloudy"),
            Some(ChoiceValue::Bool(sky == Weather::Cloudy))
        );
        assert_eq!(trace.value("temp"), Some(ChoiceValue::Real(temp)));

        let TemperatureParams { mean, scale } = sky.temperature();
        assert_eq!(
            trace.get("temp").unwrap().dist,
            DistSpec::Normal { loc: mean, scale }
        );
    }

    #[test]
    fn test_weather_twice_in_one_trace_fails() {
        let mut ctx = SampleContext::seeded(101);
        let mut trace = Trace::new();
        weather(&mut ctx, &mut trace).unwrap();
        assert!(matches!(
            weather(&mut ctx, &mut trace),
            Err(ProbError::DuplicateAddress { .. })
        ));
    }

    #[test]
    fn test_weather_untraced_matches_traced() {
        let mut a = SampleContext::seeded(33);
        let mut b = SampleContext::seeded(33);
        let traced = weather(&mut a, &mut Trace::new()).unwrap();
        let untraced = weather(&mut b, &mut Untraced).unwrap();
        assert_eq!(traced, untraced);
    }

    #[test]
    fn test_weather_conditioned_on_sunny() {
        let mut ctx = SampleContext::seeded(101);
        for _ in 0..20 {
            let mut cond = Condition::new().observe("cloudy", false).unwrap();
            let (sky, _) = weather(&mut ctx, &mut cond).unwrap();
            assert_eq!(sky, Weather::Sunny);
        }
    }

    #[test]
    fn test_geometric_addresses() {
        let mut ctx = SampleContext::seeded(4);
        let mut trace = Trace::new();
        let failures = geometric(&mut ctx, &mut trace, 0.3).unwrap();

        assert_eq!(trace.len() as u64, failures + 1);
        for (t, site) in trace.sites().iter().enumerate() {
            assert_eq!(site.address.as_str(), format!("x_{}", t));
            let last = t as u64 == failures;
            assert_eq!(site.value, ChoiceValue::Bool(last));
        }
    }

    #[test]
    fn test_geometric_certain_success() {
        let mut ctx = SampleContext::seeded(4);
        let mut trace = Trace::new();
        assert_eq!(geometric(&mut ctx, &mut trace, 1.0).unwrap(), 0);
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_geometric_rejects_bad_p() {
        let mut ctx = SampleContext::seeded(4);
        assert!(geometric(&mut ctx, &mut Untraced, 0.0).is_err());
        assert!(geometric(&mut ctx, &mut Untraced, 1.5).is_err());
        assert!(geometric(&mut ctx, &mut Untraced, f64::NAN).is_err());
    }

    #[test]
    fn test_geometric_forced_by_condition() {
        let mut ctx = SampleContext::seeded(4);
        let mut cond = Condition::new()
            .observe("x_0", false)
            .unwrap()
            .observe("x_1", false)
            .unwrap()
            .observe("x_2", true)
            .unwrap();
        assert_eq!(geometric(&mut ctx, &mut cond, 0.5).unwrap(), 2);
        let expected = 3.0 * 0.5_f64.ln();
        assert!((cond.trace().log_likelihood() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_bounded_stops_at_limit() {
        let mut ctx = SampleContext::seeded(4);
        let mut trace = Trace::new();
        let result = geometric_bounded(&mut ctx, &mut trace, 1e-12, 25);

        assert_eq!(result, Err(ProbError::StepLimit { limit: 25 }));
        assert_eq!(trace.len(), 25);
        assert_eq!(trace.addresses().last().map(|a| a.as_str()), Some("x_24"));
    }

    #[test]
    fn test_geometric_bounded_matches_unbounded() {
        let mut a = SampleContext::seeded(12);
        let mut b = SampleContext::seeded(12);
        let bounded = geometric_bounded(&mut a, &mut Trace::new(), 0.4, 1_000).unwrap();
        let unbounded = geometric(&mut b, &mut Trace::new(), 0.4).unwrap();
        assert_eq!(bounded, unbounded);
    }

    #[test]
    fn test_geometric_bad_p_uses_invalid_parameter() {
        let mut ctx = SampleContext::seeded(4);
        assert!(matches!(
            geometric(&mut ctx, &mut Untraced, 0.0),
            Err(ProbError::InvalidParameter { ref name, .. }) if name == "p"
        ));
        assert!(matches!(
            geometric_bounded(&mut ctx, &mut Untraced, 0.5, 0),
            Err(ProbError::InvalidParameter { ref name, .. }) if name == "max_flips"
        ));
    }
}
