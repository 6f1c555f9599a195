//! Addresses, sample sites and execution traces.
//!
//! Every named draw produces a [`SampleSite`]. A [`Trace`] collects the sites
//! of one execution in the order they were taken and refuses to record the
//! same address twice, so each random choice can later be looked up, replayed
//! or conditioned on by name.

use crate::dist::{ChoiceValue, DistSpec};
use crate::ProbError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Address
// ============================================================================

/// The label of a random choice. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create an address from a label.
    ///
    /// # Errors
    /// Returns [`ProbError::EmptyAddress`] if the label is empty.
    pub fn new(label: impl Into<String>) -> Result<Self, ProbError> {
        let label = label.into();
        if label.is_empty() {
            return Err(ProbError::EmptyAddress);
        }
        Ok(Self(label))
    }

    /// Address for the `index`-th choice of a loop or recursion: `"{base}_{index}"`.
    ///
    /// ```rust
    /// use stochastic_prob::Address;
    ///
    /// let a = Address::indexed("x", 3).unwrap();
    /// assert_eq!(a.as_str(), "x_3");
    /// ```
    pub fn indexed(base: &str, index: usize) -> Result<Self, ProbError> {
        if base.is_empty() {
            return Err(ProbError::EmptyAddress);
        }
        Ok(Self(format!("{}_{}", base, index)))
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = ProbError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Address::new(label)
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Sample Site
// ============================================================================

/// Where the value at a site came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteOrigin {
    /// Drawn from the distribution
    Sampled,
    /// Copied from an earlier trace
    Replayed,
    /// Fixed to an observation
    Observed,
}

impl fmt::Display for SiteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteOrigin::Sampled => "sampled",
            SiteOrigin::Replayed => "replayed",
            SiteOrigin::Observed => "observed",
        };
        f.write_str(name)
    }
}

/// One named random choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSite {
    /// Label of the choice
    pub address: Address,
    /// The value returned to the caller
    pub value: ChoiceValue,
    /// Score of the value under `dist`
    #[serde(with = "log_prob_repr")]
    pub log_prob: f64,
    /// Distribution the value was drawn from or scored against
    pub dist: DistSpec,
    /// Where the value came from
    pub origin: SiteOrigin,
}

/// JSON has no infinities, so non-finite scores travel as `"inf"`, `"-inf"`
/// or `"NaN"`. Finite scores stay numbers.
mod log_prob_repr {
    use serde::de::{self, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(x) => Ok(x),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"NaN\"",
                )),
            },
        }
    }
}

// ============================================================================
// Trace
// ============================================================================

/// The named choices of one execution, in the order they were taken.
///
/// # Example
///
/// ```rust
/// use stochastic_prob::{Bernoulli, SampleContext, Trace};
///
/// let mut ctx = SampleContext::seeded(101);
/// let mut trace = Trace::new();
///
/// let coin = Bernoulli::new(0.5).unwrap();
/// ctx.sample(&mut trace, "flip", &coin).unwrap();
/// assert!(trace.contains("flip"));
///
/// // Reusing an address is rejected
/// assert!(ctx.sample(&mut trace, "flip", &coin).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SampleSite>", into = "Vec<SampleSite>")]
pub struct Trace {
    sites: Vec<SampleSite>,
    index: HashMap<Address, usize>,
}

impl Trace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Whether `label` has been recorded.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// The site recorded at `label`.
    pub fn get(&self, label: &str) -> Option<&SampleSite> {
        self.index.get(label).map(|&i| &self.sites[i])
    }

    /// The value recorded at `label`.
    pub fn value(&self, label: &str) -> Option<ChoiceValue> {
        self.get(label).map(|s| s.value)
    }

    /// Sites in recording order.
    pub fn sites(&self) -> &[SampleSite] {
        &self.sites
    }

    /// Addresses in recording order.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.sites.iter().map(|s| &s.address)
    }

    /// Record a site.
    ///
    /// # Errors
    /// Returns [`ProbError::DuplicateAddress`] if the address is already present.
    pub fn insert(&mut self, site: SampleSite) -> Result<(), ProbError> {
        if self.index.contains_key(&site.address) {
            return Err(ProbError::DuplicateAddress {
                address: site.address.to_string(),
            });
        }
        self.index.insert(site.address.clone(), self.sites.len());
        self.sites.push(site);
        Ok(())
    }

    /// Sum of the log-probabilities of every site.
    pub fn log_joint(&self) -> f64 {
        self.sites.iter().map(|s| s.log_prob).sum()
    }

    /// Sum of the log-probabilities of observed sites only.
    pub fn log_likelihood(&self) -> f64 {
        self.sites
            .iter()
            .filter(|s| s.origin == SiteOrigin::Observed)
            .map(|s| s.log_prob)
            .sum()
    }

    /// Render the trace as a table.
    pub fn render(&self) -> String {
        use std::fmt::Write;
        let width = self
            .sites
            .iter()
            .map(|s| s.address.as_str().len())
            .max()
            .unwrap_or(0)
            .max("address".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<width$}  {:>12}  {:>10}  {:<8}  dist",
            "address",
            "value",
            "log_prob",
            "origin",
            width = width
        );
        for site in &self.sites {
            let _ = writeln!(
                out,
                "{:<width$}  {:>12}  {:>10.4}  {:<8}  {}",
                site.address.as_str(),
                site.value.to_string(),
                site.log_prob,
                site.origin.to_string(),
                site.dist,
                width = width
            );
        }
        let _ = writeln!(out, "log_joint = {:.4}", self.log_joint());
        out
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<Vec<SampleSite>> for Trace {
    type Error = ProbError;

    fn try_from(sites: Vec<SampleSite>) -> Result<Self, Self::Error> {
        let mut trace = Trace::new();
        for site in sites {
            trace.insert(site)?;
        }
        Ok(trace)
    }
}

impl From<Trace> for Vec<SampleSite> {
    fn from(trace: Trace) -> Self {
        trace.sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(label: &str, value: ChoiceValue, log_prob: f64, origin: SiteOrigin) -> SampleSite {
        SampleSite {
            address: Address::new(label).unwrap(),
            value,
            log_prob,
            dist: DistSpec::Bernoulli { probs: 0.5 },
            origin,
        }
    }

    #[test]
    fn test_address_rejects_empty() {
        assert_eq!(Address::new(""), Err(ProbError::EmptyAddress));
        assert_eq!(Address::indexed("", 0), Err(ProbError::EmptyAddress));
        assert_eq!(Address::new("temp").unwrap().as_str(), "temp");
    }

    #[test]
    fn test_trace_insert_and_lookup() {
        let mut trace = Trace::new();
        trace
            .insert(site("cloudy", ChoiceValue::Bool(true), -1.2, SiteOrigin::Sampled))
            .unwrap();
        trace
            .insert(site("temp", ChoiceValue::Real(52.0), -3.3, SiteOrigin::Sampled))
            .unwrap();

        assert_eq!(trace.len(), 2);
        assert!(trace.contains("cloudy"));
        assert!(!trace.contains("missing"));
        assert_eq!(trace.value("temp"), Some(ChoiceValue::Real(52.0)));
        assert_eq!(trace.get("temp").map(|s| s.log_prob), Some(-3.3));

        let order: Vec<&str> = trace.addresses().map(|a| a.as_str()).collect();
        assert_eq!(order, vec!["cloudy", "temp"]);
    }

    #[test]
    fn test_trace_rejects_duplicate() {
        let mut trace = Trace::new();
        trace
            .insert(site("x", ChoiceValue::Real(1.0), 0.0, SiteOrigin::Sampled))
            .unwrap();
        let err = trace
            .insert(site("x", ChoiceValue::Real(2.0), 0.0, SiteOrigin::Sampled))
            .unwrap_err();
        assert_eq!(
            err,
            ProbError::DuplicateAddress {
                address: "x".to_string()
            }
        );
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.value("x"), Some(ChoiceValue::Real(1.0)));
    }

    #[test]
    fn test_trace_log_joint_and_likelihood() {
        let mut trace = Trace::new();
        trace
            .insert(site("a", ChoiceValue::Bool(true), -1.0, SiteOrigin::Sampled))
            .unwrap();
        trace
            .insert(site("b", ChoiceValue::Bool(false), -2.0, SiteOrigin::Observed))
            .unwrap();
        trace
            .insert(site("c", ChoiceValue::Bool(false), -0.5, SiteOrigin::Replayed))
            .unwrap();

        assert!((trace.log_joint() + 3.5).abs() < 1e-12);
        assert!((trace.log_likelihood() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_trace_render() {
        let mut trace = Trace::new();
        trace
            .insert(site("cloudy", ChoiceValue::Bool(false), -0.3567, SiteOrigin::Sampled))
            .unwrap();
        let text = trace.to_string();
        assert!(text.contains("cloudy"));
        assert!(text.contains("Bernoulli(0.5)"));
        assert!(text.contains("log_joint"));
    }

    #[test]
    fn test_trace_json_rejects_duplicates() {
        let json = r#"[
            {"address": "x", "value": 1.0, "log_prob": 0.0,
             "dist": {"family": "normal", "loc": 0.0, "scale": 1.0}, "origin": "sampled"},
            {"address": "x", "value": 2.0, "log_prob": 0.0,
             "dist": {"family": "normal", "loc": 0.0, "scale": 1.0}, "origin": "sampled"}
        ]"#;
        assert!(serde_json::from_str::<Trace>(json).is_err());
    }

    #[test]
    fn test_trace_json_preserves_sites() {
        let mut trace = Trace::new();
        trace
            .insert(site("cloudy", ChoiceValue::Bool(true), -1.2, SiteOrigin::Sampled))
            .unwrap();
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"address\":\"cloudy\""));
        assert!(json.contains("\"family\":\"bernoulli\""));

        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_trace_json_keeps_impossible_observation() {
        use crate::{Bernoulli, Condition, SampleContext};

        let mut ctx = SampleContext::seeded(101);
        let mut cond = Condition::new().observe("flip", true).unwrap();
        let never = Bernoulli::new(0.0).unwrap();
        assert!(ctx.sample(&mut cond, "flip", &never).unwrap());

        let trace = cond.into_trace();
        assert_eq!(trace.log_likelihood(), f64::NEG_INFINITY);

        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"log_prob\":\"-inf\""));

        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
        assert_eq!(back.get("flip").map(|s| s.origin), Some(SiteOrigin::Observed));
    }

    #[test]
    fn test_trace_json_rejects_unknown_score_text() {
        let json = r#"[{"address": "x", "value": true, "log_prob": "lots",
            "dist": {"family": "bernoulli", "probs": 0.5}, "origin": "sampled"}]"#;
        assert!(serde_json::from_str::<Trace>(json).is_err());
    }
}
