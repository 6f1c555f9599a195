//! # Stochastic Prob - Named Random Choices (Session 1)
//!
//! This crate implements primitive stochastic functions and the *named
//! sample*: a random draw tagged with a unique address and recorded in an
//! explicit trace, so that later stages can look it up, replay it, or
//! condition on it.
//!
//! ## Core Concepts
//!
//! - **Distributions are primitive stochastic functions**: `sample` draws,
//!   `log_prob` scores ([`Normal`], [`Bernoulli`])
//! - **Randomness is explicit**: every draw uses the generator owned by a
//!   [`SampleContext`], seeded from configuration
//! - **Choices have names**: [`SampleContext::sample`] takes a label and
//!   reports a [`SampleSite`] to a [`Recorder`]
//! - **Traces enforce uniqueness**: a [`Trace`] never records an address twice
//! - **Models are plain functions**: [`weather`] and [`geometric`] are
//!   ordinary Rust with named samples inside
//!
//! ## Example: Weather
//!
//! ```rust
//! use stochastic_prob::{weather, SampleContext, Trace, Weather};
//!
//! let mut ctx = SampleContext::seeded(101);
//!
//! for _ in 0..3 {
//!     let mut trace = Trace::new();
//!     let (sky, temp) = weather(&mut ctx, &mut trace).unwrap();
//!
//!     // Two named choices per day
//!     assert_eq!(trace.len(), 2);
//!
//!     // The temperature was drawn from the sky's distribution
//!     let expected = sky.temperature_dist().unwrap();
//!     let site = trace.get("temp").unwrap();
//!     assert_eq!(site.dist.to_string(), format!("Normal({}, {})", expected.loc(), expected.scale()));
//!     assert!(temp.is_finite());
//! }
//! ```

mod bernoulli;
pub mod config;
mod context;
mod dist;
mod error;
pub mod models;
mod normal;
mod sample;
mod trace;

pub use bernoulli::Bernoulli;
pub use config::{ConfigError, SimulationConfig};
pub use context::{SampleContext, DEFAULT_SEED};
pub use dist::{Choice, ChoiceValue, DistSpec, Distribution, RSample, Reparameterized};
pub use error::ProbError;
pub use models::{geometric, geometric_bounded, weather, TemperatureParams, Weather};
pub use normal::Normal;
pub use sample::{sample_with, Condition, Recorder, Replay, Untraced};
pub use trace::{Address, SampleSite, SiteOrigin, Trace};
