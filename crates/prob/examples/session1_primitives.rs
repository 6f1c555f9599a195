//! Session 1: Primitive Stochastic Functions and Named Samples
//!
//! Run with: cargo run -p stochastic-prob --example session1_primitives
//!
//! This example demonstrates:
//! - Distributions as primitive stochastic functions (sample + log_prob)
//! - A simple model: weather built from a Bernoulli and a Normal
//! - The named sample primitive and the traces it produces
//! - Replay and conditioning by address
//! - Random control flow: a geometric recursion with one address per step
//!
//! Key insight: naming every random choice turns a program into something
//! that can be inspected, replayed and conditioned.

use stochastic_prob::{
    geometric, weather, Condition, Distribution, Normal, ProbError, Replay, SampleContext, Trace,
    Untraced,
};

fn main() -> Result<(), ProbError> {
    println!("=== Session 1: Primitive Stochastic Functions ===\n");

    let mut ctx = SampleContext::seeded(101);

    // -------------------------------------------------------------------------
    // 1. Primitive Stochastic Functions
    // -------------------------------------------------------------------------
    println!("1. Primitive Stochastic Functions");
    println!("---------------------------------");
    println!();
    println!("A distribution draws values and scores them.");
    println!();

    let normal = Normal::new(0.0, 1.0)?;
    let x = ctx.rsample(&normal);
    println!("sample {:.4}", x.value);
    println!("log prob {:.4}", normal.log_prob(x.value));
    println!();

    // -------------------------------------------------------------------------
    // 2. A Simple Model
    // -------------------------------------------------------------------------
    println!("2. A Simple Model");
    println!("-----------------");
    println!();
    println!("cloudy ~ Bernoulli(0.3); temp ~ Normal(mean[sky], scale[sky])");
    println!();

    for _ in 0..3 {
        let (sky, temp) = weather(&mut ctx, &mut Untraced)?;
        println!("  ({}, {:.2})", sky, temp);
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. The Named Sample Primitive
    // -------------------------------------------------------------------------
    println!("3. The Named Sample Primitive");
    println!("-----------------------------");
    println!();

    let mut trace = Trace::new();
    let x = ctx.sample(&mut trace, "my_sample", &normal)?;
    println!("{:.4}", x);
    println!();

    let mut traces = Vec::new();
    for _ in 0..3 {
        let mut trace = Trace::new();
        let (sky, temp) = weather(&mut ctx, &mut trace)?;
        println!("  ({}, {:.2})", sky, temp);
        traces.push(trace);
    }
    println!();
    println!("Trace of the first run:");
    print!("{}", traces[0]);
    println!();

    // Labels must be unique within a trace
    let mut reused = Trace::new();
    weather(&mut ctx, &mut reused)?;
    match weather(&mut ctx, &mut reused) {
        Err(e) => println!("Running weather twice into one trace: {}", e),
        Ok(_) => println!("Unexpected: duplicate addresses accepted"),
    }
    println!();

    // -------------------------------------------------------------------------
    // 4. Replay and Conditioning
    // -------------------------------------------------------------------------
    println!("4. Replay and Conditioning");
    println!("--------------------------");
    println!();

    let mut replay = Replay::new(&traces[0]);
    let (sky, temp) = weather(&mut ctx, &mut replay)?;
    println!("Replayed first run: ({}, {:.2})", sky, temp);

    let mut cond = Condition::new().observe("cloudy", true)?.observe("temp", 60.0)?;
    let (sky, temp) = weather(&mut ctx, &mut cond)?;
    println!("Conditioned run:    ({}, {:.2})", sky, temp);
    println!("  log likelihood = {:.4}", cond.trace().log_likelihood());
    println!();

    // -------------------------------------------------------------------------
    // 5. Random Control Flow
    // -------------------------------------------------------------------------
    println!("5. Random Control Flow");
    println!("----------------------");
    println!();
    println!("Flip Bernoulli(0.5) at x_0, x_1, ... until the first success.");
    println!();

    let mut trace = Trace::new();
    let failures = geometric(&mut ctx, &mut trace, 0.5)?;
    println!("Failures before success: {}", failures);
    print!("{}", trace);

    Ok(())
}
