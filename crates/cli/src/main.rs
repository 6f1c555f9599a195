//! stochastic CLI - primitive stochastic functions and named samples.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stochastic_prob::{
    geometric_bounded, weather, Distribution, Normal, SampleContext, SimulationConfig, Trace,
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "stochastic")]
#[command(version)]
#[command(about = "Sample from primitive stochastic functions and a toy weather model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random generator (overrides the config file)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Seed from operating-system entropy instead
    #[arg(long, global = true, conflicts_with = "seed")]
    entropy: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw from Normal(0, 1) and score the draw
    Primitives,

    /// Run the weather model
    Weather {
        /// Number of independent runs (overrides the config file)
        #[arg(short, long)]
        runs: Option<usize>,

        /// Print each run's trace as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip a coin until the first success, one address per flip
    Geometric {
        /// Success probability (overrides the config file)
        #[arg(short, long)]
        p: Option<f64>,
    },

    /// Show example configuration
    ExampleConfig,
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    match &cli.command {
        Commands::Weather { runs: Some(runs), .. } => config.runs = *runs,
        Commands::Geometric { p: Some(p) } => config.geometric_p = *p,
        _ => {}
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn context_for(cli: &Cli, config: &SimulationConfig) -> SampleContext {
    if cli.entropy {
        info!("Seeding from entropy");
        SampleContext::from_entropy()
    } else {
        info!(seed = config.seed, "Seeding random generator");
        SampleContext::new(config)
    }
}

fn run_primitives(ctx: &mut SampleContext) -> Result<()> {
    let normal = Normal::new(0.0, 1.0)?;
    let x = ctx.rsample(&normal);
    println!("sample {}", x.value);
    println!("log prob {}", normal.log_prob(x.value));

    let mut trace = Trace::new();
    let named = ctx.sample(&mut trace, "my_sample", &normal)?;
    println!("{}", named);
    debug!(log_joint = trace.log_joint(), "primitives done");
    Ok(())
}

fn run_weather(ctx: &mut SampleContext, runs: usize, json: bool) -> Result<()> {
    for run in 0..runs {
        let mut trace = Trace::new();
        let (sky, temp) = weather(ctx, &mut trace).with_context(|| format!("Weather run {}", run))?;
        if json {
            println!("{}", serde_json::to_string(&trace)?);
        } else {
            println!("({}, {})", sky, temp);
        }
        debug!(run, log_joint = trace.log_joint(), "weather run recorded");
    }
    Ok(())
}

fn run_geometric(ctx: &mut SampleContext, p: f64, max_flips: usize) -> Result<()> {
    let mut trace = Trace::new();
    let failures = geometric_bounded(ctx, &mut trace, p, max_flips)
        .with_context(|| format!("Geometric with p = {}", p))?;
    println!("failures before first success: {}", failures);
    print!("{}", trace);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    if let Commands::ExampleConfig = cli.command {
        print!("{}", SimulationConfig::example_toml());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let mut ctx = context_for(&cli, &config);

    match cli.command {
        Commands::Primitives => run_primitives(&mut ctx),
        Commands::Weather { json, .. } => run_weather(&mut ctx, config.runs, json),
        Commands::Geometric { .. } => {
            run_geometric(&mut ctx, config.geometric_p, config.max_flips)
        }
        Commands::ExampleConfig => Ok(()),
    }
}
