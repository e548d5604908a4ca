//! # cartpend
//!
//! Command-line entry point. Logging goes through `tracing`; set `RUST_LOG`
//! to `debug` to see every finished episode.

use anyhow::{Context, Result};
use cartpend::app::{self, Driver};
use cartpend::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cart-pendulum swing-up with a group policy-gradient trainer
#[derive(Parser, Debug)]
#[command(name = "cartpend", version, about)]
struct Cli {
    /// Path to a JSON config file; every field is optional
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for weight initialization and action sampling
    #[arg(long, global = true, default_value_t = 0)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run policy-gradient updates, then report the learning curve
    Train {
        #[arg(long, default_value_t = 100)]
        iterations: u64,

        /// Overrides the config's Adam step size
        #[arg(long)]
        learning_rate: Option<f32>,

        /// Demo ticks to run with the trained policy afterwards
        #[arg(long, default_value_t = 0)]
        demo_ticks: u64,
    },
    /// Let an untrained policy drive the cart
    Demo {
        #[arg(long, default_value_t = 600)]
        ticks: u64,
    },
    /// Replay a push script: L, R, B (both), - (none), r (reset), t (toggle mode)
    Manual {
        #[arg(long)]
        script: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Command::Train {
        learning_rate: Some(lr),
        ..
    } = cli.command
    {
        config.learning_rate = lr;
    }
    tracing::info!(seed = cli.seed, ?config, "Configuration loaded");

    let mut driver = Driver::new(config, cli.seed);
    match cli.command {
        Command::Train {
            iterations,
            demo_ticks,
            ..
        } => {
            let history = app::train(&mut driver, iterations).context("Training failed")?;
            for (i, mean) in history.iter().enumerate() {
                println!("{:>5} {mean:>10.3}", i + 1);
            }
            if demo_ticks > 0 {
                let last = app::demo(&mut driver, demo_ticks).context("Demo failed")?;
                println!("demo reward {:.3}", last.cumulative_reward);
            }
        }
        Command::Demo { ticks } => {
            let last = app::demo(&mut driver, ticks).context("Demo failed")?;
            println!("demo reward {:.3}", last.cumulative_reward);
        }
        Command::Manual { script } => {
            let frames = app::parse_script(&script)?;
            let last = app::replay(&mut driver, frames).context("Replay failed")?;
            println!(
                "angle {:.3} rad, cart x {:.1}, reward {:.3}",
                last.phase_point.0,
                driver.simulation().cart_position(),
                last.cumulative_reward
            );
        }
    }
    Ok(())
}
