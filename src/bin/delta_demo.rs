//! delta_demo - train a toy classifier under the delta learning rate controller
//!
//! Generates a synthetic logistic-regression problem, trains it with plain
//! SGD while the controller steers the learning rate, then prints a summary
//! and optionally writes a JSON report and a PNG chart.

use std::path::PathBuf;

use clap::Parser;
use delta_optim::harness::{self, SyntheticProblem, TrainSettings};
use delta_optim::{plots, write_report, DeltaConfig, Logger, LoggingSettings, Report, Result};

/// Train a synthetic problem with an adaptive learning rate
///
/// Examples:
///   delta_demo                          # Defaults, summary on stdout
///   delta_demo --config delta.toml      # Custom thresholds
///   delta_demo --report run.json --plot run.png
///   delta_demo --dry-run                # Validate config and exit
#[derive(Parser, Debug)]
#[command(name = "delta_demo")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Controller config file (.toml or .json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the initial learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Passes over the data
    #[arg(short, long, default_value = "20")]
    epochs: usize,

    #[arg(short, long, default_value = "32")]
    batch_size: usize,

    #[arg(long, default_value = "1000")]
    samples: usize,

    #[arg(long, default_value = "8")]
    features: usize,

    /// Standard deviation of label noise
    #[arg(long, default_value = "0.5")]
    noise: f32,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Write a JSON report of the run
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Write a PNG chart of loss and learning rate (needs the plotters feature)
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,

    /// Log every N-th step
    #[arg(long, default_value = "50")]
    log_every: usize,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// Validate the config, run the controller on a fixed loss sequence, and exit
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => DeltaConfig::from_path(path)?,
        None => DeltaConfig {
            initial_lr: 0.1,
            ..DeltaConfig::default()
        },
    };
    if let Some(lr) = cli.lr {
        config.initial_lr = lr;
    }
    config.validate()?;

    if cli.dry_run {
        let mut logger = Logger::new(LoggingSettings::new(true, 1));
        harness::dry_run(config, &mut logger)?;
        println!("dry run ok");
        return Ok(());
    }

    let problem = SyntheticProblem::generate(cli.samples, cli.features, cli.noise, cli.seed)?;
    let settings = TrainSettings {
        epochs: cli.epochs,
        batch_size: cli.batch_size,
        seed: cli.seed,
    };
    let logger = Logger::new(LoggingSettings::new(!cli.quiet, cli.log_every));

    let delta = harness::train(&problem, config, &settings, Some(logger))?;
    let stats = delta.finish();
    let (loss, accuracy) = harness::evaluate(&problem, delta.optimizer().params.view())?;
    println!("full-data loss={:.4} accuracy={:.2}%", loss, accuracy);
    plots::print_summary(delta.history(), &stats);

    if let Some(path) = &cli.report {
        write_report(path, &Report::from_controller(delta.controller()))?;
        println!("wrote report to {}", path.display());
    }
    if let Some(path) = &cli.plot {
        plots::plot_history(delta.history(), path)?;
        println!("wrote plot to {}", path.display());
    }

    Ok(())
}
