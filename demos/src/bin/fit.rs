//! Heatmap fitting example
//!
//! Fits a batch of free-form probability maps to synthetic point sets by minimizing
//! the Weighted Hausdorff Distance, logging the three loss terms as it goes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin fit -- --steps 500 --learning-rate 0.05
//! cargo run --bin fit --features wgpu --no-default-features
//! ```

use std::path::PathBuf;

use anyhow::Result;
use burn::backend::Autodiff;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use whd_demos::{create_device, fit, get_backend_name, FitConfig, SelectedBackend};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override number of optimizer steps
    #[arg(long)]
    steps: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => FitConfig::load(path)?,
        None => FitConfig::default(),
    };

    // Apply command line overrides
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    config.validate()?;

    let device = create_device();
    info!(backend = get_backend_name(), "using backend");

    let outcome = fit::<Autodiff<SelectedBackend>>(&config, &device)?;

    let estimated_points = outcome
        .model
        .forward()
        .sum_dim(1)
        .sum_dim(2)
        .reshape([config.batch_size])
        .into_data()
        .iter::<f32>()
        .map(f64::from)
        .collect::<Vec<_>>();

    info!(
        initial = outcome.initial_loss,
        last = outcome.final_terms["total"],
        ?estimated_points,
        "fitting completed"
    );

    Ok(())
}
