//! RideTcx - Indoor cycling workout to TCX converter
//!
//! Main entry point for the command line tool.
//!
//! ```bash
//! ridetcx --workout workout.json --summary summary.json --samples performance.json
//! ridetcx --workout w.json --summary s.json --samples p.json --output-dir "~/tcx" -v
//! ridetcx --workout w.json --summary s.json --samples p.json --output-dir exports --save-config
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ridetcx::config::{get_config_path, load_config_from, save_config_to};
use ridetcx::export::output::clean_output_dir;
use ridetcx::export::{export_workout, TracingSink};
use ridetcx::workout::{load_samples, load_summary, load_workout};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ridetcx",
    version,
    about = "Convert a recorded indoor cycling workout into a TCX file"
)]
struct Args {
    /// Workout record JSON
    #[arg(long)]
    workout: PathBuf,

    /// Workout summary JSON
    #[arg(long)]
    summary: PathBuf,

    /// Performance samples JSON
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Output directory override
    #[arg(long)]
    output_dir: Option<String>,

    /// Configuration file override
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RideTcx v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(get_config_path);
    let mut config = load_config_from(&config_path).context("Failed to load configuration")?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if args.save_config {
        save_config_to(&config, &config_path).context("Failed to save configuration")?;
        tracing::info!("Saved configuration to {}", config_path.display());
    }

    let workout = load_workout(&args.workout)?;
    let summary = load_summary(&args.summary)?;
    let samples = match &args.samples {
        Some(path) => load_samples(path)?,
        None => None,
    };

    if config.create_output_dir {
        let dir = clean_output_dir(&config.output_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let path = export_workout(
        &workout,
        &summary,
        samples.as_ref(),
        &config.output_dir,
        &config.export_options(),
        &mut TracingSink,
    )
    .with_context(|| format!("Failed to export workout {}", workout.id))?;

    println!("{}", path.display());
    Ok(())
}
