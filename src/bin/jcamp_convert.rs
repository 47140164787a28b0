//! # jcamp-convert
//!
//! Command-line front-end: convert a folder, ZIP archive or single JCAMP-DX
//! file into one matrix of spectra sampled on a common wavenumber axis.
//!
//! ```bash
//! # ZIP of .jdx files -> espectros_processados.csv
//! jcamp-convert JCAMP_051524.zip
//!
//! # Folder -> Parquet, 2000-point axis from 650 cm-1, with a skip report
//! jcamp-convert spectra/ -o matrix.parquet --axis-start 650 --points 2000 --report run.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rusty_jcamp::batch::{self, Progress};
use rusty_jcamp::config::RunConfig;
use rusty_jcamp::output;

/// Convert JCAMP-DX infrared spectra into a matrix on a common axis
#[derive(Parser)]
#[command(name = "jcamp-convert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder, .zip archive, or single .jdx/.dx file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output matrix (.csv, .parquet or .json; defaults to espectros_processados.csv)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// TOML file with [axis], [smoothing] and [run] settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// First wavenumber of the common axis (cm-1)
    #[arg(long)]
    axis_start: Option<f64>,

    /// Last wavenumber of the common axis (cm-1)
    #[arg(long)]
    axis_end: Option<f64>,

    /// Number of points on the common axis
    #[arg(long)]
    points: Option<usize>,

    /// Savitzky-Golay window length (odd)
    #[arg(long)]
    window: Option<usize>,

    /// Savitzky-Golay polynomial order
    #[arg(long)]
    order: Option<usize>,

    /// Process spectra one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Write a JSON summary of processed and skipped files
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// File settings first, then explicit flags on top.
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        let pipeline = &mut config.pipeline;
        if let Some(v) = self.axis_start {
            pipeline.axis.start = v;
        }
        if let Some(v) = self.axis_end {
            pipeline.axis.end = v;
        }
        if let Some(v) = self.points {
            pipeline.axis.points = v;
        }
        if let Some(v) = self.window {
            pipeline.smoothing.window = v;
        }
        if let Some(v) = self.order {
            pipeline.smoothing.order = v;
        }
        if self.sequential {
            pipeline.parallel = false;
        }
        if let Some(path) = &self.output {
            config.output = path.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if !cli.input.exists() {
        anyhow::bail!("Input does not exist: {}", cli.input.display());
    }
    let config = cli.run_config()?;

    info!("Input:  {}", cli.input.display());
    info!("Output: {}", config.output.display());
    info!(
        "Axis: {}..{} cm-1, {} points; smoothing window {} order {}",
        config.pipeline.axis.start,
        config.pipeline.axis.end,
        config.pipeline.axis.points,
        config.pipeline.smoothing.window,
        config.pipeline.smoothing.order
    );

    let result = batch::run(&cli.input, &config, |progress| {
        if let Progress::Processed { name } = progress {
            info!("Processed {name}");
        }
    })
    .context("Conversion failed")?;

    if let Some(path) = &cli.report {
        output::write_report(&result.report(), path)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    println!("Saved to: {}", config.output.display());
    println!(
        "Spectra processed: {} (skipped: {})",
        result.processed(),
        result.skipped_count()
    );
    Ok(())
}
