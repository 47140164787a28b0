//! Run configuration.
//!
//! Every setting has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! # rusty-jcamp.toml
//! [axis]
//! start = 400.0
//! end = 4000.0
//! points = 3600
//!
//! [smoothing]
//! window = 17
//! order = 3
//!
//! [run]
//! parallel = true
//! output = "espectros_processados.csv"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::CommonAxis;
use crate::data::smooth::SavitzkyGolay;

/// Default output file name of the CSV matrix.
pub const DEFAULT_OUTPUT: &str = "espectros_processados.csv";

/// Invalid combination of run parameters, rejected before any processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("axis bounds must be finite with start < end (got {start}..{end})")]
    InvalidAxisRange { start: f64, end: f64 },

    #[error("axis needs at least 2 points (got {0})")]
    TooFewPoints(usize),

    #[error("smoothing window must be odd and positive (got {0})")]
    EvenWindow(usize),

    #[error("polynomial order {order} must be smaller than the window {window}")]
    OrderTooHigh { order: usize, window: usize },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Shared wavenumber axis every spectrum is resampled onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// First wavenumber (cm⁻¹).
    pub start: f64,
    /// Last wavenumber (cm⁻¹), included.
    pub end: f64,
    /// Number of samples.
    pub points: usize,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            start: 400.0,
            end: 4000.0,
            points: 3600,
        }
    }
}

impl AxisConfig {
    pub fn build(&self) -> Result<CommonAxis, ConfigError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.start < self.end) {
            return Err(ConfigError::InvalidAxisRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.points < 2 {
            return Err(ConfigError::TooFewPoints(self.points));
        }
        Ok(CommonAxis::linspace(self.start, self.end, self.points))
    }
}

/// Savitzky–Golay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Window length in samples (odd). Larger smooths more and loses detail.
    pub window: usize,
    /// Polynomial order; 2 or 3 keeps peak shapes.
    pub order: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: 17,
            order: 3,
        }
    }
}

/// Everything the core needs to process a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub axis: AxisConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Process spectra on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            axis: AxisConfig::default(),
            smoothing: SmoothingConfig::default(),
            parallel: default_parallel(),
        }
    }
}

impl PipelineConfig {
    /// Validate and build the immutable per-run state.
    pub fn prepare(&self) -> Result<Pipeline, ConfigError> {
        Ok(Pipeline {
            axis: self.axis.build()?,
            smoother: SavitzkyGolay::new(self.smoothing.window, self.smoothing.order)?,
            parallel: self.parallel,
        })
    }
}

/// Validated, read-only state shared by every spectrum of a run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub axis: CommonAxis,
    pub smoother: SavitzkyGolay,
    pub parallel: bool,
}

// ---------------------------------------------------------------------------
// Whole run: pipeline + where the matrix goes
// ---------------------------------------------------------------------------

/// Settings of one conversion run, built by the CLI or the GUI.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// On-disk layout of a config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    axis: AxisConfig,
    #[serde(default)]
    smoothing: SmoothingConfig,
    #[serde(default)]
    run: RunSection,
}

#[derive(Debug, Default, Deserialize)]
struct RunSection {
    parallel: Option<bool>,
    output: Option<PathBuf>,
}

impl RunConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string; missing keys keep defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Ok(Self {
            pipeline: PipelineConfig {
                axis: file.axis,
                smoothing: file.smoothing,
                parallel: file.run.parallel.unwrap_or_else(default_parallel),
            },
            output: file
                .run
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }
}
