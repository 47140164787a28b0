use std::fmt;

use serde::Serialize;

use super::jcamp::DecodeError;

// ---------------------------------------------------------------------------
// SourceFile – one named payload handed to the core
// ---------------------------------------------------------------------------

/// A named JCAMP-DX payload, exactly as read from disk or an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawSpectrum – what the JCAMP decoder hands back
// ---------------------------------------------------------------------------

/// Samples decoded from one JCAMP-DX payload, scale factors already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpectrum {
    /// Wavenumber axis (x), in authored order.
    pub x: Vec<f64>,
    /// Intensity axis (y) – same length as `x`.
    pub y: Vec<f64>,
    /// `##XFACTOR=` declared in the header (1.0 when absent).
    pub xfactor: f64,
    /// `##YFACTOR=` declared in the header (1.0 when absent).
    pub yfactor: f64,
}

impl RawSpectrum {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Spectrum – one spectrum travelling through the pipeline
// ---------------------------------------------------------------------------

/// A single spectrum between the cleaning and resampling stages.
///
/// The same shape is used for the cleaned, normalized and smoothed states;
/// each stage only rewrites `y` (or drops pairs, for the cleaner).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Wavenumber axis (x).
    pub x: Vec<f64>,
    /// Intensity axis (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the spectrum has no samples left.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CommonAxis – the shared resampling target
// ---------------------------------------------------------------------------

/// Uniformly spaced wavenumbers shared by every spectrum of a run.
///
/// Built once and only ever read afterwards, so a `&CommonAxis` can be
/// handed to any number of worker threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonAxis {
    points: Vec<f64>,
}

impl CommonAxis {
    /// `points` values from `start` to `end` inclusive.
    ///
    /// The caller validates the arguments (see [`crate::config::AxisConfig`]);
    /// `points < 2` degenerates to a single `start` sample.
    pub fn linspace(start: f64, end: f64, points: usize) -> Self {
        let points = match points {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f64;
                let mut v: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
                // Pin the last sample so rounding never moves it off `end`.
                v[n - 1] = end;
                v
            }
        };
        CommonAxis { points }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the axis sample closest to `wavenumber`.
    pub fn nearest_index(&self, wavenumber: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - wavenumber).abs().total_cmp(&(*b - wavenumber).abs())
            })
            .map(|(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Batch results
// ---------------------------------------------------------------------------

/// One successfully processed spectrum: exactly `|CommonAxis|` intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSpectrum {
    /// Source name (archive entry or file name).
    pub name: String,
    pub values: Vec<f64>,
}

/// A source that did not make it into the matrix, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for SkipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Everything a batch produced, rows in input order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Wavenumbers every row is sampled on.
    pub axis: CommonAxis,
    /// Successfully processed spectra, in the order their inputs were given.
    pub rows: Vec<ResampledSpectrum>,
    /// Inputs that were skipped, in input order.
    pub skipped: Vec<SkipRecord>,
}

impl BatchResult {
    /// Number of rows in the matrix.
    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    /// Number of skipped inputs.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Summary suitable for a JSON run report.
    pub fn report(&self) -> BatchReport {
        BatchReport {
            processed: self.processed(),
            skipped: self.skipped_count(),
            axis_points: self.axis.len(),
            skipped_files: self.skipped.clone(),
        }
    }
}

/// Serializable counters of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub axis_points: usize,
    pub skipped_files: Vec<SkipRecord>,
}

// ---------------------------------------------------------------------------
// Per-spectrum failures
// ---------------------------------------------------------------------------

/// Why a single spectrum could not be turned into a matrix row.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Payload is not a usable JCAMP-DX document.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Cleaning removed every sample.
    #[error("no finite samples left after cleaning")]
    EmptySpectrum,

    /// Not enough samples to form one smoothing window.
    #[error("{found} samples is fewer than the smoothing window of {window}")]
    InsufficientSamples { found: usize, window: usize },

    /// The wavenumber axis cannot bracket any target point.
    #[error("cannot interpolate: {0}")]
    Interpolation(String),
}
