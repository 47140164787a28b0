//! # rusty-jcamp
//!
//! Turns a batch of JCAMP-DX infrared spectra into one matrix whose rows all
//! share the same wavenumber axis.
//!
//! Each payload is decoded, cleaned of non-finite samples, min-max
//! normalized, Savitzky–Golay smoothed and linearly resampled onto a
//! [`CommonAxis`](data::model::CommonAxis). Failing payloads are skipped,
//! never fatal.
//!
//! ```no_run
//! use std::path::Path;
//! use rusty_jcamp::{batch, config::RunConfig};
//!
//! let config = RunConfig::default();
//! let result = batch::run(Path::new("JCAMP_051524.zip"), &config, |_| {})?;
//! println!("{} processed, {} skipped", result.processed(), result.skipped_count());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod batch;
pub mod config;
pub mod data;
pub mod output;
