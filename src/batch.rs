//! Batch orchestration: fan a list of payloads out through the per-spectrum
//! stages and fan the survivors back into one ordered matrix.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::{Pipeline, RunConfig};
use crate::data::model::{BatchResult, ProcessError, ResampledSpectrum, SkipRecord, SourceFile};
use crate::data::{filter, jcamp, loader, normalize, resample};
use crate::output;

/// Progress notification emitted once per input, from whichever worker
/// finished it.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Processed { name: &'a str },
    Skipped { name: &'a str, reason: &'a ProcessError },
}

/// Run one payload through decode → clean → normalize → smooth → resample.
pub fn process_spectrum(bytes: &[u8], pipeline: &Pipeline) -> Result<Vec<f64>, ProcessError> {
    let raw = jcamp::decode(bytes)?;
    let mut spectrum = filter::clean(raw);
    if spectrum.is_empty() {
        return Err(ProcessError::EmptySpectrum);
    }
    normalize::min_max(&mut spectrum);
    spectrum.y = pipeline.smoother.apply(&spectrum.y)?;
    resample::resample(&spectrum, &pipeline.axis)
}

/// Process every source independently; a failing source becomes a skip
/// record and never stops the batch.
pub fn process_batch(sources: &[SourceFile], pipeline: &Pipeline) -> BatchResult {
    process_batch_with_progress(sources, pipeline, |_| {})
}

/// [`process_batch`] with a callback per finished source.
///
/// Rows come back in input order whether or not the run is parallel: the
/// indexed parallel iterator collects each result at its source position.
pub fn process_batch_with_progress<F>(
    sources: &[SourceFile],
    pipeline: &Pipeline,
    on_progress: F,
) -> BatchResult
where
    F: Fn(Progress<'_>) + Sync,
{
    info!(
        "Processing {} spectra onto {} axis points ({})",
        sources.len(),
        pipeline.axis.len(),
        if pipeline.parallel { "parallel" } else { "sequential" }
    );

    let run_one = |source: &SourceFile| {
        debug!("Processing {}", source.name);
        let outcome = process_spectrum(&source.bytes, pipeline);
        match &outcome {
            Ok(_) => on_progress(Progress::Processed { name: &source.name }),
            Err(reason) => on_progress(Progress::Skipped {
                name: &source.name,
                reason,
            }),
        }
        outcome
    };

    let outcomes: Vec<Result<Vec<f64>, ProcessError>> = if pipeline.parallel {
        sources.par_iter().map(run_one).collect()
    } else {
        sources.iter().map(run_one).collect()
    };

    let mut rows = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();
    for (source, outcome) in sources.iter().zip(outcomes) {
        match outcome {
            Ok(values) => rows.push(ResampledSpectrum {
                name: source.name.clone(),
                values,
            }),
            Err(reason) => {
                warn!("Skipping {}: {reason}", source.name);
                skipped.push(SkipRecord {
                    name: source.name.clone(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    info!("{} spectra processed, {} skipped", rows.len(), skipped.len());
    BatchResult {
        axis: pipeline.axis.clone(),
        rows,
        skipped,
    }
}

/// Load every JCAMP file under `input`, process the batch and write the
/// matrix to `config.output`.
///
/// Entries the loader could not read are reported as skips ahead of the
/// processing skips.
pub fn run<F>(input: &Path, config: &RunConfig, on_progress: F) -> Result<BatchResult>
where
    F: Fn(Progress<'_>) + Sync,
{
    let pipeline = config
        .pipeline
        .prepare()
        .context("invalid pipeline configuration")?;

    let sources = loader::load_sources(input)
        .with_context(|| format!("loading spectra from {}", input.display()))?;

    let mut result = process_batch_with_progress(&sources.files, &pipeline, on_progress);
    if !sources.failures.is_empty() {
        let mut skipped = sources.failures;
        skipped.append(&mut result.skipped);
        result.skipped = skipped;
    }

    output::write_matrix(&result, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;
    info!(
        "Saved {} rows to {}",
        result.processed(),
        config.output.display()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::data::jcamp::encode_xydata;

    fn small_pipeline(parallel: bool) -> Pipeline {
        let mut config = PipelineConfig::default();
        config.axis.points = 200;
        config.parallel = parallel;
        config.prepare().unwrap()
    }

    fn gaussian_source(name: &str, centre: f64, first: f64, step: f64, n: usize) -> SourceFile {
        let x: Vec<f64> = (0..n).map(|i| first + i as f64 * step).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&v| (-(v - centre).powi(2) / (2.0 * 40.0f64.powi(2))).exp())
            .collect();
        SourceFile::new(name, encode_xydata(name, &x, &y, 1e-6))
    }

    #[test]
    fn empty_batch_is_not_an_error() {
        let result = process_batch(&[], &small_pipeline(true));
        assert_eq!(result.processed(), 0);
        assert_eq!(result.skipped_count(), 0);
    }

    #[test]
    fn malformed_source_is_skipped_and_order_kept() {
        let sources = vec![
            gaussian_source("a.jdx", 1000.0, 600.0, 2.0, 1000),
            SourceFile::new("broken.jdx", b"not a jcamp file".to_vec()),
            gaussian_source("b.dx", 2500.0, 500.0, 4.0, 800),
            gaussian_source("c.jdx", 3000.0, 3990.0, -1.5, 1200),
        ];
        let result = process_batch(&sources, &small_pipeline(true));

        let names: Vec<&str> = result.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a.jdx", "b.dx", "c.jdx"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "broken.jdx");
        assert!(result.skipped[0].reason.contains("decode error"));
        assert!(result.rows.iter().all(|r| r.values.len() == 200));
    }

    #[test]
    fn every_failure_kind_becomes_a_skip() {
        let all_nan = "##TITLE=nan\n##XYPOINTS=(XY..XY)\n1,? 2,?\n##END=\n";
        let short = "##TITLE=short\n##XYPOINTS=(XY..XY)\n1,1 2,2 3,3\n##END=\n";
        let mut flat_axis = String::from("##TITLE=flat\n##XYPOINTS=(XY..XY)\n");
        for i in 0..20 {
            flat_axis.push_str(&format!("1000,{i}\n"));
        }
        flat_axis.push_str("##END=\n");

        let pipeline = small_pipeline(false);
        assert!(matches!(
            process_spectrum(all_nan.as_bytes(), &pipeline),
            Err(ProcessError::EmptySpectrum)
        ));
        assert!(matches!(
            process_spectrum(short.as_bytes(), &pipeline),
            Err(ProcessError::InsufficientSamples { found: 3, window: 17 })
        ));
        assert!(matches!(
            process_spectrum(flat_axis.as_bytes(), &pipeline),
            Err(ProcessError::Interpolation(_))
        ));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let sources: Vec<SourceFile> = (0..12)
            .map(|i| {
                gaussian_source(
                    &format!("s{i:02}.jdx"),
                    800.0 + i as f64 * 250.0,
                    450.0 + i as f64 * 10.0,
                    1.0 + i as f64 * 0.25,
                    900 + i * 50,
                )
            })
            .collect();
        let parallel = process_batch(&sources, &small_pipeline(true));
        let sequential = process_batch(&sources, &small_pipeline(false));
        assert_eq!(parallel.rows, sequential.rows);
    }

    #[test]
    fn progress_is_reported_for_every_source() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let sources = vec![
            gaussian_source("a.jdx", 1000.0, 600.0, 2.0, 1000),
            SourceFile::new("bad.jdx", Vec::new()),
        ];
        let processed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        process_batch_with_progress(&sources, &small_pipeline(true), |p| match p {
            Progress::Processed { .. } => {
                processed.fetch_add(1, Ordering::SeqCst);
            }
            Progress::Skipped { .. } => {
                skipped.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert_eq!(processed.load(Ordering::SeqCst), 1);
        assert_eq!(skipped.load(Ordering::SeqCst), 1);
    }
}
