//! Integration tests for rusty-jcamp
//!
//! These tests run whole batches from JCAMP-DX text to the written matrix.

use std::fs::{self, File};
use std::io::Write;

use parquet::file::reader::{FileReader, SerializedFileReader};
use rusty_jcamp::batch::{self, process_batch};
use rusty_jcamp::config::{PipelineConfig, RunConfig};
use rusty_jcamp::data::jcamp::encode_xydata;
use rusty_jcamp::data::model::SourceFile;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Triangular absorption band centred on `centre`, on `first..=last` by `step`.
fn triangle_document(title: &str, first: f64, last: f64, step: f64, centre: f64) -> String {
    let count = ((last - first) / step).round() as usize + 1;
    let x: Vec<f64> = (0..count).map(|i| first + i as f64 * step).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&wn| (1.0 - (wn - centre).abs() / 25.0).max(0.0))
        .collect();
    encode_xydata(title, &x, &y, 1e-6)
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap()
}

fn default_pipeline() -> rusty_jcamp::config::Pipeline {
    PipelineConfig::default().prepare().unwrap()
}

/// A peak keeps its wavenumber through the whole chain.
#[test]
fn test_peak_position_survives_pipeline() {
    let doc = triangle_document("band", 650.0, 1200.0, 0.5, 1000.0);
    let pipeline = default_pipeline();

    let result = process_batch(&[SourceFile::new("band.jdx", doc)], &pipeline);
    assert!(result.skipped.is_empty(), "{:?}", result.skipped);
    assert_eq!(result.rows.len(), 1);

    let row = &result.rows[0].values;
    assert_eq!(row.len(), 3600);
    let expected = result.axis.nearest_index(1000.0).unwrap();
    let found = argmax(row);
    assert!(
        found.abs_diff(expected) <= 1,
        "peak at index {found}, expected {expected}"
    );
    assert!(row.iter().all(|v| v.is_finite()));
}

/// Spectra recorded on different grids land on the same columns.
#[test]
fn test_different_native_axes_share_columns() {
    let coarse = triangle_document("coarse", 700.0, 3900.0, 4.0, 1700.0);
    let fine = triangle_document("fine", 4000.0, 600.0, -1.0, 2900.0);
    let pipeline = default_pipeline();

    let result = process_batch(
        &[
            SourceFile::new("coarse.jdx", coarse),
            SourceFile::new("fine.jdx", fine),
        ],
        &pipeline,
    );

    assert_eq!(result.processed(), 2);
    assert_eq!(result.rows[0].values.len(), result.rows[1].values.len());
    assert_eq!(result.rows[0].values.len(), result.axis.len());

    let fine_peak = argmax(&result.rows[1].values);
    let expected = result.axis.nearest_index(2900.0).unwrap();
    assert!(fine_peak.abs_diff(expected) <= 1);
}

/// Valid files and a broken one: the broken file is skipped, the rest kept
/// in input order.
#[test]
fn test_batch_keeps_going_past_bad_files() {
    let pipeline = default_pipeline();
    let sources = vec![
        SourceFile::new("a.jdx", triangle_document("a", 650.0, 1200.0, 0.5, 800.0)),
        SourceFile::new("b.jdx", triangle_document("b", 650.0, 1200.0, 0.5, 900.0)),
        SourceFile::new("broken.jdx", "##TITLE=broken\n##XYDATA=(X++(Y..Y))\n"),
        SourceFile::new("c.jdx", triangle_document("c", 650.0, 1200.0, 0.5, 1100.0)),
    ];

    let result = process_batch(&sources, &pipeline);

    let names: Vec<&str> = result.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a.jdx", "b.jdx", "c.jdx"]);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].name, "broken.jdx");
}

/// ZIP input through `batch::run`, twice: byte-identical CSV.
#[test]
fn test_zip_run_writes_stable_csv() {
    let dir = tempdir().unwrap();
    let zip_path = dir.path().join("spectra.zip");

    {
        let mut zip = ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, centre) in [("spectra/one.jdx", 1000.0), ("spectra/two.JDX", 1100.0)] {
            zip.start_file(name, options).unwrap();
            let doc = triangle_document(name, 650.0, 1200.0, 0.5, centre);
            zip.write_all(doc.as_bytes()).unwrap();
        }
        zip.start_file("spectra/notes.txt", options).unwrap();
        zip.write_all(b"not a spectrum").unwrap();
        zip.finish().unwrap();
    }

    let mut config = RunConfig::default();
    config.pipeline.axis.points = 500;

    config.output = dir.path().join("first.csv");
    let first = batch::run(&zip_path, &config, |_| {}).unwrap();
    config.output = dir.path().join("second.csv");
    batch::run(&zip_path, &config, |_| {}).unwrap();

    assert_eq!(first.processed(), 2);
    assert_eq!(first.skipped_count(), 0);

    let a = fs::read(dir.path().join("first.csv")).unwrap();
    let b = fs::read(dir.path().join("second.csv")).unwrap();
    assert_eq!(a, b);

    let text = String::from_utf8(a).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Arquivo;x_0;x_1;"));
    assert!(header.ends_with(";x_499"));
    assert_eq!(header.split(';').count(), 501);

    let first_row = lines.next().unwrap();
    assert!(first_row.starts_with("spectra/one.jdx;"));
    assert_eq!(first_row.split(';').count(), 501);
    assert!(lines.next().unwrap().starts_with("spectra/two.JDX;"));
    assert!(lines.next().is_none());
}

/// Folder input, parallel and sequential: same matrix.
#[test]
fn test_folder_run_parallel_matches_sequential() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    for i in 0..6 {
        let doc = triangle_document("s", 650.0, 1200.0, 0.5, 700.0 + 60.0 * i as f64);
        fs::write(input.join(format!("s{i}.dx")), doc).unwrap();
    }
    fs::write(input.join("empty.jdx"), "").unwrap();

    let mut config = RunConfig::default();
    config.output = dir.path().join("parallel.csv");
    let parallel = batch::run(&input, &config, |_| {}).unwrap();

    config.pipeline.parallel = false;
    config.output = dir.path().join("sequential.csv");
    let sequential = batch::run(&input, &config, |_| {}).unwrap();

    assert_eq!(parallel.rows, sequential.rows);
    assert_eq!(parallel.skipped, sequential.skipped);
    assert_eq!(parallel.processed(), 6);
    assert_eq!(parallel.skipped[0].name, "empty.jdx");
    assert_eq!(
        fs::read(dir.path().join("parallel.csv")).unwrap(),
        fs::read(dir.path().join("sequential.csv")).unwrap()
    );
}

/// Parquet output has one row per processed spectrum.
#[test]
fn test_parquet_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("single.jdx");
    fs::write(&input, triangle_document("single", 650.0, 1200.0, 0.5, 1000.0)).unwrap();

    let mut config = RunConfig::default();
    config.output = dir.path().join("matrix.parquet");
    let result = batch::run(&input, &config, |_| {}).unwrap();
    assert_eq!(result.processed(), 1);

    let reader = SerializedFileReader::new(File::open(&config.output).unwrap()).unwrap();
    let metadata = reader.metadata();
    assert_eq!(metadata.file_metadata().num_rows(), 1);
}

/// A config file drives the run the same way CLI defaults do.
#[test]
fn test_config_file_controls_axis() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("run.toml");
    fs::write(
        &config_path,
        "[axis]\nstart = 600.0\nend = 1200.0\npoints = 61\n\n[run]\nparallel = false\n",
    )
    .unwrap();

    let config = RunConfig::from_file(&config_path).unwrap();
    let pipeline = config.pipeline.prepare().unwrap();
    assert_eq!(pipeline.axis.len(), 61);
    assert_eq!(pipeline.axis.points()[1], 610.0);

    let doc = triangle_document("band", 650.0, 1200.0, 0.5, 1000.0);
    let result = process_batch(&[SourceFile::new("band.jdx", doc)], &pipeline);
    assert_eq!(argmax(&result.rows[0].values), 40);
}
