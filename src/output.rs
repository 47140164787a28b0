use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::{BatchReport, BatchResult};

/// Header of the name column in the CSV matrix.
pub const NAME_COLUMN: &str = "Arquivo";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the processed matrix to `path`.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – `x`, `y` list columns plus `file` (one row per spectrum)
/// * `.json`            – `[{ "x": [...], "y": [...], "file": "..." }, ...]`
/// * anything else      – `;`-separated CSV, `Arquivo;x_0;...;x_{N-1}`
pub fn write_matrix(result: &BatchResult, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => write_parquet(result, path),
        "json" => {
            let file = File::create(path).context("creating JSON file")?;
            write_json(result, BufWriter::new(file))
        }
        _ => {
            let file = File::create(path).context("creating CSV file")?;
            write_csv(result, BufWriter::new(file))
        }
    }
}

/// Write the skip/processed counters as pretty JSON.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let file = File::create(path).context("creating report file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).context("writing report")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Semicolon-separated matrix: a name column, then one column per axis point.
pub fn write_csv<W: Write>(result: &BatchResult, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    let mut header = Vec::with_capacity(result.axis.len() + 1);
    header.push(NAME_COLUMN.to_string());
    header.extend((0..result.axis.len()).map(|i| format!("x_{i}")));
    csv.write_record(&header).context("writing CSV header")?;

    for row in &result.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.name.clone());
        record.extend(row.values.iter().map(|&v| format_float(v)));
        csv.write_record(&record)
            .with_context(|| format!("writing CSV row for {}", row.name))?;
    }
    csv.flush().context("flushing CSV")?;
    Ok(())
}

/// Shortest round-trip text of `v`, always with a decimal point and a
/// two-digit signed exponent (`1.0`, `0.25`, `1e-05`).
pub fn format_float(v: f64) -> String {
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Record<'a> {
    x: &'a [f64],
    y: &'a [f64],
    file: &'a str,
}

/// Records-oriented JSON: one object per spectrum with its axis and values.
pub fn write_json<W: Write>(result: &BatchResult, writer: W) -> Result<()> {
    let records: Vec<Record<'_>> = result
        .rows
        .iter()
        .map(|row| Record {
            x: result.axis.points(),
            y: &row.values,
            file: &row.name,
        })
        .collect();
    serde_json::to_writer(writer, &records).context("writing JSON records")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

/// One row per spectrum: `x` (List<Float64>), `y` (List<Float64>), `file` (Utf8).
pub fn write_parquet(result: &BatchResult, path: &Path) -> Result<()> {
    let mut x_builder = ListBuilder::new(Float64Builder::new());
    let mut y_builder = ListBuilder::new(Float64Builder::new());
    for row in &result.rows {
        x_builder.values().append_slice(result.axis.points());
        x_builder.append(true);
        y_builder.values().append_slice(&row.values);
        y_builder.append(true);
    }
    let names = StringArray::from(
        result
            .rows
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>(),
    );

    let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", list_type.clone(), false),
        Field::new("y", list_type, false),
        Field::new("file", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(x_builder.finish()),
            Arc::new(y_builder.finish()),
            Arc::new(names),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
