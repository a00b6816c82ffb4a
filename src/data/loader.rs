use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{check_columns, CellValue, GalaxyDataset, RawRow};
use crate::config::Thresholds;
use crate::error::{GalMorphError, Result};

/// Column names plus rows, straight from the file.
struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and classify a morphology catalogue.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – what `df.to_parquet()` writes (recommended)
/// * `.csv`     – header row, one galaxy per line
/// * `.json`    – `[{ "SubhaloID": 1, "Snapshot": 25, ... }, ...]`
pub fn load_file(path: &Path, thresholds: &Thresholds) -> Result<GalaxyDataset> {
    if !path.exists() {
        return Err(GalMorphError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let read: fn(&Path) -> anyhow::Result<RawTable> = match ext.as_str() {
        "parquet" | "pq" => read_parquet,
        "json" => read_json,
        "csv" => read_csv,
        other => return Err(GalMorphError::UnsupportedFormat(other.to_string())),
    };

    let size = std::fs::metadata(path)
        .map_err(|e| unreadable(path, anyhow::Error::new(e)))?
        .len();
    if size == 0 {
        return Err(GalMorphError::EmptyFile(path.to_path_buf()));
    }

    let table = read(path).map_err(|e| unreadable(path, e))?;
    if table.rows.is_empty() {
        return Err(GalMorphError::EmptyFile(path.to_path_buf()));
    }
    check_columns(&table.columns)?;

    let dataset = GalaxyDataset::from_rows(table.columns, &table.rows, thresholds)?;
    log::info!(
        "Loaded {} galaxies across {} snapshots from {}",
        dataset.len(),
        dataset.snapshots().len(),
        path.display()
    );
    Ok(dataset)
}

fn unreadable(path: &Path, err: anyhow::Error) -> GalMorphError {
    GalMorphError::Unreadable {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "SubhaloID": 0, "Snapshot": 25, "P_Spheroid": 0.8, "P_Disk": 0.1, "P_Irr": 0.1 },
///   ...
/// ]
/// ```
///
/// The column set is the union of keys, in first-seen order. A row lacking
/// a key simply has no cell for it.
fn read_json(path: &Path) -> anyhow::Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = RawRow::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one galaxy per record.
/// Empty cells are nulls; everything else is type-guessed.
fn read_csv(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let row: RawRow = columns
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value.trim())))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalogue.
///
/// Scalar integer, float, string and boolean columns are understood; any
/// other Arrow type is kept as a string naming the type.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> anyhow::Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let raw: RawRow = columns
                .iter()
                .enumerate()
                .map(|(col_idx, name)| (name.clone(), extract_cell(batch.column(col_idx), row)))
                .collect();
            rows.push(raw);
        }
    }

    if rows.is_empty() && columns.is_empty() {
        bail!("parquet file has no columns");
    }

    Ok(RawTable { columns, rows })
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::String(format!("{other:?}")),
    }
}
