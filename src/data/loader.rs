use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{schedule_from_json, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load at most `max_rows` listings from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` / `.jsonl` / `.ndjson` – one JSON object per line (Yelp dump)
/// * `.csv`     – flat export, `hours` as a JSON-encoded string column
/// * `.parquet` – same flat columns as the CSV export
pub fn load_file(path: &Path, max_rows: usize) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" | "jsonl" | "ndjson" => load_json_lines(path, max_rows),
        "csv" => load_csv(path, max_rows),
        "parquet" | "pq" => load_parquet(path, max_rows),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} listings from {} (max review count {})",
        dataset.len(),
        path.display(),
        dataset.max_review_count()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON-lines loader
// ---------------------------------------------------------------------------

/// One listing object per line:
///
/// ```json
/// {"business_id": "x1", "name": "Cafe", "city": "Tampa", "latitude": 27.9,
///  "longitude": -82.4, "stars": 4.5, "review_count": 12,
///  "categories": "Cafes, Restaurants", "hours": {"Monday": "7:0-15:0"}}
/// ```
///
/// Blank lines are skipped.
fn load_json_lines(path: &Path, max_rows: usize) -> Result<Dataset> {
    let file = File::open(path).context("opening JSON-lines file")?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        if records.len() >= max_rows {
            break;
        }
        let line = line.with_context(|| format!("reading line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)
            .with_context(|| format!("Line {}: invalid listing record", line_no + 1))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Flat row shared by the CSV and Parquet exports.
#[derive(Debug, Deserialize)]
struct FlatRecord {
    business_id: String,
    name: String,
    city: Option<String>,
    state: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    stars: f64,
    review_count: u64,
    categories: Option<String>,
    /// JSON object text, e.g. `{"Monday": "8:0-20:0"}`.
    hours: Option<String>,
}

impl FlatRecord {
    fn into_record(self) -> Result<Record> {
        let hours = match self.hours.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let value: JsonValue =
                    serde_json::from_str(text).context("hours column is not valid JSON")?;
                schedule_from_json(&value)
            }
        };

        Ok(Record {
            id: self.business_id,
            name: self.name,
            city: self.city.filter(|c| !c.is_empty()),
            state: self.state.filter(|s| !s.is_empty()),
            latitude: self.latitude,
            longitude: self.longitude,
            rating: self.stars,
            review_count: self.review_count,
            categories: self.categories.filter(|c| !c.is_empty()),
            hours,
        })
    }
}

/// CSV layout: header row with the [`FlatRecord`] column names.
/// Empty cells are read as missing values.
fn load_csv(path: &Path, max_rows: usize) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut records = Vec::new();
    // Data rows are numbered from 1, the header is not counted.
    for (idx, result) in reader.deserialize::<FlatRecord>().enumerate() {
        if records.len() >= max_rows {
            break;
        }
        let row_no = idx + 1;
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record().with_context(|| format!("CSV row {row_no}"))?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the flat export columns.
///
/// `business_id`, `name`, `stars` and `review_count` are required; the
/// remaining columns may be absent, in which case every row reads as null.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, max_rows: usize) -> Result<Dataset> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut offset = 0;

    'batches: for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = ListingColumns::locate(&batch)?;

        for row in 0..batch.num_rows() {
            if records.len() >= max_rows {
                break 'batches;
            }
            let row_no = offset + row + 1;
            let flat = columns
                .row(row)
                .with_context(|| format!("Row {row_no}"))?;
            records.push(flat.into_record().with_context(|| format!("Row {row_no}"))?);
        }
        offset += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Column handles of one record batch.
struct ListingColumns<'a> {
    business_id: &'a ArrayRef,
    name: &'a ArrayRef,
    stars: &'a ArrayRef,
    review_count: &'a ArrayRef,
    city: Option<&'a ArrayRef>,
    state: Option<&'a ArrayRef>,
    latitude: Option<&'a ArrayRef>,
    longitude: Option<&'a ArrayRef>,
    categories: Option<&'a ArrayRef>,
    hours: Option<&'a ArrayRef>,
}

impl<'a> ListingColumns<'a> {
    fn locate(batch: &'a RecordBatch) -> Result<Self> {
        let required = |name: &str| {
            batch
                .column_by_name(name)
                .with_context(|| format!("Parquet file missing '{name}' column"))
        };

        Ok(Self {
            business_id: required("business_id")?,
            name: required("name")?,
            stars: required("stars")?,
            review_count: required("review_count")?,
            city: batch.column_by_name("city"),
            state: batch.column_by_name("state"),
            latitude: batch.column_by_name("latitude"),
            longitude: batch.column_by_name("longitude"),
            categories: batch.column_by_name("categories"),
            hours: batch.column_by_name("hours"),
        })
    }

    fn row(&self, row: usize) -> Result<FlatRecord> {
        let optional_string = |col: Option<&ArrayRef>| match col {
            Some(col) => string_at(col, row),
            None => Ok(None),
        };
        let optional_f64 = |col: Option<&ArrayRef>| match col {
            Some(col) => f64_at(col, row),
            None => Ok(None),
        };

        Ok(FlatRecord {
            business_id: string_at(self.business_id, row)?.context("null business_id")?,
            name: string_at(self.name, row)?.context("null name")?,
            city: optional_string(self.city)?,
            state: optional_string(self.state)?,
            latitude: optional_f64(self.latitude)?,
            longitude: optional_f64(self.longitude)?,
            stars: f64_at(self.stars, row)?.context("null stars")?,
            review_count: u64_at(self.review_count, row)?.context("null review_count")?,
            categories: optional_string(self.categories)?,
            hours: optional_string(self.hours)?,
        })
    }
}

fn string_at(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn f64_at(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        other => bail!("expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

fn u64_at(col: &ArrayRef, row: usize) -> Result<Option<u64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::UInt64 => col.as_primitive::<UInt64Type>().value(row),
        DataType::UInt32 => col.as_primitive::<UInt32Type>().value(row) as u64,
        DataType::Int64 => {
            let v = col.as_primitive::<Int64Type>().value(row);
            u64::try_from(v).with_context(|| format!("negative count {v}"))?
        }
        DataType::Int32 => {
            let v = col.as_primitive::<Int32Type>().value(row);
            u64::try_from(v).with_context(|| format!("negative count {v}"))?
        }
        other => bail!("expected an integer column, got {other:?}"),
    };
    Ok(Some(value))
}
