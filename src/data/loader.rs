use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, Result};
use super::model::{
    HappinessDataset, Record, COL_CORRUPTION, COL_COUNTRY, COL_FREEDOM, COL_GDP, COL_GENEROSITY,
    COL_HAPPINESS, COL_LIFE, COL_RANKING, COL_REGION, COL_SOCIAL, COL_YEAR, HEADERS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a happiness dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the canonical column names (primary format)
/// * `.json`    – `[{ "Country": "...", "Year": 2020, ... }, ...]`
/// * `.parquet` – one column per header name
pub fn load_file(path: &Path) -> Result<HappinessDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
            load_csv(file)?
        }
        "json" => {
            let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
            load_json(file)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    report_coercions(&records);
    Ok(HappinessDataset::from_records(records).with_source(path))
}

/// Copy the originally loaded file to `dst` byte for byte.
///
/// Returns the number of bytes written.
pub fn export_source(src: &Path, dst: &Path) -> Result<u64> {
    std::fs::copy(src, dst).map_err(|e| LoadError::io(dst, e))
}

fn report_coercions(records: &[Record]) {
    let coerced = records.iter().filter(|r| r.coerced).count();
    if coerced > 0 {
        log::warn!(
            "{coerced} of {} rows had missing or non-numeric values coerced to 0",
            records.len()
        );
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// A raw cell as it comes out of any of the source formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

/// Coerce a cell to `f64`. Returns the value and whether it was defaulted.
///
/// Empty, missing, non-numeric and non-finite cells all become `0.0`.
pub fn coerce_f64(cell: Cell<'_>) -> (f64, bool) {
    let parsed = match cell {
        Cell::Number(v) => Some(v),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        Cell::Missing => None,
    };
    match parsed {
        Some(v) if v.is_finite() => (v, false),
        _ => (0.0, true),
    }
}

/// Integer variant of [`coerce_f64`]; fractional input truncates toward zero.
pub fn coerce_i64(cell: Cell<'_>) -> (i64, bool) {
    let (v, defaulted) = coerce_f64(cell);
    (v.trunc() as i64, defaulted)
}

fn coerce_text(cell: Cell<'_>) -> String {
    match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(v) => v.to_string(),
        Cell::Missing => String::new(),
    }
}

/// Build one record from a column-name → cell accessor.
fn record_from_cells<'a>(cell: impl Fn(&'static str) -> Cell<'a>) -> Record {
    let mut coerced = false;
    let mut num = |col: &'static str| {
        let (v, d) = coerce_f64(cell(col));
        coerced |= d;
        v
    };

    let happiness_score = num(COL_HAPPINESS);
    let gdp_per_capita = num(COL_GDP);
    let social_support = num(COL_SOCIAL);
    let healthy_life_expectancy = num(COL_LIFE);
    let freedom_to_choose = num(COL_FREEDOM);
    let generosity = num(COL_GENEROSITY);
    let perceptions_of_corruption = num(COL_CORRUPTION);

    let (ranking, d_rank) = coerce_i64(cell(COL_RANKING));
    let (year, d_year) = coerce_i64(cell(COL_YEAR));
    coerced |= d_rank || d_year;

    let record = Record {
        ranking,
        country: coerce_text(cell(COL_COUNTRY)),
        region: coerce_text(cell(COL_REGION)),
        happiness_score,
        gdp_per_capita,
        social_support,
        healthy_life_expectancy,
        freedom_to_choose,
        generosity,
        perceptions_of_corruption,
        year,
        coerced,
    };
    if record.coerced {
        log::debug!("coerced missing values to 0 for {} {}", record.country, record.year);
    }
    record
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the canonical column names, any order.
/// `Country` and `Year` are required; any other column may be absent.
pub fn load_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let index_of = |name: &str| headers.iter().position(|h| h == name);
    for required in [COL_COUNTRY, COL_YEAR] {
        if index_of(required).is_none() {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let columns: Vec<(&'static str, Option<usize>)> =
        HEADERS.into_iter().map(|c| (c, index_of(c))).collect();

    let mut records = Vec::new();
    for result in reader.byte_records() {
        let row = result?;
        // Non-UTF-8 bytes (e.g. Latin-1 exports) are replaced, not fatal.
        let fields: Vec<Cow<'_, str>> = row.iter().map(String::from_utf8_lossy).collect();
        if fields.iter().any(|f| matches!(f, Cow::Owned(_))) {
            log::warn!(
                "row {} contains invalid UTF-8; replaced undecodable bytes",
                records.len() + 1
            );
        }
        records.push(record_from_cells(|col| {
            columns
                .iter()
                .find(|(name, _)| *name == col)
                .and_then(|(_, idx)| *idx)
                .and_then(|idx| fields.get(idx))
                .map(|f| Cell::Text(f.as_ref()))
                .unwrap_or(Cell::Missing)
        }));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, keyed by the same header names as the CSV:
///
/// ```json
/// [
///   { "Country": "Finland", "Year": 2023, "Happiness score": 7.8, ... },
///   ...
/// ]
/// ```
pub fn load_json<R: Read>(reader: R) -> Result<Vec<Record>> {
    let root: Vec<serde_json::Map<String, JsonValue>> = serde_json::from_reader(reader)?;

    // Objects have no shared header: a required key must appear somewhere,
    // and individual objects lacking it default like short CSV rows.
    if !root.is_empty() {
        for required in [COL_COUNTRY, COL_YEAR] {
            if !root.iter().any(|obj| obj.contains_key(required)) {
                return Err(LoadError::MissingColumn(required));
            }
        }
    }

    let mut records = Vec::with_capacity(root.len());
    for obj in &root {
        records.push(record_from_cells(|col| match obj.get(col) {
            Some(JsonValue::String(s)) => Cell::Text(s.as_str()),
            Some(JsonValue::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
            _ => Cell::Missing,
        }));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// A source column normalised to one of two Arrow shapes.
enum Column {
    Numbers(Float64Array),
    Text(StringArray),
}

impl Column {
    fn cell(&self, row: usize) -> Cell<'_> {
        match self {
            Column::Numbers(arr) if arr.is_valid(row) => Cell::Number(arr.value(row)),
            Column::Text(arr) if arr.is_valid(row) => Cell::Text(arr.value(row)),
            _ => Cell::Missing,
        }
    }
}

fn normalise(col: &ArrayRef, text: bool) -> Result<Column> {
    // Casts are "safe": cells that cannot be converted become nulls.
    if text {
        let casted = cast(col.as_ref(), &DataType::Utf8)?;
        let arr = casted
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| ArrowError::CastError("expected Utf8 column".into()))?;
        Ok(Column::Text(arr.clone()))
    } else {
        let casted = cast(col.as_ref(), &DataType::Float64)?;
        let arr = casted
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| ArrowError::CastError("expected Float64 column".into()))?;
        Ok(Column::Numbers(arr.clone()))
    }
}

/// Load a Parquet file whose column names match the CSV headers.
///
/// Works with files written by Pandas (`df.to_parquet()`) and Polars.
pub fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        for required in [COL_COUNTRY, COL_YEAR] {
            if schema.index_of(required).is_err() {
                return Err(LoadError::MissingColumn(required));
            }
        }

        let mut columns: Vec<(&'static str, Column)> = Vec::new();
        for name in HEADERS {
            if let Ok(idx) = schema.index_of(name) {
                let text = name == COL_COUNTRY || name == COL_REGION;
                columns.push((name, normalise(batch.column(idx), text)?));
            }
        }

        for row in 0..batch.num_rows() {
            records.push(record_from_cells(|col| {
                columns
                    .iter()
                    .find(|(name, _)| *name == col)
                    .map(|(_, c)| c.cell(row))
                    .unwrap_or(Cell::Missing)
            }));
        }
    }

    Ok(records)
}
