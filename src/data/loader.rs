use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, StringArray, UInt8Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::SchemaError;
use super::model::{
    Appointment, AppointmentDataset, CategoryValue, Column, Covariate, Gender, Outcome,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an appointment table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the column names listed in [`Column::REQUIRED`]
/// * `.json`    – `[{ "neighbourhood": "...", "age": 34, ... }, ...]`
/// * `.parquet` – one column per field, string / integer / boolean typed
///
/// Extra columns are ignored. A missing or mistyped required column fails the
/// whole load with a [`SchemaError`] in the error chain.
pub fn load_file(path: &Path) -> Result<AppointmentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} appointments across {} neighbourhoods from {}",
        dataset.len(),
        dataset.neighbourhoods().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell → typed field conversion (shared by all formats)
// ---------------------------------------------------------------------------

/// A raw cell as delivered by one of the file formats.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn invalid(column: Column, expected: &'static str, found: &Cell) -> SchemaError {
    SchemaError::InvalidValue {
        column: column.name(),
        expected,
        found: match found {
            Cell::Null => String::from("<null>"),
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
        },
    }
}

fn text_field(column: Column, cell: Cell) -> Result<String, SchemaError> {
    match cell {
        Cell::Text(s) if !s.is_empty() => Ok(s),
        other => Err(invalid(column, "a non-empty string", &other)),
    }
}

/// Integers may arrive as `34`, `34.0` (pandas float export) or `"34"`.
fn integer_field(column: Column, cell: Cell) -> Result<i64, SchemaError> {
    match &cell {
        Cell::Int(i) => Ok(*i),
        Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
        Cell::Text(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            match s.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
                _ => Err(invalid(column, "an integer", &cell)),
            }
        }
        _ => Err(invalid(column, "an integer", &cell)),
    }
}

fn gender_field(cell: Cell) -> Result<Gender, SchemaError> {
    match &cell {
        Cell::Text(s) => Gender::from_code(s.trim()),
        _ => None,
    }
    .ok_or_else(|| invalid(Column::Gender, "'F' or 'M'", &cell))
}

fn outcome_field(cell: Cell) -> Result<Outcome, SchemaError> {
    match &cell {
        Cell::Text(s) => Outcome::from_label(s.trim()),
        _ => None,
    }
    .ok_or_else(|| invalid(Column::NoShow, "'Yes' or 'No'", &cell))
}

/// Covariates are opaque keys; only floats with a fractional part are refused.
fn category_field(column: Column, cell: Cell) -> Result<CategoryValue, SchemaError> {
    match cell {
        Cell::Null => Ok(CategoryValue::Null),
        Cell::Bool(b) => Ok(CategoryValue::Bool(b)),
        Cell::Int(i) => Ok(CategoryValue::Integer(i)),
        Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(CategoryValue::Integer(f as i64)),
        Cell::Text(s) => Ok(guess_category(&s)),
        other => Err(invalid(column, "a category key", &other)),
    }
}

fn guess_category(s: &str) -> CategoryValue {
    let s = s.trim();
    if s.is_empty() {
        return CategoryValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CategoryValue::Integer(i);
    }
    match s {
        "true" | "True" | "TRUE" => CategoryValue::Bool(true),
        "false" | "False" | "FALSE" => CategoryValue::Bool(false),
        _ => CategoryValue::String(s.to_string()),
    }
}

/// Assemble one record; `cell` yields the raw value for each required column.
fn build_record(mut cell: impl FnMut(Column) -> Cell) -> Result<Appointment, SchemaError> {
    use super::model::Covariate::*;

    Ok(Appointment {
        neighbourhood: text_field(Column::Neighbourhood, cell(Column::Neighbourhood))?,
        age: integer_field(Column::Age, cell(Column::Age))?,
        gender: gender_field(cell(Column::Gender))?,
        no_show: outcome_field(cell(Column::NoShow))?,
        scholarship: covariate_field(Scholarship, &mut cell)?,
        sms_received: covariate_field(SmsReceived, &mut cell)?,
        handcap: covariate_field(Handcap, &mut cell)?,
        hipertension: covariate_field(Hipertension, &mut cell)?,
        diabetes: covariate_field(Diabetes, &mut cell)?,
        alcoholism: covariate_field(Alcoholism, &mut cell)?,
        days_until_appointment: integer_field(
            Column::DaysUntilAppointment,
            cell(Column::DaysUntilAppointment),
        )?,
    })
}

fn covariate_field(
    covariate: Covariate,
    cell: &mut impl FnMut(Column) -> Cell,
) -> Result<CategoryValue, SchemaError> {
    let column = Column::Covariate(covariate);
    category_field(column, cell(column))
}

/// Map every required column to its position in a header, or fail on the
/// first one that is absent.
fn locate_columns(names: &[&str]) -> Result<HashMap<Column, usize>, SchemaError> {
    Column::REQUIRED
        .iter()
        .map(|&col| {
            names
                .iter()
                .position(|h| h.trim() == col.name())
                .map(|idx| (col, idx))
                .ok_or(SchemaError::MissingColumn(col.name()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one appointment per line.
/// Every cell is text and is converted according to its column.
fn load_csv(path: &Path) -> Result<AppointmentDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<AppointmentDataset> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let names: Vec<&str> = headers.iter().collect();
    let positions = locate_columns(&names)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let appointment = build_record(|col| {
            let raw = record.get(positions[&col]).unwrap_or("");
            if raw.is_empty() {
                Cell::Null
            } else {
                Cell::Text(raw.to_string())
            }
        })
        .with_context(|| format!("CSV row {row_no}"))?;
        records.push(appointment);
    }

    Ok(AppointmentDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "neighbourhood": "CENTRO", "age": 34, "gender": "F", "no_show": "No",
///     "scholarship": 0, "sms_received": 1, "handcap": 0, "hipertension": 0,
///     "diabetes": 0, "alcoholism": 0, "days_until_appointment": 5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<AppointmentDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<AppointmentDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if let Some(missing) = Column::REQUIRED.iter().find(|c| !obj.contains_key(c.name())) {
            return Err(SchemaError::MissingColumn(missing.name()))
                .with_context(|| format!("JSON row {i}"));
        }

        let appointment = build_record(|col| json_to_cell(&obj[col.name()]))
            .with_context(|| format!("JSON row {i}"))?;
        records.push(appointment);
    }

    Ok(AppointmentDataset::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map_or(Cell::Null, Cell::Float),
        },
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per appointment field.
///
/// String columns may be `Utf8` or `LargeUtf8`; integer columns any signed
/// width (or whole-valued floats); covariates additionally `Boolean`.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<AppointmentDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let positions = locate_columns(&names)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let mut failure = None;
            let appointment = build_record(|col| {
                match extract_cell(batch.column(positions[&col]), row) {
                    Ok(cell) => cell,
                    Err(e) => {
                        failure.get_or_insert(SchemaError::UnsupportedType {
                            column: col.name(),
                            found: e,
                        });
                        Cell::Null
                    }
                }
            });
            if let Some(e) = failure {
                return Err(e).with_context(|| format!("Parquet row {row_no}"));
            }
            records.push(appointment.with_context(|| format!("Parquet row {row_no}"))?);
        }
    }

    Ok(AppointmentDataset::from_records(records))
}

/// Extract a single cell from an Arrow column; `Err` carries the data type
/// name when the column type is not supported.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<Cell, String> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }

    macro_rules! int_cell {
        ($arr:ty) => {
            col.as_any()
                .downcast_ref::<$arr>()
                .map(|a| Cell::Int(a.value(row) as i64))
        };
    }

    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| Cell::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => Some(Cell::Text(col.as_string::<i64>().value(row).to_string())),
        DataType::Int8 => int_cell!(Int8Array),
        DataType::Int16 => int_cell!(Int16Array),
        DataType::Int32 => int_cell!(Int32Array),
        DataType::Int64 => int_cell!(Int64Array),
        DataType::UInt8 => int_cell!(UInt8Array),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| Cell::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Cell::Float(a.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| Cell::Bool(a.value(row))),
        _ => None,
    };

    cell.ok_or_else(|| format!("{:?}", col.data_type()))
}
