use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::iter;
use std::path::Path;

use log::debug;
use serde_json::{Map, Value};

use crate::errors::ExportError;

pub const RECORDS_KEY: &str = "DATA";

/// Records flattened into rows. Every row has exactly one cell per column.
#[derive(Debug, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn extract_records(response: &Value) -> Result<&Vec<Value>, ExportError> {
    let document = match response.as_object() {
        Some(o) => { o },
        None => {
            return Err(ExportError::MalformedResponse("response is not a JSON object".to_owned()))
        }
    };

    match document.get(RECORDS_KEY) {
        Some(Value::Array(records)) => { Ok(records) },
        Some(_) => {
            Err(ExportError::MalformedResponse(format!("`{}` is not an array", RECORDS_KEY)))
        },
        None => {
            Err(ExportError::MalformedResponse(format!("response has no `{}` field. Fields present: {:?}", RECORDS_KEY, document.keys().collect::<Vec<_>>())))
        }
    }
}

/// Strings are written raw, booleans as `True`/`False` and null as an empty cell.
/// Nested values fall back to compact JSON.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => { String::new() },
        Value::Bool(true) => { "True".to_owned() },
        Value::Bool(false) => { "False".to_owned() },
        Value::Number(n) => { n.to_string() },
        Value::String(s) => { s.to_owned() },
        nested => { nested.to_string() }
    }
}

pub fn build_table(records: &[Value]) -> Result<Table, ExportError> {
    let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    // union of keys, in the order they are first encountered
    for (index, record) in records.iter().enumerate() {
        let object = match record.as_object() {
            Some(o) => { o },
            None => {
                return Err(ExportError::MalformedResponse(format!("record {} is not an object: {}", index, record)))
            }
        };

        for key in object.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.to_owned());
            }
        }
        objects.push(object);
    }

    let rows = objects.iter()
        .map(|object| {
            columns.iter()
                .map(|column| object.get(column).map(render_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Writes the header (an unnamed index column, then the columns) followed by each row
/// prefixed with its 0-based position.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(iter::once("").chain(table.columns.iter().map(String::as_str)))?;

    for (index, row) in table.rows.iter().enumerate() {
        wtr.write_record(iter::once(index.to_string()).chain(row.iter().cloned()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the `DATA` records of `response` to `output`, replacing any existing file.
/// Nothing is written when there are no records.
pub fn write_csv(response: &Value, output: &Path) -> Result<usize, ExportError> {
    let records = extract_records(response)?;
    if records.is_empty() {
        return Err(ExportError::EmptyResultSet);
    }

    let table = build_table(records)?;
    debug!("writing {} rows x {} columns to {}", table.rows.len(), table.columns.len(), output.display());

    let file = File::create(output)?;
    write_table(&table, file)?;

    Ok(table.rows.len())
}
