//! Delimited-file adapters.
//!
//! The reader turns a header row plus data rows into a table whose cells are
//! all raw text; typing is left to [`Table::convert`]. The writer emits the
//! header row first, then one line per record. Null cells are written as
//! empty fields.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::TableError;
use crate::schema::ColumnMap;
use crate::table::Table;
use crate::value::Value;

/// Delimited-file dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Whether the first line holds column names. Without a header, columns
    /// are named by their zero-based position.
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_headers: true,
        }
    }
}

/// Reads a table from delimited text. Every cell becomes [`Value::Text`].
///
/// Rows with a different field count than the header are rejected.
#[instrument(skip_all)]
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Table, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(options.has_headers)
        .flexible(false)
        .from_reader(reader);

    let mut columns: ColumnMap = if options.has_headers {
        rdr.headers()?
            .iter()
            .map(|h| (Value::from(h), Vec::new()))
            .collect()
    } else {
        Vec::new()
    };

    for record in rdr.records() {
        let record = record?;
        if columns.is_empty() {
            columns = (0..record.len())
                .map(|i| (Value::Integer(i as i64), Vec::new()))
                .collect();
        }
        for ((_, cells), field) in columns.iter_mut().zip(record.iter()) {
            cells.push(Value::from(field));
        }
    }

    let table = Table::from_columns(columns)?;
    debug!(rows = table.nrows(), cols = table.ncols(), "Read delimited table");
    Ok(table)
}

/// Reads a table from a delimited file.
pub fn read_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Table, TableError> {
    let file = File::open(path.as_ref())?;
    read_csv(file, options)
}

/// Writes a table as delimited text: header row first, then the records in
/// column order.
#[instrument(skip_all, fields(rows = table.nrows()))]
pub fn write_csv<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> Result<(), TableError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_writer(writer);

    if options.has_headers && table.ncols() > 0 {
        wtr.write_record(table.columns().iter().map(|name| name.to_string()))?;
    }
    for record in table.to_records() {
        wtr.write_record(record.iter().map(|(_, cell)| cell.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes a table to a delimited file, creating or truncating it.
pub fn write_csv_path(
    table: &Table,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<(), TableError> {
    let file = File::create(path.as_ref())?;
    write_csv(table, file, options)
}
