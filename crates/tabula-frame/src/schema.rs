//! Input shapes accepted at the construction boundary, and the structural
//! checks that run before a table is built.

use std::collections::HashSet;

use crate::error::TableError;
use crate::value::Value;

/// One row as ordered `(column name, cell)` pairs.
pub type Record = Vec<(Value, Value)>;

/// Ordered `(column name, cells)` pairs.
pub type ColumnMap = Vec<(Value, Vec<Value>)>;

/// Raw data handed to [`Table::new`](crate::Table::new).
///
/// The shape is resolved once here; everything downstream works on the
/// normalised [`ColumnMap`] returned by [`validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A sequence of rows. Every row must carry the same set of keys.
    Records(Vec<Record>),
    /// A mapping from column name to its cells. All columns must have the
    /// same length.
    Columns(ColumnMap),
}

impl RawInput {
    /// Resolves untyped JSON into one of the two accepted shapes.
    ///
    /// An array of objects is a record list, an object of arrays is a column
    /// map. Anything else fails with [`TableError::InvalidInputShape`].
    pub fn from_json(json: &serde_json::Value) -> Result<Self, TableError> {
        match json {
            serde_json::Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let obj = item.as_object().ok_or_else(|| {
                        TableError::InvalidInputShape(format!(
                            "record {i} must be an object, got {item}"
                        ))
                    })?;
                    let mut record = Vec::with_capacity(obj.len());
                    for (key, cell) in obj {
                        record.push((Value::from(key.as_str()), Value::from_json(cell)?));
                    }
                    records.push(record);
                }
                Ok(RawInput::Records(records))
            }
            serde_json::Value::Object(obj) => {
                let mut columns = Vec::with_capacity(obj.len());
                for (key, cells) in obj {
                    let cells = cells.as_array().ok_or_else(|| {
                        TableError::InvalidInputShape(format!(
                            "column '{key}' must be an array, got {cells}"
                        ))
                    })?;
                    let values = cells
                        .iter()
                        .map(Value::from_json)
                        .collect::<Result<Vec<_>, _>>()?;
                    columns.push((Value::from(key.as_str()), values));
                }
                Ok(RawInput::Columns(columns))
            }
            other => Err(TableError::InvalidInputShape(format!(
                "expected an array of records or an object of columns, got {other}"
            ))),
        }
    }
}

impl From<Vec<Record>> for RawInput {
    fn from(records: Vec<Record>) -> Self {
        RawInput::Records(records)
    }
}

impl From<ColumnMap> for RawInput {
    fn from(columns: ColumnMap) -> Self {
        RawInput::Columns(columns)
    }
}

/// Checks structural consistency of raw input and returns it as columns.
///
/// For records, column order is the first-seen union of keys across all
/// records, and every record must carry every key. For column maps, all
/// columns must share one length.
pub fn validate(input: RawInput) -> Result<ColumnMap, TableError> {
    match input {
        RawInput::Records(records) => records_to_columns(records),
        RawInput::Columns(columns) => {
            let mut seen = HashSet::with_capacity(columns.len());
            for (name, _) in &columns {
                check_column_name(name)?;
                if !seen.insert(name) {
                    return Err(TableError::ColumnAlreadyExists(name.to_string()));
                }
            }
            if let Some((first_name, first)) = columns.first() {
                let expected = first.len();
                for (name, cells) in &columns {
                    if cells.len() != expected {
                        return Err(TableError::LengthMismatch {
                            subject: format!(
                                "column '{name}' (first column '{first_name}')"
                            ),
                            expected,
                            found: cells.len(),
                        });
                    }
                }
            }
            Ok(columns)
        }
    }
}

fn records_to_columns(records: Vec<Record>) -> Result<ColumnMap, TableError> {
    let mut names: Vec<Value> = Vec::new();
    let mut known: HashSet<Value> = HashSet::new();
    for record in &records {
        let mut in_record = HashSet::with_capacity(record.len());
        for (name, _) in record {
            check_column_name(name)?;
            if !in_record.insert(name) {
                return Err(TableError::ColumnAlreadyExists(name.to_string()));
            }
            if known.insert(name.clone()) {
                names.push(name.clone());
            }
        }
    }

    let mut columns: ColumnMap = names
        .into_iter()
        .map(|name| (name, Vec::with_capacity(records.len())))
        .collect();

    for mut record in records {
        if record.len() != columns.len() {
            let missing = columns
                .iter()
                .find(|(name, _)| !record.iter().any(|(k, _)| k == name))
                .map(|(name, _)| name.to_string())
                .unwrap_or_default();
            return Err(TableError::SchemaMismatch { column: missing });
        }
        for (name, cells) in columns.iter_mut() {
            let pos = record
                .iter()
                .position(|(k, _)| k == name)
                .ok_or_else(|| TableError::SchemaMismatch {
                    column: name.to_string(),
                })?;
            cells.push(record.swap_remove(pos).1);
        }
    }
    Ok(columns)
}

/// Column names must be a non-null scalar.
pub fn check_column_name(name: &Value) -> Result<(), TableError> {
    if name.is_null() {
        return Err(TableError::InvalidColumnName("null".into()));
    }
    Ok(())
}

/// Checks that a row mask lines up with a table of `nrows` rows.
pub fn check_mask(mask: &[bool], nrows: usize) -> Result<(), TableError> {
    if mask.len() != nrows {
        return Err(TableError::LengthMismatch {
            subject: "row mask".into(),
            expected: nrows,
            found: mask.len(),
        });
    }
    Ok(())
}

/// Parses an untyped JSON array into a row mask.
///
/// Fails with [`TableError::InvalidMask`] when the input is not an array or
/// holds anything other than booleans.
pub fn parse_mask(json: &serde_json::Value) -> Result<Vec<bool>, TableError> {
    let items = json
        .as_array()
        .ok_or_else(|| TableError::InvalidMask(format!("expected an array, got {json}")))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_bool().ok_or_else(|| {
                TableError::InvalidMask(format!("entry {i} is not a boolean: {item}"))
            })
        })
        .collect()
}
