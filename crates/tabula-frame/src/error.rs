use thiserror::Error;

use crate::value::ScalarKind;

/// Which input of a merge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors that can occur while building or transforming a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The raw input is neither a list of records nor a map of columns.
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    /// A record is missing a column that another record carries.
    #[error("Schema mismatch: column '{column}' is missing from at least one record")]
    SchemaMismatch { column: String },

    /// Two sequences that must line up have different lengths.
    #[error("Length mismatch for {subject}: expected {expected}, got {found}")]
    LengthMismatch {
        subject: String,
        expected: usize,
        found: usize,
    },

    /// A column name is not one of the allowed scalar kinds.
    #[error("Invalid column name: {0}")]
    InvalidColumnName(String),

    /// The requested column does not exist.
    #[error("Column not found: {column}{}", side_suffix(.side))]
    ColumnNotFound { column: String, side: Option<Side> },

    /// A column with this name is already present.
    #[error("Column already exists: {0}")]
    ColumnAlreadyExists(String),

    /// A column holds non-null values of more than one kind.
    #[error("Mixed types in column '{column}': {}", join_kinds(.kinds))]
    MixedType {
        column: String,
        kinds: Vec<ScalarKind>,
    },

    /// A row mask is not a sequence of booleans.
    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    /// A value's kind does not match the kind of the column it targets.
    #[error("Type mismatch on column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: ScalarKind,
        found: ScalarKind,
    },

    /// A value cannot be reparsed as the requested kind.
    #[error("Conversion error on column '{column}': cannot convert '{value}' to {target}")]
    Conversion {
        column: String,
        value: String,
        target: ScalarKind,
    },

    /// Concatenation was given fewer than two tables.
    #[error("Insufficient inputs: concatenation needs at least 2 tables, got {0}")]
    InsufficientInputs(usize),

    /// An I/O error from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the delimited-file reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error occurred during JSON serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

fn side_suffix(side: &Option<Side>) -> String {
    match side {
        Some(side) => format!(" (in {side} table)"),
        None => String::new(),
    }
}

fn join_kinds(kinds: &[ScalarKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
