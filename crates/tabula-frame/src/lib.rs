//! # tabula-frame
//!
//! In-memory tabular data engine.
//!
//! A [`Table`] is a column-oriented store of named, equal-length sequences.
//! Construction validates the input shape and infers one [`ScalarKind`] per
//! column; a column mixing kinds is rejected. Tables support column and row
//! selection, in-place mutation, type conversion, deduplication, inner joins
//! on key combinations and row concatenation. Delimited files are read and
//! written through the [`io`] adapters.
//!
//! ## Quick start
//!
//! ```
//! use serde_json::json;
//! use tabula_frame::{merge, ScalarKind, Table};
//!
//! let people = Table::from_json(&json!({"id": [1, 2], "name": ["Ada", "Alan"]})).unwrap();
//! let scores = Table::from_json(&json!([{"id": 2, "score": 9.5}, {"id": 3, "score": 7.0}])).unwrap();
//!
//! assert_eq!(people.dtype("id").unwrap(), ScalarKind::Integer);
//!
//! let joined = merge(&people, &scores, ["id"], "_right", "_left").unwrap();
//! assert_eq!(joined.shape(), (1, 3));
//! ```

pub mod combination;
pub mod concat;
pub mod convert;
mod display;
pub mod error;
pub mod infer;
pub mod io;
pub mod join;
pub mod schema;
pub mod table;
pub mod value;

// Re-exports for convenience.
pub use combination::{Combination, Group};
pub use concat::concat;
pub use error::{Side, TableError};
pub use io::{read_csv, read_csv_path, write_csv, write_csv_path, CsvOptions};
pub use join::{merge, DEFAULT_LEFT_SUFFIX, DEFAULT_RIGHT_SUFFIX};
pub use schema::{parse_mask, ColumnMap, RawInput, Record};
pub use table::{Column, Table};
pub use value::{ScalarKind, Value};
