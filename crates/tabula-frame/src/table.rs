use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::convert::convert_value;
use crate::error::TableError;
use crate::infer::infer_kind;
use crate::schema::{self, ColumnMap, RawInput, Record};
use crate::value::{ScalarKind, Value};

/// A named, typed sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// The column name.
    pub name: Value,
    /// The kind shared by every non-null cell, or [`ScalarKind::Null`].
    pub kind: ScalarKind,
    /// The cells, one per row.
    pub values: Vec<Value>,
}

/// A column-oriented, in-memory table.
///
/// Every column has the same length, names are unique, and every column is
/// type-homogeneous. The inferred kind of each column is kept next to its
/// cells and refreshed whenever a column is added or converted.
///
/// Tables own their cells. Operations that produce a new table copy the cells
/// they need, so a derived table never shares mutable state with its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table from raw input, validating its shape and inferring the
    /// kind of every column.
    #[instrument(skip_all)]
    pub fn new(input: impl Into<RawInput>) -> Result<Self, TableError> {
        let columns = schema::validate(input.into())?;
        let table = Self::from_validated(columns)?;
        debug!(rows = table.nrows(), cols = table.ncols(), "Built table");
        Ok(table)
    }

    /// Builds a table from a sequence of records.
    pub fn from_records(records: Vec<Record>) -> Result<Self, TableError> {
        Self::new(RawInput::Records(records))
    }

    /// Builds a table from a column map.
    pub fn from_columns(columns: ColumnMap) -> Result<Self, TableError> {
        Self::new(RawInput::Columns(columns))
    }

    /// Builds a table from untyped JSON (an array of objects or an object of
    /// arrays).
    pub fn from_json(json: &serde_json::Value) -> Result<Self, TableError> {
        Self::new(RawInput::from_json(json)?)
    }

    fn from_validated(columns: ColumnMap) -> Result<Self, TableError> {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let kind = infer_kind(&name, &values)?;
                Ok(Column { name, kind, values })
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        Ok(Self { columns })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Column names in order.
    pub fn columns(&self) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.name).collect()
    }

    /// The type map: column names paired with their inferred kinds, in
    /// column order.
    pub fn dtypes(&self) -> Vec<(&Value, ScalarKind)> {
        self.columns.iter().map(|c| (&c.name, c.kind)).collect()
    }

    /// The inferred kind of a single column.
    pub fn dtype(&self, name: impl Into<Value>) -> Result<ScalarKind, TableError> {
        let idx = self.require(&name.into())?;
        Ok(self.columns[idx].kind)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: impl Into<Value>) -> bool {
        self.position(&name.into()).is_some()
    }

    /// The cells of one column.
    pub fn select(&self, name: impl Into<Value>) -> Result<&[Value], TableError> {
        let idx = self.require(&name.into())?;
        Ok(&self.columns[idx].values)
    }

    /// The internal column store. No copy is made.
    pub fn to_columns(&self) -> &[Column] {
        &self.columns
    }

    /// One row as ordered `(name, cell)` pairs.
    pub fn row(&self, idx: usize) -> Option<Record> {
        if idx >= self.nrows() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[idx].clone()))
                .collect(),
        )
    }

    /// One record per row, in column order.
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.nrows()).filter_map(|i| self.row(i)).collect()
    }

    /// The table as a JSON array of objects. Column names become their
    /// textual form.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = (0..self.nrows())
            .map(|i| {
                let obj = self
                    .columns
                    .iter()
                    .map(|c| (c.name.to_string(), c.values[i].to_json()))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::Value::Array(rows)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// A new table restricted to `names`, in the given order.
    pub fn select_columns<I, N>(&self, names: I) -> Result<Table, TableError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Value>,
    {
        let mut subset = ColumnMap::new();
        for name in names {
            let name = name.into();
            let idx = self.require(&name)?;
            subset.push((name, self.columns[idx].values.clone()));
        }
        Table::from_columns(subset)
    }

    /// A new table holding the rows where `mask` is true, in original order.
    pub fn select_rows(&self, mask: &[bool]) -> Result<Table, TableError> {
        schema::check_mask(mask, self.nrows())?;
        let kept: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();
        Table::from_columns(self.take_rows(&kept))
    }

    fn take_rows(&self, rows: &[usize]) -> ColumnMap {
        self.columns
            .iter()
            .map(|c| {
                let values = rows.iter().map(|&i| c.values[i].clone()).collect();
                (c.name.clone(), values)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Appends a column and infers its kind.
    ///
    /// On a table without columns any length is accepted and becomes the row
    /// count.
    pub fn add_column(
        &mut self,
        name: impl Into<Value>,
        values: Vec<Value>,
    ) -> Result<(), TableError> {
        let name = name.into();
        schema::check_column_name(&name)?;
        if self.position(&name).is_some() {
            return Err(TableError::ColumnAlreadyExists(name.to_string()));
        }
        if !self.columns.is_empty() && values.len() != self.nrows() {
            return Err(TableError::LengthMismatch {
                subject: format!("column '{name}'"),
                expected: self.nrows(),
                found: values.len(),
            });
        }
        let kind = infer_kind(&name, &values)?;
        debug!(column = %name, %kind, "Added column");
        self.columns.push(Column { name, kind, values });
        Ok(())
    }

    /// Removes a column if present. Removing an absent column is a no-op.
    pub fn remove_column(&mut self, name: impl Into<Value>) {
        let name = name.into();
        self.columns.retain(|c| c.name != name);
    }

    /// Renames a column, keeping its position and kind.
    ///
    /// If another column already carries `new`, that column is dropped and
    /// replaced by the renamed one.
    pub fn rename_column(
        &mut self,
        old: impl Into<Value>,
        new: impl Into<Value>,
    ) -> Result<(), TableError> {
        let (old, new) = (old.into(), new.into());
        self.require(&old)?;
        if old == new {
            return Ok(());
        }
        schema::check_column_name(&new)?;
        self.columns.retain(|c| c.name != new);
        let idx = self.require(&old)?;
        self.columns[idx].name = new;
        Ok(())
    }

    /// Converts every cell of the named columns to `target`.
    ///
    /// All cells are converted before any column is replaced, so a failure
    /// leaves the table untouched. The column kind becomes `target` even when
    /// every converted cell is null.
    pub fn convert<I, N>(&mut self, columns: I, target: ScalarKind) -> Result<(), TableError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Value>,
    {
        let mut converted = Vec::new();
        for name in columns {
            let idx = self.require(&name.into())?;
            let column = &self.columns[idx];
            let values = column
                .values
                .iter()
                .map(|v| convert_value(&column.name, v, target))
                .collect::<Result<Vec<_>, _>>()?;
            converted.push((idx, values));
        }
        for (idx, values) in converted {
            let column = &mut self.columns[idx];
            debug!(column = %column.name, from = %column.kind, to = %target, "Converted column");
            column.values = values;
            column.kind = target;
        }
        Ok(())
    }

    /// Writes `value` into `column` at every row where `mask` is true.
    ///
    /// The value's kind must equal the column's current kind exactly, so a
    /// column of kind [`ScalarKind::Null`] only accepts null. Mask and value
    /// are checked before any cell is written.
    pub fn change_values(
        &mut self,
        column: impl Into<Value>,
        value: impl Into<Value>,
        mask: &[bool],
    ) -> Result<(), TableError> {
        let (name, value) = (column.into(), value.into());
        let idx = self.require(&name)?;
        schema::check_mask(mask, self.nrows())?;
        let column = &mut self.columns[idx];
        if value.kind() != column.kind {
            return Err(TableError::TypeMismatch {
                column: name.to_string(),
                expected: column.kind,
                found: value.kind(),
            });
        }
        for (cell, _) in column.values.iter_mut().zip(mask).filter(|(_, m)| **m) {
            *cell = value.clone();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Deduplication
    // -----------------------------------------------------------------------

    /// Row indices of the first occurrence of every distinct row.
    fn first_occurrences(&self) -> Vec<usize> {
        let mut seen: HashSet<Vec<&Value>> = HashSet::with_capacity(self.nrows());
        (0..self.nrows())
            .filter(|&i| seen.insert(self.columns.iter().map(|c| &c.values[i]).collect()))
            .collect()
    }

    /// Drops repeated rows in place, keeping first occurrences in order.
    pub fn drop_duplicates(&mut self) {
        let keep = self.first_occurrences();
        let before = self.nrows();
        if keep.len() == before {
            return;
        }
        for column in &mut self.columns {
            column.values = keep.iter().map(|&i| column.values[i].clone()).collect();
        }
        debug!(before, after = keep.len(), "Dropped duplicate rows");
    }

    /// A revalidated copy without repeated rows.
    pub fn deduplicated(&self) -> Result<Table, TableError> {
        Table::from_columns(self.take_rows(&self.first_occurrences()))
    }

    // -----------------------------------------------------------------------
    // Appending
    // -----------------------------------------------------------------------

    /// Both tables must have the same type map: the same column names with
    /// the same kinds, in any order.
    fn check_same_dtypes(&self, other: &Table) -> Result<(), TableError> {
        if self.ncols() != other.ncols() {
            let column = self
                .columns
                .iter()
                .chain(&other.columns)
                .find(|c| self.position(&c.name).is_none() || other.position(&c.name).is_none())
                .map(|c| c.name.to_string())
                .unwrap_or_default();
            return Err(TableError::SchemaMismatch { column });
        }
        for column in &self.columns {
            match other.position(&column.name) {
                Some(j) if other.columns[j].kind == column.kind => {}
                _ => {
                    return Err(TableError::SchemaMismatch {
                        column: column.name.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Appends the rows of `other` in place, without revalidation.
    pub fn append(&mut self, other: &Table) -> Result<(), TableError> {
        self.check_same_dtypes(other)?;
        for column in &mut self.columns {
            if let Some(j) = other.position(&column.name) {
                column.values.extend(other.columns[j].values.iter().cloned());
            }
        }
        debug!(rows = self.nrows(), added = other.nrows(), "Appended rows");
        Ok(())
    }

    /// A revalidated copy holding the rows of `self` followed by those of
    /// `other`.
    pub fn appended(&self, other: &Table) -> Result<Table, TableError> {
        self.check_same_dtypes(other)?;
        let mut combined = ColumnMap::with_capacity(self.ncols());
        for column in &self.columns {
            let mut values = Vec::with_capacity(self.nrows() + other.nrows());
            values.extend(column.values.iter().cloned());
            if let Some(j) = other.position(&column.name) {
                values.extend(other.columns[j].values.iter().cloned());
            }
            combined.push((column.name.clone(), values));
        }
        Table::from_columns(combined)
    }

    // -----------------------------------------------------------------------
    // Numeric helpers
    // -----------------------------------------------------------------------

    fn numeric_cells(&self, name: Value) -> Result<Vec<f64>, TableError> {
        let idx = self.require(&name)?;
        let column = &self.columns[idx];
        match column.kind {
            ScalarKind::Integer | ScalarKind::Float | ScalarKind::Null => {
                Ok(column.values.iter().filter_map(Value::as_f64).collect())
            }
            kind => Err(TableError::TypeMismatch {
                column: name.to_string(),
                expected: ScalarKind::Float,
                found: kind,
            }),
        }
    }

    /// Arithmetic mean of the non-null cells of a numeric column.
    pub fn mean(&self, name: impl Into<Value>) -> Result<Option<f64>, TableError> {
        let cells = self.numeric_cells(name.into())?;
        if cells.is_empty() {
            return Ok(None);
        }
        Ok(Some(cells.iter().sum::<f64>() / cells.len() as f64))
    }

    /// Sample standard deviation (n - 1 denominator) of the non-null cells
    /// of a numeric column.
    pub fn std_dev(&self, name: impl Into<Value>) -> Result<Option<f64>, TableError> {
        let cells = self.numeric_cells(name.into())?;
        if cells.len() < 2 {
            return Ok(None);
        }
        let n = cells.len() as f64;
        let mean = cells.iter().sum::<f64>() / n;
        let var = cells.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Ok(Some(var.sqrt()))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) fn position(&self, name: &Value) -> Option<usize> {
        self.columns.iter().position(|c| &c.name == name)
    }

    pub(crate) fn require(&self, name: &Value) -> Result<usize, TableError> {
        self.position(name).ok_or_else(|| TableError::ColumnNotFound {
            column: name.to_string(),
            side: None,
        })
    }
}
