//! Inner join of two tables on a set of key columns.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::combination::{Combination, Group};
use crate::error::{Side, TableError};
use crate::schema::ColumnMap;
use crate::table::Table;
use crate::value::Value;

/// Suffix appended to a left-table column whose name also appears in the
/// right table.
pub const DEFAULT_RIGHT_SUFFIX: &str = "_right";
/// Suffix appended to a right-table column whose name also appears in the
/// left table.
pub const DEFAULT_LEFT_SUFFIX: &str = "_left";

/// Where an output column takes its cells from.
enum Source {
    Key(usize),
    Left(usize),
    Right(usize),
}

/// Inner-joins `left` and `right` on `keys`.
///
/// Only key combinations present in both tables with no null or empty-text
/// component produce rows. For each shared combination, every matching left
/// row is paired with every matching right row (left order, then right
/// order); combinations are visited in the order they first appear in
/// `left`.
///
/// Output columns are the keys, then the left non-key columns, then the
/// right non-key columns. A non-key name present on both sides is emitted
/// twice: the left copy gets `right_suffix` appended and the right copy gets
/// `left_suffix`. The crossed naming is kept as-is for compatibility with
/// existing exports.
#[instrument(skip_all, fields(left_rows = left.nrows(), right_rows = right.nrows()))]
pub fn merge<I, N>(
    left: &Table,
    right: &Table,
    keys: I,
    right_suffix: &str,
    left_suffix: &str,
) -> Result<Table, TableError>
where
    I: IntoIterator<Item = N>,
    N: Into<Value>,
{
    let keys: Vec<Value> = keys.into_iter().map(Into::into).collect();
    if keys.is_empty() {
        return Err(TableError::InvalidInputShape(
            "merge requires at least one key column".into(),
        ));
    }
    for (table, side) in [(left, Side::Left), (right, Side::Right)] {
        if let Some(missing) = keys.iter().find(|k| table.position(k).is_none()) {
            return Err(TableError::ColumnNotFound {
                column: missing.to_string(),
                side: Some(side),
            });
        }
    }

    let mut names: Vec<Value> = keys.clone();
    let mut sources: Vec<Source> = (0..keys.len()).map(Source::Key).collect();
    for (i, column) in left.to_columns().iter().enumerate() {
        if keys.contains(&column.name) {
            continue;
        }
        names.push(if right.position(&column.name).is_some() {
            Value::Text(format!("{}{right_suffix}", column.name))
        } else {
            column.name.clone()
        });
        sources.push(Source::Left(i));
    }
    for (i, column) in right.to_columns().iter().enumerate() {
        if keys.contains(&column.name) {
            continue;
        }
        names.push(if left.position(&column.name).is_some() {
            Value::Text(format!("{}{left_suffix}", column.name))
        } else {
            column.name.clone()
        });
        sources.push(Source::Right(i));
    }

    let right_groups: HashMap<Combination, Vec<usize>> = right
        .group_rows(keys.iter().cloned())?
        .into_iter()
        .map(|Group { key, rows }| (key, rows))
        .collect();

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    let mut matched = 0usize;
    for Group { key, rows: left_rows } in left.group_rows(keys.iter().cloned())? {
        let Some(right_rows) = right_groups.get(&key) else {
            continue;
        };
        matched += 1;
        for &l in &left_rows {
            for &r in right_rows {
                for (out, source) in cells.iter_mut().zip(&sources) {
                    out.push(match *source {
                        Source::Key(k) => key.0[k].clone(),
                        Source::Left(c) => left.to_columns()[c].values[l].clone(),
                        Source::Right(c) => right.to_columns()[c].values[r].clone(),
                    });
                }
            }
        }
    }

    let table = Table::from_columns(names.into_iter().zip(cells).collect::<ColumnMap>())?;
    debug!(combinations = matched, rows = table.nrows(), "Merged tables");
    Ok(table)
}

impl Table {
    /// Inner-joins `self` (left) with `other` (right). See [`merge`].
    pub fn merge<I, N>(
        &self,
        other: &Table,
        keys: I,
        right_suffix: &str,
        left_suffix: &str,
    ) -> Result<Table, TableError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Value>,
    {
        merge(self, other, keys, right_suffix, left_suffix)
    }
}
