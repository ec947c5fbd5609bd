//! Row-union of tables sharing one type map.

use tracing::{debug, instrument};

use crate::error::TableError;
use crate::table::Table;

/// Stacks the rows of every table onto the first, in argument order.
///
/// Needs at least two tables, and every table must have the same type map as
/// the first. The result is a fresh, revalidated table; the inputs are not
/// modified.
#[instrument(skip_all, fields(tables = tables.len()))]
pub fn concat(tables: &[&Table]) -> Result<Table, TableError> {
    let [first, rest @ ..] = tables else {
        return Err(TableError::InsufficientInputs(0));
    };
    if rest.is_empty() {
        return Err(TableError::InsufficientInputs(1));
    }
    let mut out = Table::clone(first);
    for table in rest {
        out = out.appended(table)?;
    }
    debug!(rows = out.nrows(), cols = out.ncols(), "Concatenated tables");
    Ok(out)
}
