//! Column type inference.

use std::collections::BTreeSet;

use crate::error::TableError;
use crate::value::{ScalarKind, Value};

/// Derives the single kind shared by every non-null cell of a column.
///
/// A column with no non-null cells (including an empty column) is
/// [`ScalarKind::Null`]. More than one distinct kind fails with
/// [`TableError::MixedType`].
pub fn infer_kind(column: &Value, cells: &[Value]) -> Result<ScalarKind, TableError> {
    let kinds: BTreeSet<ScalarKind> = cells
        .iter()
        .filter(|v| !v.is_null())
        .map(Value::kind)
        .collect();

    let mut iter = kinds.iter();
    match (iter.next(), iter.next()) {
        (None, _) => Ok(ScalarKind::Null),
        (Some(kind), None) => Ok(*kind),
        _ => Err(TableError::MixedType {
            column: column.to_string(),
            kinds: kinds.into_iter().collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_column() {
        let cells = vec![Value::from(1), Value::Null, Value::from(3)];
        assert_eq!(infer_kind(&"n".into(), &cells).unwrap(), ScalarKind::Integer);
    }

    #[test]
    fn all_null_and_empty_columns() {
        assert_eq!(
            infer_kind(&"n".into(), &[Value::Null, Value::Null]).unwrap(),
            ScalarKind::Null
        );
        assert_eq!(infer_kind(&"n".into(), &[]).unwrap(), ScalarKind::Null);
    }

    #[test]
    fn mixed_column_names_kinds() {
        let cells = vec![Value::from("a"), Value::from(2), Value::from(2.5)];
        match infer_kind(&"mix".into(), &cells).unwrap_err() {
            TableError::MixedType { column, kinds } => {
                assert_eq!(column, "mix");
                assert_eq!(
                    kinds,
                    vec![ScalarKind::Text, ScalarKind::Integer, ScalarKind::Float]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integers_and_floats_do_not_unify() {
        let cells = vec![Value::from(1), Value::from(1.0)];
        assert!(infer_kind(&"n".into(), &cells).is_err());
    }
}
