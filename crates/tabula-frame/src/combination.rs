//! Key combinations and row grouping.

use std::collections::HashMap;

use crate::error::TableError;
use crate::table::Table;
use crate::value::Value;

/// The values of a row restricted to a set of key columns, in key order.
///
/// Two combinations are equal iff every component is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination(pub Vec<Value>);

impl Combination {
    /// A combination with a null or empty-text component never matches.
    pub fn is_complete(&self) -> bool {
        !self.0.iter().any(Value::is_blank)
    }
}

/// A distinct key combination and the rows that carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Combination,
    /// Ascending row indices.
    pub rows: Vec<usize>,
}

impl Table {
    fn key_positions(&self, keys: &[Value]) -> Result<Vec<usize>, TableError> {
        keys.iter().map(|k| self.require(k)).collect()
    }

    fn combination_at(&self, positions: &[usize], row: usize) -> Combination {
        Combination(
            positions
                .iter()
                .map(|&p| self.to_columns()[p].values[row].clone())
                .collect(),
        )
    }

    /// Groups rows by their complete key combination, in first-seen order.
    ///
    /// Rows whose combination has a null or empty-text component are left
    /// out.
    pub fn group_rows<I, N>(&self, keys: I) -> Result<Vec<Group>, TableError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Value>,
    {
        let keys: Vec<Value> = keys.into_iter().map(Into::into).collect();
        let positions = self.key_positions(&keys)?;
        let mut index: HashMap<Combination, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        for row in 0..self.nrows() {
            let key = self.combination_at(&positions, row);
            if !key.is_complete() {
                continue;
            }
            match index.get(&key) {
                Some(&g) => groups[g].rows.push(row),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        rows: vec![row],
                    });
                }
            }
        }
        Ok(groups)
    }

    /// Distinct complete key combinations, in first-seen order.
    pub fn distinct_combinations<I, N>(&self, keys: I) -> Result<Vec<Combination>, TableError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Value>,
    {
        Ok(self.group_rows(keys)?.into_iter().map(|g| g.key).collect())
    }
}
