//! Plain-text grid rendering.

use std::fmt;

use crate::table::Table;

const NULL_CELL: &str = "null";

impl fmt::Display for Table {
    /// Header row, kind row, then one line per row; columns padded to their
    /// widest cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.to_columns();
        if columns.is_empty() {
            return writeln!(f, "(empty table)");
        }

        let rendered: Vec<Vec<String>> = columns
            .iter()
            .map(|c| {
                let mut cells = vec![c.name.to_string(), c.kind.to_string()];
                cells.extend(c.values.iter().map(|v| {
                    if v.is_null() {
                        NULL_CELL.to_string()
                    } else {
                        v.to_string()
                    }
                }));
                cells
            })
            .collect();
        let widths: Vec<usize> = rendered
            .iter()
            .map(|cells| cells.iter().map(|s| s.chars().count()).max().unwrap_or(0))
            .collect();

        for line in 0..self.nrows() + 2 {
            let cells: Vec<String> = rendered
                .iter()
                .zip(&widths)
                .map(|(cells, &w)| format!("{:<w$}", cells[line]))
                .collect();
            writeln!(f, "{}", cells.join(" | ").trim_end())?;
            if line == 1 {
                let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
                writeln!(f, "{}", rule.join("-+-"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_header_kinds_and_cells() {
        let t = Table::from_json(&json!({"name": ["A", "Bob"], "age": [10, null]})).unwrap();
        let out = t.to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name | age");
        assert_eq!(lines[1], "text | integer");
        assert_eq!(lines[2], "-----+--------");
        assert_eq!(lines[3], "A    | 10");
        assert_eq!(lines[4], "Bob  | null");
    }

    #[test]
    fn empty_table() {
        assert_eq!(Table::default().to_string(), "(empty table)\n");
    }
}
