//! One function per subcommand. Each reads its inputs, runs a single engine
//! operation and writes the resulting table.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tabula_frame::{read_csv_path, write_csv, CsvOptions, ScalarKind, Table, Value};
use tracing::info;

/// Where a command writes its output table.
#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for Output {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Output::Stdout, Output::File)
    }
}

pub fn load(path: &Path, csv: &CsvOptions) -> Result<Table> {
    read_csv_path(path, csv).with_context(|| format!("failed to read {}", path.display()))
}

pub fn emit(table: &Table, output: &Output, csv: &CsvOptions) -> Result<()> {
    match output {
        Output::Stdout => {
            let stdout = io::stdout();
            write_csv(table, stdout.lock(), csv).context("failed to write to stdout")
        }
        Output::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(table, BufWriter::new(file), csv)
                .with_context(|| format!("failed to write {}", path.display()))
        }
    }
}

/// Maps a column name typed on the command line to the name the reader
/// assigned. Headerless files name their columns by position.
pub fn column_name(name: &str, csv: &CsvOptions) -> Value {
    match name.trim().parse::<i64>() {
        Ok(i) if !csv.has_headers => Value::Integer(i),
        _ => Value::from(name),
    }
}

fn column_names<'a>(names: &'a [String], csv: &'a CsvOptions) -> impl Iterator<Item = Value> + 'a {
    names.iter().map(move |n| column_name(n, csv))
}

/// Prints shape, type map and the grid.
pub fn show<W: Write>(path: &Path, csv: &CsvOptions, mut out: W) -> Result<()> {
    let table = load(path, csv)?;
    let (rows, cols) = table.shape();
    writeln!(out, "shape: ({rows}, {cols})")?;
    write!(out, "{table}")?;
    Ok(())
}

pub fn select(path: &Path, columns: &[String], csv: &CsvOptions) -> Result<Table> {
    let table = load(path, csv)?;
    Ok(table.select_columns(column_names(columns, csv))?)
}

pub fn dedup(path: &Path, csv: &CsvOptions) -> Result<Table> {
    let mut table = load(path, csv)?;
    let before = table.nrows();
    table.drop_duplicates();
    info!(before, after = table.nrows(), "Deduplicated");
    Ok(table)
}

pub fn convert(path: &Path, columns: &[String], to: ScalarKind, csv: &CsvOptions) -> Result<Table> {
    let mut table = load(path, csv)?;
    table.convert(column_names(columns, csv), to)?;
    Ok(table)
}

pub fn merge(
    left: &Path,
    right: &Path,
    on: &[String],
    right_suffix: &str,
    left_suffix: &str,
    csv: &CsvOptions,
) -> Result<Table> {
    let l = load(left, csv)?;
    let r = load(right, csv)?;
    let merged = l
        .merge(&r, column_names(on, csv), right_suffix, left_suffix)
        .with_context(|| format!("failed to merge {} with {}", left.display(), right.display()))?;
    info!(rows = merged.nrows(), "Merged");
    Ok(merged)
}

pub fn concat(paths: &[PathBuf], csv: &CsvOptions) -> Result<Table> {
    let tables = paths
        .iter()
        .map(|p| load(p, csv))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&Table> = tables.iter().collect();
    Ok(tabula_frame::concat(&refs)?)
}

/// Mean and sample standard deviation of one column, after converting it
/// to float (delimited cells arrive as text).
pub fn stats<W: Write>(path: &Path, column: &str, csv: &CsvOptions, mut out: W) -> Result<()> {
    let mut table = load(path, csv)?;
    let name = column_name(column, csv);
    table
        .convert([name.clone()], ScalarKind::Float)
        .with_context(|| format!("column '{column}' is not numeric"))?;
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| x.to_string());
    writeln!(out, "mean: {}", fmt(table.mean(name.clone())?))?;
    writeln!(out, "std_dev: {}", fmt(table.std_dev(name)?))?;
    Ok(())
}
