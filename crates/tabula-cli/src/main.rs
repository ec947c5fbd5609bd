//! `tabula` — run one table operation over delimited files.
//!
//! ```bash
//! tabula show people.csv
//! tabula merge people.csv scores.csv --on id -o joined.csv
//! TABULA_DELIMITER=';' tabula dedup export.csv
//! TABULA_LOG_LEVEL=tabula_frame=debug tabula concat a.csv b.csv c.csv
//! ```

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabula_frame::{ScalarKind, DEFAULT_LEFT_SUFFIX, DEFAULT_RIGHT_SUFFIX};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::Output;
use config::Config;

#[derive(Parser)]
#[command(name = "tabula", version)]
#[command(about = "Select, convert, merge, concatenate and deduplicate delimited files")]
struct Cli {
    /// Field delimiter (overrides TABULA_DELIMITER)
    #[arg(long, short = 'd', global = true)]
    delimiter: Option<char>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print shape, column kinds and rows
    Show { file: PathBuf },

    /// Keep only the named columns, in the given order
    Select {
        file: PathBuf,
        #[arg(long, short = 'c', value_delimiter = ',', required = true)]
        columns: Vec<String>,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Drop repeated rows, keeping first occurrences
    Dedup {
        file: PathBuf,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Convert columns to another kind (text, integer, float, date, datetime, null)
    Convert {
        file: PathBuf,
        #[arg(long, short = 'c', value_delimiter = ',', required = true)]
        columns: Vec<String>,
        #[arg(long)]
        to: ScalarKind,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Inner-join two files on key columns
    Merge {
        left: PathBuf,
        right: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        on: Vec<String>,
        /// Appended to left columns whose name also appears on the right
        #[arg(long, default_value = DEFAULT_RIGHT_SUFFIX)]
        right_suffix: String,
        /// Appended to right columns whose name also appears on the left
        #[arg(long, default_value = DEFAULT_LEFT_SUFFIX)]
        left_suffix: String,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Stack the rows of two or more files with identical column kinds
    Concat {
        #[arg(num_args = 2.., required = true)]
        files: Vec<PathBuf>,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Mean and standard deviation of a numeric column
    Stats {
        file: PathBuf,
        #[arg(long, short = 'c')]
        column: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().with_delimiter(cli.delimiter);

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .compact()
        .init();

    debug!(?config, "tabula starting");

    let csv = &config.csv;
    let (table, output) = match cli.command {
        Command::Show { file } => return commands::show(&file, csv, io::stdout().lock()),
        Command::Stats { file, column } => {
            return commands::stats(&file, &column, csv, io::stdout().lock())
        }
        Command::Select { file, columns, output } => (commands::select(&file, &columns, csv)?, output),
        Command::Dedup { file, output } => (commands::dedup(&file, csv)?, output),
        Command::Convert { file, columns, to, output } => {
            (commands::convert(&file, &columns, to, csv)?, output)
        }
        Command::Merge { left, right, on, right_suffix, left_suffix, output } => (
            commands::merge(&left, &right, &on, &right_suffix, &left_suffix, csv)?,
            output,
        ),
        Command::Concat { files, output } => (commands::concat(&files, csv)?, output),
    };

    commands::emit(&table, &Output::from(output), csv)
}
