// sqlpipe/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlpipe")]
#[command(about = "File-driven SQL/CSV ETL pipeline on DuckDB", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log verbosity: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", env = "SQLPIPE_LOG")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline (clean -> bootstrap -> load -> commit -> queries)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Database file, instead of <artifacts-path>/<database>
        #[arg(long)]
        db_path: Option<PathBuf>,
    },

    /// ⚡ Runs one query script against an existing database
    Query {
        /// Query script (resolved against sql-path when not found as given)
        script: PathBuf,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        db_path: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 🧹 Removes the artifacts directory (database included)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Header line + one line per row
    Text,
    /// Boxed table
    Table,
    Json,
}
