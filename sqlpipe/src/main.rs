// sqlpipe/src/main.rs

use clap::Parser;
use std::io::IsTerminal;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing)
    // sqlpipe --log-level debug run ... pour voir les détails
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match cli.command {
        // --- USE CASE: RUN PIPELINE ---
        Commands::Run {
            project_dir,
            db_path,
        } => commands::run::execute(project_dir, db_path),

        // --- USE CASE: AD-HOC QUERY ---
        Commands::Query {
            script,
            project_dir,
            db_path,
            format,
            output,
        } => commands::query::execute(script, project_dir, db_path, format, output),

        // --- USE CASE: CLEAN ---
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
