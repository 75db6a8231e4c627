// sqlpipe/src/commands/query.rs
//
// USE CASE: Run one query script against an existing database (ad-hoc).

use std::path::PathBuf;

use comfy_table::Table;
use sqlpipe_core::application::run_query;
use sqlpipe_core::domain::QueryReport;
use sqlpipe_core::infrastructure::adapters::duckdb::{close_database, open_database_read_only};
use sqlpipe_core::infrastructure::config::load_project_config;
use sqlpipe_core::infrastructure::fs::atomic_write;

use crate::cli::OutputFormat;

pub fn execute(
    script: PathBuf,
    project_dir: PathBuf,
    db_path: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir)?;
    let paths = config.paths(&project_dir);

    let db_path = db_path.unwrap_or(paths.db_path);
    if !db_path.exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'sqlpipe run'?",
            db_path.display()
        );
    }

    let script = if script.exists() {
        script
    } else {
        paths.sql_dir.join(&script)
    };

    let conn = open_database_read_only(&db_path)?;
    let result = run_query(&conn, &script);
    close_database(conn, &db_path)?;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };

    let rendered = match format {
        OutputFormat::Text => report.render(),
        OutputFormat::Table => render_table(&report),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&report)?),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            atomic_write(&path, &rendered)?;
            println!("✨ Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render_table(report: &QueryReport) -> String {
    let mut table = Table::new();
    table.set_header(report.columns.clone());
    for row in &report.rows {
        table.add_row(row.clone());
    }
    format!("{}\n", table)
}
