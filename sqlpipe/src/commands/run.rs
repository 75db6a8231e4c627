// sqlpipe/src/commands/run.rs
//
// USE CASE: Run the pipeline.

use std::path::PathBuf;

use anyhow::Context;
use sqlpipe_core::application::Pipeline;
use sqlpipe_core::infrastructure::config::load_project_config;
use sqlpipe_core::infrastructure::logging::TracingLogger;

pub fn execute(project_dir: PathBuf, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    let mut paths = config.paths(&project_dir);
    if let Some(db_path) = db_path {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            paths.artifacts_dir = parent.to_path_buf();
        }
        paths.db_path = db_path;
    }
    println!("   Database: {}", paths.db_path.display());

    // B. Run the Pipeline (Application Layer)
    // The logger is injected here: the core never installs one itself.
    let logger = TracingLogger;
    let pipeline = Pipeline::new(&config, paths, &logger);

    match pipeline.run() {
        Ok(summary) => {
            let rows: usize = summary.loaded.iter().map(|(_, n)| n).sum();
            println!(
                "\n✨ SUCCESS! {} rows loaded into {} tables, {} queries reported in {:.2?}",
                rows,
                summary.loaded.len(),
                summary.reports.len(),
                start.elapsed()
            );
        }
        Err(e) => {
            // The connection is already closed at this point.
            eprintln!("\n💥 PIPELINE FAILED");
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    }

    Ok(())
}
