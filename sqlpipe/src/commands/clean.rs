// sqlpipe/src/commands/clean.rs
//
// USE CASE: Remove pipeline artifacts.

use std::path::PathBuf;

use sqlpipe_core::application::clean_artifacts;
use sqlpipe_core::infrastructure::config::load_project_config;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir)?;
    match clean_artifacts(&project_dir, &config) {
        Ok(true) => println!("✨ Removed {}", config.artifacts_path),
        Ok(false) => println!("Nothing to clean in {}", config.artifacts_path),
        Err(e) => {
            eprintln!("❌ Clean failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
