// sqlpipe-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CANDIDATES: [&str; 2] = ["sqlpipe.yaml", "sqlpipe.yml"];

// --- LOADER ---

/// Loads `sqlpipe.yaml` from the project directory, or the built-in retail
/// layout when the project has no config file. Env overrides apply either way.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => load_config_file(&config_path)?,
        None => {
            info!(dir = ?project_dir, "No sqlpipe.yaml found, using retail defaults");
            ProjectConfig::default()
        }
    };

    // Permet de faire: SQLPIPE_DATABASE=scratch.duckdb sqlpipe run
    apply_env_overrides(&mut config);

    validate_config(&config)?;
    Ok(config)
}

/// Loads one explicit config file; unlike the directory lookup, a missing file is an error.
pub fn load_config_file(config_path: &Path) -> Result<ProjectConfig, InfrastructureError> {
    info!(path = ?config_path, "Loading project config");
    if !config_path.exists() {
        return Err(InfrastructureError::ConfigNotFound(
            config_path.display().to_string(),
        ));
    }

    let content = fs::read_to_string(config_path)?;
    let config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
            path: config_path.display().to_string(),
            source,
        })?;

    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &ProjectConfig) -> Result<(), InfrastructureError> {
    config.validate()?;
    if config.loads.is_empty() {
        return Err(InfrastructureError::ConfigInvalid(
            "at least one load is required".to_string(),
        ));
    }
    Ok(())
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|filename| root.join(filename))
        .find(|p| p.exists())
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Ok(val) = std::env::var("SQLPIPE_ARTIFACTS_PATH") {
        info!(old = ?config.artifacts_path, new = ?val, "Overriding artifacts path via ENV");
        config.artifacts_path = val;
    }
    if let Ok(val) = std::env::var("SQLPIPE_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
}
