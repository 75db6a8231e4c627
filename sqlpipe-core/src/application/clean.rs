// sqlpipe-core/src/application/clean.rs

use crate::domain::project::ProjectConfig;
use crate::error::PipelineError;
use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::path::{Component, Path};

/// Removes the artifacts directory (database file included).
/// Returns whether anything was removed.
pub fn clean_artifacts(project_dir: &Path, config: &ProjectConfig) -> Result<bool, PipelineError> {
    tracing::info!("🧹 Removing pipeline artifacts...");

    let target_rel_path = &config.artifacts_path;
    let rel = Path::new(target_rel_path);

    // Zero-Trust Path Traversal Guard
    if rel.is_absolute()
        || rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(PipelineError::UnsafePath(target_rel_path.clone()));
    }

    let full_path = project_dir.join(rel);
    if !full_path.exists() {
        return Ok(false);
    }

    if full_path.is_dir() {
        fs::remove_dir_all(&full_path)
            .map_err(|e| PipelineError::Infrastructure(InfrastructureError::Io(e)))?;
    } else {
        fs::remove_file(&full_path)
            .map_err(|e| PipelineError::Infrastructure(InfrastructureError::Io(e)))?;
    }
    tracing::info!("   🗑️  Artifact removed: {}", target_rel_path);
    Ok(true)
}
