// sqlpipe-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PipelineError {
    // --- ERREURS DU DOMAINE (Coercion, Result sets) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, DuckDB, Config) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unsafe path traversal detected: {0}")]
    #[diagnostic(code(sqlpipe::unsafe_path))]
    UnsafePath(String),
}

// Shortcut so `?` works on raw IO calls
impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Infrastructure(InfrastructureError::Io(err))
    }
}
