// sqlpipe-core/src/application/script.rs
//
// USE CASE: run an action script (DDL, cleanup). No result set, no commit.

use duckdb::Connection;
use std::path::Path;

use crate::error::PipelineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_script;
use crate::ports::logger::PipelineLogger;

/// Executes every statement of the script in file order. The first rejected
/// statement aborts the batch and its error is returned as-is.
pub fn run_script(
    conn: &Connection,
    script: &Path,
    logger: &dyn PipelineLogger,
) -> Result<(), PipelineError> {
    logger.info(&format!("RUN SQL script: {}", script.display()));
    let sql = read_script(script)?;

    conn.execute_batch(&sql)
        .map_err(|e| InfrastructureError::execution(script.display().to_string(), e))?;

    logger.info(&format!("DONE SQL script: {}", script.display()));
    Ok(())
}

/// Applies per-connection settings, one statement at a time.
pub fn apply_session(
    conn: &Connection,
    statements: &[String],
    logger: &dyn PipelineLogger,
) -> Result<(), PipelineError> {
    for statement in statements {
        logger.debug(&format!("SESSION: {}", statement));
        conn.execute_batch(statement)
            .map_err(|e| InfrastructureError::execution(format!("session setting '{}'", statement), e))?;
    }
    Ok(())
}
