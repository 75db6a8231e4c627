// sqlpipe-core/src/application/loader.rs
//
// USE CASE: bulk-load typed records into one table.

use duckdb::{Connection, params_from_iter};
use std::path::Path;
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::project::LoadConfig;
use crate::domain::record::{Record, TableSpec};
use crate::error::PipelineError;
use crate::infrastructure::adapters::duckdb::quote_ident;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::source::RecordSource;
use crate::ports::logger::PipelineLogger;

/// `INSERT INTO "t" ("a", "b") VALUES (?, ?)` in the table's column order.
pub fn insert_statement(table: &TableSpec) -> String {
    let columns: Vec<String> = table.column_names().map(quote_ident).collect();
    let placeholders = vec!["?"; table.width()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&table.name),
        columns.join(", "),
        placeholders
    )
}

/// Inserts every record, in order, inside whatever transaction is open on
/// `conn`. Never commits. Returns the number of rows inserted.
pub fn bulk_load(
    conn: &Connection,
    table: &TableSpec,
    records: &[Record],
) -> Result<usize, PipelineError> {
    if let Some((index, record)) = records
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != table.width())
    {
        return Err(DomainError::RecordWidth {
            table: table.name.clone(),
            index: index + 1,
            expected: table.width(),
            actual: record.len(),
        }
        .into());
    }

    let mut stmt = conn
        .prepare(&insert_statement(table))
        .map_err(|e| InfrastructureError::execution(format!("insert into {}", table.name), e))?;

    for (index, record) in records.iter().enumerate() {
        stmt.execute(params_from_iter(record.values())).map_err(|e| {
            InfrastructureError::execution(format!("table {} record {}", table.name, index + 1), e)
        })?;
    }

    Ok(records.len())
}

/// Record Source -> Bulk Loader for one configured load.
///
/// The whole file is coerced before the first insert, so a malformed row
/// leaves the table untouched.
#[instrument(skip_all, fields(table = %load.table.name))]
pub fn load_source(
    conn: &Connection,
    load: &LoadConfig,
    data_dir: &Path,
    logger: &dyn PipelineLogger,
) -> Result<usize, PipelineError> {
    let path = data_dir.join(&load.source);
    logger.info(&format!(
        "LOAD CSV -> table {}: {}",
        load.table.name,
        path.display()
    ));

    let records = RecordSource::open(&path, &load.table)?.read_all()?;
    let inserted = bulk_load(conn, &load.table, &records)?;

    logger.info(&format!(
        "DONE loading {} rows: {}",
        load.table.name, inserted
    ));
    Ok(inserted)
}
