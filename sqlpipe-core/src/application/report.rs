// sqlpipe-core/src/application/report.rs
//
// USE CASE: run a single-query script and materialize its result.

use duckdb::Connection;
use duckdb::types::Value;
use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::report::QueryReport;
use crate::error::PipelineError;
use crate::infrastructure::adapters::duckdb::{ScriptShape, classify_script, render_value};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_script;

/// Runs a single-query script and fetches every row in memory.
///
/// Anything but exactly one row-returning statement is rejected before it
/// runs, and the fetch itself happens in a transaction that is always rolled
/// back, so a query stage never changes the database.
pub fn run_query(conn: &Connection, script: &Path) -> Result<QueryReport, PipelineError> {
    let script_name = script.display().to_string();
    let sql = read_script(script)?;

    let missing = |reason: String| -> PipelineError {
        DomainError::ResultSetMissing {
            script: script_name.clone(),
            reason,
        }
        .into()
    };
    match classify_script(conn, &script_name, &sql)? {
        ScriptShape::Query | ScriptShape::Unparsed => {}
        ScriptShape::Empty => return Err(missing("script is blank".to_string())),
        ScriptShape::Multiple(n) => {
            return Err(missing(format!("script holds {} statements, expected one", n)));
        }
        ScriptShape::NotAQuery => {
            return Err(missing("statement does not return rows".to_string()));
        }
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|source| InfrastructureError::Transaction {
            action: "begin",
            source,
        })?;
    let fetched = fetch_rows(&tx, &script_name, &sql);
    let rolled_back = tx
        .rollback()
        .map_err(|source| InfrastructureError::Transaction {
            action: "rollback",
            source,
        });
    let (columns, rows) = fetched?;
    rolled_back?;

    if columns.is_empty() {
        return Err(missing("no columns".to_string()));
    }

    let name = script
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| script_name.clone());

    Ok(QueryReport {
        name,
        columns,
        rows,
    })
}

type Fetched = (Vec<String>, Vec<Vec<String>>);

fn fetch_rows(conn: &Connection, script_name: &str, sql: &str) -> Result<Fetched, PipelineError> {
    let db_err = |e: duckdb::Error| InfrastructureError::execution(script_name, e);

    let mut stmt = conn.prepare(sql).map_err(db_err)?;
    let mut rows = stmt.query([]).map_err(db_err)?;

    let columns = rows
        .as_ref()
        .map(|stmt| stmt.column_names())
        .unwrap_or_default();

    let mut rendered = Vec::new();
    while let Some(row) = rows.next().map_err(db_err)? {
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            let value = Value::from(row.get_ref(i).map_err(db_err)?);
            cells.push(render_value(&value));
        }
        rendered.push(cells);
    }
    Ok((columns, rendered))
}
