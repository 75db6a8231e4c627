// sqlpipe-core/src/infrastructure/adapters/duckdb.rs

use chrono::{DateTime, NaiveTime};
use duckdb::types::{ToSql, ToSqlOutput, Value};
use duckdb::{AccessMode, Config, Connection};
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::path::Path;

use crate::domain::record::FieldValue;
use crate::infrastructure::error::InfrastructureError;

const SECONDS_PER_DAY: i64 = 86_400;
const MICROS_PER_SECOND: i64 = 1_000_000;

/// Opens (or creates) the database file. `:memory:` gives a throwaway database.
pub fn open_database(db_path: &Path) -> Result<Connection, InfrastructureError> {
    let config = Config::default();
    let opened = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory_with_flags(config)
    } else {
        Connection::open_with_flags(db_path, config)
    };
    opened.map_err(|source| InfrastructureError::DatabaseOpen {
        path: db_path.display().to_string(),
        source,
    })
}

/// Opens an existing database file without write access (ad-hoc queries).
pub fn open_database_read_only(db_path: &Path) -> Result<Connection, InfrastructureError> {
    let open_error = |source| InfrastructureError::DatabaseOpen {
        path: db_path.display().to_string(),
        source,
    };
    let config = Config::default()
        .access_mode(AccessMode::ReadOnly)
        .map_err(open_error)?;
    Connection::open_with_flags(db_path, config).map_err(open_error)
}

/// Closes the handle. Consumes it, so a connection cannot be closed twice.
pub fn close_database(conn: Connection, db_path: &Path) -> Result<(), InfrastructureError> {
    conn.close()
        .map_err(|(_conn, source)| InfrastructureError::DatabaseClose {
            path: db_path.display().to_string(),
            source,
        })
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            FieldValue::Text(s) => Value::Text(s.clone()),
            FieldValue::Integer(i) => Value::BigInt(*i),
            FieldValue::Float(f) => Value::Double(*f),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Text form of one result cell, as it appears in query reports.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::TinyInt(i) => i.to_string(),
        Value::SmallInt(i) => i.to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::HugeInt(i) => i.to_string(),
        Value::UTinyInt(i) => i.to_string(),
        Value::USmallInt(i) => i.to_string(),
        Value::UInt(i) => i.to_string(),
        Value::UBigInt(i) => i.to_string(),
        Value::Float(f) => render_float(f.to_string()),
        Value::Double(f) => render_float(f.to_string()),
        Value::Decimal(d) => d.to_string(),
        Value::Text(s) | Value::Enum(s) => s.clone(),
        Value::Blob(bytes) => render_blob(bytes),
        Value::Date32(days) => render_date(*days),
        Value::Time64(unit, v) => render_time(unit.to_micros(*v)),
        Value::Timestamp(unit, v) => render_timestamp(unit.to_micros(*v)),
        Value::Interval {
            months,
            days,
            nanos,
        } => render_interval(*months, *days, *nanos),
        Value::List(items) | Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Struct(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, v)| format!("'{}': {}", name, render_value(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}={}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Union(inner) => render_value(inner),
    }
}

// 80 -> 80.0 ; 349.49, inf, NaN inchangés
fn render_float(text: String) -> String {
    if text.contains(['.', 'e', 'i', 'N']) {
        text
    } else {
        text + ".0"
    }
}

fn render_date(days: i32) -> String {
    DateTime::from_timestamp(i64::from(days) * SECONDS_PER_DAY, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| days.to_string())
}

fn render_timestamp(micros: i64) -> String {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc().to_string())
        .unwrap_or_else(|| micros.to_string())
}

fn render_time(micros: i64) -> String {
    let secs = micros.div_euclid(MICROS_PER_SECOND);
    let nanos = micros.rem_euclid(MICROS_PER_SECOND) * 1_000;
    u32::try_from(secs)
        .ok()
        .zip(u32::try_from(nanos).ok())
        .and_then(|(secs, nanos)| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos))
        .map(|t| t.to_string())
        .unwrap_or_else(|| micros.to_string())
}

/// `1 year 2 months 3 days 04:05:06`, zero parts omitted, time always present.
fn render_interval(months: i32, days: i32, nanos: i64) -> String {
    fn unit(n: i32, name: &str) -> Option<String> {
        match n {
            0 => None,
            1 | -1 => Some(format!("{} {}", n, name)),
            _ => Some(format!("{} {}s", n, name)),
        }
    }

    let mut parts: Vec<String> = [
        unit(months / 12, "year"),
        unit(months % 12, "month"),
        unit(days, "day"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let micros = nanos / 1_000;
    let sign = if micros < 0 { "-" } else { "" };
    let micros = micros.unsigned_abs();
    let secs = micros / 1_000_000;
    let mut clock = format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    );
    if micros % 1_000_000 != 0 {
        clock.push_str(&format!(".{:06}", micros % 1_000_000));
    }
    parts.push(clock);
    parts.join(" ")
}

// Printable ASCII as-is, every other byte as \xNN
fn render_blob(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            b'\\' => "\\\\".to_string(),
            0x20..=0x7e => char::from(b).to_string(),
            _ => format!("\\x{:02X}", b),
        })
        .collect()
}

/// How DuckDB's parser reads a script, before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptShape {
    /// Exactly one statement, and it returns rows (SELECT, WITH, VALUES, FROM ...).
    Query,
    /// Blank or comments only.
    Empty,
    /// Several statements, all of them queries.
    Multiple(usize),
    /// At least one statement that does not return rows (DML, DDL, PRAGMA ...).
    NotAQuery,
    /// The parser rejected the text; running it reports the engine's error.
    Unparsed,
}

#[derive(Deserialize)]
struct SerializedSql {
    error: bool,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    statements: Vec<IgnoredAny>,
}

/// Classifies `sql` with `json_serialize_sql`, which parses without binding or
/// executing and only accepts SELECT statements.
pub fn classify_script(
    conn: &Connection,
    script: &str,
    sql: &str,
) -> Result<ScriptShape, InfrastructureError> {
    let serialized: String = conn
        .query_row("SELECT json_serialize_sql(?::VARCHAR)", [sql], |row| {
            row.get(0)
        })
        .map_err(|e| InfrastructureError::execution(script, e))?;

    let parsed: SerializedSql =
        serde_json::from_str(&serialized).map_err(|source| {
            InfrastructureError::ScriptClassify {
                script: script.to_string(),
                source,
            }
        })?;

    let shape = match (parsed.error, parsed.error_type.as_deref()) {
        (true, Some("not implemented")) => ScriptShape::NotAQuery,
        (true, _) => ScriptShape::Unparsed,
        (false, _) => match parsed.statements.len() {
            0 => ScriptShape::Empty,
            1 => ScriptShape::Query,
            n => ScriptShape::Multiple(n),
        },
    };
    Ok(shape)
}

/// Quotes an identifier for generated SQL (`"name"`, inner quotes doubled).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
