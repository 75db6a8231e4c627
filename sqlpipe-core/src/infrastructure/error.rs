// sqlpipe-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- SCRIPTS & SOURCE FILES ---
    #[error("File not found: {path}")]
    #[diagnostic(
        code(sqlpipe::infra::not_found),
        help("Check the project layout (sql-path / data-path) and the script names.")
    )]
    ScriptNotFound { path: String },

    #[error("Cannot read {path}: {source}")]
    #[diagnostic(
        code(sqlpipe::infra::io),
        help("Check file permissions and that the file is UTF-8 text.")
    )]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    #[diagnostic(code(sqlpipe::infra::csv))]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    // --- DATABASE ---
    #[error("DuckDB rejected {script}: {source}")]
    #[diagnostic(
        code(sqlpipe::infra::database::execution),
        help("An error occurred inside the SQL engine (syntax or constraint violation).")
    )]
    ScriptExecution {
        script: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Could not classify script {script}: {source}")]
    #[diagnostic(code(sqlpipe::infra::database::classify))]
    ScriptClassify {
        script: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transaction {action} failed: {source}")]
    #[diagnostic(code(sqlpipe::infra::database::transaction))]
    Transaction {
        action: &'static str,
        #[source]
        source: duckdb::Error,
    },

    // --- RESOURCES ---
    #[error("Cannot create output directory {path}: {source}")]
    #[diagnostic(
        code(sqlpipe::infra::output_dir),
        help("Check permissions on the artifacts path.")
    )]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open database {path}: {source}")]
    #[diagnostic(
        code(sqlpipe::infra::database::open),
        help("Is another process holding the database file?")
    )]
    DatabaseOpen {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Cannot close database {path}: {source}")]
    #[diagnostic(code(sqlpipe::infra::database::close))]
    DatabaseClose {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("File System Error: {0}")]
    #[diagnostic(
        code(sqlpipe::infra::fs),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error in {path}: {source}")]
    #[diagnostic(
        code(sqlpipe::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid project configuration: {0}")]
    #[diagnostic(code(sqlpipe::infra::config_invalid))]
    ConfigInvalid(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(sqlpipe::infra::config_missing))]
    ConfigNotFound(String),
}

impl InfrastructureError {
    pub fn execution(script: impl Into<String>, source: duckdb::Error) -> Self {
        InfrastructureError::ScriptExecution {
            script: script.into(),
            source,
        }
    }
}

impl From<validator::ValidationErrors> for InfrastructureError {
    fn from(err: validator::ValidationErrors) -> Self {
        InfrastructureError::ConfigInvalid(err.to_string())
    }
}
