// sqlpipe-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::record::FieldType;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error(
        "Cannot coerce field '{field}' to {expected} at row {row} of {path}: {value:?} ({reason})"
    )]
    #[diagnostic(
        code(sqlpipe::domain::coercion),
        help("Fix the offending value in the source file. Nothing from this file was inserted.")
    )]
    RecordCoercion {
        path: String,
        row: usize,
        field: String,
        value: String,
        expected: FieldType,
        reason: String,
    },

    #[error("Source file {path} has no column '{field}'")]
    #[diagnostic(
        code(sqlpipe::domain::missing_field),
        help("The CSV header must name every column declared for the table.")
    )]
    MissingField { path: String, field: String },

    #[error("Record {index} for table '{table}' has {actual} values, expected {expected}")]
    #[diagnostic(code(sqlpipe::domain::record_width))]
    RecordWidth {
        table: String,
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Query script {script} produced no result set: {reason}")]
    #[diagnostic(
        code(sqlpipe::domain::no_result_set),
        help("A query script must contain exactly one statement that returns rows (SELECT ...).")
    )]
    ResultSetMissing { script: String, reason: String },
}
