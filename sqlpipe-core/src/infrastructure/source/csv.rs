// sqlpipe-core/src/infrastructure/source/csv.rs

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};

use crate::domain::error::DomainError;
use crate::domain::record::{FieldValue, Record, TableSpec};
use crate::error::PipelineError;
use crate::infrastructure::error::InfrastructureError;

/// Lazy, in-order stream of typed records read from a CSV file with a header row.
///
/// Each declared column is looked up by header name, so the CSV column order
/// does not matter and extra CSV columns are ignored. Reading again means
/// opening again.
pub struct RecordSource<'a> {
    path: PathBuf,
    table: &'a TableSpec,
    // header position of each declared column, in declared order
    positions: Vec<usize>,
    records: StringRecordsIntoIter<File>,
    row: usize,
}

impl<'a> RecordSource<'a> {
    pub fn open(path: &Path, table: &'a TableSpec) -> Result<Self, PipelineError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InfrastructureError::ScriptNotFound {
                path: display.clone(),
            },
            _ => InfrastructureError::ScriptRead {
                path: display.clone(),
                source: e,
            },
        })?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|source| InfrastructureError::Csv {
                path: display.clone(),
                source,
            })?
            .clone();

        let positions = table
            .column_names()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| DomainError::MissingField {
                        path: display.clone(),
                        field: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            table,
            positions,
            records: reader.into_records(),
            row: 0,
        })
    }

    /// Drains the source. Fails on the first bad row, so callers never see a partial file.
    pub fn read_all(self) -> Result<Vec<Record>, PipelineError> {
        self.collect()
    }

    fn coerce_row(&self, raw: &csv::StringRecord) -> Result<Record, PipelineError> {
        let mut values: Vec<FieldValue> = Vec::with_capacity(self.positions.len());
        for (column, &pos) in self.table.columns.iter().zip(&self.positions) {
            // The reader rejects ragged rows, so every header position exists
            let field = raw.get(pos).unwrap_or_default();
            let value =
                column
                    .field_type
                    .coerce(field)
                    .map_err(|reason| DomainError::RecordCoercion {
                        path: self.path.display().to_string(),
                        row: self.row,
                        field: column.name.clone(),
                        value: field.to_string(),
                        expected: column.field_type,
                        reason,
                    })?;
            values.push(value);
        }
        Ok(Record::new(values))
    }
}

impl Iterator for RecordSource<'_> {
    type Item = Result<Record, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.records.next()?;
        self.row += 1;
        Some(match raw {
            Ok(raw) => self.coerce_row(&raw),
            Err(source) => Err(InfrastructureError::Csv {
                path: self.path.display().to_string(),
                source,
            }
            .into()),
        })
    }
}
