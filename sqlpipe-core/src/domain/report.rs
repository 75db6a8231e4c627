// sqlpipe-core/src/domain/report.rs

use serde::Serialize;

/// Materialized result of one query script, values already rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryReport {
    pub fn header(&self) -> String {
        self.columns.join(", ")
    }

    /// Header line followed by one line per row, in fetch order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.header());
        lines.extend(self.rows.iter().map(|row| row.join(", ")));
        lines
    }

    pub fn render(&self) -> String {
        let mut out = self.lines().join("\n");
        out.push('\n');
        out
    }

    /// First cell of the first row, for single-value queries like counts.
    pub fn scalar(&self) -> Option<&str> {
        self.rows.first().and_then(|row| row.first()).map(String::as_str)
    }
}
