pub mod error;
pub mod project;
pub mod record;
pub mod report;
pub mod stage;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use record::{ColumnSpec, FieldType, FieldValue, Record, TableSpec};
pub use report::QueryReport;
pub use stage::Stage;
