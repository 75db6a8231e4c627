// sqlpipe-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod source;

pub use logging::{MemoryLogger, TracingLogger};
pub use source::RecordSource;
