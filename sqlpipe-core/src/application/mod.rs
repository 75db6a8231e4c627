// sqlpipe-core/src/application/mod.rs

pub mod clean;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod script;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use sqlpipe_core::application::{Pipeline, run_query, clean_artifacts};`
// sans avoir à connaître la structure interne des fichiers.

pub use clean::clean_artifacts;
pub use loader::{bulk_load, load_source};
pub use pipeline::{Pipeline, RunSummary};
pub use report::run_query;
pub use script::{apply_session, run_script};
