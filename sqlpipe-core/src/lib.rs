// sqlpipe-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Définit les contrats (PipelineLogger)
pub mod ports;

// 2. Domain (Cœur du métier)
// Records, coercion schemas, reports, stages, project config.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, CSV, config files, script files, logging sinks.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration (Pipeline, scripts, loads, queries, clean)
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

#[cfg(test)]
mod testing;

// --- RE-EXPORTS (FACADE) ---
// use sqlpipe_core::PipelineError;
pub use error::PipelineError;
