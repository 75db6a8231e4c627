// sqlpipe/src/commands/mod.rs

pub mod clean;
pub mod query;
pub mod run;
