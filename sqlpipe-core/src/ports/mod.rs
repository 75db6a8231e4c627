pub mod logger;

pub use logger::PipelineLogger;
