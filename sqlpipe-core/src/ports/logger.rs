// sqlpipe-core/src/ports/logger.rs

// The pipeline never reaches for a global logger: whoever builds a Pipeline
// hands it a sink, and owns that sink's lifecycle.

use tracing::Level;

pub trait PipelineLogger {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}
