// sqlpipe-core/src/infrastructure/logging.rs

use std::sync::Mutex;
use tracing::Level;

use crate::ports::logger::PipelineLogger;

/// Forwards pipeline messages to `tracing`. The subscriber is the caller's business.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PipelineLogger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "sqlpipe::pipeline", "{}", message),
            Level::WARN => tracing::warn!(target: "sqlpipe::pipeline", "{}", message),
            Level::INFO => tracing::info!(target: "sqlpipe::pipeline", "{}", message),
            Level::DEBUG => tracing::debug!(target: "sqlpipe::pipeline", "{}", message),
            _ => tracing::trace!(target: "sqlpipe::pipeline", "{}", message),
        }
    }
}

/// Keeps every message in memory (tests, embedding).
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, msg)| msg).collect()
    }

    /// Index of the first message containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.messages().iter().position(|m| m.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

impl PipelineLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push((level, message.to_string()));
    }
}
