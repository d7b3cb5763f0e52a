//! Logging capability handed to [`CrudDb`](crate::CrudDb).
//!
//! Failures are reported twice: as a structured [`DbError`](crate::DbError) to the caller and as
//! a log entry carrying the same cause. The logger is injected at construction so tests can
//! capture what was logged instead of reading global state.

use std::error::Error;
use std::sync::Mutex;

/// Sink for the messages emitted by database operations.
pub trait Logger: Send + Sync {
    /// Progress messages (connection established, rows deleted).
    fn info(&self, message: &str);

    /// A failure, with the underlying cause when there is one.
    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>);

    /// Suspicious input that is still executed.
    fn warn(&self, message: &str);

    /// Diagnostic output, such as the SQL text that was executed.
    fn debug(&self, message: &str);
}

/// A `tracing`-based logger.
///
/// Messages are emitted under target `crudsql`; SQL text goes to `crudsql.sql` so it can be
/// filtered separately (e.g. `RUST_LOG=crudsql=info,crudsql.sql=debug`).
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    _private: (),
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "crudsql", "{message}");
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => tracing::error!(target: "crudsql", error = %cause, "{message}"),
            None => tracing::error!(target: "crudsql", "{message}"),
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "crudsql", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "crudsql.sql", "{message}");
    }
}

/// Severity of a recorded [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// A message captured by [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Rendered cause for error entries.
    pub cause: Option<String>,
}

/// Logger that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Messages recorded at `level`, in order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, level: LogLevel, message: &str, cause: Option<String>) {
        self.lock().push(LogEntry {
            level,
            message: message.to_string(),
            cause,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message, None);
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.record(LogLevel::Error, message, cause.map(|c| c.to_string()));
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message, None);
    }

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[test]
    fn memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.info("Connection successful");
        logger.error("Query failed", Some(&DbError::query("relation does not exist")));
        logger.debug("SELECT 1");

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(
            entries[1].cause.as_deref(),
            Some("Query error: relation does not exist")
        );
        assert_eq!(logger.messages(LogLevel::Debug), ["SELECT 1"]);

        logger.clear();
        assert!(logger.entries().is_empty());
    }
}
