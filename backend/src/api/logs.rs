//! Pipeline diagnostics and real-time log streaming via Server-Sent Events (SSE).
//!
//! The transform never logs through a global directly: it receives a
//! [`LogSink`]. In the server that sink is [`LOG_BROADCASTER`], which prints
//! to stdout and fans entries out to SSE clients. The CLI uses
//! [`ConsoleSink`] so stdout stays clean for the report. Tests pass a
//! [`MemorySink`] and assert on what was recorded.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Console form: indentation, level marker, message.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Debug => "   ·",
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Receiver of pipeline diagnostics.
pub trait LogSink: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn debug(&self, msg: &str) {
        self.log(LogEntry::debug(msg));
    }

    fn info(&self, msg: &str) {
        self.log(LogEntry::info(msg));
    }

    fn success(&self, msg: &str) {
        self.log(LogEntry::success(msg));
    }

    fn warning(&self, msg: &str) {
        self.log(LogEntry::warning(msg));
    }

    fn error(&self, msg: &str) {
        self.log(LogEntry::error(msg));
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl LogSink for LogBroadcaster {
    /// Print the entry and send it to all subscribers
    fn log(&self, entry: LogEntry) {
        println!("{}", entry.render());

        // Ignore if no receivers
        let _ = self.sender.send(entry);
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that prints to stderr, for CLI commands whose stdout is the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    /// Also print debug entries
    pub verbose: bool,
}

impl LogSink for ConsoleSink {
    fn log(&self, entry: LogEntry) {
        if entry.level != LogLevel::Debug || self.verbose {
            eprintln!("{}", entry.render());
        }
    }
}

/// Sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entries at `level` whose message contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.entries().iter().filter(|e| e.level == level).count()
    }
}

impl LogSink for MemorySink {
    fn log(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_levels() {
        let sink = MemorySink::new();
        sink.warning("'Group' column not found");
        sink.error("Column 'Surch' not found");
        sink.info("done");

        assert_eq!(sink.entries().len(), 3);
        assert!(sink.contains(LogLevel::Warning, "Group"));
        assert!(!sink.contains(LogLevel::Info, "Group"));
        assert_eq!(sink.count(LogLevel::Error), 1);
    }

    #[test]
    fn test_broadcaster_fans_out() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.log(LogEntry::success("Loaded").with_indent(1));

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Success);
        assert_eq!(entry.indent, 1);
    }

    #[test]
    fn test_render_indent_and_marker() {
        let line = LogEntry::warning("Formatting file not found").with_indent(1).render();
        assert_eq!(line, "      ⚠️ Formatting file not found");
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_value(LogEntry::warning("x")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 0);
    }
}
