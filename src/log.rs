//! Log levels, entries and the sink the rest of the pipeline writes into.
//!
//! The sink is an explicit, owned, append-only sequence. Producers receive a
//! `&mut dyn LogSink` handle; there is no process-wide log singleton.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// One structured finding: a static check result or a relayed runtime event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: Level,
    /// Subsystem tag: "html", "css", "syntax", "html-inline-js", "iframe".
    pub source: String,
    pub message: String,
    /// Originating path. Empty when the event carries no file association.
    pub filename: String,
    pub lineno: u32,
    pub colno: u32,
    pub stack: String,
    pub timestamp_ms: i64,
}

impl LogEntry {
    pub fn new(level: Level, source: &str, message: impl Into<String>) -> Self {
        LogEntry {
            level,
            source: source.to_string(),
            message: message.into(),
            filename: String::new(),
            lineno: 0,
            colno: 0,
            stack: String::new(),
            timestamp_ms: now_ms(),
        }
    }

    pub fn at(mut self, filename: &str, lineno: u32, colno: u32) -> Self {
        self.filename = filename.to_string();
        self.lineno = lineno;
        self.colno = colno;
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Consumer interface of the terminal pane: drop everything, or take one entry.
/// Entries are rendered in append order.
pub trait LogSink {
    fn clear(&mut self);
    fn append(&mut self, entry: LogEntry);
}

/// The in-memory terminal feed. Owns its entries in append order.
#[derive(Debug, Default)]
pub struct TerminalLog {
    entries: Vec<LogEntry>,
}

impl TerminalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LogSink for TerminalLog {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_preserved() {
        let mut log = TerminalLog::new();
        log.append(LogEntry::new(Level::Info, "html", "first"));
        log.append(LogEntry::new(Level::Error, "css", "second"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "first");
        assert_eq!(log.entries()[1].message, "second");
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut log = TerminalLog::new();
        log.append(LogEntry::new(Level::Warn, "html", "stale"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let entry = LogEntry::new(Level::Error, "syntax", "boom").at("a.js", 3, 7);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["lineno"], 3);
        assert_eq!(value["timestampMs"], entry.timestamp_ms);
    }
}
