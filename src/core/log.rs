//! Operator-facing log channel
//!
//! Producers on any thread post timestamped messages; the control panel is
//! the single consumer and drains the queue on its repaint cadence.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// An immutable timestamped log message.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// Render as a panel line, e.g. `[14:03:22] Alarm started!`
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Thread-safe, unbounded, ordered queue of log entries.
#[derive(Default)]
pub struct LogChannel {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timestamped entry. Never blocks the producer.
    pub fn post(&self, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        };
        self.entries.lock().push_back(entry);
    }

    /// Atomically remove and return every queued entry in insertion order.
    pub fn drain_all(&self) -> Vec<LogEntry> {
        let mut entries = self.entries.lock();
        entries.drain(..).collect()
    }

    /// Number of entries currently waiting to be drained.
    pub fn pending(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_drain_preserves_insertion_order() {
        let log = LogChannel::new();
        log.post("first");
        log.post("second");
        log.post("third");

        let drained = log.drain_all();
        let messages: Vec<_> = drained.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_entries_delivered_exactly_once() {
        let log = LogChannel::new();
        log.post("only");
        assert_eq!(log.drain_all().len(), 1);
        assert!(log.drain_all().is_empty());
        assert_eq!(log.pending(), 0);
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let log = Arc::new(LogChannel::new());
        let mut handles = Vec::new();
        for producer in 0..4 {
            let log = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    log.post(format!("p{producer}-{i}"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let drained = log.drain_all();
        assert_eq!(drained.len(), 400);

        // FIFO holds per producer even when producers interleave
        let p0: Vec<_> = drained
            .iter()
            .filter(|e| e.message.starts_with("p0-"))
            .map(|e| e.message.clone())
            .collect();
        let expected: Vec<_> = (0..100).map(|i| format!("p0-{i}")).collect();
        assert_eq!(p0, expected);
    }

    #[test]
    fn test_display_line_format() {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: "hello".to_string(),
        };
        let line = entry.display_line();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello"));
    }
}
