//! Diagnostic aggregator: a bounded FIFO ring of sandbox log entries with
//! counts and the hand-off payload for the external fix collaborator.

use crate::protocol::LogKind;
use chrono::{DateTime, Utc};
use glimpse_compose::FileMap;
use serde::Serialize;
use std::collections::VecDeque;

/// Ring capacity: oldest entries are evicted past this.
pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn now(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounts {
    pub errors: usize,
    pub warnings: usize,
}

/// Ordered error messages plus the FileMap they came from, handed to the
/// external fix-request collaborator. Producing this payload is the end of
/// this core's responsibility — the fix itself happens elsewhere.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRequest {
    pub error_messages: Vec<String>,
    pub files: FileMap,
}

/// Single-writer log ring. Length never exceeds the capacity.
#[derive(Debug)]
pub struct DiagnosticBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    has_errors: bool,
}

impl Default for DiagnosticBuffer {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl DiagnosticBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            has_errors: false,
        }
    }

    /// Appends an entry, evicting the oldest when full.
    pub fn append(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        if entry.kind == LogKind::Error {
            self.has_errors = true;
        }
        self.entries.push_back(entry);
    }

    /// Empties the buffer and resets the error flag.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.has_errors = false;
    }

    pub fn counts(&self) -> DiagnosticCounts {
        let mut counts = DiagnosticCounts {
            errors: 0,
            warnings: 0,
        };
        for entry in &self.entries {
            match entry.kind {
                LogKind::Error => counts.errors += 1,
                LogKind::Warn => counts.warnings += 1,
                _ => {}
            }
        }
        counts
    }

    /// True once any error entry has arrived since the last clear, even if
    /// the entry itself was evicted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Builds the fix hand-off payload: error messages in arrival order
    /// plus the current files. `None` when there is nothing to fix.
    pub fn handoff(&self, files: &FileMap) -> Option<FixRequest> {
        let error_messages: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.kind == LogKind::Error)
            .map(|e| e.message.clone())
            .collect();
        if error_messages.is_empty() {
            return None;
        }
        Some(FixRequest {
            error_messages,
            files: files.clone(),
        })
    }
}
