//! On-page diagnostic log.
//!
//! A bounded, newest-first list of timestamped messages. It is a side channel
//! only: recording never affects control flow, and views may choose to render
//! it or not.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded message.
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl DiagnosticEntry {
    /// `[HH:MM:SS] message`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Shared handle to the diagnostic log. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<VecDeque<DiagnosticEntry>>>,
    capacity: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(200)
    }
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        }
    }

    /// Prepends a message, evicting the oldest entry when full.
    pub fn record(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("diagnostic: {}", message);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(DiagnosticEntry {
            at: Local::now(),
            message,
        });
        entries.truncate(self.capacity);
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
