//! In-memory log sink with callbacks and filtering
//!
//! This module provides thread-safe entry storage with support for callbacks,
//! filtering by invocation, event type, time range, and custom predicates.

use super::log_entry::{EntryFilterFn, EventType, LogEntry};
use super::sink::LogSink;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, MutexGuard};

/// Type alias for entry callback functions
pub type EntryCallback = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// Store for capturing and querying log entries
///
/// EventStore keeps every appended entry in memory, in append order. It supports:
/// - Callbacks triggered on each stored entry
/// - Filtering by invocation id and event type
/// - Filtering by time range
/// - Custom filter predicates
/// - Query for last N entries
pub struct EventStore {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    on_store_callback: Option<EntryCallback>,
}

impl EventStore {
    /// Create a new event store
    ///
    /// # Arguments
    ///
    /// * `on_store_callback` - Optional callback function called whenever an entry is stored
    pub fn new(on_store_callback: Option<EntryCallback>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            on_store_callback,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store an entry
    ///
    /// If a callback is configured, it will be called with the stored entry.
    pub fn store(&self, entry: LogEntry) {
        if let Some(callback) = &self.on_store_callback {
            callback(&entry);
        }

        self.lock().push(entry);
    }

    /// Snapshot of all entries in append order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Entries belonging to one invocation, in append order
    pub fn entries_for_invocation(&self, invocation_id: &str) -> Vec<LogEntry> {
        self.lock().iter().filter(|e| e.invocation_id == invocation_id).cloned().collect()
    }

    /// Sequence of event types recorded for one invocation
    pub fn event_types_for(&self, invocation_id: &str) -> Vec<EventType> {
        self.lock()
            .iter()
            .filter(|e| e.invocation_id == invocation_id)
            .map(|e| e.event_type)
            .collect()
    }

    /// Count entries matching filters
    ///
    /// # Arguments
    ///
    /// * `start_time` - Include entries with timestamp >= start_time
    /// * `end_time` - Include entries with timestamp <= end_time
    /// * `filter_func` - Custom filter function to apply to entries
    pub fn count_events(
        &self,
        start_time: Option<DateTime<Local>>,
        end_time: Option<DateTime<Local>>,
        filter_func: Option<&dyn EntryFilterFn>,
    ) -> usize {
        self.lock()
            .iter()
            .filter(|e| Self::passes(e, start_time, end_time, filter_func))
            .count()
    }

    /// Get summaries of entries matching filters
    ///
    /// Returns printable summaries instead of cloning entries
    pub fn get_event_summaries(
        &self,
        start_time: Option<DateTime<Local>>,
        end_time: Option<DateTime<Local>>,
        filter_func: Option<&dyn EntryFilterFn>,
    ) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| Self::passes(e, start_time, end_time, filter_func))
            .map(LogEntry::printable_summary)
            .collect()
    }

    /// Get the last N entries, optionally filtered
    pub fn get_last_n(&self, n: usize, filter_func: Option<&dyn EntryFilterFn>) -> Vec<LogEntry> {
        let entries = self.lock();

        let filtered: Vec<&LogEntry> = match filter_func {
            Some(filter) => entries.iter().filter(|e| filter.matches(e)).collect(),
            None => entries.iter().collect(),
        };

        let start_idx = filtered.len().saturating_sub(n);
        filtered[start_idx..].iter().map(|e| (*e).clone()).collect()
    }

    fn passes(
        entry: &LogEntry,
        start_time: Option<DateTime<Local>>,
        end_time: Option<DateTime<Local>>,
        filter_func: Option<&dyn EntryFilterFn>,
    ) -> bool {
        if let Some(start) = start_time {
            if entry.timestamp < start {
                return false;
            }
        }

        if let Some(end) = end_time {
            if entry.timestamp > end {
                return false;
            }
        }

        filter_func.map_or(true, |filter| filter.matches(entry))
    }

    /// Clear all entries from the store
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get the total number of entries in the store
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl LogSink for EventStore {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.store(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(id: &str, event_type: EventType) -> LogEntry {
        LogEntry::now(id, event_type, Map::new())
    }

    #[test]
    fn test_store_entry() {
        let store = EventStore::default();
        store.store(entry("abc", EventType::RunStart));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_callback_triggered() {
        let callback_count = Arc::new(AtomicUsize::new(0));
        let callback_count_clone = Arc::clone(&callback_count);

        let callback: EntryCallback = Arc::new(move |_entry| {
            callback_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let store = EventStore::new(Some(callback));
        store.store(entry("abc", EventType::RunStart));
        store.store(entry("abc", EventType::RunEnd));

        assert_eq!(callback_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_entries_for_invocation() {
        let store = EventStore::default();
        store.store(entry("a", EventType::RunStart));
        store.store(entry("b", EventType::RunStart));
        store.store(entry("a", EventType::RunEnd));

        let a = store.entries_for_invocation("a");
        assert_eq!(a.len(), 2);
        assert_eq!(store.event_types_for("a"), vec![EventType::RunStart, EventType::RunEnd]);
        assert_eq!(store.event_types_for("b"), vec![EventType::RunStart]);
        assert!(store.event_types_for("c").is_empty());
    }

    #[test]
    fn test_count_with_filter() {
        let store = EventStore::default();
        store.store(entry("a", EventType::LlmCall));
        store.store(entry("a", EventType::LlmResponse));
        store.store(entry("a", EventType::LlmCall));

        let only_calls = |e: &LogEntry| e.event_type == EventType::LlmCall;
        assert_eq!(store.count_events(None, None, Some(&only_calls)), 2);
        assert_eq!(store.count_events(None, None, None), 3);
    }

    #[test]
    fn test_count_with_time_range() {
        let store = EventStore::default();
        store.store(entry("a", EventType::RunStart));
        let after_first = Local::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.store(entry("a", EventType::RunEnd));

        assert_eq!(store.count_events(Some(after_first), None, None), 1);
        assert_eq!(store.count_events(None, Some(after_first), None), 1);
    }

    #[test]
    fn test_get_last_n() {
        let store = EventStore::default();
        for i in 0..5 {
            store.store(entry(&format!("inv-{}", i), EventType::RunStart));
        }

        let last = store.get_last_n(2, None);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].invocation_id, "inv-3");
        assert_eq!(last[1].invocation_id, "inv-4");

        assert_eq!(store.get_last_n(10, None).len(), 5);
    }

    #[test]
    fn test_get_event_summaries() {
        let store = EventStore::default();
        store.store(entry("abc", EventType::ToolCall));

        let summaries = store.get_event_summaries(None, None, None);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].contains("tool_call (invocation_id: abc)"));
    }

    #[test]
    fn test_clear() {
        let store = EventStore::default();
        store.store(entry("abc", EventType::RunStart));
        assert_eq!(store.len(), 1);

        store.clear();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_as_sink() {
        let store = EventStore::default();
        store.append(&entry("abc", EventType::RunStart)).await.unwrap();
        store.flush().await.unwrap();

        assert_eq!(store.entries()[0].invocation_id, "abc");
    }
}
