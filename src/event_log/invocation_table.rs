//! In-flight invocation tracking
//!
//! The table pairs start and end events of an invocation. It is a working set only:
//! nothing here is persisted, and a record lives exactly from the agent-start hook to the
//! agent-end hook (or the explicit fallback completion).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Context captured when an invocation starts
#[derive(Debug, Clone)]
pub struct InvocationState {
    pub invocation_id: String,
    pub start_time: Instant,
    pub session_id: String,
    pub user_id: String,
    pub agent_name: String,
}

impl InvocationState {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Thread-safe map of open invocations keyed by invocation id
#[derive(Debug, Default)]
pub struct InvocationTable {
    states: Mutex<HashMap<String, InvocationState>>,
}

impl InvocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock must not disable tracking for later invocations
    fn lock(&self) -> MutexGuard<'_, HashMap<String, InvocationState>> {
        self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a record. Returns the record it replaced if the id was already open.
    pub fn open(&self, state: InvocationState) -> Option<InvocationState> {
        self.lock().insert(state.invocation_id.clone(), state)
    }

    /// Remove and return the record for `invocation_id`
    pub fn close(&self, invocation_id: &str) -> Option<InvocationState> {
        self.lock().remove(invocation_id)
    }

    /// Remove and return the only open record, or `None` when zero or several are open
    pub fn close_sole(&self) -> Option<InvocationState> {
        let mut states = self.lock();
        if states.len() != 1 {
            return None;
        }
        let id = states.keys().next().cloned()?;
        states.remove(&id)
    }

    pub fn is_open(&self, invocation_id: &str) -> bool {
        self.lock().contains_key(invocation_id)
    }

    /// Ids of all open invocations, oldest first
    pub fn open_ids(&self) -> Vec<String> {
        let states = self.lock();
        let mut open: Vec<&InvocationState> = states.values().collect();
        open.sort_by_key(|s| s.start_time);
        open.into_iter().map(|s| s.invocation_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state(id: &str) -> InvocationState {
        InvocationState {
            invocation_id: id.to_string(),
            start_time: Instant::now(),
            session_id: "s1".to_string(),
            user_id: "u1".to_string(),
            agent_name: "logger_agent".to_string(),
        }
    }

    #[test]
    fn test_open_and_close() {
        let table = InvocationTable::new();
        assert!(table.open(state("a")).is_none());
        assert!(table.is_open("a"));
        assert_eq!(table.len(), 1);

        let closed = table.close("a").unwrap();
        assert_eq!(closed.invocation_id, "a");
        assert!(!table.is_open("a"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_close_is_exactly_once() {
        let table = InvocationTable::new();
        table.open(state("a"));

        assert!(table.close("a").is_some());
        assert!(table.close("a").is_none());
    }

    #[test]
    fn test_reopen_replaces_record() {
        let table = InvocationTable::new();
        table.open(state("a"));
        let replaced = table.open(state("a"));

        assert!(replaced.is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_close_sole_only_with_single_record() {
        let table = InvocationTable::new();
        assert!(table.close_sole().is_none());

        table.open(state("a"));
        table.open(state("b"));
        assert!(table.close_sole().is_none());
        assert_eq!(table.len(), 2);

        table.close("a");
        assert_eq!(table.close_sole().unwrap().invocation_id, "b");
        assert!(table.is_empty());
    }

    #[test]
    fn test_open_ids_oldest_first() {
        let table = InvocationTable::new();
        table.open(state("first"));
        std::thread::sleep(Duration::from_millis(2));
        table.open(state("second"));

        assert_eq!(table.open_ids(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_concurrent_distinct_ids() {
        let table = Arc::new(InvocationTable::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    let id = format!("inv-{}", i);
                    table.open(state(&id));
                    table.close(&id).is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(table.is_empty());
    }
}
