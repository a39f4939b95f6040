//! Log entry types written by the execution event logger
//!
//! A [`LogEntry`] is one immutable line of the event log. Entries carry a wall-clock
//! timestamp, the invocation they belong to, an [`EventType`] and an open map of
//! event-specific details.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Trait for filtering log entries
///
/// Implement this trait to create custom entry filters. It is used instead of raw
/// closure types to avoid type complexity warnings.
pub trait EntryFilterFn: Send + Sync {
    /// Test whether an entry passes the filter
    fn matches(&self, entry: &LogEntry) -> bool;
}

impl<F> EntryFilterFn for F
where
    F: Fn(&LogEntry) -> bool + Send + Sync,
{
    fn matches(&self, entry: &LogEntry) -> bool {
        self(entry)
    }
}

/// Stage of an invocation an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    RunStart,
    RunEnd,
    RunEndFallback,
    LlmCall,
    LlmResponse,
    ToolCall,
    ToolResponse,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RunStart => "run_start",
            EventType::RunEnd => "run_end",
            EventType::RunEndFallback => "run_end_fallback",
            EventType::LlmCall => "llm_call",
            EventType::LlmResponse => "llm_response",
            EventType::ToolCall => "tool_call",
            EventType::ToolResponse => "tool_response",
        }
    }

    /// Whether this event closes an invocation
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventType::RunEnd | EventType::RunEndFallback)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time the event was recorded
    pub timestamp: DateTime<Local>,
    /// Invocation the event belongs to
    pub invocation_id: String,
    pub event_type: EventType,
    /// Event-specific fields
    pub details: Map<String, Value>,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn now(
        invocation_id: impl Into<String>,
        event_type: EventType,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            invocation_id: invocation_id.into(),
            event_type,
            details,
        }
    }

    /// Serialize as a single JSON line without the trailing newline
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }

    /// Get a formatted multi-line summary of the entry
    pub fn printable_summary(&self) -> String {
        let time_str = self.timestamp.format("%H:%M:%S%.3f");
        let mut summary = format!(
            "[{}] {} (invocation_id: {})",
            time_str, self.event_type, self.invocation_id
        );

        if let Some(agent) = self.detail_str("agent_name") {
            summary.push_str(&format!("\n   Agent: {}", agent));
        }

        match self.event_type {
            EventType::RunStart => {
                if let Some(message) = self.detail_str("user_message") {
                    summary.push_str(&format!("\n   Message: {}", message));
                }
            }
            EventType::RunEnd => {
                if let Some(seconds) = self.detail("execution_time_seconds").and_then(Value::as_f64) {
                    summary.push_str(&format!("\n   Duration: {:.2}s", seconds));
                }
                if let Some(preview) = self.detail_str("agent_response_preview") {
                    summary.push_str(&format!("\n   Response: {}", preview));
                }
            }
            EventType::RunEndFallback => {
                if let Some(note) = self.detail_str("note") {
                    summary.push_str(&format!("\n   Note: {}", note));
                }
            }
            EventType::LlmCall => {
                if let Some(length) = self.detail("prompt_length") {
                    summary.push_str(&format!("\n   Prompt length: {} chars", length));
                }
            }
            EventType::LlmResponse => {
                if let Some(length) = self.detail("response_length") {
                    summary.push_str(&format!("\n   Response length: {} chars", length));
                }
            }
            EventType::ToolCall => {
                if let Some(tool) = self.detail_str("tool_name") {
                    summary.push_str(&format!("\n   Tool: {}", tool));
                }
                if let Some(params) = self.detail("tool_params") {
                    summary.push_str(&format!("\n   Params: {}", params));
                }
            }
            EventType::ToolResponse => {
                if let Some(tool) = self.detail_str("tool_name") {
                    summary.push_str(&format!("\n   Tool: {}", tool));
                }
                if let Some(result) = self.detail_str("tool_response_summary") {
                    summary.push_str(&format!("\n   Result: {}", result));
                }
            }
        }

        summary
    }
}
