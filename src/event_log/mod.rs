//! Execution event log for agent invocations
//!
//! The event log turns lifecycle hook calls into an append-only audit trail, one JSON
//! object per line. Every entry carries the invocation id it belongs to, so the events
//! of one user query can be reassembled from a log shared by many invocations.
//!
//! # Architecture
//!
//! - **ExecutionEventLogger**: Implements the lifecycle hooks, measures sizes and timing
//! - **InvocationTable**: Pairs run start and run end to compute execution time
//! - **LogSink**: Append-only destination; `JsonlFileSink`, `EventStore`, `FanoutSink`
//!   and `QueuedSink` are provided
//! - **LogEntry**: One immutable line of the log
//!
//! # Event Types
//!
//! `run_start`, `run_end`, `run_end_fallback`, `llm_call`, `llm_response`, `tool_call`
//! and `tool_response`. A successful run with a single tool call produces
//!
//! ```text
//! run_start, llm_call, llm_response, tool_call, tool_response, llm_call, llm_response, run_end
//! ```
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use hooklog::config::LoggerConfig;
//! use hooklog::event_log::ExecutionEventLogger;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(ExecutionEventLogger::to_file(LoggerConfig::default()).await?);
//! let agent = Agent::builder("logger_agent", "gemini-2.5-flash")
//!     .hooks(logger.clone())
//!     .build();
//! ```

pub mod event_store;
pub mod execution_logger;
pub mod invocation_table;
pub mod log_entry;
pub mod measure;
pub mod sink;

pub use event_store::{EntryCallback, EventStore};
pub use execution_logger::{CompletionContext, CompletionOutcome, ExecutionEventLogger};
pub use invocation_table::{InvocationState, InvocationTable};
pub use log_entry::{EntryFilterFn, EventType, LogEntry};
pub use sink::{FanoutSink, JsonlFileSink, LogSink, QueuedSink};
