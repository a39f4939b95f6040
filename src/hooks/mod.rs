//! Lifecycle hooks fired by an agent host
//!
//! A host runtime processing one user query passes through six extension points:
//! before/after the agent run, before/after each model call and before/after each tool
//! call. [`LifecycleHooks`] models those points; the execution event logger implements it
//! to build its audit trail, and [`NullHooks`] implements it as a no-op.
//!
//! Hooks return [`HookOutcome`], letting an implementation either let the host continue
//! unmodified or override the pending value.

pub mod context;
pub mod lifecycle;
pub mod types;

pub use context::{CallbackContext, SessionInfo, ToolContext};
pub use lifecycle::{LifecycleHooks, NullHooks};
pub use types::{AgentEvent, AgentResult, HookOutcome, LlmRequest, LlmResponse};
