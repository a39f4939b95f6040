pub mod config;
pub mod content;
pub mod error;
pub mod event_log;
pub mod hooks;
pub mod runner;
pub mod tools;

pub use error::{HooklogError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{LoggerConfig, SinkFailurePolicy};
    pub use crate::content::{Content, Part, Role};
    pub use crate::error::{HooklogError, Result};
    pub use crate::event_log::{
        CompletionContext, CompletionOutcome, EventStore, EventType, ExecutionEventLogger,
        FanoutSink, JsonlFileSink, LogEntry, LogSink,
    };
    pub use crate::hooks::{
        AgentResult, CallbackContext, HookOutcome, LifecycleHooks, LlmRequest, LlmResponse,
        ToolContext,
    };
    pub use crate::runner::{Agent, ModelBackend, Runner, Session};
    pub use crate::tools::{CurrentTimeTool, LlmTool, ToolDescriptor, WeatherTool};
}
