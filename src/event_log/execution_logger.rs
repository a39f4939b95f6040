//! The execution event logger
//!
//! [`ExecutionEventLogger`] turns lifecycle hook calls into an append-only event log. It
//! pairs the start and end of each invocation through an [`InvocationTable`] to measure
//! execution time, and writes one [`LogEntry`] per hook call to its [`LogSink`].
//!
//! Nothing inside the logger propagates toward the host: sink failures are retried or
//! dropped according to [`SinkFailurePolicy`], console echo failures are swallowed, and
//! absent context degrades to placeholder values.

use super::invocation_table::{InvocationState, InvocationTable};
use super::log_entry::{EventType, LogEntry};
use super::measure::{self, char_len, truncate_chars, value_string};
use super::sink::{JsonlFileSink, LogSink};
use crate::config::{LoggerConfig, SinkFailurePolicy};
use crate::content::Content;
use crate::error::Result;
use crate::hooks::{
    AgentResult, CallbackContext, HookOutcome, LifecycleHooks, LlmRequest, LlmResponse,
    ToolContext,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_AGENT: &str = "UnknownAgent";
pub const UNKNOWN_TOOL: &str = "UnknownTool";
pub const NO_MESSAGE: &str = "No message found";

const SHORT_ID_CHARS: usize = 8;

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(placeholder)
}

fn into_details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Context used by [`ExecutionEventLogger::log_completion`] when no start was recorded
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionContext<'a> {
    pub session_id: Option<&'a str>,
    pub user_id: Option<&'a str>,
    pub agent_name: Option<&'a str>,
}

/// What [`ExecutionEventLogger::log_completion`] did
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// An open invocation was closed with a `run_end` entry
    Closed {
        invocation_id: String,
        execution_time: Duration,
    },
    /// No matching start was available; a `run_end_fallback` entry was written
    Fallback { invocation_id: String },
    /// Nothing was open and no id was given; nothing was written
    NothingOpen,
}

/// Records lifecycle events of agent invocations to an append-only sink
///
/// # Example
///
/// ```rust,ignore
/// use hooklog::event_log::{ExecutionEventLogger, EventStore};
/// use hooklog::config::LoggerConfig;
/// use std::sync::Arc;
///
/// let store = Arc::new(EventStore::default());
/// let logger = ExecutionEventLogger::new(store.clone(), LoggerConfig::default());
///
/// logger.on_agent_start("abc", Some("s1"), Some("u1"), Some("weather_agent"), Some("Hi")).await;
/// logger.on_agent_end("abc", &AgentResult::text("Hello!")).await;
///
/// assert_eq!(store.len(), 2);
/// ```
pub struct ExecutionEventLogger {
    sink: Arc<dyn LogSink>,
    config: LoggerConfig,
    invocations: InvocationTable,
    enabled: AtomicBool,
    echo_writer: Mutex<Box<dyn Write + Send>>,
}

impl ExecutionEventLogger {
    /// Create a logger writing to `sink`
    pub fn new(sink: Arc<dyn LogSink>, config: LoggerConfig) -> Self {
        Self {
            sink,
            config,
            invocations: InvocationTable::new(),
            enabled: AtomicBool::new(true),
            echo_writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Send the console echo to `writer` instead of stdout
    pub fn with_echo_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.echo_writer = Mutex::new(writer);
        self
    }

    /// Create a logger writing JSON Lines to `config.log_file`, truncating it first
    pub async fn to_file(config: LoggerConfig) -> Result<Self> {
        let sink = JsonlFileSink::create(&config.log_file).await?;
        Ok(Self::new(Arc::new(sink), config))
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Check if the logger is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enable the logger
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Disable the logger. A disabled logger neither records entries nor tracks invocations.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Whether a start has been recorded for `invocation_id` without a matching end
    pub fn is_open(&self, invocation_id: &str) -> bool {
        self.invocations.is_open(invocation_id)
    }

    /// Ids of invocations started but not yet ended, oldest first
    pub fn open_invocations(&self) -> Vec<String> {
        self.invocations.open_ids()
    }

    /// Append one entry stamped with the current time.
    ///
    /// Never fails: sink errors are handled per the configured [`SinkFailurePolicy`].
    pub async fn record(&self, invocation_id: &str, event_type: EventType, details: Map<String, Value>) {
        if !self.is_enabled() {
            return;
        }

        let entry = LogEntry::now(invocation_id, event_type, details);
        self.write(&entry).await;
    }

    async fn write(&self, entry: &LogEntry) {
        let attempts = match self.config.sink_failure {
            SinkFailurePolicy::Drop => 1,
            SinkFailurePolicy::Retry { attempts } => attempts.saturating_add(1),
        };

        for attempt in 1..=attempts {
            match self.sink.append(entry).await {
                Ok(()) => {
                    debug!(
                        invocation_id = entry.invocation_id.as_str(),
                        event_type = entry.event_type.as_str(),
                        "Recorded event"
                    );
                    return;
                }
                Err(e) if attempt < attempts => {
                    debug!(attempt, "Retrying log write: {}", e);
                }
                Err(e) => {
                    warn!(
                        invocation_id = entry.invocation_id.as_str(),
                        event_type = entry.event_type.as_str(),
                        "Dropped log entry after {} attempt(s): {}",
                        attempts,
                        e
                    );
                }
            }
        }
    }

    fn echo(&self, line: &str) {
        if !self.config.echo_console {
            return;
        }

        let mut writer = self.echo_writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(writer, "[Callback] {}", line).and_then(|()| writer.flush()) {
            debug!("Console echo failed: {}", e);
        }
    }

    fn short_id(invocation_id: &str) -> String {
        truncate_chars(invocation_id, SHORT_ID_CHARS)
    }

    /// Open the invocation and emit `run_start`
    pub async fn on_agent_start(
        &self,
        invocation_id: &str,
        session_id: Option<&str>,
        user_id: Option<&str>,
        agent_name: Option<&str>,
        user_message: Option<&str>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let session_id = or_placeholder(session_id, NOT_AVAILABLE);
        let user_id = or_placeholder(user_id, NOT_AVAILABLE);
        let agent_name = or_placeholder(agent_name, UNKNOWN_AGENT);
        let user_message = user_message.unwrap_or(NO_MESSAGE);

        let replaced = self.invocations.open(InvocationState {
            invocation_id: invocation_id.to_string(),
            start_time: Instant::now(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            agent_name: agent_name.to_string(),
        });
        if replaced.is_some() {
            warn!(invocation_id, "Invocation started twice; restarting its clock");
        }

        self.record(
            invocation_id,
            EventType::RunStart,
            into_details(json!({
                "user_id": user_id,
                "session_id": session_id,
                "agent_name": agent_name,
                "user_message": user_message
            })),
        )
        .await;

        self.echo(&format!(
            "Run start: {}... Message='{}...'",
            Self::short_id(invocation_id),
            truncate_chars(user_message, self.config.message_echo_chars)
        ));
    }

    /// Close the invocation and emit `run_end`, or `run_end_fallback` when it was never opened
    pub async fn on_agent_end(&self, invocation_id: &str, result: &AgentResult) {
        self.end_invocation(invocation_id, None, result).await;
    }

    /// `agent_name` is only used for `run_end_fallback`; an open record carries its own
    async fn end_invocation(&self, invocation_id: &str, agent_name: Option<&str>, result: &AgentResult) {
        if !self.is_enabled() {
            return;
        }

        let response = measure::response_text(result, self.config.preview_chars);

        match self.invocations.close(invocation_id) {
            Some(state) => {
                self.record_run_end(&state, &response).await;
            }
            None => {
                self.record(
                    invocation_id,
                    EventType::RunEndFallback,
                    into_details(json!({
                        "note": "No state; agent completed",
                        "agent_name": or_placeholder(agent_name, UNKNOWN_AGENT),
                        "agent_response_length": char_len(&response),
                        "agent_response_preview": truncate_chars(&response, self.config.preview_chars)
                    })),
                )
                .await;

                self.echo(&format!(
                    "Run end without recorded start: {}...",
                    Self::short_id(invocation_id)
                ));
            }
        }
    }

    async fn record_run_end(&self, state: &InvocationState, response: &str) -> Duration {
        let execution_time = state.elapsed();

        self.record(
            &state.invocation_id,
            EventType::RunEnd,
            into_details(json!({
                "user_id": state.user_id,
                "session_id": state.session_id,
                "agent_name": state.agent_name,
                "execution_time_seconds": execution_time.as_secs_f64(),
                "agent_response_length": char_len(response),
                "agent_response_preview": truncate_chars(response, self.config.preview_chars)
            })),
        )
        .await;

        self.echo(&format!(
            "Run end: {}... Time = {:.2} seconds",
            Self::short_id(&state.invocation_id),
            execution_time.as_secs_f64()
        ));

        execution_time
    }

    /// Emit `llm_call`
    pub async fn on_model_call_start(
        &self,
        invocation_id: &str,
        agent_name: Option<&str>,
        prompt_length: usize,
    ) {
        if !self.is_enabled() {
            return;
        }

        let agent_name = or_placeholder(agent_name, UNKNOWN_AGENT);
        self.record(
            invocation_id,
            EventType::LlmCall,
            into_details(json!({
                "agent_name": agent_name,
                "prompt_length": prompt_length
            })),
        )
        .await;

        self.echo(&format!(
            "LLM call: Agent = {}, Prompt length = {} chars",
            agent_name, prompt_length
        ));
    }

    /// Emit `llm_response`
    pub async fn on_model_call_end(
        &self,
        invocation_id: &str,
        agent_name: Option<&str>,
        response_length: usize,
    ) {
        if !self.is_enabled() {
            return;
        }

        let agent_name = or_placeholder(agent_name, UNKNOWN_AGENT);
        self.record(
            invocation_id,
            EventType::LlmResponse,
            into_details(json!({
                "agent_name": agent_name,
                "response_length": response_length
            })),
        )
        .await;

        self.echo(&format!(
            "LLM response: Agent = {}, Response length = {} chars",
            agent_name, response_length
        ));
    }

    /// Emit `tool_call` with the full tool arguments
    pub async fn on_tool_call_start(
        &self,
        invocation_id: &str,
        agent_name: Option<&str>,
        tool_name: Option<&str>,
        tool_args: &Map<String, Value>,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let agent_name = or_placeholder(agent_name, UNKNOWN_AGENT);
        let tool_name = or_placeholder(tool_name, UNKNOWN_TOOL);
        self.record(
            invocation_id,
            EventType::ToolCall,
            into_details(json!({
                "user_id": or_placeholder(user_id, NOT_AVAILABLE),
                "session_id": or_placeholder(session_id, NOT_AVAILABLE),
                "agent_name": agent_name,
                "tool_name": tool_name,
                "tool_params": tool_args
            })),
        )
        .await;

        self.echo(&format!(
            "Tool call: Agent = {}, Tool = {}, Params = {}",
            agent_name,
            tool_name,
            Value::Object(tool_args.clone())
        ));
    }

    /// Emit `tool_response` carrying only a truncated summary of the result
    pub async fn on_tool_call_end(
        &self,
        invocation_id: &str,
        agent_name: Option<&str>,
        tool_name: Option<&str>,
        tool_result: &Value,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let agent_name = or_placeholder(agent_name, UNKNOWN_AGENT);
        let tool_name = or_placeholder(tool_name, UNKNOWN_TOOL);
        let output = value_string(tool_result);

        self.record(
            invocation_id,
            EventType::ToolResponse,
            into_details(json!({
                "user_id": or_placeholder(user_id, NOT_AVAILABLE),
                "session_id": or_placeholder(session_id, NOT_AVAILABLE),
                "agent_name": agent_name,
                "tool_name": tool_name,
                "tool_response_summary": truncate_chars(&output, self.config.preview_chars)
            })),
        )
        .await;

        self.echo(&format!(
            "Tool response: Agent = {}, Tool = {}, Output preview: {}",
            agent_name,
            tool_name,
            truncate_chars(&output, self.config.tool_echo_chars)
        ));
    }

    /// Explicit completion path for hosts whose end hook may not fire.
    ///
    /// With an id, closes that invocation (`run_end`) or writes `run_end_fallback` if it
    /// was never opened. Without an id, closes the only open invocation; when several are
    /// open it refuses to guess and writes `run_end_fallback` under a synthesized id.
    pub async fn log_completion(
        &self,
        invocation_id: Option<&str>,
        final_response: &str,
        context: CompletionContext<'_>,
    ) -> CompletionOutcome {
        if !self.is_enabled() {
            return CompletionOutcome::NothingOpen;
        }

        let state = match invocation_id {
            Some(id) => self.invocations.close(id),
            None => self.invocations.close_sole(),
        };

        if let Some(state) = state {
            let execution_time = self.record_run_end(&state, final_response).await;
            return CompletionOutcome::Closed {
                invocation_id: state.invocation_id,
                execution_time,
            };
        }

        let (fallback_id, note) = match invocation_id {
            Some(id) => (id.to_string(), "No recorded start for invocation".to_string()),
            None => {
                let open = self.invocations.len();
                if open == 0 {
                    debug!("No open invocation to complete");
                    return CompletionOutcome::NothingOpen;
                }
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                (
                    format!("fallback-{}", seconds),
                    format!("{} invocations open; completion not attributed", open),
                )
            }
        };

        self.record(
            &fallback_id,
            EventType::RunEndFallback,
            into_details(json!({
                "note": note,
                "user_id": or_placeholder(context.user_id, NOT_AVAILABLE),
                "session_id": or_placeholder(context.session_id, NOT_AVAILABLE),
                "agent_name": or_placeholder(context.agent_name, UNKNOWN_AGENT),
                "agent_response_length": char_len(final_response),
                "agent_response_preview": truncate_chars(final_response, self.config.preview_chars)
            })),
        )
        .await;

        self.echo(&format!("Run end (fallback): {}...", Self::short_id(&fallback_id)));

        CompletionOutcome::Fallback {
            invocation_id: fallback_id,
        }
    }
}

#[async_trait]
impl LifecycleHooks for ExecutionEventLogger {
    async fn before_agent(&self, ctx: &CallbackContext) -> HookOutcome<Content> {
        self.on_agent_start(
            &ctx.invocation_id,
            ctx.session_id(),
            ctx.user_id(),
            ctx.agent_name.as_deref(),
            ctx.user_message(),
        )
        .await;
        HookOutcome::Continue
    }

    async fn after_agent(&self, ctx: &CallbackContext, result: &AgentResult) -> HookOutcome<Content> {
        self.end_invocation(&ctx.invocation_id, ctx.agent_name.as_deref(), result).await;
        HookOutcome::Continue
    }

    async fn before_model(
        &self,
        ctx: &CallbackContext,
        request: &LlmRequest,
    ) -> HookOutcome<LlmResponse> {
        self.on_model_call_start(
            &ctx.invocation_id,
            ctx.agent_name.as_deref(),
            measure::prompt_length(request),
        )
        .await;
        HookOutcome::Continue
    }

    async fn after_model(
        &self,
        ctx: &CallbackContext,
        response: &LlmResponse,
    ) -> HookOutcome<LlmResponse> {
        self.on_model_call_end(
            &ctx.invocation_id,
            ctx.agent_name.as_deref(),
            measure::response_length(response),
        )
        .await;
        HookOutcome::Continue
    }

    async fn before_tool(
        &self,
        ctx: &ToolContext,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> HookOutcome<Value> {
        self.on_tool_call_start(
            &ctx.invocation_id,
            ctx.agent_name.as_deref(),
            Some(tool_name),
            args,
            ctx.session_id(),
            ctx.user_id(),
        )
        .await;
        HookOutcome::Continue
    }

    async fn after_tool(
        &self,
        ctx: &ToolContext,
        tool_name: &str,
        _args: &Map<String, Value>,
        result: &Value,
    ) -> HookOutcome<Value> {
        self.on_tool_call_end(
            &ctx.invocation_id,
            ctx.agent_name.as_deref(),
            Some(tool_name),
            result,
            ctx.session_id(),
            ctx.user_id(),
        )
        .await;
        HookOutcome::Continue
    }
}
