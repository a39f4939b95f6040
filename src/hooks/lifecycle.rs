//! The lifecycle hook trait and its no-op implementation.

use super::context::{CallbackContext, ToolContext};
use super::types::{AgentResult, HookOutcome, LlmRequest, LlmResponse};
use crate::content::Content;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Extension points a host runtime fires while processing an invocation.
///
/// Every method defaults to [`HookOutcome::Continue`], so implementations only override
/// the stages they care about. Hooks are infallible by type: an implementation that can
/// fail internally must contain the failure itself.
///
/// For one invocation the host fires `before_agent` first, then any number of
/// `before_model`/`after_model` and `before_tool`/`after_tool` pairs, and finally
/// `after_agent`. Each hook is awaited before the next stage begins.
///
/// # Example
///
/// ```rust,ignore
/// use hooklog::hooks::{LifecycleHooks, ToolContext, HookOutcome};
/// use async_trait::async_trait;
///
/// struct DenyShell;
///
/// #[async_trait]
/// impl LifecycleHooks for DenyShell {
///     async fn before_tool(
///         &self,
///         _ctx: &ToolContext,
///         tool_name: &str,
///         _args: &serde_json::Map<String, serde_json::Value>,
///     ) -> HookOutcome<serde_json::Value> {
///         if tool_name == "shell" {
///             HookOutcome::Override(serde_json::json!({"error": "denied"}))
///         } else {
///             HookOutcome::Continue
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Called once before the agent starts processing an invocation.
    /// Overriding skips the model loop and uses the given content as the answer.
    async fn before_agent(&self, ctx: &CallbackContext) -> HookOutcome<Content> {
        let _ = ctx;
        HookOutcome::Continue
    }

    /// Called once after the agent has produced its final answer.
    /// Overriding replaces the final content.
    async fn after_agent(&self, ctx: &CallbackContext, result: &AgentResult) -> HookOutcome<Content> {
        let _ = (ctx, result);
        HookOutcome::Continue
    }

    /// Called before each model request. Overriding skips the model call.
    async fn before_model(
        &self,
        ctx: &CallbackContext,
        request: &LlmRequest,
    ) -> HookOutcome<LlmResponse> {
        let _ = (ctx, request);
        HookOutcome::Continue
    }

    /// Called after each model response. Overriding replaces the response.
    async fn after_model(
        &self,
        ctx: &CallbackContext,
        response: &LlmResponse,
    ) -> HookOutcome<LlmResponse> {
        let _ = (ctx, response);
        HookOutcome::Continue
    }

    /// Called before each tool execution. Overriding skips the tool.
    async fn before_tool(
        &self,
        ctx: &ToolContext,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> HookOutcome<Value> {
        let _ = (ctx, tool_name, args);
        HookOutcome::Continue
    }

    /// Called after each tool execution. Overriding replaces the tool result.
    async fn after_tool(
        &self,
        ctx: &ToolContext,
        tool_name: &str,
        args: &Map<String, Value>,
        result: &Value,
    ) -> HookOutcome<Value> {
        let _ = (ctx, tool_name, args, result);
        HookOutcome::Continue
    }
}

/// Hooks that observe nothing and never override
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHooks;

impl NullHooks {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LifecycleHooks for NullHooks {}
