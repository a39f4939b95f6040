//! Drives one agent through an invocation, firing lifecycle hooks at each stage.
//!
//! For every user message the runner assigns a fresh invocation id, fires `before_agent`,
//! alternates model turns and tool executions until the model answers without requesting
//! a tool, and finally fires `after_agent`. Each model turn is wrapped in
//! `before_model`/`after_model` and each tool execution in `before_tool`/`after_tool`.

use super::agent::Agent;
use super::backend::ModelBackend;
use super::session::Session;
use crate::content::{Content, Part, Role};
use crate::error::{HooklogError, Result};
use crate::hooks::{
    AgentEvent, AgentResult, CallbackContext, HookOutcome, LifecycleHooks, LlmRequest, ToolContext,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_MAX_LLM_CALLS: usize = 10;

/// Result of one invocation
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub invocation_id: String,
    /// Concatenated text of the final content
    pub final_text: String,
    pub final_content: Content,
    /// Model turns taken, including turns answered by a hook
    pub llm_calls: usize,
}

/// Runs the hooks for one stage in registration order and returns the first override.
///
/// A panicking hook is logged and treated as if it had returned `Continue`.
async fn first_override<'a, T>(
    hooks: &'a [Arc<dyn LifecycleHooks>],
    stage: &'static str,
    call: impl Fn(&'a dyn LifecycleHooks) -> BoxFuture<'a, HookOutcome<T>>,
) -> Option<T> {
    for hook in hooks {
        match AssertUnwindSafe(call(hook.as_ref())).catch_unwind().await {
            Ok(HookOutcome::Override(value)) => {
                debug!(stage, "Hook overrode pending value");
                return Some(value);
            }
            Ok(HookOutcome::Continue) => {}
            Err(_) => warn!(stage, "Lifecycle hook panicked; continuing"),
        }
    }
    None
}

fn as_model_error(error: HooklogError) -> HooklogError {
    match error {
        HooklogError::ModelError(_) => error,
        other => HooklogError::ModelError(other.to_string()),
    }
}

/// Host runtime for a single agent
pub struct Runner {
    agent: Agent,
    backend: Arc<dyn ModelBackend>,
    max_llm_calls: usize,
}

impl Runner {
    pub fn new(agent: Agent, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            agent,
            backend,
            max_llm_calls: DEFAULT_MAX_LLM_CALLS,
        }
    }

    /// Set the maximum number of model turns per invocation (default: 10)
    pub fn with_max_llm_calls(mut self, max_llm_calls: usize) -> Self {
        self.max_llm_calls = max_llm_calls;
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Process one user message as a new invocation.
    ///
    /// The user message, every tool exchange and the final answer are appended to the
    /// session history. A failed run leaves the history as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the backend fails and `AgentError` if the model keeps
    /// requesting tools past the model call limit. In both cases `after_agent` is not
    /// fired, so hooks tracking the invocation must be completed by the caller.
    pub async fn run(&self, session: &mut Session, message: &str) -> Result<RunOutput> {
        let invocation_id = format!("e-{}", Uuid::new_v4());
        let user_content = Content::user(message);
        let ctx = CallbackContext::new(invocation_id.clone())
            .with_agent_name(self.agent.name.clone())
            .with_session(session.info.clone())
            .with_user_content(user_content.clone());
        let hooks = self.agent.hooks();

        info!(
            invocation_id = invocation_id.as_str(),
            agent = self.agent.name.as_str(),
            "Starting invocation"
        );
        let history_len = session.history.len();
        session.history.push(user_content);

        let mut llm_calls = 0;
        let answer = match first_override(hooks, "before_agent", |hook| hook.before_agent(&ctx)).await {
            Some(content) => {
                info!("Agent run answered by before_agent hook");
                content
            }
            None => match self.model_loop(&ctx, session, &mut llm_calls).await {
                Ok(content) => content,
                Err(e) => {
                    session.history.truncate(history_len);
                    return Err(e);
                }
            },
        };

        let result = AgentResult::StructuredEvent(AgentEvent {
            author: self.agent.name.clone(),
            content: Some(answer.clone()),
        });
        let replaced =
            first_override(hooks, "after_agent", |hook| hook.after_agent(&ctx, &result)).await;
        let final_content = replaced.unwrap_or(answer);

        session.history.push(final_content.clone());
        info!(invocation_id = invocation_id.as_str(), llm_calls, "Invocation complete");

        Ok(RunOutput {
            invocation_id,
            final_text: final_content.joined_text(),
            final_content,
            llm_calls,
        })
    }

    async fn model_loop(
        &self,
        ctx: &CallbackContext,
        session: &mut Session,
        llm_calls: &mut usize,
    ) -> Result<Content> {
        let hooks = self.agent.hooks();

        loop {
            if *llm_calls >= self.max_llm_calls {
                return Err(HooklogError::AgentError(format!(
                    "Exceeded the limit of {} model calls",
                    self.max_llm_calls
                )));
            }
            *llm_calls += 1;

            let request = self.build_request(&session.history);
            let response =
                match first_override(hooks, "before_model", |hook| hook.before_model(ctx, &request))
                    .await
                {
                    Some(response) => response,
                    None => self.backend.generate(&request).await.map_err(as_model_error)?,
                };
            let replaced =
                first_override(hooks, "after_model", |hook| hook.after_model(ctx, &response)).await;
            let response = replaced.unwrap_or(response);

            let Some(content) = response.content else {
                return Ok(Content::with_parts(Role::Model, Vec::new()));
            };

            let calls: Vec<(Option<String>, String, Map<String, Value>)> = content
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::FunctionCall { id, name, args } => {
                        Some((id.clone(), name.clone(), args.clone()))
                    }
                    _ => None,
                })
                .collect();

            if calls.is_empty() {
                return Ok(content);
            }

            info!("Tool calls requested: {}", calls.len());
            session.history.push(content);

            let mut responses = Vec::with_capacity(calls.len());
            for (call_id, name, args) in calls {
                let tool_ctx = ToolContext::from_callback(ctx, call_id.clone());

                let output = match first_override(hooks, "before_tool", |hook| {
                    hook.before_tool(&tool_ctx, &name, &args)
                })
                .await
                {
                    Some(value) => value,
                    None => self.execute_tool(&name, &args),
                };
                let replaced = first_override(hooks, "after_tool", |hook| {
                    hook.after_tool(&tool_ctx, &name, &args, &output)
                })
                .await;

                responses.push(Part::FunctionResponse {
                    id: call_id,
                    name,
                    response: replaced.unwrap_or(output),
                });
            }
            session.history.push(Content::with_parts(Role::User, responses));
        }
    }

    fn build_request(&self, history: &[Content]) -> LlmRequest {
        LlmRequest {
            model: self.agent.model.clone(),
            system_instruction: self.agent.instruction.clone(),
            contents: history.to_vec(),
            tools: self.agent.tool_descriptors(),
        }
    }

    fn execute_tool(&self, name: &str, args: &Map<String, Value>) -> Value {
        match self.agent.find_tool(name) {
            Some(tool) => {
                info!("Executing tool: {}", name);
                tool.run(args).unwrap_or_else(|e| {
                    warn!("Tool {} failed: {}", name, e);
                    json!({ "error": e.to_string() })
                })
            }
            None => {
                warn!("Tool not found: {}", name);
                json!({ "error": format!("Tool not found: {}", name) })
            }
        }
    }
}
