//! Contexts handed to lifecycle hooks.

use crate::content::Content;
use serde::{Deserialize, Serialize};

/// Identity of the conversation an invocation belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub app_name: String,
    pub session_id: String,
    pub user_id: String,
}

impl SessionInfo {
    pub fn new(
        app_name: impl Into<String>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            session_id: session_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Context for agent and model hooks
#[derive(Debug, Clone)]
pub struct CallbackContext {
    pub invocation_id: String,
    pub agent_name: Option<String>,
    pub session: Option<SessionInfo>,
    /// The user content that triggered this invocation
    pub user_content: Option<Content>,
}

impl CallbackContext {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            agent_name: None,
            session: None,
            user_content: None,
        }
    }

    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    pub fn with_session(mut self, session: SessionInfo) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_user_content(mut self, content: Content) -> Self {
        self.user_content = Some(content);
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    /// Text of the first part of the triggering user content
    pub fn user_message(&self) -> Option<&str> {
        self.user_content.as_ref().and_then(|c| c.parts.first()).and_then(|p| p.as_text())
    }
}

/// Context for tool hooks
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub invocation_id: String,
    pub agent_name: Option<String>,
    pub session: Option<SessionInfo>,
    /// Identifier of the function call being served, when the model supplied one
    pub function_call_id: Option<String>,
}

impl ToolContext {
    /// Derive a tool context from the surrounding agent context
    pub fn from_callback(ctx: &CallbackContext, function_call_id: Option<String>) -> Self {
        Self {
            invocation_id: ctx.invocation_id.clone(),
            agent_name: ctx.agent_name.clone(),
            session: ctx.session.clone(),
            function_call_id,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Part, Role};
    use serde_json::Map;

    #[test]
    fn test_callback_context_accessors() {
        let ctx = CallbackContext::new("inv-1")
            .with_agent_name("logger_agent")
            .with_session(SessionInfo::new("CallbackDemo", "s1", "u1"))
            .with_user_content(Content::user("What time is it?"));

        assert_eq!(ctx.invocation_id, "inv-1");
        assert_eq!(ctx.session_id(), Some("s1"));
        assert_eq!(ctx.user_id(), Some("u1"));
        assert_eq!(ctx.user_message(), Some("What time is it?"));
    }

    #[test]
    fn test_callback_context_without_session() {
        let ctx = CallbackContext::new("inv-2");
        assert_eq!(ctx.session_id(), None);
        assert_eq!(ctx.user_id(), None);
        assert_eq!(ctx.user_message(), None);
    }

    #[test]
    fn test_user_message_requires_text_first_part() {
        let ctx = CallbackContext::new("inv-3").with_user_content(Content::with_parts(
            Role::User,
            vec![Part::function_call("noop", Map::new())],
        ));
        assert_eq!(ctx.user_message(), None);
    }

    #[test]
    fn test_tool_context_inherits_agent_context() {
        let ctx = CallbackContext::new("inv-4")
            .with_agent_name("weather_agent")
            .with_session(SessionInfo::new("app", "s9", "u9"));

        let tool_ctx = ToolContext::from_callback(&ctx, Some("call-1".to_string()));

        assert_eq!(tool_ctx.invocation_id, "inv-4");
        assert_eq!(tool_ctx.agent_name.as_deref(), Some("weather_agent"));
        assert_eq!(tool_ctx.session_id(), Some("s9"));
        assert_eq!(tool_ctx.user_id(), Some("u9"));
        assert_eq!(tool_ctx.function_call_id.as_deref(), Some("call-1"));
    }
}
