//! Values flowing through lifecycle hooks.

use crate::content::Content;
use crate::tools::ToolDescriptor;
use serde::{Deserialize, Serialize};

/// What a hook asks the host to do with the pending value
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome<T> {
    /// Proceed with the pending request, response or result unmodified
    Continue,
    /// Replace the pending value with this one
    Override(T),
}

impl<T> HookOutcome<T> {
    pub fn is_continue(&self) -> bool {
        matches!(self, HookOutcome::Continue)
    }

    pub fn into_override(self) -> Option<T> {
        match self {
            HookOutcome::Continue => None,
            HookOutcome::Override(value) => Some(value),
        }
    }
}

impl<T> Default for HookOutcome<T> {
    fn default() -> Self {
        HookOutcome::Continue
    }
}

/// Request about to be sent to a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents,
            tools: Vec::new(),
        }
    }
}

/// Response received from a model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
}

impl LlmResponse {
    pub fn new(content: Content) -> Self {
        Self {
            content: Some(content),
        }
    }

    /// Response carrying a single model text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Content::model(text))
    }

    pub fn has_function_calls(&self) -> bool {
        self.content.as_ref().is_some_and(Content::has_function_calls)
    }
}

/// A structured event produced by an agent at the end of its run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub author: String,
    pub content: Option<Content>,
}

/// Completion result handed to the after-agent hook
#[derive(Debug, Clone, PartialEq)]
pub enum AgentResult {
    /// Plain content returned by the agent
    TextContent(Content),
    /// An event wrapping the agent's final content
    StructuredEvent(AgentEvent),
    /// Anything else, already stringified by the host
    Unknown(String),
}

impl AgentResult {
    /// Result holding a single model text part
    pub fn text(text: impl Into<String>) -> Self {
        AgentResult::TextContent(Content::model(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Part, Role};
    use serde_json::Map;

    #[test]
    fn test_hook_outcome_default_is_continue() {
        let outcome: HookOutcome<Content> = HookOutcome::default();
        assert!(outcome.is_continue());
        assert_eq!(outcome.into_override(), None);
    }

    #[test]
    fn test_hook_outcome_override() {
        let outcome = HookOutcome::Override(Content::model("replaced"));
        assert!(!outcome.is_continue());
        assert_eq!(outcome.into_override(), Some(Content::model("replaced")));
    }

    #[test]
    fn test_response_detects_function_calls() {
        let plain = LlmResponse::text("hello");
        assert!(!plain.has_function_calls());

        let call = LlmResponse::new(Content::with_parts(
            Role::Model,
            vec![Part::function_call("get_current_time", Map::new())],
        ));
        assert!(call.has_function_calls());

        assert!(!LlmResponse::default().has_function_calls());
    }

    #[test]
    fn test_request_serialization_omits_missing_instruction() {
        let request = LlmRequest::new("gemini-2.5-flash", vec![Content::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gemini-2.5-flash");
        assert!(json.get("system_instruction").is_none());
        assert_eq!(json["tools"], serde_json::json!([]));
    }

    #[test]
    fn test_agent_result_text() {
        assert_eq!(
            AgentResult::text("Paris is sunny."),
            AgentResult::TextContent(Content::model("Paris is sunny."))
        );
    }
}
