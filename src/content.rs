//! Message content exchanged between a user, a model and tools.
//!
//! A [`Content`] is one turn of conversation made of ordered [`Part`]s. Parts are either
//! text, a function call requested by the model, or the response a tool produced for such
//! a call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Author of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single part of a [`Content`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        args: Map<String, Value>,
    },
    FunctionResponse {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        response: Value,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create a function call part
    pub fn function_call(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Part::FunctionCall {
            id: None,
            name: name.into(),
            args,
        }
    }

    /// Create a function response part
    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Part::FunctionResponse {
            id: None,
            name: name.into(),
            response,
        }
    }

    /// Text carried by this part, if it is text-bearing
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Text { text } => write!(f, "{}", text),
            Part::FunctionCall { name, args, .. } => {
                write!(f, "function_call: {}({})", name, Value::Object(args.clone()))
            }
            Part::FunctionResponse { name, response, .. } => {
                write!(f, "function_response: {} -> {}", name, response)
            }
        }
    }
}

/// One turn of conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// Create user content holding a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create model content holding a single text part
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Create content from an explicit list of parts
    pub fn with_parts(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// First part carrying non-empty text
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().filter_map(Part::as_text).find(|text| !text.is_empty())
    }

    /// Concatenated text of all text-bearing parts
    pub fn joined_text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect::<Vec<_>>().join("")
    }

    /// Function calls requested in this content
    pub fn function_calls(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|part| matches!(part, Part::FunctionCall { .. }))
    }

    /// Whether this content requests at least one function call
    pub fn has_function_calls(&self) -> bool {
        self.function_calls().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_part_serialization_is_tagged() {
        let json = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(json, json!({"type": "text", "text": "hi"}));

        let mut args = Map::new();
        args.insert("location".to_string(), json!("Paris"));
        let json = serde_json::to_value(Part::function_call("get_weather", args)).unwrap();
        assert_eq!(json["type"], "function_call");
        assert_eq!(json["name"], "get_weather");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_text_part_displays_verbatim() {
        assert_eq!(Part::text("Paris is sunny").to_string(), "Paris is sunny");
    }

    #[test]
    fn test_function_call_display() {
        let mut args = Map::new();
        args.insert("location".to_string(), json!("Paris"));
        let part = Part::function_call("get_weather", args);

        assert_eq!(part.to_string(), r#"function_call: get_weather({"location":"Paris"})"#);
    }

    #[test]
    fn test_function_response_display() {
        let part = Part::function_response("get_weather", json!({"temp": 20}));
        assert_eq!(part.to_string(), r#"function_response: get_weather -> {"temp":20}"#);
    }

    #[test]
    fn test_first_text_skips_empty_and_non_text_parts() {
        let content = Content::with_parts(
            Role::Model,
            vec![
                Part::function_call("get_current_time", Map::new()),
                Part::text(""),
                Part::text("It is noon."),
                Part::text("Anything else?"),
            ],
        );

        assert_eq!(content.first_text(), Some("It is noon."));
        assert_eq!(content.joined_text(), "It is noon.Anything else?");
        assert!(content.has_function_calls());
    }

    #[test]
    fn test_first_text_none_without_text() {
        let content = Content::with_parts(Role::Model, vec![]);
        assert_eq!(content.first_text(), None);
        assert!(!content.has_function_calls());
    }
}
