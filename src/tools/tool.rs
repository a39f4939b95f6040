use crate::error::Result;
use serde_json::{Map, Value};

/// Descriptor for tool function parameters
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Descriptor of type `function`
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Trait for tools an agent may call mid-invocation
pub trait LlmTool: Send + Sync {
    /// Execute the tool with given arguments
    fn run(&self, args: &Map<String, Value>) -> Result<Value>;

    /// Get tool descriptor for the model
    fn descriptor(&self) -> ToolDescriptor;

    /// Name the model uses to call this tool
    fn name(&self) -> String {
        self.descriptor().function.name
    }

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.name() == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_descriptor_serialization() {
        let descriptor = ToolDescriptor::function(
            "test_tool",
            "A test tool",
            json!({
                "type": "object",
                "properties": {
                    "arg1": {"type": "string"}
                }
            }),
        );

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("test_tool"));
        assert!(json.contains("A test tool"));
        assert!(json.contains("\"type\":\"function\""));
    }

    #[test]
    fn test_tool_descriptor_deserialization() {
        let json = r#"{
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Get the current weather",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "location": {"type": "string"}
                    }
                }
            }
        }"#;

        let descriptor: ToolDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.r#type, "function");
        assert_eq!(descriptor.function.name, "get_weather");
        assert_eq!(descriptor.function.description, "Get the current weather");
    }

    struct MockTool;

    impl LlmTool for MockTool {
        fn run(&self, _args: &Map<String, Value>) -> Result<Value> {
            Ok(json!("result"))
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor::function("mock_tool", "A mock tool", json!({}))
        }
    }

    #[test]
    fn test_tool_name_and_matches() {
        let tool = MockTool;
        assert_eq!(tool.name(), "mock_tool");
        assert!(tool.matches("mock_tool"));
        assert!(!tool.matches("other_tool"));
    }

    #[test]
    fn test_tool_run() {
        let tool = MockTool;
        let result = tool.run(&Map::new()).unwrap();
        assert_eq!(result, json!("result"));
    }
}
