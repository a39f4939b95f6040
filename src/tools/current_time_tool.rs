use crate::error::Result;
use crate::tools::{LlmTool, ToolDescriptor};
use chrono::Local;
use serde_json::{json, Map, Value};

/// Tool for getting the current local time
///
/// Returns the current time, date and timezone. Useful when the model needs to
/// answer "what time is it" style questions.
///
/// # Examples
///
/// ```ignore
/// use hooklog::tools::CurrentTimeTool;
///
/// let tool = CurrentTimeTool;
/// let result = tool.run(&serde_json::Map::new())?;
/// // result contains current_time, current_date and timezone
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    pub fn new() -> Self {
        Self
    }
}

impl LlmTool for CurrentTimeTool {
    fn run(&self, _args: &Map<String, Value>) -> Result<Value> {
        let now = Local::now();

        Ok(json!({
            "current_time": now.format("%H:%M:%S").to_string(),
            "current_date": now.format("%Y-%m-%d").to_string(),
            "timezone": now.offset().to_string()
        }))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            "get_current_time",
            "Returns the current time. Use this when the user asks for the current time.",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }
}
