pub mod current_time_tool;
mod tool;
pub mod weather_tool;

pub use current_time_tool::CurrentTimeTool;
pub use tool::{FunctionDescriptor, LlmTool, ToolDescriptor};
pub use weather_tool::WeatherTool;
