//! Error types and result aliases for the hooklog library.
//!
//! This module defines the core error type [`HooklogError`] and the [`Result`] type alias.
//! Errors never cross the hook boundary: the lifecycle hooks are infallible by type, and
//! only sinks, tools, model backends and the runner return `Result<T>`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HooklogError {
    #[error("Log sink error: {0}")]
    SinkError(String),

    #[error("Log sink closed")]
    SinkClosed,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Agent error: {0}")]
    AgentError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, HooklogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_display() {
        let err = HooklogError::SinkError("disk full".to_string());
        assert_eq!(err.to_string(), "Log sink error: disk full");
    }

    #[test]
    fn test_sink_closed_display() {
        assert_eq!(HooklogError::SinkClosed.to_string(), "Log sink closed");
    }

    #[test]
    fn test_tool_error_display() {
        let err = HooklogError::ToolError("missing location".to_string());
        assert_eq!(err.to_string(), "Tool error: missing location");
    }

    #[test]
    fn test_model_error_display() {
        let err = HooklogError::ModelError("backend unavailable".to_string());
        assert_eq!(err.to_string(), "Model error: backend unavailable");
    }

    #[test]
    fn test_config_error_display() {
        let err = HooklogError::ConfigError("HOOKLOG_ECHO must be a boolean".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: HOOKLOG_ECHO must be a boolean");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: HooklogError = json_err.into();

        match err {
            HooklogError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: HooklogError = io_err.into();

        match err {
            HooklogError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }
}
