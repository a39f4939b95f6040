//! Logger configuration.
//!
//! [`LoggerConfig`] carries the log file location, console echo settings, preview lengths
//! and the policy applied when the log sink rejects a write. Defaults reproduce the
//! behaviour of the callback demo: `agent_logs.jsonl`, console echo on, previews of
//! 30/100/50 characters and failed writes dropped.

use crate::error::{HooklogError, Result};
use std::path::PathBuf;

pub const DEFAULT_LOG_FILE: &str = "agent_logs.jsonl";

const ENV_LOG_FILE: &str = "HOOKLOG_FILE";
const ENV_ECHO: &str = "HOOKLOG_ECHO";
const ENV_SINK_RETRIES: &str = "HOOKLOG_SINK_RETRIES";

/// What to do when the log sink fails to accept an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFailurePolicy {
    /// Drop the entry after a single failed attempt
    Drop,
    /// Retry up to `attempts` more times, then drop
    Retry { attempts: u32 },
}

/// Configuration for the execution event logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_file: PathBuf,
    pub echo_console: bool,
    /// Characters of the user message shown in the run start echo
    pub message_echo_chars: usize,
    /// Characters kept for response previews and tool result summaries
    pub preview_chars: usize,
    /// Characters of the tool output shown in the tool response echo
    pub tool_echo_chars: usize,
    pub sink_failure: SinkFailurePolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            echo_console: true,
            message_echo_chars: 30,
            preview_chars: 100,
            tool_echo_chars: 50,
            sink_failure: SinkFailurePolicy::Drop,
        }
    }
}

impl LoggerConfig {
    /// Build a configuration from the environment, loading `.env` first if present.
    ///
    /// Recognised variables:
    ///
    /// * `HOOKLOG_FILE` - path of the JSONL log
    /// * `HOOKLOG_ECHO` - `true`/`false`, console echo
    /// * `HOOKLOG_SINK_RETRIES` - retries before a failed write is dropped (0 drops immediately)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_LOG_FILE) {
            if path.trim().is_empty() {
                return Err(HooklogError::ConfigError(format!("{} must not be empty", ENV_LOG_FILE)));
            }
            config.log_file = PathBuf::from(path);
        }

        if let Some(echo) = lookup(ENV_ECHO) {
            config.echo_console = match echo.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(HooklogError::ConfigError(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_ECHO, other
                    )))
                }
            };
        }

        if let Some(retries) = lookup(ENV_SINK_RETRIES) {
            let attempts: u32 = retries.trim().parse().map_err(|_| {
                HooklogError::ConfigError(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_SINK_RETRIES, retries
                ))
            })?;
            config.sink_failure = if attempts == 0 {
                SinkFailurePolicy::Drop
            } else {
                SinkFailurePolicy::Retry { attempts }
            };
        }

        Ok(config)
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn with_echo_console(mut self, echo: bool) -> Self {
        self.echo_console = echo;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn with_sink_failure(mut self, policy: SinkFailurePolicy) -> Self {
        self.sink_failure = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();

        assert_eq!(config.log_file, PathBuf::from("agent_logs.jsonl"));
        assert!(config.echo_console);
        assert_eq!(config.message_echo_chars, 30);
        assert_eq!(config.preview_chars, 100);
        assert_eq!(config.tool_echo_chars, 50);
        assert_eq!(config.sink_failure, SinkFailurePolicy::Drop);
    }

    #[test]
    fn test_lookup_without_variables_gives_defaults() {
        let config = LoggerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(config.echo_console);
    }

    #[test]
    fn test_lookup_reads_all_variables() {
        let config = LoggerConfig::from_lookup(lookup_from(&[
            ("HOOKLOG_FILE", "/tmp/run.jsonl"),
            ("HOOKLOG_ECHO", "off"),
            ("HOOKLOG_SINK_RETRIES", "3"),
        ]))
        .unwrap();

        assert_eq!(config.log_file, PathBuf::from("/tmp/run.jsonl"));
        assert!(!config.echo_console);
        assert_eq!(config.sink_failure, SinkFailurePolicy::Retry { attempts: 3 });
    }

    #[test]
    fn test_zero_retries_means_drop() {
        let config =
            LoggerConfig::from_lookup(lookup_from(&[("HOOKLOG_SINK_RETRIES", "0")])).unwrap();
        assert_eq!(config.sink_failure, SinkFailurePolicy::Drop);
    }

    #[test]
    fn test_invalid_echo_is_rejected() {
        let result = LoggerConfig::from_lookup(lookup_from(&[("HOOKLOG_ECHO", "maybe")]));
        assert!(matches!(result, Err(HooklogError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_retries_is_rejected() {
        let result = LoggerConfig::from_lookup(lookup_from(&[("HOOKLOG_SINK_RETRIES", "-1")]));
        assert!(matches!(result, Err(HooklogError::ConfigError(_))));
    }

    #[test]
    fn test_empty_log_file_is_rejected() {
        let result = LoggerConfig::from_lookup(lookup_from(&[("HOOKLOG_FILE", "  ")]));
        assert!(matches!(result, Err(HooklogError::ConfigError(_))));
    }

    #[test]
    fn test_builder_setters() {
        let config = LoggerConfig::default()
            .with_log_file("other.jsonl")
            .with_echo_console(false)
            .with_preview_chars(20)
            .with_sink_failure(SinkFailurePolicy::Retry { attempts: 2 });

        assert_eq!(config.log_file, PathBuf::from("other.jsonl"));
        assert!(!config.echo_console);
        assert_eq!(config.preview_chars, 20);
        assert_eq!(config.sink_failure, SinkFailurePolicy::Retry { attempts: 2 });
    }
}
