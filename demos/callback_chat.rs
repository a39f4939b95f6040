//! Interactive chat demonstration with the execution event logger
//!
//! This example wires an `ExecutionEventLogger` into an agent as its lifecycle hooks and
//! runs an interactive chat loop. Every run start, model call, tool call and run end is
//! echoed to the console and appended to a JSON Lines log (`agent_logs.jsonl` unless
//! `HOOKLOG_FILE` says otherwise). When the user exits, a summary of the recorded events
//! is printed.
//!
//! The model is a small rule-based stand-in so the demo runs offline: ask for the time or
//! for the weather in a city to see tool calls in the log.
//!
//! # Running the example
//!
//! ```bash
//! cargo run --example callback_chat
//! RUST_LOG=hooklog=debug cargo run --example callback_chat
//! ```

use async_trait::async_trait;
use hooklog::config::LoggerConfig;
use hooklog::content::{Content, Part, Role};
use hooklog::event_log::{
    CompletionContext, EventStore, EventType, ExecutionEventLogger, FanoutSink, JsonlFileSink,
    LogEntry, LogSink,
};
use hooklog::hooks::{LlmRequest, LlmResponse};
use hooklog::runner::{Agent, ModelBackend, Runner, Session};
use hooklog::tools::{CurrentTimeTool, WeatherTool};
use serde_json::{json, Map, Value};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "CallbackDemo";
const USER_ID: &str = "user1";

/// Answers time and weather questions through tools and echoes everything else
struct KeywordBackend;

impl KeywordBackend {
    fn summarize(name: &str, response: &Value) -> String {
        if let Some(error) = response.get("error").and_then(Value::as_str) {
            return format!("Sorry, that did not work: {}", error);
        }

        match name {
            "get_current_time" => format!(
                "The current time is {} on {} ({}).",
                response["current_time"].as_str().unwrap_or("unknown"),
                response["current_date"].as_str().unwrap_or("unknown"),
                response["timezone"].as_str().unwrap_or("local time")
            ),
            "get_weather" => format!(
                "In {} it is {}°C and {} with {}% humidity.",
                response["location"].as_str().unwrap_or("that place"),
                response["temperature_celsius"],
                response["conditions"].as_str().unwrap_or("unknown").to_lowercase(),
                response["humidity"]
            ),
            other => format!("{} returned {}", other, response),
        }
    }

    /// Text after the last " in ", matched case-insensitively on the original message
    fn location_in(message: &str) -> Option<String> {
        const MARKER: &str = " in ";
        let start = message
            .char_indices()
            .rev()
            .map(|(i, _)| i)
            .find(|&i| {
                message
                    .get(i..i + MARKER.len())
                    .is_some_and(|s| s.eq_ignore_ascii_case(MARKER))
            })?
            + MARKER.len();
        let location = message[start..]
            .trim()
            .trim_end_matches(|c: char| c == '?' || c == '.' || c == '!');
        (!location.is_empty()).then(|| location.to_string())
    }

    fn call(name: &str, args: Map<String, Value>) -> LlmResponse {
        LlmResponse::new(Content::with_parts(Role::Model, vec![Part::function_call(name, args)]))
    }
}

#[async_trait]
impl ModelBackend for KeywordBackend {
    async fn generate(&self, request: &LlmRequest) -> hooklog::Result<LlmResponse> {
        let Some(last) = request.contents.last() else {
            return Ok(LlmResponse::text("Hello! Ask me for the time or the weather."));
        };

        let tool_answers: Vec<String> = last
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::FunctionResponse { name, response, .. } => Some(Self::summarize(name, response)),
                _ => None,
            })
            .collect();
        if !tool_answers.is_empty() {
            return Ok(LlmResponse::text(tool_answers.join(" ")));
        }

        let message = last.joined_text();
        let lower = message.to_lowercase();

        if lower.contains("weather") {
            return Ok(match Self::location_in(&message) {
                Some(location) => {
                    let mut args = Map::new();
                    args.insert("location".to_string(), json!(location));
                    Self::call("get_weather", args)
                }
                None => LlmResponse::text("Which city would you like the weather for?"),
            });
        }

        if lower.contains("time") || lower.contains("date") {
            return Ok(Self::call("get_current_time", Map::new()));
        }

        Ok(LlmResponse::text(format!("You said: {}", message)))
    }
}

fn print_summary(store: &EventStore, log_path: &str) {
    println!();
    println!("{}", "=".repeat(80));
    println!("Event Log Summary");
    println!("{}", "=".repeat(80));

    println!("Total events recorded: {}", store.len());
    for event_type in [
        EventType::RunStart,
        EventType::RunEnd,
        EventType::RunEndFallback,
        EventType::LlmCall,
        EventType::LlmResponse,
        EventType::ToolCall,
        EventType::ToolResponse,
    ] {
        let of_type = move |e: &LogEntry| e.event_type == event_type;
        let count = store.count_events(None, None, Some(&of_type));
        if count > 0 {
            println!("  - {}: {}", event_type, count);
        }
    }

    let recent = store.get_last_n(5, None);
    if !recent.is_empty() {
        println!();
        println!("Last {} events:", recent.len());
        for (i, entry) in recent.iter().enumerate() {
            println!("{}. {}", i + 1, entry.printable_summary());
        }
    }

    println!();
    println!("Full log written to {}", log_path);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = LoggerConfig::from_env()?;
    let log_path = config.log_file.display().to_string();

    let store = Arc::new(EventStore::default());
    let file = Arc::new(JsonlFileSink::create(&config.log_file).await?);
    let sinks: Vec<Arc<dyn LogSink>> = vec![file, store.clone()];
    let logger = Arc::new(ExecutionEventLogger::new(
        Arc::new(FanoutSink::new(sinks)),
        config,
    ));

    let agent = Agent::builder("logger_agent", "rule-based")
        .description("An agent that demonstrates lifecycle logging")
        .instruction("Answer questions. Use get_current_time for time questions and get_weather for weather questions.")
        .tool(Arc::new(CurrentTimeTool::new()))
        .tool(Arc::new(WeatherTool::new()))
        .hooks(logger.clone())
        .build();
    let runner = Runner::new(agent, Arc::new(KeywordBackend));
    let mut session = Session::new(APP_NAME, USER_ID);
    let session_id = session.id().to_string();
    let agent_name = runner.agent().name.clone();

    println!("{}", "=".repeat(80));
    println!("Interactive Chat with Lifecycle Logging");
    println!("{}", "=".repeat(80));
    println!("Events are logged to {}", log_path);
    println!("Try 'What time is it?' or 'What's the weather in Paris?'");
    println!("Type 'exit' or 'quit' to end the session.");
    println!();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let context = CompletionContext {
            session_id: Some(&session_id),
            user_id: Some(USER_ID),
            agent_name: Some(&agent_name),
        };

        match runner.run(&mut session, input).await {
            Ok(output) => {
                println!("Agent: {}\n", output.final_text);

                if logger.is_open(&output.invocation_id) {
                    logger
                        .log_completion(Some(&output.invocation_id), &output.final_text, context)
                        .await;
                }
            }
            Err(e) => {
                eprintln!("Error: {}\n", e);
                logger.log_completion(None, &format!("Error: {}", e), context).await;
            }
        }
    }

    logger.sink().flush().await?;
    print_summary(&store, &log_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_after_in() {
        assert_eq!(
            KeywordBackend::location_in("What's the weather in Paris?"),
            Some("Paris".to_string())
        );
        assert_eq!(
            KeywordBackend::location_in("WEATHER IN Tokyo"),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn test_location_uses_last_in() {
        assert_eq!(
            KeywordBackend::location_in("Weather in spring in Oslo."),
            Some("Oslo".to_string())
        );
    }

    #[test]
    fn test_location_with_case_folding_that_changes_length() {
        // 'İ' grows by a byte when lowercased
        assert_eq!(
            KeywordBackend::location_in("İİİ weather in Zürich!"),
            Some("Zürich".to_string())
        );
    }

    #[test]
    fn test_no_location() {
        assert_eq!(KeywordBackend::location_in("What's the weather?"), None);
        assert_eq!(KeywordBackend::location_in("Weather in "), None);
    }

    #[tokio::test]
    async fn test_weather_question_calls_tool_with_location() {
        let request = LlmRequest {
            model: "rule-based".to_string(),
            system_instruction: None,
            contents: vec![Content::user("ÀÉÎ weather in Lyon?")],
            tools: Vec::new(),
        };

        let response = KeywordBackend.generate(&request).await.unwrap();
        let content = response.content.unwrap();

        match &content.parts[0] {
            Part::FunctionCall { name, args, .. } => {
                assert_eq!(name, "get_weather");
                assert_eq!(args["location"], json!("Lyon"));
            }
            other => panic!("expected a tool call, got {:?}", other),
        }
    }
}
