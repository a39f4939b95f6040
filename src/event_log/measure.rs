//! Size metrics and previews derived from hook payloads
//!
//! Lengths count characters, not bytes, so previews never split a UTF-8 sequence.

use crate::hooks::{AgentResult, LlmRequest, LlmResponse};
use serde_json::Value;

pub const NO_RESPONSE_TEXT: &str = "No response text";
pub const NO_RESPONSE: &str = "No response";

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Sum of the lengths of every text-bearing part across the request contents
pub fn prompt_length(request: &LlmRequest) -> usize {
    request
        .contents
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.as_text())
        .map(char_len)
        .sum()
}

/// Sum of the lengths of the string form of every response part.
///
/// Non-text parts such as function calls count through their `Display` form.
pub fn response_length(response: &LlmResponse) -> usize {
    response
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .map(|part| char_len(&part.to_string()))
        .sum()
}

/// String form of a JSON value: strings verbatim, everything else as compact JSON
pub fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Response text extracted from an agent completion result
pub fn response_text(result: &AgentResult, max_chars: usize) -> String {
    match result {
        AgentResult::TextContent(content) => {
            content.first_text().unwrap_or(NO_RESPONSE_TEXT).to_string()
        }
        AgentResult::StructuredEvent(event) => event
            .content
            .as_ref()
            .and_then(|content| content.first_text())
            .unwrap_or(NO_RESPONSE_TEXT)
            .to_string(),
        AgentResult::Unknown(raw) if raw.is_empty() => NO_RESPONSE.to_string(),
        AgentResult::Unknown(raw) => truncate_chars(raw, max_chars),
    }
}
