use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use super::base::Usage;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::history::{HistoryEntry, HistoryRole};

/// Map a non-success HTTP status to a provider error, otherwise decode the JSON body
pub async fn handle_response(response: Response) -> ProviderResult<Value> {
    match response.status() {
        StatusCode::OK => Ok(response.json().await?),
        StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited(
            StatusCode::TOO_MANY_REQUESTS.as_u16(),
        )),
        status if status.is_server_error() => Err(ProviderError::Server(status.as_u16())),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::Request {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Convert the history view to Gemini `contents`
pub fn messages_to_gemini_contents(messages: &[HistoryEntry]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let role = match message.role {
                HistoryRole::User => "user",
                HistoryRole::Model => "model",
            };
            json!({
                "role": role,
                "parts": [{ "text": message.content }]
            })
        })
        .collect()
}

/// Extract the reply text of a Gemini `generateContent` response
///
/// A response without candidates carries no text and yields an empty reply,
/// unless the prompt itself was blocked.
pub fn gemini_response_text(response: &Value) -> ProviderResult<String> {
    if let Some(reason) = response
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(|reason| reason.as_str())
    {
        return Err(ProviderError::Blocked(reason.to_string()));
    }

    let candidates = match response.get("candidates") {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(candidates) => candidates
            .as_array()
            .ok_or_else(|| ProviderError::MalformedResponse("candidates is not an array".into()))?,
    };

    let Some(first) = candidates.first() else {
        return Ok(String::new());
    };

    let text = first
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

pub fn gemini_usage(response: &Value) -> Usage {
    let metadata = response.get("usageMetadata");
    let count = |key: &str| {
        metadata
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
    };
    Usage::new(
        count("promptTokenCount"),
        count("candidatesTokenCount"),
        count("totalTokenCount"),
    )
}

/// Convert the history view to OpenAI chat messages, system message first
pub fn messages_to_openai_messages(system: &str, messages: &[HistoryEntry]) -> Vec<Value> {
    let mut wire = vec![json!({ "role": "system", "content": system })];
    wire.extend(messages.iter().map(|message| {
        let role = match message.role {
            HistoryRole::User => "user",
            HistoryRole::Model => "assistant",
        };
        json!({ "role": role, "content": message.content })
    }));
    wire
}

/// Extract the reply text of an OpenAI chat completion; a null content is an empty reply
pub fn openai_response_text(response: &Value) -> ProviderResult<String> {
    if let Some(error) = response.get("error") {
        return Err(ProviderError::MalformedResponse(format!(
            "OpenAI API error: {}",
            error
        )));
    }

    let message = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| ProviderError::MalformedResponse("no choices in response".into()))?;

    Ok(message
        .get("content")
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string())
}

pub fn openai_usage(response: &Value) -> Usage {
    let usage = response.get("usage");
    let count = |key: &str| {
        usage
            .and_then(|u| u.get(key))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
    };
    let input_tokens = count("prompt_tokens");
    let output_tokens = count("completion_tokens");
    let total_tokens = count("total_tokens").or_else(|| match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    });
    Usage::new(input_tokens, output_tokens, total_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::model("Hello!"),
            HistoryEntry::user("How long does shipping take?"),
        ]
    }

    #[test]
    fn test_messages_to_gemini_contents() {
        let wire = messages_to_gemini_contents(&sample_history());
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0]["role"], "model");
        assert_eq!(wire[0]["parts"][0]["text"], "Hello!");
        assert_eq!(wire[1]["role"], "user");
    }

    #[test]
    fn test_gemini_response_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Delivery takes "}, {"text": "2-3 weeks."}]
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(gemini_response_text(&response).unwrap(), "Delivery takes 2-3 weeks.");
    }

    #[test]
    fn test_gemini_response_without_candidates_is_empty() {
        assert_eq!(gemini_response_text(&json!({})).unwrap(), "");
        assert_eq!(gemini_response_text(&json!({"candidates": []})).unwrap(), "");
        assert_eq!(
            gemini_response_text(&json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap(),
            ""
        );
    }

    #[test]
    fn test_gemini_blocked_prompt() {
        let response = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(matches!(
            gemini_response_text(&response),
            Err(ProviderError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_gemini_malformed_candidates() {
        let response = json!({"candidates": "oops"});
        assert!(matches!(
            gemini_response_text(&response),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_gemini_usage() {
        let response = json!({
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
        });
        assert_eq!(gemini_usage(&response), Usage::new(Some(12), Some(8), Some(20)));
        assert_eq!(gemini_usage(&json!({})), Usage::default());
    }

    #[test]
    fn test_messages_to_openai_messages() {
        let wire = messages_to_openai_messages("Be concise.", &sample_history());
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0], json!({"role": "system", "content": "Be concise."}));
        assert_eq!(wire[1]["role"], "assistant");
        assert_eq!(wire[2]["content"], "How long does shipping take?");
    }

    #[test]
    fn test_openai_response_text() {
        let response = json!({"choices": [{"message": {"role": "assistant", "content": "Hi"}}]});
        assert_eq!(openai_response_text(&response).unwrap(), "Hi");

        let null_content = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        assert_eq!(openai_response_text(&null_content).unwrap(), "");

        assert!(openai_response_text(&json!({"choices": []})).is_err());
        assert!(openai_response_text(&json!({"error": {"message": "quota"}})).is_err());
    }

    #[test]
    fn test_openai_usage_computes_total() {
        let response = json!({"usage": {"prompt_tokens": 3, "completion_tokens": 4}});
        assert_eq!(openai_usage(&response), Usage::new(Some(3), Some(4), Some(7)));
    }
}
