use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::GeminiProviderConfig;
use super::utils::{gemini_response_text, gemini_usage, handle_response, messages_to_gemini_contents};
use crate::errors::ProviderResult;
use crate::models::history::HistoryEntry;

/// Google Generative Language API, `generateContent`
pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> ProviderResult<Value> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        handle_response(response).await
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[HistoryEntry],
    ) -> ProviderResult<(String, Usage)> {
        let mut payload = json!({
            "contents": messages_to_gemini_contents(messages),
        });

        if !system.is_empty() {
            payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = self.config.temperature {
            generation_config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = self.config.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(tokens));
        }
        if !generation_config.is_empty() {
            payload["generationConfig"] = Value::Object(generation_config);
        }

        let response = self.post(payload).await?;
        let text = gemini_response_text(&response)?;
        Ok((text, gemini_usage(&response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server(response: ResponseTemplate) -> (MockServer, GeminiProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test_api_key"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        let config = GeminiProviderConfig {
            host: mock_server.uri(),
            ..GeminiProviderConfig::new("test_api_key")
        };

        let provider = GeminiProvider::new(config).unwrap();
        (mock_server, provider)
    }

    #[tokio::test]
    async fn test_complete_basic() -> anyhow::Result<()> {
        let response_body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "We ship worldwide."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 4, "totalTokenCount": 44}
        });
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(200).set_body_json(response_body)).await;

        let messages = vec![HistoryEntry::user("Do you ship to the UK?")];
        let (text, usage) = provider.complete("You are CZTL support.", &messages).await?;

        assert_eq!(text, "We ship worldwide.");
        assert_eq!(usage.total_tokens, Some(44));
        Ok(())
    }

    #[tokio::test]
    async fn test_request_carries_system_instruction_and_history() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "systemInstruction": {"parts": [{"text": "Directive"}]},
                "contents": [
                    {"role": "model", "parts": [{"text": "Hello!"}]},
                    {"role": "user", "parts": [{"text": "Hi"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new(GeminiProviderConfig {
            host: mock_server.uri(),
            ..GeminiProviderConfig::new("key")
        })?;
        let messages = vec![HistoryEntry::model("Hello!"), HistoryEntry::user("Hi")];
        let (text, _) = provider.complete("Directive", &messages).await?;
        assert_eq!(text, "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let (_server, provider) = setup_mock_server(ResponseTemplate::new(429)).await;
        let result = provider.complete("", &[HistoryEntry::user("hi")]).await;
        assert!(matches!(result, Err(ProviderError::RateLimited(429))));
    }

    #[tokio::test]
    async fn test_bad_request_keeps_body() {
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(400).set_body_string("API key not valid")).await;
        let result = provider.complete("", &[HistoryEntry::user("hi")]).await;
        match result {
            Err(ProviderError::Request { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("Expected request error, got {:?}", other),
        }
    }
}
