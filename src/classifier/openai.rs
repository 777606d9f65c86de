//! OpenAI互換 Chat Completions クライアント
//!
//! `POST {base_url}/chat/completions` に system/user の2メッセージを送り、
//! `choices[0].message.content` を回答として返す。

use super::{CompletionClient, CompletionRequest};
use crate::config::Config;
use crate::error::{Result, TaggerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout_seconds: u64,
}

impl OpenAiClient {
    pub fn new(api_key: &str, config: &Config) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TaggerError::ClientInit("APIキーが空です".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TaggerError::ClientInit(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            endpoint: chat_completions_url(&config.base_url),
            timeout_seconds: config.timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// レスポンスJSONから回答テキストを取り出す
fn extract_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| TaggerError::ClassifierApi(format!("レスポンスのパースに失敗: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TaggerError::ClassifierApi("レスポンスに回答が含まれていません".into()))
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest::from(request);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TaggerError::ClassifierApi(format!(
                        "タイムアウト（{}秒）: {}",
                        self.timeout_seconds, e
                    ))
                } else {
                    TaggerError::ClassifierApi(format!("リクエスト失敗: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TaggerError::ClassifierApi(format!("レスポンス読み込み失敗: {}", e)))?;

        tracing::debug!(status = status.as_u16(), body_len = text.len(), "chat completion response");

        if !status.is_success() {
            return Err(TaggerError::ClassifierApi(format!(
                "Error code: {} - {}",
                status.as_u16(),
                text.trim()
            )));
        }

        extract_content(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_completions_url() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:8080/v1/"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".into(),
            system: "sys".into(),
            user: "usr".into(),
            temperature: 0.5,
            max_tokens: 20,
        };
        let value = serde_json::to_value(ChatRequest::from(&request)).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "sys");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "usr");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 20);
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Retail"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Retail");
    }

    #[test]
    fn test_extract_content_missing() {
        let err = extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, TaggerError::ClassifierApi(_)));

        let err = extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, TaggerError::ClassifierApi(_)));
    }

    #[test]
    fn test_extract_content_invalid_json() {
        let err = extract_content("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TaggerError::ClassifierApi(_)));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let err = OpenAiClient::new("  ", &Config::default()).err().unwrap();
        assert!(matches!(err, TaggerError::ClientInit(_)));
    }

    #[test]
    fn test_new_builds_endpoint() {
        let client = OpenAiClient::new("sk-test", &Config::default()).unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
