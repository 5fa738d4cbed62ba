//! HTTP client for an OpenAI-compatible chat-completions endpoint (OpenRouter by default).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat:free";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("completion contained no message")]
    EmptyCompletion,
}

/// Client for a single chat model behind a chat-completions API.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
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

impl ChatClient {
    /// Create a client for the given API base URL.
    ///
    /// `base_url` should be like `https://openrouter.ai/api/v1` (no trailing slash).
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user question and return the first completion's text.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: question,
            }],
        };

        info!(url = %url, model = %self.model, chars = question.len(), "asking chat model");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let answer = parse_completion(&bytes)?;
        info!(chars = answer.len(), "chat model answered");
        Ok(answer)
    }
}

fn parse_completion(bytes: &[u8]) -> Result<String, ChatError> {
    let parsed: CompletionResponse = serde_json::from_slice(bytes)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ChatError::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_client_trims_trailing_slash() {
        let client = ChatClient::new(
            "https://openrouter.ai/api/v1/".into(),
            "key".into(),
            DEFAULT_MODEL.into(),
        );
        assert_eq!(client.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn request_body_shape() {
        let body = CompletionRequest {
            model: DEFAULT_MODEL,
            messages: [Message {
                role: "user",
                content: "What causes migraines?",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What causes migraines?");
    }

    #[test]
    fn parse_first_choice() {
        let json = br#"{
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Stay hydrated."}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        assert_eq!(parse_completion(json).unwrap(), "Stay hydrated.");
    }

    #[test]
    fn parse_no_choices() {
        let err = parse_completion(br#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ChatError::EmptyCompletion));
    }

    #[test]
    fn parse_null_content() {
        let json = br#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(
            parse_completion(json).unwrap_err(),
            ChatError::EmptyCompletion
        ));
    }

    #[test]
    fn parse_garbage() {
        assert!(matches!(
            parse_completion(b"<html>").unwrap_err(),
            ChatError::Json(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let client = ChatClient::new("http://127.0.0.1:9".into(), "key".into(), "m".into());
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Http(_)));
    }
}
