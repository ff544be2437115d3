use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use suplo_core::config::{Backend, LlmConfig};
use suplo_core::conversation::ConversationMessage;

/// Exactly one completion is requested per call; reply assembly reads a
/// single text field.
const COMPLETION_COUNT: u8 = 1;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{backend} completion failed with status {status}: {message}")]
    Api { backend: Backend, status: u16, message: String },
    #[error("{backend} completion response contained no choices")]
    EmptyChoices { backend: Backend },
}

/// Outbound call to a completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        backend: Backend,
        messages: &[ConversationMessage],
    ) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    n: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Clone, Debug)]
pub struct BackendEndpoint {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
}

impl BackendEndpoint {
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// HTTP client for the OpenAI-compatible chat-completions wire format; both
/// supported backends differ only in base URL, model id, and key.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    openai: BackendEndpoint,
    deepseek: BackendEndpoint,
    temperature: Option<f32>,
}

impl HttpCompletionClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        let timeout =
            config.openai.timeout_secs.max(config.deepseek.timeout_secs);
        let client = reqwest::Client::builder().timeout(Duration::from_secs(timeout)).build()?;

        Ok(Self {
            client,
            openai: BackendEndpoint {
                base_url: config.openai.base_url.clone(),
                model: config.openai.model.clone(),
                api_key: config.openai.api_key.clone(),
            },
            deepseek: BackendEndpoint {
                base_url: config.deepseek.base_url.clone(),
                model: config.deepseek.model.clone(),
                api_key: config.deepseek.api_key.clone(),
            },
            temperature: config.temperature,
        })
    }

    fn endpoint(&self, backend: Backend) -> &BackendEndpoint {
        match backend {
            Backend::OpenAi => &self.openai,
            Backend::DeepSeek => &self.deepseek,
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        backend: Backend,
        messages: &[ConversationMessage],
    ) -> Result<String, CompletionError> {
        let endpoint = self.endpoint(backend);
        let request = ChatCompletionRequest {
            model: &endpoint.model,
            messages,
            n: COMPLETION_COUNT,
            temperature: self.temperature,
        };

        let mut builder = self.client.post(endpoint.completions_url()).json(&request);
        if let Some(api_key) = &endpoint.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|error| {
                format!("failed to read error response body: {error}")
            });
            return Err(CompletionError::Api { backend, status: status.as_u16(), message });
        }

        let payload: ChatCompletionResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyChoices { backend })
    }
}

#[cfg(test)]
mod tests {
    use suplo_core::conversation::ConversationMessage;

    use super::{
        ChatCompletionRequest, ChatCompletionResponse, CompletionError, COMPLETION_COUNT,
    };
    use suplo_core::config::Backend;

    #[test]
    fn request_serializes_single_completion_and_omits_absent_temperature() {
        let messages =
            vec![ConversationMessage::system("s"), ConversationMessage::user("hello")];
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            n: COMPLETION_COUNT,
            temperature: None,
        };

        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["n"], 1);
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn request_serializes_temperature_when_configured() {
        let messages = vec![ConversationMessage::user("hello")];
        let request = ChatCompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            n: COMPLETION_COUNT,
            temperature: Some(0.7),
        };

        let json = serde_json::to_value(&request).expect("serialize");
        assert!((json["temperature"].as_f64().expect("temperature") - 0.7).abs() < 1e-6);
    }

    #[test]
    fn response_parse_extracts_first_choice_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"reply text"}}]}"#;
        let payload: ChatCompletionResponse = serde_json::from_str(raw).expect("parse");
        let content = payload.choices.into_iter().next().map(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("reply text"));
    }

    #[test]
    fn api_error_carries_backend_status_and_message() {
        let error = CompletionError::Api {
            backend: Backend::DeepSeek,
            status: 429,
            message: "rate limited".to_owned(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("deepseek"));
        assert!(rendered.contains("429"));
        assert!(rendered.contains("rate limited"));
    }
}
