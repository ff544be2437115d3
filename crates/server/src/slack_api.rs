//! reqwest-backed implementation of the outbound Slack Web API seam.
//!
//! Every call POSTs JSON to `https://slack.com/api/<method>` with the bot
//! token and checks the `ok`/`error` envelope; profile status updates use
//! the user-scoped token.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use suplo_core::conversation::{ChannelMessage, ThreadReply};
use suplo_slack::api::{
    ApiError, ChatApi, FileInfo, PostedMessage, StatusUpdate, SuggestedPrompt,
};
use suplo_slack::blocks::{MessageTemplate, ModalView};

const SLACK_API_BASE: &str = "https://slack.com/api";

pub struct HttpChatApi {
    client: Client,
    base_url: String,
    bot_token: SecretString,
    user_token: Option<SecretString>,
}

impl HttpChatApi {
    pub fn new(bot_token: SecretString, user_token: Option<SecretString>) -> Self {
        Self {
            client: Client::new(),
            base_url: SLACK_API_BASE.to_owned(),
            bot_token,
            user_token,
        }
    }

    async fn call(
        &self,
        method: &str,
        payload: Value,
        token: &SecretString,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{method}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|error| ApiError::Http(error.to_string()))?;

        let body: Value =
            response.json().await.map_err(|error| ApiError::Http(error.to_string()))?;

        if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            Ok(body)
        } else {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_owned();
            Err(ApiError::Slack { method: method.to_owned(), error })
        }
    }

    async fn bot_call(&self, method: &str, payload: Value) -> Result<Value, ApiError> {
        self.call(method, payload, &self.bot_token).await
    }
}

pub(crate) fn message_payload(
    channel_id: &str,
    thread_ts: Option<&str>,
    message: &MessageTemplate,
) -> Value {
    let mut payload = json!({
        "channel": channel_id,
        "text": message.fallback_text,
    });
    if let Some(thread_ts) = thread_ts {
        payload["thread_ts"] = json!(thread_ts);
    }
    if !message.blocks.is_empty() {
        payload["blocks"] = json!(message.blocks);
    }
    payload
}

pub(crate) fn replies_from(body: &Value) -> Vec<ThreadReply> {
    body.get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .map(|message| ThreadReply {
                    user_id: message
                        .get("user")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    bot_id: message
                        .get("bot_id")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    text: message.get("text").and_then(Value::as_str).map(str::to_owned),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn channel_history_from(body: &Value) -> Vec<ChannelMessage> {
    body.get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .map(|message| ChannelMessage {
                    user_id: message
                        .get("user")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    text: message
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn file_info_from(body: &Value) -> Result<FileInfo, ApiError> {
    let file = body.get("file").ok_or_else(|| ApiError::Malformed {
        method: "files.info".to_owned(),
        detail: "missing `file` object".to_owned(),
    })?;

    let field = |name: &str| -> Result<String, ApiError> {
        file.get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::Malformed {
                method: "files.info".to_owned(),
                detail: format!("missing `file.{name}`"),
            })
    };

    Ok(FileInfo {
        id: field("id")?,
        name: field("name").unwrap_or_default(),
        filetype: field("filetype")?,
        url_private: field("url_private")?,
    })
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        message: &MessageTemplate,
    ) -> Result<PostedMessage, ApiError> {
        let body = self
            .bot_call("chat.postMessage", message_payload(channel_id, thread_ts, message))
            .await?;
        let ts = body
            .get("ts")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Malformed {
                method: "chat.postMessage".to_owned(),
                detail: "missing `ts`".to_owned(),
            })?
            .to_owned();
        Ok(PostedMessage { ts })
    }

    async fn update_message(
        &self,
        channel_id: &str,
        ts: &str,
        message: &MessageTemplate,
    ) -> Result<(), ApiError> {
        let mut payload = message_payload(channel_id, None, message);
        payload["ts"] = json!(ts);
        self.bot_call("chat.update", payload).await?;
        Ok(())
    }

    async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<(), ApiError> {
        self.bot_call("views.open", json!({ "trigger_id": trigger_id, "view": view })).await?;
        Ok(())
    }

    async fn fetch_thread_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<ThreadReply>, ApiError> {
        let body = self
            .bot_call(
                "conversations.replies",
                json!({ "channel": channel_id, "ts": thread_ts, "oldest": thread_ts }),
            )
            .await?;
        Ok(replies_from(&body))
    }

    async fn fetch_channel_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, ApiError> {
        let body = self
            .bot_call("conversations.history", json!({ "channel": channel_id, "limit": limit }))
            .await?;
        Ok(channel_history_from(&body))
    }

    async fn fetch_file_info(&self, file_id: &str) -> Result<FileInfo, ApiError> {
        let body = self.bot_call("files.info", json!({ "file": file_id })).await?;
        file_info_from(&body)
    }

    async fn download_file(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.bot_token.expose_secret())
            .send()
            .await
            .map_err(|error| ApiError::Http(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Slack {
                method: "files.download".to_owned(),
                error: format!("status {status}"),
            });
        }

        let bytes =
            response.bytes().await.map_err(|error| ApiError::Http(error.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn join_channel(&self, channel_id: &str) -> Result<(), ApiError> {
        self.bot_call("conversations.join", json!({ "channel": channel_id })).await?;
        Ok(())
    }

    async fn user_email(&self, user_id: &str) -> Result<Option<String>, ApiError> {
        let body = self.bot_call("users.info", json!({ "user": user_id })).await?;
        Ok(body
            .pointer("/user/profile/email")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    async fn set_user_status(
        &self,
        user_id: &str,
        status: &StatusUpdate,
    ) -> Result<(), ApiError> {
        let Some(user_token) = &self.user_token else {
            return Err(ApiError::Slack {
                method: "users.profile.set".to_owned(),
                error: "user token not configured".to_owned(),
            });
        };

        let mut profile = json!({
            "status_text": status.text,
            "status_emoji": status.emoji,
        });
        if let Some(expiration) = status.expiration {
            profile["status_expiration"] = json!(expiration);
        }

        self.call(
            "users.profile.set",
            json!({ "user": user_id, "profile": profile }),
            user_token,
        )
        .await?;
        Ok(())
    }

    async fn set_thread_title(
        &self,
        channel_id: &str,
        thread_ts: &str,
        title: &str,
    ) -> Result<(), ApiError> {
        self.bot_call(
            "assistant.threads.setTitle",
            json!({ "channel_id": channel_id, "thread_ts": thread_ts, "title": title }),
        )
        .await?;
        Ok(())
    }

    async fn set_thread_status(
        &self,
        channel_id: &str,
        thread_ts: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.bot_call(
            "assistant.threads.setStatus",
            json!({ "channel_id": channel_id, "thread_ts": thread_ts, "status": status }),
        )
        .await?;
        Ok(())
    }

    async fn set_suggested_prompts(
        &self,
        channel_id: &str,
        thread_ts: &str,
        title: &str,
        prompts: &[SuggestedPrompt],
    ) -> Result<(), ApiError> {
        let prompt_payloads: Vec<Value> = prompts
            .iter()
            .map(|prompt| json!({ "title": prompt.title, "message": prompt.message }))
            .collect();

        self.bot_call(
            "assistant.threads.setSuggestedPrompts",
            json!({
                "channel_id": channel_id,
                "thread_ts": thread_ts,
                "title": title,
                "prompts": prompt_payloads,
            }),
        )
        .await?;
        Ok(())
    }
}
