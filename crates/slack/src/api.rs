use async_trait::async_trait;
use thiserror::Error;

use suplo_core::conversation::{ChannelMessage, ThreadReply};

use crate::blocks::{MessageTemplate, ModalView};

/// Outbound Web API failure. Carried as strings so the seam stays free of
/// HTTP client types; the reqwest-backed implementation lives in the server
/// crate.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("slack api transport failed: {0}")]
    Http(String),
    #[error("slack api call `{method}` failed: {error}")]
    Slack { method: String, error: String },
    #[error("slack api response for `{method}` was malformed: {detail}")]
    Malformed { method: String, detail: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostedMessage {
    pub ts: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
    pub filetype: String,
    pub url_private: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub text: String,
    pub emoji: String,
    /// Epoch seconds after which Slack clears the status.
    pub expiration: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedPrompt {
    pub title: String,
    pub message: String,
}

/// The outbound Slack Web API surface the bot uses. The transport itself is
/// an external collaborator; handlers depend on this trait and tests inject
/// recording fakes.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        message: &MessageTemplate,
    ) -> Result<PostedMessage, ApiError>;

    async fn update_message(
        &self,
        channel_id: &str,
        ts: &str,
        message: &MessageTemplate,
    ) -> Result<(), ApiError>;

    async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<(), ApiError>;

    async fn fetch_thread_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<ThreadReply>, ApiError>;

    /// Newest-first channel history, bounded by `limit`.
    async fn fetch_channel_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, ApiError>;

    async fn fetch_file_info(&self, file_id: &str) -> Result<FileInfo, ApiError>;

    async fn download_file(&self, url: &str) -> Result<Vec<u8>, ApiError>;

    async fn join_channel(&self, channel_id: &str) -> Result<(), ApiError>;

    async fn user_email(&self, user_id: &str) -> Result<Option<String>, ApiError>;

    async fn set_user_status(
        &self,
        user_id: &str,
        status: &StatusUpdate,
    ) -> Result<(), ApiError>;

    async fn set_thread_title(
        &self,
        channel_id: &str,
        thread_ts: &str,
        title: &str,
    ) -> Result<(), ApiError>;

    async fn set_thread_status(
        &self,
        channel_id: &str,
        thread_ts: &str,
        status: &str,
    ) -> Result<(), ApiError>;

    async fn set_suggested_prompts(
        &self,
        channel_id: &str,
        thread_ts: &str,
        title: &str,
        prompts: &[SuggestedPrompt],
    ) -> Result<(), ApiError>;
}

/// Does nothing and succeeds; the default wiring until a real client is
/// registered, and a harmless stand-in for tests that don't assert on
/// outbound traffic.
#[derive(Default)]
pub struct NoopChatApi;

#[async_trait]
impl ChatApi for NoopChatApi {
    async fn post_message(
        &self,
        _channel_id: &str,
        _thread_ts: Option<&str>,
        _message: &MessageTemplate,
    ) -> Result<PostedMessage, ApiError> {
        Ok(PostedMessage { ts: "0000000000.000000".to_owned() })
    }

    async fn update_message(
        &self,
        _channel_id: &str,
        _ts: &str,
        _message: &MessageTemplate,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn open_view(&self, _trigger_id: &str, _view: &ModalView) -> Result<(), ApiError> {
        Ok(())
    }

    async fn fetch_thread_replies(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
    ) -> Result<Vec<ThreadReply>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_channel_history(
        &self,
        _channel_id: &str,
        _limit: u32,
    ) -> Result<Vec<ChannelMessage>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_file_info(&self, file_id: &str) -> Result<FileInfo, ApiError> {
        Ok(FileInfo {
            id: file_id.to_owned(),
            name: String::new(),
            filetype: String::new(),
            url_private: String::new(),
        })
    }

    async fn download_file(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
        Ok(Vec::new())
    }

    async fn join_channel(&self, _channel_id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn user_email(&self, _user_id: &str) -> Result<Option<String>, ApiError> {
        Ok(None)
    }

    async fn set_user_status(
        &self,
        _user_id: &str,
        _status: &StatusUpdate,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn set_thread_title(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
        _title: &str,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn set_thread_status(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
        _status: &str,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn set_suggested_prompts(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
        _title: &str,
        _prompts: &[SuggestedPrompt],
    ) -> Result<(), ApiError> {
        Ok(())
    }
}
