//! Shared test fakes for the server crate.

use async_trait::async_trait;
use tokio::sync::Mutex;

use suplo_core::conversation::{ChannelMessage, ThreadReply};
use suplo_slack::api::{
    ApiError, ChatApi, FileInfo, PostedMessage, StatusUpdate, SuggestedPrompt,
};
use suplo_slack::blocks::{MessageTemplate, ModalView};

/// Records outbound Slack traffic and serves scripted fetch results.
#[derive(Default)]
pub struct RecordingChatApi {
    pub posts: Mutex<Vec<(String, MessageTemplate)>>,
    pub updates: Mutex<Vec<(String, String, MessageTemplate)>>,
    pub statuses: Mutex<Vec<(String, StatusUpdate)>>,
    pub opened_views: Mutex<Vec<(String, ModalView)>>,
    pub history_requests: Mutex<Vec<(String, u32)>>,
    pub suggested_prompts: Mutex<Vec<(String, Vec<SuggestedPrompt>)>>,
    pub email: Option<String>,
    pub thread_replies: Vec<ThreadReply>,
    pub channel_history: Vec<ChannelMessage>,
    pub file_info: Option<FileInfo>,
    pub file_data: Vec<u8>,
}

#[async_trait]
impl ChatApi for RecordingChatApi {
    async fn post_message(
        &self,
        channel_id: &str,
        _thread_ts: Option<&str>,
        message: &MessageTemplate,
    ) -> Result<PostedMessage, ApiError> {
        self.posts.lock().await.push((channel_id.to_owned(), message.clone()));
        Ok(PostedMessage { ts: "1730000000.100000".to_owned() })
    }

    async fn update_message(
        &self,
        channel_id: &str,
        ts: &str,
        message: &MessageTemplate,
    ) -> Result<(), ApiError> {
        self.updates.lock().await.push((channel_id.to_owned(), ts.to_owned(), message.clone()));
        Ok(())
    }

    async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<(), ApiError> {
        self.opened_views.lock().await.push((trigger_id.to_owned(), view.clone()));
        Ok(())
    }

    async fn fetch_thread_replies(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
    ) -> Result<Vec<ThreadReply>, ApiError> {
        Ok(self.thread_replies.clone())
    }

    async fn fetch_channel_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, ApiError> {
        self.history_requests.lock().await.push((channel_id.to_owned(), limit));
        Ok(self.channel_history.clone())
    }

    async fn fetch_file_info(&self, file_id: &str) -> Result<FileInfo, ApiError> {
        Ok(self.file_info.clone().unwrap_or(FileInfo {
            id: file_id.to_owned(),
            name: String::new(),
            filetype: String::new(),
            url_private: String::new(),
        }))
    }

    async fn download_file(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.file_data.clone())
    }

    async fn join_channel(&self, _channel_id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn user_email(&self, _user_id: &str) -> Result<Option<String>, ApiError> {
        Ok(self.email.clone())
    }

    async fn set_user_status(
        &self,
        user_id: &str,
        status: &StatusUpdate,
    ) -> Result<(), ApiError> {
        self.statuses.lock().await.push((user_id.to_owned(), status.clone()));
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
        channel_id: &str,
        _thread_ts: &str,
        _title: &str,
        prompts: &[SuggestedPrompt],
    ) -> Result<(), ApiError> {
        self.suggested_prompts.lock().await.push((channel_id.to_owned(), prompts.to_vec()));
        Ok(())
    }
}
