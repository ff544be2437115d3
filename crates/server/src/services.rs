//! Event service implementations wiring the Slack surface to the assistant
//! runtime and the approval workflow.
//!
//! Every service catches its own failures at the handler boundary: the user
//! gets a single fallback reply (or a specific message), the error is
//! logged with structured fields, and nothing propagates past the
//! dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use suplo_assistant::documents::{DocumentError, UNSUPPORTED_UPLOAD_NOTICE};
use suplo_assistant::shortcuts::{
    match_shortcut, mention_requests_summary, Shortcut, IDENTITY_REPLY,
    SUMMARIZE_CHANNEL_PROMPT,
};
use suplo_assistant::AssistantRuntime;
use suplo_slack::api::{ChatApi, SuggestedPrompt};
use suplo_slack::blocks::{
    error_message, leave_request_modal, timesheet_modal, MessageTemplate,
};
use suplo_slack::commands::{CommandRouteError, CommandService, SlashCommandPayload};
use suplo_slack::events::{
    AppMentionEvent, BlockActionEvent, BlockActionService, EventContext, EventHandlerError,
    FileSharedEvent, FileSharedService, MentionService, ThreadContextChangedEvent,
    ThreadLifecycleService, ThreadStartedEvent, UserMessageEvent, UserMessageService,
    ViewSubmissionEvent, ViewSubmissionService,
};

use crate::approvals::{submission_failure_notice, ApprovalFlow};

/// Greeting posted when an assistant thread starts.
pub const THREAD_GREETING: &str = "Hi, how can Suplo help?";

/// Fixed user-facing reply for any handler failure.
pub const FALLBACK_REPLY: &str = "Something unexpected happened while processing your request";

/// Status shown while a completion is in flight.
const TYPING_STATUS: &str = "is typing...";

/// Channel messages fetched for a summarization request.
pub const SUMMARY_FETCH_LIMIT: u32 = 50;

const SUGGESTED_PROMPTS_TITLE: &str = "Here are some suggested options by Suplo:";

fn suggested_prompts(has_context_channel: bool) -> Vec<SuggestedPrompt> {
    let mut prompts = vec![SuggestedPrompt {
        title: "This is a suggested prompt".to_owned(),
        message: "When a user clicks a prompt, the resulting prompt message text can be passed \
                  directly to your LLM for processing.\n\nAssistant, please create some helpful \
                  prompts I can provide to my users."
            .to_owned(),
    }];

    if has_context_channel {
        prompts.push(SuggestedPrompt {
            title: "Summarize channel".to_owned(),
            message: SUMMARIZE_CHANNEL_PROMPT.to_owned(),
        });
    }

    prompts
}

/// Thread → context-channel map. Same lifetime and durability stance as the
/// provider preference map: process-wide, in-memory, lost on restart.
#[derive(Default)]
pub struct ThreadContextStore {
    entries: RwLock<HashMap<(String, String), Option<String>>>,
}

impl ThreadContextStore {
    pub async fn save(&self, channel_id: &str, thread_ts: &str, context_channel: Option<String>) {
        self.entries
            .write()
            .await
            .insert((channel_id.to_owned(), thread_ts.to_owned()), context_channel);
    }

    pub async fn context_channel(&self, channel_id: &str, thread_ts: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .get(&(channel_id.to_owned(), thread_ts.to_owned()))
            .cloned()
            .flatten()
    }
}

pub struct SuploThreadLifecycle {
    api: Arc<dyn ChatApi>,
    contexts: Arc<ThreadContextStore>,
}

impl SuploThreadLifecycle {
    pub fn new(api: Arc<dyn ChatApi>, contexts: Arc<ThreadContextStore>) -> Self {
        Self { api, contexts }
    }
}

#[async_trait]
impl ThreadLifecycleService for SuploThreadLifecycle {
    async fn thread_started(
        &self,
        event: &ThreadStartedEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        self.contexts
            .save(&event.channel_id, &event.thread_ts, event.context_channel_id.clone())
            .await;

        let greeting = MessageTemplate::text(THREAD_GREETING);
        if let Err(api_error) =
            self.api.post_message(&event.channel_id, Some(&event.thread_ts), &greeting).await
        {
            error!(
                event_name = "assistant.thread_started.greeting_failed",
                correlation_id = %ctx.correlation_id,
                channel_id = %event.channel_id,
                error = %api_error,
                "failed to greet new assistant thread"
            );
            return Ok(());
        }

        let prompts = suggested_prompts(event.context_channel_id.is_some());
        if let Err(api_error) = self
            .api
            .set_suggested_prompts(
                &event.channel_id,
                &event.thread_ts,
                SUGGESTED_PROMPTS_TITLE,
                &prompts,
            )
            .await
        {
            error!(
                event_name = "assistant.thread_started.prompts_failed",
                correlation_id = %ctx.correlation_id,
                channel_id = %event.channel_id,
                error = %api_error,
                "failed to publish suggested prompts"
            );
        }

        Ok(())
    }

    async fn context_changed(
        &self,
        event: &ThreadContextChangedEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        self.contexts
            .save(&event.channel_id, &event.thread_ts, event.context_channel_id.clone())
            .await;
        Ok(())
    }
}

pub struct SuploUserMessageService {
    runtime: Arc<AssistantRuntime>,
    api: Arc<dyn ChatApi>,
    contexts: Arc<ThreadContextStore>,
}

impl SuploUserMessageService {
    pub fn new(
        runtime: Arc<AssistantRuntime>,
        api: Arc<dyn ChatApi>,
        contexts: Arc<ThreadContextStore>,
    ) -> Self {
        Self { runtime, api, contexts }
    }

    async fn reply(&self, event: &UserMessageEvent, text: &str) -> Option<MessageTemplate> {
        let message = MessageTemplate::text(text);
        match self
            .api
            .post_message(&event.channel_id, Some(&event.thread_ts), &message)
            .await
        {
            Ok(_) => Some(message),
            Err(api_error) => {
                error!(
                    event_name = "assistant.user_message.reply_failed",
                    channel_id = %event.channel_id,
                    thread_id = %event.thread_ts,
                    error = %api_error,
                    "failed to post assistant reply"
                );
                None
            }
        }
    }

    async fn summarize_context_channel(&self, event: &UserMessageEvent) -> anyhow::Result<String> {
        let Some(context_channel) =
            self.contexts.context_channel(&event.channel_id, &event.thread_ts).await
        else {
            return Ok(
                "I can only summarize a channel when this thread has channel context. Try \
                 mentioning me in the channel you want summarized."
                    .to_owned(),
            );
        };

        let history =
            self.api.fetch_channel_history(&context_channel, SUMMARY_FETCH_LIMIT).await?;
        self.runtime.summarize_channel(&event.user_id, &context_channel, history).await
    }

    async fn run_pipeline(&self, event: &UserMessageEvent) -> anyhow::Result<String> {
        match match_shortcut(&event.text) {
            Some(Shortcut::Identity) => Ok(IDENTITY_REPLY.to_owned()),
            Some(Shortcut::SummarizeChannel) => self.summarize_context_channel(event).await,
            None => {
                let replies =
                    self.api.fetch_thread_replies(&event.channel_id, &event.thread_ts).await?;
                match self
                    .runtime
                    .handle_user_message(&event.user_id, &event.text, &replies)
                    .await?
                {
                    suplo_assistant::AssistantReply::Canned(text)
                    | suplo_assistant::AssistantReply::Completed(text) => Ok(text),
                    suplo_assistant::AssistantReply::SummarizeRequested => {
                        self.summarize_context_channel(event).await
                    }
                }
            }
        }
    }
}

#[async_trait]
impl UserMessageService for SuploUserMessageService {
    async fn user_message(
        &self,
        event: &UserMessageEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        if let Err(api_error) =
            self.api.set_thread_title(&event.channel_id, &event.thread_ts, &event.text).await
        {
            debug!(error = %api_error, "failed to set thread title");
        }
        if let Err(api_error) = self
            .api
            .set_thread_status(&event.channel_id, &event.thread_ts, TYPING_STATUS)
            .await
        {
            debug!(error = %api_error, "failed to set typing status");
        }

        match self.run_pipeline(event).await {
            Ok(reply_text) => Ok(self.reply(event, &reply_text).await),
            Err(pipeline_error) => {
                error!(
                    event_name = "assistant.user_message.failed",
                    correlation_id = %ctx.correlation_id,
                    channel_id = %event.channel_id,
                    thread_id = %event.thread_ts,
                    error = %pipeline_error,
                    "user message pipeline failed; sending fallback reply"
                );
                Ok(self.reply(event, FALLBACK_REPLY).await)
            }
        }
    }
}

pub struct SuploMentionService {
    runtime: Arc<AssistantRuntime>,
    api: Arc<dyn ChatApi>,
}

impl SuploMentionService {
    pub fn new(runtime: Arc<AssistantRuntime>, api: Arc<dyn ChatApi>) -> Self {
        Self { runtime, api }
    }

    async fn run(&self, event: &AppMentionEvent) -> anyhow::Result<String> {
        if mention_requests_summary(&event.text) {
            let history =
                self.api.fetch_channel_history(&event.channel_id, SUMMARY_FETCH_LIMIT).await?;
            self.runtime.summarize_channel(&event.user_id, &event.channel_id, history).await
        } else {
            self.runtime.complete_single(&event.user_id, &event.text).await
        }
    }
}

#[async_trait]
impl MentionService for SuploMentionService {
    async fn app_mention(
        &self,
        event: &AppMentionEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        let reply_text = match self.run(event).await {
            Ok(reply_text) => reply_text,
            Err(mention_error) => {
                error!(
                    event_name = "assistant.mention.failed",
                    correlation_id = %ctx.correlation_id,
                    channel_id = %event.channel_id,
                    error = %mention_error,
                    "mention handling failed; sending fallback reply"
                );
                FALLBACK_REPLY.to_owned()
            }
        };

        let message = MessageTemplate::text(&reply_text);
        if let Err(api_error) = self.api.post_message(&event.channel_id, None, &message).await {
            error!(
                event_name = "assistant.mention.reply_failed",
                channel_id = %event.channel_id,
                error = %api_error,
                "failed to post mention reply"
            );
            return Ok(None);
        }
        Ok(Some(message))
    }
}

pub struct SuploFileService {
    runtime: Arc<AssistantRuntime>,
    api: Arc<dyn ChatApi>,
}

impl SuploFileService {
    pub fn new(runtime: Arc<AssistantRuntime>, api: Arc<dyn ChatApi>) -> Self {
        Self { runtime, api }
    }

    async fn run(&self, event: &FileSharedEvent) -> anyhow::Result<String> {
        let info = self.api.fetch_file_info(&event.file_id).await?;
        let data = self.api.download_file(&info.url_private).await?;
        self.runtime.analyze_document(&event.user_id, &info.filetype, &data).await
    }
}

#[async_trait]
impl FileSharedService for SuploFileService {
    async fn file_shared(
        &self,
        event: &FileSharedEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        if !self.runtime.documents_enabled() {
            debug!(
                event_name = "assistant.file_shared.disabled",
                channel_id = %event.channel_id,
                "document uploads disabled for this deployment"
            );
            return Ok(None);
        }

        let reply_text = match self.run(event).await {
            Ok(analysis) => analysis,
            Err(document_error) => {
                if matches!(
                    document_error.downcast_ref::<DocumentError>(),
                    Some(DocumentError::Unsupported { .. })
                ) {
                    UNSUPPORTED_UPLOAD_NOTICE.to_owned()
                } else {
                    error!(
                        event_name = "assistant.file_shared.failed",
                        correlation_id = %ctx.correlation_id,
                        file_id = %event.file_id,
                        error = %document_error,
                        "document processing failed; sending fallback reply"
                    );
                    FALLBACK_REPLY.to_owned()
                }
            }
        };

        let message = MessageTemplate::text(&reply_text);
        if let Err(api_error) = self.api.post_message(&event.channel_id, None, &message).await {
            error!(
                event_name = "assistant.file_shared.reply_failed",
                channel_id = %event.channel_id,
                error = %api_error,
                "failed to post document reply"
            );
            return Ok(None);
        }
        Ok(Some(message))
    }
}

pub struct SuploCommandService {
    runtime: Arc<AssistantRuntime>,
    api: Arc<dyn ChatApi>,
}

impl SuploCommandService {
    pub fn new(runtime: Arc<AssistantRuntime>, api: Arc<dyn ChatApi>) -> Self {
        Self { runtime, api }
    }
}

#[async_trait]
impl CommandService for SuploCommandService {
    async fn open_timesheet(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        let view = timesheet_modal(Some(Utc::now().timestamp()));
        if let Err(api_error) = self.api.open_view(&payload.trigger_id, &view).await {
            error!(
                event_name = "commands.timesheet_modal_failed",
                user_id = %payload.user_id,
                error = %api_error,
                "failed to open timesheet modal"
            );
        }
        Ok(None)
    }

    async fn open_leave_request(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let view = leave_request_modal(Some(today));
        if let Err(api_error) = self.api.open_view(&payload.trigger_id, &view).await {
            error!(
                event_name = "commands.leave_request_modal_failed",
                user_id = %payload.user_id,
                error = %api_error,
                "failed to open leave request modal"
            );
        }
        Ok(None)
    }

    async fn set_provider(
        &self,
        payload: &SlashCommandPayload,
        requested: &str,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        let message = match self.runtime.set_provider_preference(&payload.user_id, requested).await
        {
            Ok(backend) => {
                info!(
                    event_name = "commands.provider_preference_set",
                    user_id = %payload.user_id,
                    backend = %backend,
                    "provider preference recorded"
                );
                MessageTemplate::text(format!(
                    "Got it <@{}>, your replies will now come from `{backend}`.",
                    payload.user_id
                ))
            }
            Err(unsupported) => error_message(&unsupported.to_string(), &payload.request_id),
        };

        if let Err(api_error) =
            self.api.post_message(&payload.channel_id, None, &message).await
        {
            error!(
                event_name = "commands.provider_reply_failed",
                user_id = %payload.user_id,
                error = %api_error,
                "failed to post provider preference reply"
            );
        }
        Ok(Some(message))
    }
}

pub struct SuploViewSubmissionService {
    approvals: Arc<ApprovalFlow>,
    api: Arc<dyn ChatApi>,
}

impl SuploViewSubmissionService {
    pub fn new(approvals: Arc<ApprovalFlow>, api: Arc<dyn ChatApi>) -> Self {
        Self { approvals, api }
    }

    async fn notify_failure(&self, user_id: &str, kind: &str) {
        let notice = MessageTemplate::text(submission_failure_notice(kind));
        if let Err(api_error) = self.api.post_message(user_id, None, &notice).await {
            error!(
                event_name = "approvals.submission_notice_failed",
                user_id,
                error = %api_error,
                "failed to notify submitter of submission failure"
            );
        }
    }
}

#[async_trait]
impl ViewSubmissionService for SuploViewSubmissionService {
    async fn view_submitted(
        &self,
        event: &ViewSubmissionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        match event.callback_id.as_str() {
            "timesheet_modal" => {
                if let Err(approval_error) =
                    self.approvals.submit_timesheet_form(&event.user_id, &event.values).await
                {
                    error!(
                        event_name = "approvals.timesheet_submission_failed",
                        correlation_id = %ctx.correlation_id,
                        user_id = %event.user_id,
                        error = %approval_error,
                        "timesheet submission failed"
                    );
                    self.notify_failure(&event.user_id, "timesheet").await;
                }
            }
            "leaverequest_modal" => {
                if let Err(approval_error) =
                    self.approvals.submit_leave_form(&event.user_id, &event.values).await
                {
                    error!(
                        event_name = "approvals.leave_submission_failed",
                        correlation_id = %ctx.correlation_id,
                        user_id = %event.user_id,
                        error = %approval_error,
                        "leave request submission failed"
                    );
                    self.notify_failure(&event.user_id, "Leave Request").await;
                }
            }
            other => {
                debug!(callback_id = other, "ignoring unrecognized view submission");
            }
        }
        Ok(())
    }
}

pub struct SuploBlockActionService {
    approvals: Arc<ApprovalFlow>,
}

impl SuploBlockActionService {
    pub fn new(approvals: Arc<ApprovalFlow>) -> Self {
        Self { approvals }
    }
}

#[async_trait]
impl BlockActionService for SuploBlockActionService {
    async fn block_action(
        &self,
        event: &BlockActionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        match self.approvals.handle_action(event).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(action_id = %event.action_id, "ignoring unrecognized block action");
            }
            Err(approval_error) => {
                error!(
                    event_name = "approvals.action_failed",
                    correlation_id = %ctx.correlation_id,
                    action_id = %event.action_id,
                    approver_id = %event.user_id,
                    error = %approval_error,
                    "approval action failed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use suplo_assistant::dispatch::CompletionDispatcher;
    use suplo_assistant::documents::DocumentPipeline;
    use suplo_assistant::llm::{CompletionClient, CompletionError};
    use suplo_assistant::router::{InMemoryPreferenceStore, ProviderRouter};
    use suplo_assistant::AssistantRuntime;
    use suplo_core::config::Backend;
    use suplo_core::conversation::{ChannelMessage, ConversationMessage, ThreadReply};
    use suplo_slack::api::FileInfo;
    use suplo_slack::commands::{CommandService, SlashCommandPayload};
    use suplo_slack::events::{
        AppMentionEvent, EventContext, FileSharedEvent, MentionService, ThreadLifecycleService,
        ThreadStartedEvent, UserMessageEvent, UserMessageService, FileSharedService,
    };

    use crate::testing::RecordingChatApi;

    use super::{
        SuploCommandService, SuploFileService, SuploMentionService, SuploThreadLifecycle,
        SuploUserMessageService, ThreadContextStore, FALLBACK_REPLY, SUMMARY_FETCH_LIMIT,
        THREAD_GREETING,
    };

    #[derive(Default)]
    struct RecordingCompletionClient {
        requests: Mutex<Vec<Vec<ConversationMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionClient for RecordingCompletionClient {
        async fn complete(
            &self,
            backend: Backend,
            messages: &[ConversationMessage],
        ) -> Result<String, CompletionError> {
            if self.fail {
                return Err(CompletionError::Api {
                    backend,
                    status: 500,
                    message: "upstream exploded".to_owned(),
                });
            }
            self.requests.lock().await.push(messages.to_vec());
            Ok("model reply".to_owned())
        }
    }

    fn runtime(client: Arc<RecordingCompletionClient>) -> Arc<AssistantRuntime> {
        let router = ProviderRouter::new(
            Arc::new(InMemoryPreferenceStore::default()),
            Backend::OpenAi,
        );
        Arc::new(AssistantRuntime::new(
            CompletionDispatcher::new(router, client),
            DocumentPipeline::noop(),
            10,
            true,
        ))
    }

    fn user_message(text: &str) -> UserMessageEvent {
        UserMessageEvent {
            channel_id: "D1".to_owned(),
            thread_ts: "1730000000.1".to_owned(),
            user_id: "UA".to_owned(),
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn identity_question_gets_canned_reply_with_no_completion_call() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi {
            thread_replies: vec![
                ThreadReply::from_user("UA", "hi"),
                ThreadReply::from_bot("B1", "hello"),
            ],
            ..RecordingChatApi::default()
        });
        let service = SuploUserMessageService::new(
            runtime(client.clone()),
            api.clone(),
            Arc::new(ThreadContextStore::default()),
        );

        let reply = service
            .user_message(&user_message("who are you"), &EventContext::default())
            .await
            .expect("handled");

        assert!(reply.expect("reply posted").fallback_text.contains("Suplo"));
        assert!(client.requests.lock().await.is_empty(), "no completion expected");
        let posts = api.posts.lock().await;
        assert_eq!(posts.len(), 1);
        assert!(posts[0].1.fallback_text.contains("The LEGEND"));
    }

    #[tokio::test]
    async fn ordinary_message_runs_the_completion_pipeline() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi {
            thread_replies: vec![ThreadReply::from_user("UA", "earlier question")],
            ..RecordingChatApi::default()
        });
        let service = SuploUserMessageService::new(
            runtime(client.clone()),
            api.clone(),
            Arc::new(ThreadContextStore::default()),
        );

        let reply = service
            .user_message(&user_message("draft a release note"), &EventContext::default())
            .await
            .expect("handled");

        assert_eq!(reply.expect("reply").fallback_text, "model reply");
        let requests = client.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].iter().any(|m| m.content == "earlier question"));
    }

    #[tokio::test]
    async fn pipeline_failure_produces_the_fixed_fallback_reply() {
        let client = Arc::new(RecordingCompletionClient { fail: true, ..Default::default() });
        let api = Arc::new(RecordingChatApi::default());
        let service = SuploUserMessageService::new(
            runtime(client),
            api.clone(),
            Arc::new(ThreadContextStore::default()),
        );

        let reply = service
            .user_message(&user_message("draft a release note"), &EventContext::default())
            .await
            .expect("handled despite upstream failure");

        assert_eq!(reply.expect("fallback posted").fallback_text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn mention_with_summarize_fetches_history_and_dispatches_once() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi {
            channel_history: vec![
                ChannelMessage { user_id: Some("U2".to_owned()), text: "second".to_owned() },
                ChannelMessage { user_id: Some("U1".to_owned()), text: "first".to_owned() },
            ],
            ..RecordingChatApi::default()
        });
        let service = SuploMentionService::new(runtime(client.clone()), api.clone());

        let reply = service
            .app_mention(
                &AppMentionEvent {
                    channel_id: "C7".to_owned(),
                    user_id: "UA".to_owned(),
                    text: "<@B1> please summarize this week".to_owned(),
                },
                &EventContext::default(),
            )
            .await
            .expect("handled");

        assert!(reply.is_some());
        assert_eq!(*api.history_requests.lock().await, vec![("C7".to_owned(), SUMMARY_FETCH_LIMIT)]);
        let requests = client.requests.lock().await;
        assert_eq!(requests.len(), 1, "exactly one completion call");
        let prompt = &requests[0][1].content;
        let first = prompt.find("<@U1> says: first").expect("first entry");
        let second = prompt.find("<@U2> says: second").expect("second entry");
        assert!(first < second, "prompt must be chronological");
    }

    #[tokio::test]
    async fn thread_start_greets_and_offers_summary_prompt_with_context() {
        let api = Arc::new(RecordingChatApi::default());
        let service =
            SuploThreadLifecycle::new(api.clone(), Arc::new(ThreadContextStore::default()));

        service
            .thread_started(
                &ThreadStartedEvent {
                    channel_id: "D1".to_owned(),
                    thread_ts: "1730000000.1".to_owned(),
                    user_id: "UA".to_owned(),
                    context_channel_id: Some("C7".to_owned()),
                },
                &EventContext::default(),
            )
            .await
            .expect("handled");

        let posts = api.posts.lock().await;
        assert_eq!(posts[0].1.fallback_text, THREAD_GREETING);
        let prompts = api.suggested_prompts.lock().await;
        assert_eq!(prompts[0].1.len(), 2);
        assert_eq!(prompts[0].1[1].title, "Summarize channel");
    }

    #[tokio::test]
    async fn unsupported_upload_gets_the_polite_notice() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi {
            file_info: Some(FileInfo {
                id: "F1".to_owned(),
                name: "deck.pptx".to_owned(),
                filetype: "pptx".to_owned(),
                url_private: "https://files.slack.com/F1".to_owned(),
            }),
            ..RecordingChatApi::default()
        });
        let service = SuploFileService::new(runtime(client.clone()), api.clone());

        let reply = service
            .file_shared(
                &FileSharedEvent {
                    channel_id: "C1".to_owned(),
                    file_id: "F1".to_owned(),
                    user_id: "UA".to_owned(),
                },
                &EventContext::default(),
            )
            .await
            .expect("handled");

        assert!(reply.expect("notice").fallback_text.contains("only supports PDF and DOCX"));
        assert!(client.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn provider_command_records_preference_and_confirms() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi::default());
        let service = SuploCommandService::new(runtime(client), api.clone());
        let payload = SlashCommandPayload {
            command: "/suplo".to_owned(),
            text: "provider deepseek".to_owned(),
            channel_id: "C1".to_owned(),
            user_id: "UA".to_owned(),
            trigger_id: "trigger-1".to_owned(),
            request_id: "req-1".to_owned(),
        };

        let message = service
            .set_provider(&payload, "deepseek")
            .await
            .expect("route")
            .expect("confirmation");

        assert!(message.fallback_text.contains("`deepseek`"));
    }

    #[tokio::test]
    async fn bogus_provider_lists_the_valid_set_and_keeps_resolution() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi::default());
        let runtime = runtime(client);
        let service = SuploCommandService::new(runtime.clone(), api.clone());
        let payload = SlashCommandPayload {
            command: "/suplo".to_owned(),
            text: "provider bogus".to_owned(),
            channel_id: "C1".to_owned(),
            user_id: "UA".to_owned(),
            trigger_id: "trigger-1".to_owned(),
            request_id: "req-1".to_owned(),
        };

        let message =
            service.set_provider(&payload, "bogus").await.expect("route").expect("error card");

        assert!(message.fallback_text.contains("unsupported backend `bogus`"));
        assert!(message.fallback_text.contains("openai, deepseek"));
    }

    #[tokio::test]
    async fn timesheet_command_opens_the_modal() {
        let client = Arc::new(RecordingCompletionClient::default());
        let api = Arc::new(RecordingChatApi::default());
        let service = SuploCommandService::new(runtime(client), api.clone());
        let payload = SlashCommandPayload {
            command: "/timesheet-lks".to_owned(),
            text: String::new(),
            channel_id: "C1".to_owned(),
            user_id: "UA".to_owned(),
            trigger_id: "trigger-99".to_owned(),
            request_id: "req-1".to_owned(),
        };

        let message = service.open_timesheet(&payload).await.expect("route");

        assert!(message.is_none());
        let views = api.opened_views.lock().await;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].0, "trigger-99");
        assert_eq!(views[0].1.callback_id, "timesheet_modal");
    }
}
