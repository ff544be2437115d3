use anyhow::Result;
use tracing::debug;

use suplo_core::config::Backend;
use suplo_core::conversation::{ChannelMessage, ThreadReply};

use crate::dispatch::CompletionDispatcher;
use crate::documents::DocumentPipeline;
use crate::normalize::normalize_thread;
use crate::prompt::{assemble, assemble_channel_summary};
use crate::router::UnsupportedBackend;
use crate::shortcuts::{match_shortcut, Shortcut, IDENTITY_REPLY};

/// Outcome of the per-thread message pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssistantReply {
    /// A shortcut answered without any model call.
    Canned(String),
    /// The completion backend produced this reply text.
    Completed(String),
    /// The message redirects into the channel summarization path; the
    /// caller fetches channel history and invokes `summarize_channel`.
    SummarizeRequested,
}

/// The parameterized conversation pipeline. The deployment variants differ
/// only in this configuration: default backend (via the router), history
/// window, sampling temperature (via the completion client), and whether
/// document uploads are handled.
pub struct AssistantRuntime {
    dispatcher: CompletionDispatcher,
    documents: DocumentPipeline,
    history_window: usize,
    documents_enabled: bool,
}

impl AssistantRuntime {
    pub fn new(
        dispatcher: CompletionDispatcher,
        documents: DocumentPipeline,
        history_window: usize,
        documents_enabled: bool,
    ) -> Self {
        Self { dispatcher, documents, history_window, documents_enabled }
    }

    pub fn documents_enabled(&self) -> bool {
        self.documents_enabled
    }

    /// Full per-thread path: shortcut interception, then normalize →
    /// assemble → resolve → dispatch.
    pub async fn handle_user_message(
        &self,
        user_id: &str,
        text: &str,
        replies: &[ThreadReply],
    ) -> Result<AssistantReply> {
        match match_shortcut(text) {
            Some(Shortcut::Identity) => {
                debug!(
                    event_name = "assistant.shortcut.identity",
                    user_id,
                    "identity question short-circuited without a model call"
                );
                return Ok(AssistantReply::Canned(IDENTITY_REPLY.to_owned()));
            }
            Some(Shortcut::SummarizeChannel) => {
                return Ok(AssistantReply::SummarizeRequested);
            }
            None => {}
        }

        let window = normalize_thread(replies, self.history_window);
        let messages = assemble(&window, text);
        let reply = self.dispatcher.dispatch(user_id, &messages).await?;
        Ok(AssistantReply::Completed(reply))
    }

    /// Channel summarization: `history` arrives newest-first from the
    /// transport and is reversed to chronological order before assembly.
    pub async fn summarize_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        mut history: Vec<ChannelMessage>,
    ) -> Result<String> {
        history.reverse();
        let messages = assemble_channel_summary(channel_id, &history);
        let reply = self.dispatcher.dispatch(user_id, &messages).await?;
        Ok(reply)
    }

    /// Single-turn completion with no thread history (mention replies,
    /// document analysis).
    pub async fn complete_single(&self, user_id: &str, text: &str) -> Result<String> {
        let messages = assemble(&[], text);
        let reply = self.dispatcher.dispatch(user_id, &messages).await?;
        Ok(reply)
    }

    /// Extracts text from an uploaded document and asks the backend to
    /// analyze it.
    pub async fn analyze_document(
        &self,
        user_id: &str,
        file_type: &str,
        data: &[u8],
    ) -> Result<String> {
        let extracted = self.documents.extract_text(file_type, data).await?;
        self.complete_single(user_id, &format!("Analyze this document content: {extracted}"))
            .await
    }

    pub async fn set_provider_preference(
        &self,
        user_id: &str,
        requested: &str,
    ) -> Result<Backend, UnsupportedBackend> {
        self.dispatcher.router().set_preference(user_id, requested).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use suplo_core::config::Backend;
    use suplo_core::conversation::{ChannelMessage, ConversationMessage, Role, ThreadReply};

    use super::{AssistantReply, AssistantRuntime};
    use crate::dispatch::CompletionDispatcher;
    use crate::documents::DocumentPipeline;
    use crate::llm::{CompletionClient, CompletionError};
    use crate::router::{InMemoryPreferenceStore, ProviderRouter};

    #[derive(Default)]
    struct RecordingCompletionClient {
        requests: Mutex<Vec<Vec<ConversationMessage>>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingCompletionClient {
        async fn complete(
            &self,
            _backend: Backend,
            messages: &[ConversationMessage],
        ) -> Result<String, CompletionError> {
            self.requests.lock().await.push(messages.to_vec());
            Ok("model reply".to_owned())
        }
    }

    fn runtime_with(client: Arc<RecordingCompletionClient>) -> AssistantRuntime {
        let router = ProviderRouter::new(
            Arc::new(InMemoryPreferenceStore::default()),
            Backend::OpenAi,
        );
        AssistantRuntime::new(
            CompletionDispatcher::new(router, client),
            DocumentPipeline::noop(),
            10,
            true,
        )
    }

    #[tokio::test]
    async fn identity_question_yields_canned_reply_and_zero_completion_calls() {
        let client = Arc::new(RecordingCompletionClient::default());
        let runtime = runtime_with(client.clone());
        let replies = vec![
            ThreadReply::from_user("UA", "hi"),
            ThreadReply::from_bot("B1", "hello"),
        ];

        let reply = runtime
            .handle_user_message("UA", "who are you", &replies)
            .await
            .expect("pipeline");

        assert!(matches!(reply, AssistantReply::Canned(text) if text.contains("Suplo")));
        assert!(client.requests.lock().await.is_empty(), "no completion call expected");
    }

    #[tokio::test]
    async fn normal_message_dispatches_windowed_history_with_system_prefix() {
        let client = Arc::new(RecordingCompletionClient::default());
        let runtime = runtime_with(client.clone());
        let replies: Vec<_> = (0..14)
            .map(|index| ThreadReply::from_user("UA", format!("m{index}")))
            .collect();

        let reply = runtime
            .handle_user_message("UA", "latest question", &replies)
            .await
            .expect("pipeline");

        assert!(matches!(reply, AssistantReply::Completed(text) if text == "model reply"));
        let requests = client.requests.lock().await;
        let messages = &requests[0];
        // system + 10-message window + new utterance
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "m4");
        assert_eq!(messages[11].content, "latest question");
    }

    #[tokio::test]
    async fn summarize_prompt_contains_every_message_in_chronological_order() {
        let client = Arc::new(RecordingCompletionClient::default());
        let runtime = runtime_with(client.clone());
        // Newest-first, as the transport returns channel history.
        let history = vec![
            ChannelMessage { user_id: Some("U3".to_owned()), text: "third".to_owned() },
            ChannelMessage { user_id: Some("U2".to_owned()), text: "second".to_owned() },
            ChannelMessage { user_id: Some("U1".to_owned()), text: "first".to_owned() },
        ];

        runtime.summarize_channel("UA", "C9", history).await.expect("summary");

        let requests = client.requests.lock().await;
        assert_eq!(requests.len(), 1, "exactly one completion call");
        let prompt = &requests[0][1].content;
        let first = prompt.find("<@U1> says: first").expect("first");
        let second = prompt.find("<@U2> says: second").expect("second");
        let third = prompt.find("<@U3> says: third").expect("third");
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn document_analysis_wraps_extracted_text() {
        struct StubExtractor;

        #[async_trait]
        impl crate::documents::DocumentExtractor for StubExtractor {
            async fn extract(
                &self,
                _data: &[u8],
            ) -> Result<String, crate::documents::DocumentError> {
                Ok("quarterly report body".to_owned())
            }
        }

        let client = Arc::new(RecordingCompletionClient::default());
        let router = ProviderRouter::new(
            Arc::new(InMemoryPreferenceStore::default()),
            Backend::OpenAi,
        );
        let runtime = AssistantRuntime::new(
            CompletionDispatcher::new(router, client.clone()),
            DocumentPipeline::new(Arc::new(StubExtractor), Arc::new(StubExtractor)),
            10,
            true,
        );

        runtime.analyze_document("UA", "pdf", b"%PDF").await.expect("analysis");

        let requests = client.requests.lock().await;
        let prompt = &requests[0][1].content;
        assert_eq!(prompt, "Analyze this document content: quarterly report body");
    }

    #[tokio::test]
    async fn unsupported_document_error_keeps_the_fixed_message() {
        let client = Arc::new(RecordingCompletionClient::default());
        let runtime = runtime_with(client.clone());

        let error = runtime
            .analyze_document("UA", "xls", b"...")
            .await
            .expect_err("unsupported type");

        assert_eq!(error.to_string(), "Sorry Document type not supported");
        assert!(client.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn suggested_prompt_redirects_to_summarization() {
        let client = Arc::new(RecordingCompletionClient::default());
        let runtime = runtime_with(client.clone());

        let reply = runtime
            .handle_user_message(
                "UA",
                crate::shortcuts::SUMMARIZE_CHANNEL_PROMPT,
                &[],
            )
            .await
            .expect("pipeline");

        assert_eq!(reply, AssistantReply::SummarizeRequested);
        assert!(client.requests.lock().await.is_empty());
    }
}
