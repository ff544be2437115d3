use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use suplo_assistant::dispatch::CompletionDispatcher;
use suplo_assistant::documents::DocumentPipeline;
use suplo_assistant::llm::{CompletionError, HttpCompletionClient};
use suplo_assistant::router::{InMemoryPreferenceStore, ProviderRouter};
use suplo_assistant::AssistantRuntime;
use suplo_core::config::{AppConfig, ConfigError, LoadOptions};
use suplo_slack::api::ChatApi;
use suplo_slack::events::{
    AppMentionHandler, BlockActionHandler, EventDispatcher, FileSharedHandler,
    SlashCommandHandler, ThreadContextChangedHandler, ThreadStartedHandler, UserMessageHandler,
    ViewSubmissionHandler,
};
use suplo_slack::socket::SocketModeRunner;

use crate::approvals::ApprovalFlow;
use crate::crm::SalesforceClient;
use crate::services::{
    SuploBlockActionService, SuploCommandService, SuploFileService, SuploMentionService,
    SuploThreadLifecycle, SuploUserMessageService, SuploViewSubmissionService,
    ThreadContextStore,
};
use crate::slack_api::HttpChatApi;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AssistantRuntime>,
    pub slack_runner: SocketModeRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("completion client initialization failed: {0}")]
    CompletionClient(#[source] CompletionError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        default_backend = %config.llm.default_backend,
        "starting application bootstrap"
    );

    let completion_client = Arc::new(
        HttpCompletionClient::from_config(&config.llm).map_err(BootstrapError::CompletionClient)?,
    );
    let router = ProviderRouter::new(
        Arc::new(InMemoryPreferenceStore::default()),
        config.llm.default_backend,
    );
    let runtime = Arc::new(AssistantRuntime::new(
        CompletionDispatcher::new(router, completion_client),
        DocumentPipeline::noop(),
        config.assistant.history_window,
        config.assistant.documents_enabled,
    ));

    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(
        config.slack.bot_token.clone(),
        config.slack.user_token.clone(),
    ));

    let crm = SalesforceClient::from_config(&config.crm);
    info!(
        event_name = "system.bootstrap.crm_mode",
        correlation_id = "bootstrap",
        crm_enabled = crm.is_some(),
        "crm integration resolved"
    );
    let approvals = Arc::new(ApprovalFlow::new(
        api.clone(),
        crm,
        config.slack.approvals_channel.clone(),
    ));

    let dispatcher = build_dispatcher(runtime.clone(), api, approvals);
    let slack_runner = SocketModeRunner::noop_with_dispatcher(dispatcher);

    info!(
        event_name = "system.bootstrap.complete",
        correlation_id = "bootstrap",
        history_window = config.assistant.history_window,
        "application bootstrap complete"
    );

    Ok(Application { config, runtime, slack_runner })
}

fn build_dispatcher(
    runtime: Arc<AssistantRuntime>,
    api: Arc<dyn ChatApi>,
    approvals: Arc<ApprovalFlow>,
) -> EventDispatcher {
    let contexts = Arc::new(ThreadContextStore::default());
    let lifecycle = Arc::new(SuploThreadLifecycle::new(api.clone(), contexts.clone()));

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(ThreadStartedHandler::new(lifecycle.clone()));
    dispatcher.register(ThreadContextChangedHandler::new(lifecycle));
    dispatcher.register(UserMessageHandler::new(SuploUserMessageService::new(
        runtime.clone(),
        api.clone(),
        contexts,
    )));
    dispatcher.register(AppMentionHandler::new(SuploMentionService::new(
        runtime.clone(),
        api.clone(),
    )));
    dispatcher.register(FileSharedHandler::new(SuploFileService::new(
        runtime.clone(),
        api.clone(),
    )));
    dispatcher.register(SlashCommandHandler::new(SuploCommandService::new(
        runtime,
        api.clone(),
    )));
    dispatcher.register(ViewSubmissionHandler::new(SuploViewSubmissionService::new(
        approvals.clone(),
        api,
    )));
    dispatcher.register(BlockActionHandler::new(SuploBlockActionService::new(approvals)));
    dispatcher
}

#[cfg(test)]
mod tests {
    use suplo_core::config::{ConfigOverrides, LoadOptions};

    use super::bootstrap;

    fn valid_overrides() -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                slack_app_token: Some("xapp-test".to_string()),
                slack_bot_token: Some("xoxb-test".to_string()),
                openai_api_key: Some("sk-test".to_string()),
                approvals_channel: Some("C0APPROVALS".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_required_slack_tokens() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                slack_app_token: Some("invalid-token".to_string()),
                slack_bot_token: Some("xoxb-valid".to_string()),
                openai_api_key: Some("sk-test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("slack.app_token"));
    }

    #[tokio::test]
    async fn bootstrap_wires_every_event_handler() {
        let app = bootstrap(valid_overrides()).await.expect("bootstrap should succeed");

        assert!(app.slack_runner.is_noop_transport());
        assert_eq!(app.slack_runner.handler_count(), 8);
        assert_eq!(app.config.assistant.history_window, 10);
        assert!(app.runtime.documents_enabled());
    }
}
