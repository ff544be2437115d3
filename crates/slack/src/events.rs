use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    blocks::MessageTemplate,
    commands::{
        normalize_command, CommandParseError, CommandRouteError, CommandRouter, CommandService,
        NoopCommandService, SlashCommandPayload,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackEnvelope {
    pub envelope_id: String,
    pub event: SlackEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    ThreadStarted(ThreadStartedEvent),
    ThreadContextChanged(ThreadContextChangedEvent),
    UserMessage(UserMessageEvent),
    AppMention(AppMentionEvent),
    FileShared(FileSharedEvent),
    SlashCommand(SlashCommandPayload),
    ViewSubmission(ViewSubmissionEvent),
    BlockAction(BlockActionEvent),
    Unsupported { event_type: String },
}

impl SlackEvent {
    pub fn event_type(&self) -> SlackEventType {
        match self {
            Self::ThreadStarted(_) => SlackEventType::ThreadStarted,
            Self::ThreadContextChanged(_) => SlackEventType::ThreadContextChanged,
            Self::UserMessage(_) => SlackEventType::UserMessage,
            Self::AppMention(_) => SlackEventType::AppMention,
            Self::FileShared(_) => SlackEventType::FileShared,
            Self::SlashCommand(_) => SlackEventType::SlashCommand,
            Self::ViewSubmission(_) => SlackEventType::ViewSubmission,
            Self::BlockAction(_) => SlackEventType::BlockAction,
            Self::Unsupported { .. } => SlackEventType::Unsupported,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlackEventType {
    ThreadStarted,
    ThreadContextChanged,
    UserMessage,
    AppMention,
    FileShared,
    SlashCommand,
    ViewSubmission,
    BlockAction,
    Unsupported,
}

/// A new assistant thread. `context_channel_id` is the channel the user had
/// open when the thread started, when Slack provides one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadStartedEvent {
    pub channel_id: String,
    pub thread_ts: String,
    pub user_id: String,
    pub context_channel_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadContextChangedEvent {
    pub channel_id: String,
    pub thread_ts: String,
    pub context_channel_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMessageEvent {
    pub channel_id: String,
    pub thread_ts: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppMentionEvent {
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSharedEvent {
    pub channel_id: String,
    pub file_id: String,
    pub user_id: String,
}

/// Modal submission state, keyed by block id. Only the value shapes the
/// approval forms produce are modeled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewStateValues {
    values: HashMap<String, ViewValue>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewValue {
    PlainText(String),
    SelectedDateTime(i64),
    SelectedDate(String),
    SelectedOption(String),
}

impl ViewStateValues {
    pub fn insert(&mut self, block_id: impl Into<String>, value: ViewValue) {
        self.values.insert(block_id.into(), value);
    }

    pub fn plain_text(&self, block_id: &str) -> Option<&str> {
        match self.values.get(block_id) {
            Some(ViewValue::PlainText(text)) => Some(text),
            _ => None,
        }
    }

    pub fn selected_date_time(&self, block_id: &str) -> Option<i64> {
        match self.values.get(block_id) {
            Some(ViewValue::SelectedDateTime(epoch)) => Some(*epoch),
            _ => None,
        }
    }

    pub fn selected_date(&self, block_id: &str) -> Option<&str> {
        match self.values.get(block_id) {
            Some(ViewValue::SelectedDate(date)) => Some(date),
            _ => None,
        }
    }

    pub fn selected_option(&self, block_id: &str) -> Option<&str> {
        match self.values.get(block_id) {
            Some(ViewValue::SelectedOption(value)) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSubmissionEvent {
    pub callback_id: String,
    pub user_id: String,
    pub values: ViewStateValues,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockActionEvent {
    pub channel_id: String,
    pub message_ts: String,
    pub user_id: String,
    pub action_id: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

/// Handlers perform their own outbound calls; `Replied` carries the
/// rendered reply for logging and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Replied(MessageTemplate),
    Processed,
    Ignored,
}

#[derive(Debug, Error)]
pub enum EventHandlerError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error(transparent)]
    Route(#[from] CommandRouteError),
    #[error("thread handler failure: {0}")]
    Thread(String),
    #[error("mention handler failure: {0}")]
    Mention(String),
    #[error("document handler failure: {0}")]
    Document(String),
    #[error("modal submission handler failure: {0}")]
    Submission(String),
    #[error("block action handler failure: {0}")]
    Action(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> SlackEventType;
    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<SlackEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

pub fn default_dispatcher() -> EventDispatcher {
    let noop_threads = Arc::new(NoopThreadLifecycleService);
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(ThreadStartedHandler::new(noop_threads.clone()));
    dispatcher.register(ThreadContextChangedHandler::new(noop_threads));
    dispatcher.register(UserMessageHandler::new(NoopUserMessageService));
    dispatcher.register(AppMentionHandler::new(NoopMentionService));
    dispatcher.register(FileSharedHandler::new(NoopFileSharedService));
    dispatcher.register(SlashCommandHandler::new(NoopCommandService));
    dispatcher.register(ViewSubmissionHandler::new(NoopViewSubmissionService));
    dispatcher.register(BlockActionHandler::new(NoopBlockActionService));
    dispatcher
}

#[async_trait]
pub trait ThreadLifecycleService: Send + Sync {
    async fn thread_started(
        &self,
        event: &ThreadStartedEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;

    async fn context_changed(
        &self,
        event: &ThreadContextChangedEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

pub struct ThreadStartedHandler<S> {
    service: Arc<S>,
}

impl<S> ThreadStartedHandler<S>
where
    S: ThreadLifecycleService,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for ThreadStartedHandler<S>
where
    S: ThreadLifecycleService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::ThreadStarted
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::ThreadStarted(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        self.service.thread_started(event, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct ThreadContextChangedHandler<S> {
    service: Arc<S>,
}

impl<S> ThreadContextChangedHandler<S>
where
    S: ThreadLifecycleService,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for ThreadContextChangedHandler<S>
where
    S: ThreadLifecycleService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::ThreadContextChanged
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::ThreadContextChanged(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        self.service.context_changed(event, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct NoopThreadLifecycleService;

#[async_trait]
impl ThreadLifecycleService for NoopThreadLifecycleService {
    async fn thread_started(
        &self,
        _event: &ThreadStartedEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        Ok(())
    }

    async fn context_changed(
        &self,
        _event: &ThreadContextChangedEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        Ok(())
    }
}

#[async_trait]
pub trait UserMessageService: Send + Sync {
    async fn user_message(
        &self,
        event: &UserMessageEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError>;
}

pub struct UserMessageHandler<S> {
    service: S,
}

impl<S> UserMessageHandler<S>
where
    S: UserMessageService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for UserMessageHandler<S>
where
    S: UserMessageService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::UserMessage
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::UserMessage(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let message = self.service.user_message(event, ctx).await?;
        Ok(match message {
            Some(message) => HandlerResult::Replied(message),
            None => HandlerResult::Processed,
        })
    }
}

pub struct NoopUserMessageService;

#[async_trait]
impl UserMessageService for NoopUserMessageService {
    async fn user_message(
        &self,
        _event: &UserMessageEvent,
        _ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        Ok(None)
    }
}

#[async_trait]
pub trait MentionService: Send + Sync {
    async fn app_mention(
        &self,
        event: &AppMentionEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError>;
}

pub struct AppMentionHandler<S> {
    service: S,
}

impl<S> AppMentionHandler<S>
where
    S: MentionService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for AppMentionHandler<S>
where
    S: MentionService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::AppMention
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::AppMention(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let message = self.service.app_mention(event, ctx).await?;
        Ok(match message {
            Some(message) => HandlerResult::Replied(message),
            None => HandlerResult::Processed,
        })
    }
}

pub struct NoopMentionService;

#[async_trait]
impl MentionService for NoopMentionService {
    async fn app_mention(
        &self,
        _event: &AppMentionEvent,
        _ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        Ok(None)
    }
}

#[async_trait]
pub trait FileSharedService: Send + Sync {
    async fn file_shared(
        &self,
        event: &FileSharedEvent,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError>;
}

pub struct FileSharedHandler<S> {
    service: S,
}

impl<S> FileSharedHandler<S>
where
    S: FileSharedService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for FileSharedHandler<S>
where
    S: FileSharedService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::FileShared
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::FileShared(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let message = self.service.file_shared(event, ctx).await?;
        Ok(match message {
            Some(message) => HandlerResult::Replied(message),
            None => HandlerResult::Processed,
        })
    }
}

pub struct NoopFileSharedService;

#[async_trait]
impl FileSharedService for NoopFileSharedService {
    async fn file_shared(
        &self,
        _event: &FileSharedEvent,
        _ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, EventHandlerError> {
        Ok(None)
    }
}

pub struct SlashCommandHandler<S> {
    router: CommandRouter<S>,
}

impl<S> SlashCommandHandler<S>
where
    S: CommandService,
{
    pub fn new(service: S) -> Self {
        Self { router: CommandRouter::new(service) }
    }
}

#[async_trait]
impl<S> EventHandler for SlashCommandHandler<S>
where
    S: CommandService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        _ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let normalized = normalize_command(payload.clone())?;
        let message = self.router.route(normalized).await?;
        Ok(match message {
            Some(message) => HandlerResult::Replied(message),
            None => HandlerResult::Processed,
        })
    }
}

#[async_trait]
pub trait ViewSubmissionService: Send + Sync {
    async fn view_submitted(
        &self,
        event: &ViewSubmissionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

pub struct ViewSubmissionHandler<S> {
    service: S,
}

impl<S> ViewSubmissionHandler<S>
where
    S: ViewSubmissionService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for ViewSubmissionHandler<S>
where
    S: ViewSubmissionService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::ViewSubmission
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::ViewSubmission(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        self.service.view_submitted(event, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct NoopViewSubmissionService;

#[async_trait]
impl ViewSubmissionService for NoopViewSubmissionService {
    async fn view_submitted(
        &self,
        _event: &ViewSubmissionEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        Ok(())
    }
}

#[async_trait]
pub trait BlockActionService: Send + Sync {
    async fn block_action(
        &self,
        event: &BlockActionEvent,
        ctx: &EventContext,
    ) -> Result<(), EventHandlerError>;
}

pub struct BlockActionHandler<S> {
    service: S,
}

impl<S> BlockActionHandler<S>
where
    S: BlockActionService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> EventHandler for BlockActionHandler<S>
where
    S: BlockActionService + 'static,
{
    fn event_type(&self) -> SlackEventType {
        SlackEventType::BlockAction
    }

    async fn handle(
        &self,
        envelope: &SlackEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let SlackEvent::BlockAction(event) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        self.service.block_action(event, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

pub struct NoopBlockActionService;

#[async_trait]
impl BlockActionService for NoopBlockActionService {
    async fn block_action(
        &self,
        _event: &BlockActionEvent,
        _ctx: &EventContext,
    ) -> Result<(), EventHandlerError> {
        Ok(())
    }
}
