use async_trait::async_trait;
use thiserror::Error;

use crate::blocks::{self, MessageTemplate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    /// Short-lived token required to open a modal in response.
    pub trigger_id: String,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuploCommand {
    Provider { requested: Option<String> },
    Help,
    Unknown { verb: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    OpenTimesheet,
    OpenLeaveRequest,
    Suplo(SuploCommand),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub kind: CommandKind,
    pub payload: SlashCommandPayload,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unsupported slash command: {0}")]
    UnsupportedCommand(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandRouteError {
    #[error("command service failed: {0}")]
    Service(String),
}

pub fn normalize_command(
    payload: SlashCommandPayload,
) -> Result<CommandEnvelope, CommandParseError> {
    let kind = match payload.command.as_str() {
        "/timesheet-lks" => CommandKind::OpenTimesheet,
        "/leaverequest-lks" => CommandKind::OpenLeaveRequest,
        "/suplo" => CommandKind::Suplo(parse_suplo_command(&payload.text)),
        other => return Err(CommandParseError::UnsupportedCommand(other.to_owned())),
    };

    Ok(CommandEnvelope { kind, payload })
}

pub fn parse_suplo_command(text: &str) -> SuploCommand {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return SuploCommand::Help;
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    match verb.as_str() {
        "provider" => {
            SuploCommand::Provider { requested: parts.next().map(str::to_owned) }
        }
        "help" => SuploCommand::Help,
        _ => SuploCommand::Unknown { verb },
    }
}

/// Side-effecting command operations; the real implementation opens modals
/// and records provider preferences, the Noop renders preview templates.
#[async_trait]
pub trait CommandService: Send + Sync {
    async fn open_timesheet(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError>;

    async fn open_leave_request(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError>;

    async fn set_provider(
        &self,
        payload: &SlashCommandPayload,
        requested: &str,
    ) -> Result<Option<MessageTemplate>, CommandRouteError>;
}

pub struct CommandRouter<S> {
    service: S,
}

impl<S> CommandRouter<S>
where
    S: CommandService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn route(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        match &envelope.kind {
            CommandKind::OpenTimesheet => self.service.open_timesheet(&envelope.payload).await,
            CommandKind::OpenLeaveRequest => {
                self.service.open_leave_request(&envelope.payload).await
            }
            CommandKind::Suplo(SuploCommand::Provider { requested: Some(requested) }) => {
                self.service.set_provider(&envelope.payload, requested).await
            }
            CommandKind::Suplo(SuploCommand::Provider { requested: None }) => {
                Ok(Some(blocks::error_message(
                    "Usage: `/suplo provider <openai|deepseek>`",
                    &envelope.payload.request_id,
                )))
            }
            CommandKind::Suplo(SuploCommand::Help) => Ok(Some(blocks::help_message())),
            CommandKind::Suplo(SuploCommand::Unknown { verb }) => Ok(Some(blocks::error_message(
                &format!("Unsupported command `/suplo {verb}`. Try `/suplo help`."),
                &envelope.payload.request_id,
            ))),
        }
    }
}

#[derive(Default)]
pub struct NoopCommandService;

#[async_trait]
impl CommandService for NoopCommandService {
    async fn open_timesheet(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        Ok(Some(blocks::error_message(
            "Preview mode active: timesheet modal not wired to a Slack client yet.",
            &payload.request_id,
        )))
    }

    async fn open_leave_request(
        &self,
        payload: &SlashCommandPayload,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        Ok(Some(blocks::error_message(
            "Preview mode active: leave request modal not wired to a Slack client yet.",
            &payload.request_id,
        )))
    }

    async fn set_provider(
        &self,
        payload: &SlashCommandPayload,
        requested: &str,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        Ok(Some(blocks::error_message(
            &format!("Preview mode active: provider `{requested}` not recorded."),
            &payload.request_id,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_command, parse_suplo_command, CommandKind, CommandParseError, CommandRouter,
        NoopCommandService, SlashCommandPayload, SuploCommand,
    };

    fn payload(command: &str, text: &str) -> SlashCommandPayload {
        SlashCommandPayload {
            command: command.to_owned(),
            text: text.to_owned(),
            channel_id: "C1".to_owned(),
            user_id: "U1".to_owned(),
            trigger_id: "trigger-1".to_owned(),
            request_id: "req-1".to_owned(),
        }
    }

    #[test]
    fn known_slash_commands_normalize_to_their_kinds() {
        let envelope = normalize_command(payload("/timesheet-lks", "")).expect("parse");
        assert_eq!(envelope.kind, CommandKind::OpenTimesheet);

        let envelope = normalize_command(payload("/leaverequest-lks", "")).expect("parse");
        assert_eq!(envelope.kind, CommandKind::OpenLeaveRequest);

        let envelope = normalize_command(payload("/suplo", "provider deepseek")).expect("parse");
        assert_eq!(
            envelope.kind,
            CommandKind::Suplo(SuploCommand::Provider {
                requested: Some("deepseek".to_owned())
            })
        );
    }

    #[test]
    fn unknown_slash_command_is_rejected() {
        let error = normalize_command(payload("/quote", "new")).expect_err("unsupported");
        assert_eq!(error, CommandParseError::UnsupportedCommand("/quote".to_owned()));
    }

    #[test]
    fn empty_suplo_text_means_help() {
        assert_eq!(parse_suplo_command("  "), SuploCommand::Help);
        assert_eq!(parse_suplo_command("help"), SuploCommand::Help);
    }

    #[test]
    fn provider_verb_captures_the_requested_backend() {
        assert_eq!(
            parse_suplo_command("PROVIDER openai"),
            SuploCommand::Provider { requested: Some("openai".to_owned()) }
        );
        assert_eq!(parse_suplo_command("provider"), SuploCommand::Provider { requested: None });
    }

    #[tokio::test]
    async fn router_renders_usage_when_provider_argument_is_missing() {
        let router = CommandRouter::new(NoopCommandService);
        let envelope = normalize_command(payload("/suplo", "provider")).expect("parse");

        let message = router.route(envelope).await.expect("route").expect("template");
        assert!(message.fallback_text.contains("Usage"));
    }

    #[tokio::test]
    async fn router_renders_guidance_for_unknown_verbs() {
        let router = CommandRouter::new(NoopCommandService);
        let envelope = normalize_command(payload("/suplo", "reboot")).expect("parse");

        let message = router.route(envelope).await.expect("route").expect("template");
        assert!(message.fallback_text.contains("Unsupported command `/suplo reboot`"));
    }
}
