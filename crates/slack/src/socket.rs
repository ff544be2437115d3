use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{
    default_dispatcher, DispatchError, EventContext, EventDispatcher, SlackEnvelope, SlackEvent,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport ack failed: {0}")]
    Acknowledge(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

#[async_trait]
pub trait SocketTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_envelope(&self) -> Result<Option<SlackEnvelope>, TransportError>;
    async fn acknowledge(&self, envelope_id: &str) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

#[derive(Default)]
pub struct NoopSocketTransport;

#[async_trait]
impl SocketTransport for NoopSocketTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_envelope(&self) -> Result<Option<SlackEnvelope>, TransportError> {
        Ok(None)
    }

    async fn acknowledge(&self, _envelope_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub struct SocketModeRunner {
    transport: Arc<dyn SocketTransport>,
    dispatcher: EventDispatcher,
    reconnect_policy: ReconnectPolicy,
    noop_transport: bool,
}

impl Default for SocketModeRunner {
    fn default() -> Self {
        Self {
            transport: Arc::new(NoopSocketTransport),
            dispatcher: default_dispatcher(),
            reconnect_policy: ReconnectPolicy::default(),
            noop_transport: true,
        }
    }
}

impl SocketModeRunner {
    pub fn new(
        transport: Arc<dyn SocketTransport>,
        dispatcher: EventDispatcher,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, dispatcher, reconnect_policy, noop_transport: false }
    }

    /// Noop dispatcher wiring with no live transport; the process runs but
    /// never receives envelopes.
    pub fn noop_with_dispatcher(dispatcher: EventDispatcher) -> Self {
        Self {
            transport: Arc::new(NoopSocketTransport),
            dispatcher,
            reconnect_policy: ReconnectPolicy::default(),
            noop_transport: true,
        }
    }

    pub fn is_noop_transport(&self) -> bool {
        self.noop_transport
    }

    pub fn handler_count(&self) -> usize {
        self.dispatcher.handler_count()
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "socket mode transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "socket mode retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening socket mode transport connection");
        self.transport.connect().await?;
        info!(attempt, "socket mode transport connected");

        loop {
            let Some(envelope) = self.transport.next_envelope().await? else {
                info!(attempt, "socket mode transport stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };
            let (channel_id, thread_id) = correlation_fields(&envelope);

            info!(
                event_name = "ingress.slack.envelope_received",
                envelope_id = %envelope.envelope_id,
                event_type = ?envelope.event.event_type(),
                correlation_id = %envelope.envelope_id,
                channel_id = channel_id.as_deref().unwrap_or("unknown"),
                thread_id = thread_id.as_deref().unwrap_or("unknown"),
                "received slack envelope"
            );

            if let Err(error) = self.transport.acknowledge(&envelope.envelope_id).await {
                warn!(
                    event_name = "ingress.slack.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    channel_id = channel_id.as_deref().unwrap_or("unknown"),
                    thread_id = thread_id.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "failed to acknowledge slack envelope"
                );
            } else {
                debug!(
                    event_name = "ingress.slack.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    channel_id = channel_id.as_deref().unwrap_or("unknown"),
                    thread_id = thread_id.as_deref().unwrap_or("unknown"),
                    "acknowledged slack envelope"
                );
            }

            let context = EventContext { correlation_id: envelope.envelope_id.clone() };
            if let Err(error) = self.dispatcher.dispatch(&envelope, &context).await {
                warn!(
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    channel_id = channel_id.as_deref().unwrap_or("unknown"),
                    thread_id = thread_id.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "event dispatch failed; continuing socket loop"
                );
            }
        }
    }
}

fn correlation_fields(envelope: &SlackEnvelope) -> (Option<String>, Option<String>) {
    match &envelope.event {
        SlackEvent::ThreadStarted(event) => {
            (Some(event.channel_id.clone()), Some(event.thread_ts.clone()))
        }
        SlackEvent::ThreadContextChanged(event) => {
            (Some(event.channel_id.clone()), Some(event.thread_ts.clone()))
        }
        SlackEvent::UserMessage(event) => {
            (Some(event.channel_id.clone()), Some(event.thread_ts.clone()))
        }
        SlackEvent::AppMention(event) => (Some(event.channel_id.clone()), None),
        SlackEvent::FileShared(event) => (Some(event.channel_id.clone()), None),
        SlackEvent::SlashCommand(payload) => (Some(payload.channel_id.clone()), None),
        SlackEvent::BlockAction(event) => {
            (Some(event.channel_id.clone()), Some(event.message_ts.clone()))
        }
        SlackEvent::ViewSubmission(_) | SlackEvent::Unsupported { .. } => (None, None),
    }
}
