//! Core domain types and configuration for suplo.
//!
//! This crate is dependency-light on purpose: it holds the conversation
//! domain model shared by the assistant pipeline and the Slack surface, and
//! the layered application configuration (defaults → `suplo.toml` → `SUPLO_*`
//! environment variables → programmatic overrides → validation).

pub mod config;
pub mod conversation;

pub use config::{AppConfig, Backend, ConfigError, LoadOptions};
pub use conversation::{ChannelMessage, ConversationMessage, Role, ThreadReply};
