//! Slack Integration - Socket Mode bot interface
//!
//! This crate provides the Slack interface for suplo:
//! - **Socket Mode** (`socket`) - WebSocket connection to Slack (no public URL needed)
//! - **Slash Commands** (`commands`) - `/timesheet-lks`, `/leaverequest-lks`, `/suplo`
//! - **Events** (`events`) - Assistant threads, mentions, file shares, modals, buttons
//! - **Web API** (`api`) - Outbound call seam (post, update, fetch, modals, status)
//! - **Block Kit** (`blocks`) - Rich message and modal view builders
//!
//! # Getting Started
//!
//! 1. Create a Slack app at https://api.slack.com/apps
//! 2. Enable Socket Mode, the Assistant feature, and subscribe to events
//! 3. Add slash commands: `/timesheet-lks`, `/leaverequest-lks`, `/suplo`
//! 4. Set env vars: `SUPLO_SLACK_APP_TOKEN`, `SUPLO_SLACK_BOT_TOKEN`
//!
//! # Architecture
//!
//! ```text
//! Slack Events → EventDispatcher → Handlers → Assistant Runtime → LLM Backend
//!                     ↓                ↓
//!               Block Kit UI ←── ChatApi (outbound)
//! ```

pub mod api;
pub mod blocks;
pub mod commands;
pub mod events;
pub mod socket;
