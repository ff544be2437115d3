//! Assistant pipeline - conversation assembly and LLM dispatch
//!
//! This crate is the brain of suplo. It turns a raw Slack thread into a
//! provider-agnostic message list and dispatches it to a completion backend:
//!
//! 1. **Normalization** (`normalize`) - thread replies → role/content pairs,
//!    placeholder filler filtered out, bounded to the recent window
//! 2. **Prompt assembly** (`prompt`) - fixed system instruction + window +
//!    new utterance; synthetic channel-summary prompts
//! 3. **Provider routing** (`router`) - per-user backend preference over an
//!    injected `PreferenceStore`, validated against the supported set
//! 4. **Completion dispatch** (`llm`, `dispatch`) - one completion per call,
//!    single non-recursive fallback to the default backend
//! 5. **Shortcuts** (`shortcuts`) - identity questions and the channel
//!    summarization trigger intercepted before any model call
//!
//! `AssistantRuntime` (`runtime`) glues the stages into one parameterized
//! pipeline; the near-duplicate deployment variants differ only in its
//! configuration (default backend, window size, temperature, document
//! uploads).

pub mod dispatch;
pub mod documents;
pub mod llm;
pub mod normalize;
pub mod prompt;
pub mod router;
pub mod runtime;
pub mod shortcuts;

pub use dispatch::CompletionDispatcher;
pub use llm::{CompletionClient, CompletionError, HttpCompletionClient};
pub use router::{InMemoryPreferenceStore, PreferenceStore, ProviderRouter, UnsupportedBackend};
pub use runtime::{AssistantReply, AssistantRuntime};
