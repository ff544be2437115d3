use serde::{Deserialize, Serialize};

/// Speaker role in a provider-agnostic conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role/content pair as sent to a completion backend.
///
/// Invariants maintained by the assembler: chronological order, at most one
/// `system` entry, always first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Raw reply shape handed over by the chat transport for a thread.
///
/// `text` is optional because the platform emits reply entries without a
/// text field (joins, tombstones); those are skipped during normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadReply {
    pub user_id: Option<String>,
    pub bot_id: Option<String>,
    pub text: Option<String>,
}

impl ThreadReply {
    pub fn from_user(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { user_id: Some(user_id.into()), bot_id: None, text: Some(text.into()) }
    }

    pub fn from_bot(bot_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { user_id: None, bot_id: Some(bot_id.into()), text: Some(text.into()) }
    }
}

/// One entry of a channel history fetch, as consumed by the summarization
/// prompt. Entries without a user author (bot posts, system notices) carry
/// `user_id: None` and are skipped by the prompt builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelMessage {
    pub user_id: Option<String>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::{ConversationMessage, Role};

    #[test]
    fn constructors_assign_expected_roles() {
        assert_eq!(ConversationMessage::system("s").role, Role::System);
        assert_eq!(ConversationMessage::user("u").role, Role::User);
        assert_eq!(ConversationMessage::assistant("a").role, Role::Assistant);
    }

    #[test]
    fn roles_serialize_lowercase_for_the_wire() {
        let message = ConversationMessage::assistant("hello");
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
