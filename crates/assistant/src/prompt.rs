use suplo_core::conversation::{ChannelMessage, ConversationMessage};

/// The fixed system instruction prepended to every completion. Persona,
/// tone, Slack mention syntax, and Slack-flavored markdown are product
/// constants; the text never changes at runtime.
pub const SYSTEM_PROMPT: &str = "\
You are Suplo, an assistant in a Slack Langit Kreasi Solusindo workspace.
Users in the workspace will ask you to help them write something or to think better about a specific topic.
You'll respond to those questions in a professional way unless explicitly requested otherwise.
When you include markdown text, convert them to Slack compatible ones.
When a prompt has Slack's special syntax like <@USER_ID> or <#CHANNEL_ID>, you must keep them as-is in your response.
Avoid starting responses with greetings unless explicitly requested by the user.";

/// Builds the message sequence for a threaded exchange:
/// `[system] + window + [user: new utterance]`.
pub fn assemble(window: &[ConversationMessage], utterance: &str) -> Vec<ConversationMessage> {
    let mut messages = Vec::with_capacity(window.len() + 2);
    messages.push(ConversationMessage::system(SYSTEM_PROMPT));
    messages.extend_from_slice(window);
    messages.push(ConversationMessage::user(utterance));
    messages
}

/// Builds the single synthetic user message for the channel summarization
/// path: a fixed instruction line naming the channel, then one
/// `<@author> says: <text>` line per message in chronological order.
/// Messages without a user author are skipped.
pub fn assemble_channel_summary(
    channel_id: &str,
    messages: &[ChannelMessage],
) -> Vec<ConversationMessage> {
    let mut prompt = format!(
        "Please generate a brief summary of the following messages from Slack channel <#{channel_id}>:"
    );
    for message in messages {
        if let Some(user_id) = &message.user_id {
            prompt.push_str(&format!("\n<@{user_id}> says: {}", message.text));
        }
    }

    vec![ConversationMessage::system(SYSTEM_PROMPT), ConversationMessage::user(prompt)]
}
