/// Fixed identity triggers, matched case-insensitively as substrings.
///
/// Substring semantics also match a trigger quoted inside a longer message;
/// preserved as-is pending product sign-off.
pub const IDENTITY_TRIGGERS: &[&str] = &[
    "who are you",
    "siapa kamu",
    "what is your name",
    "what is your identity",
    "what are you?",
];

/// Canned identity reply, served without any model call.
pub const IDENTITY_REPLY: &str = "I'm Suplo, LKS Assistant ready to serve all LKS Members. \
Suplo is The Man, The Myth, The LEGEND!!";

/// Suggested prompt published on thread start; an exact match redirects
/// into the channel summarization path.
pub const SUMMARIZE_CHANNEL_PROMPT: &str =
    "Assistant, please summarize the activity in this channel!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Identity,
    SummarizeChannel,
}

/// Pre-dispatch interception for assistant-thread messages.
pub fn match_shortcut(text: &str) -> Option<Shortcut> {
    let lowered = text.to_lowercase();
    if IDENTITY_TRIGGERS.iter().any(|trigger| lowered.contains(trigger)) {
        return Some(Shortcut::Identity);
    }
    if text == SUMMARIZE_CHANNEL_PROMPT {
        return Some(Shortcut::SummarizeChannel);
    }
    None
}

/// Mention events redirect into summarization when the text carries the
/// keyword anywhere.
pub fn mention_requests_summary(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("summarize") || lowered.contains("summary")
}
