use suplo_core::conversation::{ConversationMessage, Role, ThreadReply};

/// Startup/error filler the bot posts when it cannot answer. It must never
/// be replayed into model context.
pub const PLACEHOLDER_FILLER: &str = "Hi, sorry Suplo lagi ngehang....";

/// Converts a platform-native thread history into an ordered, provider-
/// agnostic message sequence.
///
/// Bot-originated replies become `assistant`, everything else `user`.
/// Replies without a text field are skipped. A non-zero `window` keeps only
/// the most recent entries, preserving their relative order; `0` keeps the
/// full thread.
pub fn normalize_thread(replies: &[ThreadReply], window: usize) -> Vec<ConversationMessage> {
    let mut history: Vec<ConversationMessage> = replies
        .iter()
        .filter_map(|reply| {
            let text = reply.text.as_deref()?;
            if text == PLACEHOLDER_FILLER {
                return None;
            }
            let role = if reply.bot_id.is_some() { Role::Assistant } else { Role::User };
            Some(ConversationMessage { role, content: text.to_owned() })
        })
        .collect();

    if window > 0 && history.len() > window {
        history.drain(..history.len() - window);
    }

    history
}

#[cfg(test)]
mod tests {
    use suplo_core::conversation::{Role, ThreadReply};

    use super::{normalize_thread, PLACEHOLDER_FILLER};

    #[test]
    fn maps_bot_replies_to_assistant_and_others_to_user() {
        let replies = vec![
            ThreadReply::from_user("U1", "hi"),
            ThreadReply::from_bot("B1", "hello"),
            ThreadReply::from_user("U2", "question"),
        ];

        let normalized = normalize_thread(&replies, 10);

        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].role, Role::User);
        assert_eq!(normalized[1].role, Role::Assistant);
        assert_eq!(normalized[1].content, "hello");
        assert_eq!(normalized[2].role, Role::User);
    }

    #[test]
    fn placeholder_filler_is_never_replayed() {
        let replies = vec![
            ThreadReply::from_bot("B1", PLACEHOLDER_FILLER),
            ThreadReply::from_user("U1", "are you back?"),
            ThreadReply::from_bot("B1", PLACEHOLDER_FILLER),
        ];

        let normalized = normalize_thread(&replies, 10);

        assert_eq!(normalized.len(), 1);
        assert!(normalized.iter().all(|message| message.content != PLACEHOLDER_FILLER));
    }

    #[test]
    fn replies_without_text_are_skipped_not_fatal() {
        let replies = vec![
            ThreadReply { user_id: Some("U1".to_owned()), bot_id: None, text: None },
            ThreadReply::from_user("U1", "still here"),
        ];

        let normalized = normalize_thread(&replies, 10);

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].content, "still here");
    }

    #[test]
    fn window_keeps_exactly_the_last_entries_in_original_order() {
        let replies: Vec<_> =
            (0..15).map(|index| ThreadReply::from_user("U1", format!("m{index}"))).collect();

        let normalized = normalize_thread(&replies, 10);

        assert_eq!(normalized.len(), 10);
        assert_eq!(normalized[0].content, "m5");
        assert_eq!(normalized[9].content, "m14");
    }

    #[test]
    fn window_zero_keeps_the_full_thread() {
        let replies: Vec<_> =
            (0..15).map(|index| ThreadReply::from_user("U1", format!("m{index}"))).collect();

        let normalized = normalize_thread(&replies, 0);

        assert_eq!(normalized.len(), 15);
    }

    #[test]
    fn window_is_applied_after_filler_filtering() {
        let mut replies: Vec<_> =
            (0..12).map(|index| ThreadReply::from_user("U1", format!("m{index}"))).collect();
        replies.insert(0, ThreadReply::from_bot("B1", PLACEHOLDER_FILLER));

        let normalized = normalize_thread(&replies, 10);

        assert_eq!(normalized.len(), 10);
        assert_eq!(normalized[0].content, "m2");
    }
}
