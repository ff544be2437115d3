use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    Plain { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    pub action_id: String,
    pub text: TextObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ButtonElement {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            text: TextObject::plain(label),
            style: None,
            value: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { block_id: String, text: TextObject },
    Actions { block_id: String, elements: Vec<ButtonElement> },
    Context { block_id: String, elements: Vec<TextObject> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub fallback_text: String,
    pub blocks: Vec<Block>,
}

impl MessageTemplate {
    /// Plain text message with no Block Kit payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self { fallback_text: text.into(), blocks: Vec::new() }
    }
}

pub struct MessageBuilder {
    fallback_text: String,
    blocks: Vec<Block>,
}

impl MessageBuilder {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self { fallback_text: fallback_text.into(), blocks: Vec::new() }
    }

    pub fn section<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut SectionBuilder),
    {
        let mut builder = SectionBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Section { block_id: block_id.into(), text: builder.build() });
        self
    }

    pub fn actions<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Actions { block_id: block_id.into(), elements: builder.build() });
        self
    }

    pub fn context<F>(mut self, block_id: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ContextBuilder),
    {
        let mut builder = ContextBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Context { block_id: block_id.into(), elements: builder.build() });
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate { fallback_text: self.fallback_text, blocks: self.blocks }
    }
}

#[derive(Default)]
pub struct SectionBuilder {
    text: Option<TextObject>,
}

impl SectionBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> TextObject {
        self.text.unwrap_or_else(|| TextObject::plain(""))
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }

    fn build(self) -> Vec<ButtonElement> {
        self.elements
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    elements: Vec<TextObject>,
}

impl ContextBuilder {
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::plain(text));
        self
    }

    pub fn mrkdwn(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(TextObject::mrkdwn(text));
        self
    }

    fn build(self) -> Vec<TextObject> {
        self.elements
    }
}

/// Slack's localized date token: renders the epoch in the viewer's
/// timezone, falling back to the raw value.
pub fn slack_date_token(epoch_secs: i64) -> String {
    format!("<!date^{epoch_secs}^{{date}} at {{time}}|{epoch_secs}>")
}

fn timesheet_summary(user_id: &str, start: i64, end: i64, work_mode: &str) -> String {
    format!(
        "<@{user_id}> submitted the following TimeSheet: \n{} - {}\nWork Mode: {work_mode}",
        slack_date_token(start),
        slack_date_token(end),
    )
}

fn leave_request_summary(
    user_id: &str,
    title: &str,
    start_date: &str,
    end_date: &str,
    note: &str,
) -> String {
    format!(
        "<@{user_id}> submitted the following Leave Request: \nTitle : {title}\n{start_date} - {end_date}\nNote: {note}"
    )
}

/// Approval card posted to the approvals channel after a timesheet modal
/// submission. `metadata` is the JSON-encoded submission carried in the
/// button values.
pub fn timesheet_request_message(
    user_id: &str,
    start: i64,
    end: i64,
    work_mode: &str,
    metadata: &str,
) -> MessageTemplate {
    let summary = timesheet_summary(user_id, start, end, work_mode);
    MessageBuilder::new(summary.clone())
        .section("timesheet.summary.v1", |section| {
            section.mrkdwn(summary.clone());
        })
        .actions("timesheet_actions", |actions| {
            actions
                .button(
                    ButtonElement::new("approve_request", "Approve")
                        .style(ButtonStyle::Primary)
                        .value(metadata),
                )
                .button(
                    ButtonElement::new("reject_request", "Reject")
                        .style(ButtonStyle::Danger)
                        .value(metadata),
                );
        })
        .build()
}

pub fn leave_request_message(
    user_id: &str,
    title: &str,
    start_date: &str,
    end_date: &str,
    note: &str,
    metadata: &str,
) -> MessageTemplate {
    let summary = leave_request_summary(user_id, title, start_date, end_date, note);
    MessageBuilder::new(summary.clone())
        .section("leaverequest.summary.v1", |section| {
            section.mrkdwn(summary.clone());
        })
        .actions("leaverequest_actions", |actions| {
            actions
                .button(
                    ButtonElement::new("approve_request_lr", "Approve")
                        .style(ButtonStyle::Primary)
                        .value(metadata),
                )
                .button(
                    ButtonElement::new("reject_request_lr", "Reject")
                        .style(ButtonStyle::Danger)
                        .value(metadata),
                );
        })
        .build()
}

/// Replacement card after an approver decision: buttons removed, decision
/// recorded in a context line.
pub fn timesheet_resolved_message(
    user_id: &str,
    start: i64,
    end: i64,
    work_mode: &str,
    approver_id: &str,
    approved: bool,
) -> MessageTemplate {
    let summary = format!(
        "Timesheet submitted by <@{user_id}> : \n({} - {})\nWork Mode: {work_mode}",
        slack_date_token(start),
        slack_date_token(end),
    );
    let decision = if approved {
        format!(":white_check_mark: Approved by <@{approver_id}>")
    } else {
        format!(":x: Rejected by <@{approver_id}>")
    };

    MessageBuilder::new(summary.clone())
        .section("timesheet.resolved.v1", |section| {
            section.mrkdwn(summary.clone());
        })
        .context("timesheet.decision.v1", |context| {
            context.mrkdwn(decision);
        })
        .build()
}

pub fn leave_resolved_message(
    user_id: &str,
    title: &str,
    start_date: &str,
    end_date: &str,
    note: &str,
    approver_id: &str,
    approved: bool,
) -> MessageTemplate {
    let summary = format!(
        "Leave Request submitted by <@{user_id}> : \nTitle : {title}\n{start_date} - {end_date}\nNote: {note}"
    );
    let decision = if approved {
        format!(":white_check_mark: Approved by <@{approver_id}>")
    } else {
        format!(":x: Rejected by <@{approver_id}>")
    };

    MessageBuilder::new(summary.clone())
        .section("leaverequest.resolved.v1", |section| {
            section.mrkdwn(summary.clone());
        })
        .context("leaverequest.decision.v1", |context| {
            context.mrkdwn(decision);
        })
        .build()
}

pub fn error_message(summary: &str, correlation_id: &str) -> MessageTemplate {
    MessageBuilder::new(summary.to_owned())
        .section("suplo.error.summary.v1", |section| {
            section.mrkdwn(format!(":warning: {summary}"));
        })
        .context("suplo.error.context.v1", |context| {
            context.plain(format!("Correlation ID: {correlation_id}"));
        })
        .build()
}

pub fn help_message() -> MessageTemplate {
    MessageBuilder::new("Suplo command help")
        .section("suplo.help.summary.v1", |section| {
            section.mrkdwn(
                "*Available commands*\n• `/suplo provider <openai|deepseek>`\n• `/suplo help`\n• `/timesheet-lks`\n• `/leaverequest-lks`",
            );
        })
        .build()
}

// Modal views. Only the element shapes the approval forms use are modeled;
// the serialized JSON follows Slack's Block Kit field names.

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModalView {
    #[serde(rename = "type")]
    kind: &'static str,
    pub callback_id: String,
    pub title: TextObject,
    pub submit: TextObject,
    pub close: TextObject,
    pub blocks: Vec<InputBlock>,
}

impl ModalView {
    pub fn new(callback_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: "modal",
            callback_id: callback_id.into(),
            title: TextObject::plain(title),
            submit: TextObject::plain("Submit"),
            close: TextObject::plain("Cancel"),
            blocks: Vec::new(),
        }
    }

    pub fn input(mut self, block: InputBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    pub block_id: String,
    pub label: TextObject,
    pub element: InputElement,
}

impl InputBlock {
    pub fn new(
        block_id: impl Into<String>,
        label: impl Into<String>,
        element: InputElement,
    ) -> Self {
        Self {
            kind: "input",
            block_id: block_id.into(),
            label: TextObject::plain(label),
            element,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum InputElement {
    #[serde(rename = "datetimepicker")]
    DatetimePicker {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_date_time: Option<i64>,
    },
    #[serde(rename = "datepicker")]
    DatePicker {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_date: Option<String>,
    },
    #[serde(rename = "static_select")]
    StaticSelect {
        action_id: String,
        placeholder: TextObject,
        options: Vec<SelectOption>,
    },
    #[serde(rename = "plain_text_input")]
    PlainTextInput {
        action_id: String,
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: TextObject,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { text: TextObject::plain(label), value: value.into() }
    }
}

/// The timesheet submission form. `initial_date_time` preloads both pickers
/// with the current time.
pub fn timesheet_modal(initial_date_time: Option<i64>) -> ModalView {
    ModalView::new("timesheet_modal", "Submit TimeSheet")
        .input(InputBlock::new(
            "start_datetime_block",
            "Start datetime",
            InputElement::DatetimePicker {
                action_id: "start_datetime".to_owned(),
                initial_date_time,
            },
        ))
        .input(InputBlock::new(
            "end_datetime_block",
            "End datetime",
            InputElement::DatetimePicker {
                action_id: "end_datetime".to_owned(),
                initial_date_time,
            },
        ))
        .input(InputBlock::new(
            "work_mode_block",
            "Work Mode",
            InputElement::StaticSelect {
                action_id: "work_mode".to_owned(),
                placeholder: TextObject::plain("Select work mode"),
                options: vec![
                    SelectOption::new("WFO", "WFO"),
                    SelectOption::new("WFA", "WFA"),
                    SelectOption::new("Hybrid", "Hybrid"),
                ],
            },
        ))
}

/// The leave request form. `initial_date` preloads both date pickers with
/// today's date (`YYYY-MM-DD`).
pub fn leave_request_modal(initial_date: Option<String>) -> ModalView {
    ModalView::new("leaverequest_modal", "Submit Leave Request")
        .input(InputBlock::new(
            "title_block",
            "Title",
            InputElement::PlainTextInput {
                action_id: "title".to_owned(),
                multiline: false,
                placeholder: Some(TextObject::plain("Enter post title")),
            },
        ))
        .input(InputBlock::new(
            "start_date_block",
            "Start Date",
            InputElement::DatePicker {
                action_id: "start_date".to_owned(),
                initial_date: initial_date.clone(),
            },
        ))
        .input(InputBlock::new(
            "end_date_block",
            "End Date",
            InputElement::DatePicker { action_id: "end_date".to_owned(), initial_date },
        ))
        .input(InputBlock::new(
            "note_block",
            "Note",
            InputElement::PlainTextInput {
                action_id: "note".to_owned(),
                multiline: true,
                placeholder: Some(TextObject::plain("Enter additional notes")),
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::{
        error_message, leave_request_message, leave_request_modal, timesheet_modal,
        timesheet_request_message, timesheet_resolved_message, Block, ButtonStyle, InputElement,
        MessageBuilder, TextObject,
    };

    #[test]
    fn message_builder_creates_typed_block_structure() {
        let message = MessageBuilder::new("fallback")
            .section("suplo.reply.v1", |section| {
                section.mrkdwn("*Reply*");
            })
            .actions("suplo.reply.actions.v1", |actions| {
                actions.button(super::ButtonElement::new("suplo.ack.v1", "Ok"));
            })
            .build();

        assert_eq!(message.blocks.len(), 2);
        assert!(matches!(
            &message.blocks[0],
            Block::Section {
                block_id,
                text: TextObject::Mrkdwn { .. }
            } if block_id == "suplo.reply.v1"
        ));
        assert!(matches!(
            &message.blocks[1],
            Block::Actions { block_id, elements } if block_id == "suplo.reply.actions.v1" && elements.len() == 1
        ));
    }

    #[test]
    fn timesheet_card_has_primary_and_danger_buttons_with_metadata() {
        let message =
            timesheet_request_message("U1", 1_730_000_000, 1_730_030_000, "WFO", "{\"k\":1}");

        let elements = match &message.blocks[1] {
            Block::Actions { block_id, elements } if block_id == "timesheet_actions" => elements,
            other => panic!("expected timesheet actions block, got {other:?}"),
        };
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].action_id, "approve_request");
        assert_eq!(elements[0].style, Some(ButtonStyle::Primary));
        assert_eq!(elements[0].value.as_deref(), Some("{\"k\":1}"));
        assert_eq!(elements[1].action_id, "reject_request");
        assert_eq!(elements[1].style, Some(ButtonStyle::Danger));
    }

    #[test]
    fn leave_request_card_uses_the_lr_action_ids() {
        let message =
            leave_request_message("U1", "Bali trip", "2026-08-10", "2026-08-14", "PTO", "{}");

        let elements = match &message.blocks[1] {
            Block::Actions { elements, .. } => elements,
            other => panic!("expected actions block, got {other:?}"),
        };
        assert_eq!(elements[0].action_id, "approve_request_lr");
        assert_eq!(elements[1].action_id, "reject_request_lr");
        assert!(message.fallback_text.contains("Bali trip"));
    }

    #[test]
    fn resolved_card_drops_buttons_and_records_the_approver() {
        let message =
            timesheet_resolved_message("U1", 1_730_000_000, 1_730_030_000, "WFA", "U9", true);

        assert!(message.blocks.iter().all(|block| !matches!(block, Block::Actions { .. })));
        let context = match &message.blocks[1] {
            Block::Context { elements, .. } => elements,
            other => panic!("expected context block, got {other:?}"),
        };
        assert!(matches!(
            context.first(),
            Some(TextObject::Mrkdwn { text }) if text.contains("Approved by <@U9>")
        ));
    }

    #[test]
    fn error_template_contains_correlation_id() {
        let message = error_message("Cannot process request", "req-123");
        let elements = match &message.blocks[1] {
            Block::Context { elements, .. } => elements,
            other => panic!("expected context block, got {other:?}"),
        };
        assert!(matches!(
            elements.first(),
            Some(TextObject::Plain { text }) if text.contains("req-123")
        ));
    }

    #[test]
    fn timesheet_modal_serializes_expected_element_types() {
        let view = timesheet_modal(Some(1_730_000_000));
        let json = serde_json::to_value(&view).expect("serialize");

        assert_eq!(json["type"], "modal");
        assert_eq!(json["callback_id"], "timesheet_modal");
        assert_eq!(json["blocks"][0]["element"]["type"], "datetimepicker");
        assert_eq!(json["blocks"][0]["element"]["initial_date_time"], 1_730_000_000);
        assert_eq!(json["blocks"][2]["element"]["type"], "static_select");
        assert_eq!(json["blocks"][2]["element"]["options"][2]["value"], "Hybrid");
    }

    #[test]
    fn leave_request_modal_has_title_dates_and_note() {
        let view = leave_request_modal(Some("2026-08-07".to_owned()));

        assert_eq!(view.callback_id, "leaverequest_modal");
        assert_eq!(view.blocks.len(), 4);
        assert!(matches!(
            &view.blocks[3].element,
            InputElement::PlainTextInput { multiline: true, .. }
        ));
        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["blocks"][1]["element"]["type"], "datepicker");
        assert_eq!(json["blocks"][1]["element"]["initial_date"], "2026-08-07");
    }

    #[test]
    fn plain_text_objects_use_slack_type_names() {
        let json = serde_json::to_value(TextObject::plain("hi")).expect("serialize");
        assert_eq!(json["type"], "plain_text");
        let json = serde_json::to_value(TextObject::mrkdwn("hi")).expect("serialize");
        assert_eq!(json["type"], "mrkdwn");
    }
}
