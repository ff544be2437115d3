//! Timesheet and leave-request approval workflow.
//!
//! A modal submission posts an approval card (with the submission carried
//! as JSON in the button values) to the approvals channel. An approver
//! decision notifies the submitter by DM, replaces the card's buttons with
//! the decision, and on approval submits to the CRM and updates the
//! submitter's Slack status. A CRM failure is reported to the submitter but
//! does not roll back the already-posted messages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use suplo_slack::api::{ApiError, ChatApi, StatusUpdate};
use suplo_slack::blocks::{
    leave_request_message, leave_resolved_message, slack_date_token,
    timesheet_request_message, timesheet_resolved_message, MessageTemplate,
};
use suplo_slack::events::{BlockActionEvent, ViewStateValues};

use crate::crm::{
    format_leave_date, format_work_timestamp, CrmError, LeaveRequestSubmission,
    SalesforceClient, TimesheetSubmission,
};

pub const FALLBACK_EMAIL: &str = "unknown@example.com";

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("modal submission is missing `{0}`")]
    MissingField(&'static str),
    #[error("approval metadata is malformed: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("approvals channel is not configured")]
    NoApprovalsChannel,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Submission payload carried in the approval card's button values.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetMetadata {
    pub email: String,
    pub start_datetime: i64,
    pub end_datetime: i64,
    pub work_mode: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestMetadata {
    pub email: String,
    pub start_date: String,
    pub end_date: String,
    pub title: String,
    pub note: String,
    pub user_id: String,
}

/// Slack status shown on the submitter's profile after an approved
/// timesheet, derived from the work mode.
pub fn status_for_work_mode(work_mode: &str) -> (&'static str, &'static str) {
    match work_mode {
        "Hybrid" => ("Commuting", ":bus:"),
        "WFA" => ("Working remotely", ":house_with_garden:"),
        _ => ("Office", ":office:"),
    }
}

pub struct ApprovalFlow {
    api: Arc<dyn ChatApi>,
    crm: Option<SalesforceClient>,
    approvals_channel: Option<String>,
}

impl ApprovalFlow {
    pub fn new(
        api: Arc<dyn ChatApi>,
        crm: Option<SalesforceClient>,
        approvals_channel: Option<String>,
    ) -> Self {
        Self { api, crm, approvals_channel }
    }

    async fn submitter_email(&self, user_id: &str) -> String {
        match self.api.user_email(user_id).await {
            Ok(Some(email)) => email,
            Ok(None) => FALLBACK_EMAIL.to_owned(),
            Err(api_error) => {
                warn!(
                    event_name = "approvals.email_lookup_failed",
                    user_id,
                    error = %api_error,
                    "falling back to placeholder email"
                );
                FALLBACK_EMAIL.to_owned()
            }
        }
    }

    fn approvals_channel(&self) -> Result<&str, ApprovalError> {
        self.approvals_channel.as_deref().ok_or(ApprovalError::NoApprovalsChannel)
    }

    pub async fn submit_timesheet_form(
        &self,
        user_id: &str,
        values: &ViewStateValues,
    ) -> Result<(), ApprovalError> {
        let start = values
            .selected_date_time("start_datetime_block")
            .ok_or(ApprovalError::MissingField("start_datetime"))?;
        let end = values
            .selected_date_time("end_datetime_block")
            .ok_or(ApprovalError::MissingField("end_datetime"))?;
        let work_mode = values
            .selected_option("work_mode_block")
            .ok_or(ApprovalError::MissingField("work_mode"))?
            .to_owned();

        let email = self.submitter_email(user_id).await;
        let metadata = serde_json::to_string(&TimesheetMetadata {
            email,
            start_datetime: start,
            end_datetime: end,
            work_mode: work_mode.clone(),
            user_id: user_id.to_owned(),
        })?;

        let channel = self.approvals_channel()?;
        self.api
            .post_message(
                channel,
                None,
                &timesheet_request_message(user_id, start, end, &work_mode, &metadata),
            )
            .await?;
        Ok(())
    }

    pub async fn submit_leave_form(
        &self,
        user_id: &str,
        values: &ViewStateValues,
    ) -> Result<(), ApprovalError> {
        let title =
            values.plain_text("title_block").ok_or(ApprovalError::MissingField("title"))?;
        let start_date = values
            .selected_date("start_date_block")
            .ok_or(ApprovalError::MissingField("start_date"))?;
        let end_date = values
            .selected_date("end_date_block")
            .ok_or(ApprovalError::MissingField("end_date"))?;
        let note = values.plain_text("note_block").unwrap_or_default();

        let email = self.submitter_email(user_id).await;
        let metadata = serde_json::to_string(&LeaveRequestMetadata {
            email,
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
            title: title.to_owned(),
            note: note.to_owned(),
            user_id: user_id.to_owned(),
        })?;

        let channel = self.approvals_channel()?;
        self.api
            .post_message(
                channel,
                None,
                &leave_request_message(user_id, title, start_date, end_date, note, &metadata),
            )
            .await?;
        Ok(())
    }

    /// Routes an approval-card button press. Returns `false` for action ids
    /// this flow does not own.
    pub async fn handle_action(&self, event: &BlockActionEvent) -> Result<bool, ApprovalError> {
        match event.action_id.as_str() {
            "approve_request" => self.resolve_timesheet(event, true).await?,
            "reject_request" => self.resolve_timesheet(event, false).await?,
            "approve_request_lr" => self.resolve_leave(event, true).await?,
            "reject_request_lr" => self.resolve_leave(event, false).await?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    async fn resolve_timesheet(
        &self,
        event: &BlockActionEvent,
        approved: bool,
    ) -> Result<(), ApprovalError> {
        let raw = event.value.as_deref().ok_or(ApprovalError::MissingField("action value"))?;
        let metadata: TimesheetMetadata = serde_json::from_str(raw)?;
        let summary = format!(
            "{} - {}\nWork Mode: {}",
            slack_date_token(metadata.start_datetime),
            slack_date_token(metadata.end_datetime),
            metadata.work_mode,
        );

        if approved {
            self.submit_to_crm_timesheet(&metadata).await;
            self.notify_submitter(
                &metadata.user_id,
                &format!("Your timesheet has been :white_check_mark: approved: \n{summary}"),
            )
            .await;
        } else {
            self.notify_submitter(
                &metadata.user_id,
                &format!("Your timesheet has been :x: rejected: \n{summary}"),
            )
            .await;
        }

        self.api
            .update_message(
                &event.channel_id,
                &event.message_ts,
                &timesheet_resolved_message(
                    &metadata.user_id,
                    metadata.start_datetime,
                    metadata.end_datetime,
                    &metadata.work_mode,
                    &event.user_id,
                    approved,
                ),
            )
            .await?;

        if approved {
            self.update_work_status(&metadata).await;
        }

        Ok(())
    }

    async fn resolve_leave(
        &self,
        event: &BlockActionEvent,
        approved: bool,
    ) -> Result<(), ApprovalError> {
        let raw = event.value.as_deref().ok_or(ApprovalError::MissingField("action value"))?;
        let metadata: LeaveRequestMetadata = serde_json::from_str(raw)?;
        let summary = format!(
            "Title : {}\n{} - {}\nNote: {}",
            metadata.title, metadata.start_date, metadata.end_date, metadata.note,
        );

        if approved {
            self.submit_to_crm_leave(&metadata).await;
            self.notify_submitter(
                &metadata.user_id,
                &format!("Your Leave Request has been :white_check_mark: approved: \n{summary}"),
            )
            .await;
        } else {
            self.notify_submitter(
                &metadata.user_id,
                &format!("Your Leave Request has been :x: rejected: \n{summary}"),
            )
            .await;
        }

        self.api
            .update_message(
                &event.channel_id,
                &event.message_ts,
                &leave_resolved_message(
                    &metadata.user_id,
                    &metadata.title,
                    &metadata.start_date,
                    &metadata.end_date,
                    &metadata.note,
                    &event.user_id,
                    approved,
                ),
            )
            .await?;

        Ok(())
    }

    /// CRM submit on approval. Failures are reported to the submitter and
    /// logged; the approval itself proceeds (no compensating transaction).
    async fn submit_to_crm_timesheet(&self, metadata: &TimesheetMetadata) {
        let Some(crm) = &self.crm else {
            warn!(
                event_name = "approvals.crm_disabled",
                user_id = %metadata.user_id,
                "crm integration disabled; approved timesheet not forwarded"
            );
            return;
        };

        let submission = TimesheetSubmission {
            email: metadata.email.clone(),
            work_start: format_work_timestamp(metadata.start_datetime),
            work_end: format_work_timestamp(metadata.end_datetime),
            work_mode: metadata.work_mode.clone(),
        };

        if let Err(crm_error) = crm.submit_timesheet(&submission).await {
            self.report_crm_failure(&metadata.user_id, "timesheet", &crm_error).await;
        }
    }

    async fn submit_to_crm_leave(&self, metadata: &LeaveRequestMetadata) {
        let Some(crm) = &self.crm else {
            warn!(
                event_name = "approvals.crm_disabled",
                user_id = %metadata.user_id,
                "crm integration disabled; approved leave request not forwarded"
            );
            return;
        };

        let submission = LeaveRequestSubmission {
            email: metadata.email.clone(),
            title: metadata.title.clone(),
            note: metadata.note.clone(),
            start_date: format_leave_date(&metadata.start_date),
            end_date: format_leave_date(&metadata.end_date),
        };

        if let Err(crm_error) = crm.submit_leave_request(&submission).await {
            self.report_crm_failure(&metadata.user_id, "Leave Request", &crm_error).await;
        }
    }

    async fn report_crm_failure(&self, user_id: &str, kind: &str, crm_error: &CrmError) {
        error!(
            event_name = "approvals.crm_submit_failed",
            user_id,
            kind,
            error = %crm_error,
            "crm submission failed after approval"
        );
        self.notify_submitter(user_id, &format!("❌ Error processing your {kind}: {crm_error}"))
            .await;
    }

    async fn notify_submitter(&self, user_id: &str, text: &str) {
        if let Err(api_error) =
            self.api.post_message(user_id, None, &MessageTemplate::text(text)).await
        {
            error!(
                event_name = "approvals.dm_failed",
                user_id,
                error = %api_error,
                "failed to notify submitter"
            );
        }
    }

    async fn update_work_status(&self, metadata: &TimesheetMetadata) {
        let (text, emoji) = status_for_work_mode(&metadata.work_mode);
        let status = StatusUpdate {
            text: text.to_owned(),
            emoji: emoji.to_owned(),
            expiration: Some(metadata.end_datetime),
        };

        if let Err(api_error) = self.api.set_user_status(&metadata.user_id, &status).await {
            warn!(
                event_name = "approvals.status_update_failed",
                user_id = %metadata.user_id,
                error = %api_error,
                "failed to update submitter status"
            );
        }
    }
}

/// Renders a user-facing submission failure, used by the view-submission
/// service when the form data is malformed.
pub fn submission_failure_notice(kind: &str) -> String {
    format!("❌ Sorry, there was an error submitting your {kind}.")
}
