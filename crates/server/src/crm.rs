//! Salesforce integration for the approval workflows.
//!
//! The flow mirrors the CRM contract: an OAuth2 password-grant token fetch,
//! then a bearer-token POST of the approved submission to a fixed REST
//! path. Non-2xx responses surface as `CrmError` and are rendered into a
//! user-visible error message by the approval flow; there is no retry and
//! no rollback of already-posted Slack messages.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use suplo_core::config::CrmConfig;

pub const TIMESHEET_SUBMIT_PATH: &str = "/services/apexrest/time-sheet/v1.0/Submit";
pub const LEAVE_REQUEST_SUBMIT_PATH: &str = "/services/apexrest/leave-request/v1.0/Submit";

/// Work timestamps are reported in the workspace's local timezone (UTC+7).
const WORK_UTC_OFFSET_SECS: i32 = 7 * 3600;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("crm transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("crm token fetch failed with status {status}: {message}")]
    Token { status: u16, message: String },
    #[error("crm api call failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TimesheetSubmission {
    pub email: String,
    pub work_start: String,
    pub work_end: String,
    pub work_mode: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct LeaveRequestSubmission {
    pub email: String,
    pub title: String,
    pub note: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct SalesforceClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: SecretString,
    username: String,
    password: SecretString,
}

impl SalesforceClient {
    /// Builds a client when the CRM integration is enabled and fully
    /// configured; `None` otherwise (approvals then skip the CRM call).
    pub fn from_config(config: &CrmConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }

        Some(Self {
            client: Client::new(),
            base_url: config.base_url.clone()?,
            client_id: config.client_id.clone()?,
            client_secret: config.client_secret.clone()?,
            username: config.username.clone()?,
            password: config.password.clone()?,
        })
    }

    async fn fetch_token(&self) -> Result<String, CrmError> {
        let url = format!("{}/services/oauth2/token", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .query(&[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("username", self.username.as_str()),
                ("password", self.password.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|error| format!("failed to read error response body: {error}"));
            return Err(CrmError::Token { status: status.as_u16(), message });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn submit<T: Serialize>(&self, path: &str, payload: &T) -> Result<(), CrmError> {
        let access_token = self.fetch_token().await?;
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let response =
            self.client.post(url).bearer_auth(access_token).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|error| format!("failed to read error response body: {error}"));
            return Err(CrmError::Api { status: status.as_u16(), message });
        }

        Ok(())
    }

    pub async fn submit_timesheet(
        &self,
        submission: &TimesheetSubmission,
    ) -> Result<(), CrmError> {
        info!(
            event_name = "crm.timesheet.submit",
            email = %submission.email,
            work_mode = %submission.work_mode,
            "submitting approved timesheet to crm"
        );
        self.submit(TIMESHEET_SUBMIT_PATH, submission).await
    }

    pub async fn submit_leave_request(
        &self,
        submission: &LeaveRequestSubmission,
    ) -> Result<(), CrmError> {
        info!(
            event_name = "crm.leave_request.submit",
            email = %submission.email,
            "submitting approved leave request to crm"
        );
        self.submit(LEAVE_REQUEST_SUBMIT_PATH, submission).await
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the workspace timezone, as the timesheet
/// endpoint expects. Falls back to the raw epoch for out-of-range values.
pub fn format_work_timestamp(epoch_secs: i64) -> String {
    match FixedOffset::east_opt(WORK_UTC_OFFSET_SECS)
        .and_then(|offset| offset.timestamp_opt(epoch_secs, 0).single())
    {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_secs.to_string(),
    }
}

/// Reformats a picker date (`YYYY-MM-DD`) as `DD/MM/YYYY` for the leave
/// request endpoint. Unparseable input passes through unchanged.
pub fn format_leave_date(iso_date: &str) -> String {
    NaiveDate::parse_from_str(iso_date, "%Y-%m-%d")
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| iso_date.to_owned())
}

#[cfg(test)]
mod tests {
    use suplo_core::config::CrmConfig;

    use super::{
        format_leave_date, format_work_timestamp, LeaveRequestSubmission, SalesforceClient,
        TimesheetSubmission,
    };

    #[test]
    fn work_timestamp_is_rendered_in_utc_plus_seven() {
        // 2024-10-27 03:33:20 UTC == 10:33:20 UTC+7
        assert_eq!(format_work_timestamp(1_730_000_000), "2024-10-27 10:33:20");
    }

    #[test]
    fn leave_date_is_reformatted_day_first() {
        assert_eq!(format_leave_date("2026-08-07"), "07/08/2026");
        assert_eq!(format_leave_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn submissions_serialize_with_crm_field_names() {
        let timesheet = TimesheetSubmission {
            email: "a@b.co".to_owned(),
            work_start: "2026-08-07 09:00:00".to_owned(),
            work_end: "2026-08-07 17:00:00".to_owned(),
            work_mode: "WFO".to_owned(),
        };
        let json = serde_json::to_value(&timesheet).expect("serialize");
        assert_eq!(json["Email"], "a@b.co");
        assert_eq!(json["WorkStart"], "2026-08-07 09:00:00");
        assert_eq!(json["WorkMode"], "WFO");

        let leave = LeaveRequestSubmission {
            email: "a@b.co".to_owned(),
            title: "Trip".to_owned(),
            note: "PTO".to_owned(),
            start_date: "07/08/2026".to_owned(),
            end_date: "14/08/2026".to_owned(),
        };
        let json = serde_json::to_value(&leave).expect("serialize");
        assert_eq!(json["Title"], "Trip");
        assert_eq!(json["StartDate"], "07/08/2026");
        assert_eq!(json["EndDate"], "14/08/2026");
    }

    #[test]
    fn disabled_or_incomplete_config_yields_no_client() {
        let disabled = CrmConfig {
            enabled: false,
            base_url: Some("https://example.my.salesforce.com".to_owned()),
            client_id: Some("id".to_owned()),
            client_secret: Some("secret".to_owned().into()),
            username: Some("user".to_owned()),
            password: Some("pass".to_owned().into()),
        };
        assert!(SalesforceClient::from_config(&disabled).is_none());

        let incomplete = CrmConfig {
            enabled: true,
            base_url: Some("https://example.my.salesforce.com".to_owned()),
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
        };
        assert!(SalesforceClient::from_config(&incomplete).is_none());
    }
}
