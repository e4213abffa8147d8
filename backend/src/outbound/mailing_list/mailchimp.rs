//! Mailchimp Marketing API adapter.
//!
//! Members are added with `POST /3.0/lists/{list_id}/members` on the account's
//! data-centre host, authenticated with HTTP basic auth and the API key as
//! the password.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::EmailAddress;
use crate::domain::ports::{MailingList, MailingListError};
use crate::outbound::body_preview;

#[derive(Debug, Clone)]
pub struct MailchimpSettings {
    pub api_key: String,
    /// Data-centre prefix such as `us6`.
    pub data_center: String,
    pub list_id: String,
    pub timeout: Duration,
}

impl MailchimpSettings {
    /// Members endpoint for the configured list.
    pub fn members_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "https://{dc}.api.mailchimp.com/3.0/lists/{list}/members",
            dc = self.data_center,
            list = self.list_id
        ))
    }
}

#[derive(Debug, Serialize)]
struct MemberRequest<'a> {
    email_address: &'a str,
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct ProblemDetail {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailchimpSetupError {
    #[error("invalid Mailchimp data centre or list id: {0}")]
    Url(#[from] url::ParseError),
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct MailchimpMailingList {
    client: Client,
    members_url: Url,
    api_key: String,
}

impl MailchimpMailingList {
    pub fn new(settings: MailchimpSettings) -> Result<Self, MailchimpSetupError> {
        let members_url = settings.members_url()?;
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            members_url,
            api_key: settings.api_key,
        })
    }
}

/// Interpret a non-success response. Re-subscribing an existing member is
/// reported by Mailchimp as `400 Member Exists` and counts as success.
fn interpret_failure(status: StatusCode, body: &[u8]) -> Result<(), MailingListError> {
    let problem: Option<ProblemDetail> = serde_json::from_slice(body).ok();
    if status == StatusCode::BAD_REQUEST
        && problem
            .as_ref()
            .is_some_and(|p| p.title.eq_ignore_ascii_case("Member Exists"))
    {
        return Ok(());
    }
    let message = problem
        .map(|p| format!("{}: {}", p.title, p.detail))
        .unwrap_or_else(|| body_preview(body));
    Err(MailingListError::rejected(status.as_u16(), message))
}

#[async_trait]
impl MailingList for MailchimpMailingList {
    async fn add_member(&self, email: &EmailAddress) -> Result<(), MailingListError> {
        let response = self
            .client
            .post(self.members_url.clone())
            .basic_auth("gameconnect", Some(&self.api_key))
            .json(&MemberRequest {
                email_address: email.as_str(),
                status: "subscribed",
            })
            .send()
            .await
            .map_err(|err| MailingListError::transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            debug!(%email, "mailing list member added");
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| MailingListError::transport(err.to_string()))?;
        interpret_failure(status, &body)
    }
}
