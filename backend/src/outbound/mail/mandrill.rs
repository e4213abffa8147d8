//! Reqwest-backed Mandrill `messages/send` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::OutboundEmail;
use crate::domain::ports::{MailTransport, MailTransportError};
use crate::outbound::body_preview;

/// Provider endpoint and credentials.
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Full URL of the `messages/send.json` endpoint.
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    key: &'a str,
    message: MessageDto<'a>,
}

#[derive(Debug, Serialize)]
struct MessageDto<'a> {
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    from_email: &'a str,
    to: [RecipientDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RecipientDto<'a> {
    email: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct SendResult {
    email: String,
    status: String,
    #[serde(default)]
    reject_reason: Option<String>,
}

pub struct MandrillMailTransport {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl MandrillMailTransport {
    /// Build the adapter with a client bounded by `settings.timeout`.
    pub fn new(settings: MailSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
        })
    }
}

fn request_body<'a>(api_key: &'a str, email: &'a OutboundEmail) -> SendRequest<'a> {
    SendRequest {
        key: api_key,
        message: MessageDto {
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
            from_email: email.from.as_str(),
            to: [RecipientDto {
                email: email.to.as_str(),
                kind: "to",
            }],
        },
    }
}

/// Mandrill answers 200 even for rejected recipients; inspect each result.
fn check_results(status: u16, body: &[u8]) -> Result<(), MailTransportError> {
    let results: Vec<SendResult> = serde_json::from_slice(body).map_err(|err| {
        MailTransportError::transport(format!("unreadable provider response: {err}"))
    })?;
    match results
        .iter()
        .find(|result| matches!(result.status.as_str(), "rejected" | "invalid"))
    {
        Some(result) => Err(MailTransportError::rejected(
            status,
            format!(
                "{} {}: {}",
                result.email,
                result.status,
                result.reject_reason.as_deref().unwrap_or("no reason given")
            ),
        )),
        None => Ok(()),
    }
}

#[async_trait]
impl MailTransport for MandrillMailTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request_body(&self.api_key, email))
            .send()
            .await
            .map_err(|err| MailTransportError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| MailTransportError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(MailTransportError::rejected(
                status.as_u16(),
                body_preview(&body),
            ));
        }
        check_results(status.as_u16(), &body)?;
        debug!(to = %email.to, "mail accepted by provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, NotificationMessage};
    use rstest::rstest;
    use serde_json::Value;

    fn email() -> OutboundEmail {
        let from = EmailAddress::new("noreply@gameconnect.test").expect("from");
        let to = EmailAddress::new("u2@example.com").expect("to");
        NotificationMessage::welcome().to_email(&from, &to)
    }

    #[test]
    fn payload_uses_mandrill_field_names() {
        let email = email();
        let value = serde_json::to_value(request_body("secret", &email)).expect("serialise");
        assert_eq!(value.get("key").and_then(Value::as_str), Some("secret"));
        assert_eq!(
            value.pointer("/message/from_email").and_then(Value::as_str),
            Some("noreply@gameconnect.test")
        );
        assert_eq!(
            value.pointer("/message/to/0/type").and_then(Value::as_str),
            Some("to")
        );
    }

    #[rstest]
    #[case(r#"[{"email":"u2@example.com","status":"sent"}]"#, true)]
    #[case(r#"[{"email":"u2@example.com","status":"queued"}]"#, true)]
    #[case(
        r#"[{"email":"u2@example.com","status":"rejected","reject_reason":"hard-bounce"}]"#,
        false
    )]
    #[case("not json", false)]
    fn provider_results_are_checked(#[case] body: &str, #[case] ok: bool) {
        assert_eq!(check_results(200, body.as_bytes()).is_ok(), ok);
    }
}
