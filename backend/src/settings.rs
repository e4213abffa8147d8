//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from a `GAMECONNECT_*` environment variable, a
//! configuration file or the command line. Optional integrations (database,
//! mail provider, mailing list, staff bootstrap) stay disabled until all of
//! their values are present.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::{Deserialize, Deserializer};

use crate::domain::{
    CredentialValidationError, EmailAddress, NewPassword, NotificationSettings,
    UserValidationError, Username,
};
use crate::outbound::mail::MailSettings;
use crate::outbound::mailing_list::MailchimpSettings;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_FROM_ADDRESS: &str = "noreply@gameconnect.example";
const DEFAULT_MAIL_ENDPOINT: &str = "https://mandrillapp.com/api/1.0/messages/send.json";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host {host:?}")]
    BindHost { host: String },
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("{present} is set but {missing} is missing")]
    Incomplete {
        present: &'static str,
        missing: &'static str,
    },
}

impl SettingsError {
    fn invalid(field: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            field,
            message: message.to_string(),
        }
    }
}

/// Credentials for the staff account created at start-up.
#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub username: Username,
    pub email: EmailAddress,
    pub password: NewPassword,
}

/// Read a text setting that the environment layer may have typed.
///
/// All-digit values such as `12345678` arrive as numbers; they are turned
/// back into their decimal text.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(value) => value,
        Raw::Signed(value) => value.to_string(),
        Raw::Unsigned(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
        Raw::Flag(value) => value.to_string(),
    }))
}

/// Top-level application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMECONNECT")]
pub struct AppSettings {
    /// Interface to listen on.
    #[serde(default, deserialize_with = "text")]
    pub host: Option<String>,
    /// TCP port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. Without it an in-memory store is used.
    #[serde(default, deserialize_with = "text")]
    pub database_url: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub staff_username: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub staff_email: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub staff_password: Option<String>,
    /// Mandrill-compatible `messages/send` endpoint.
    #[serde(default, deserialize_with = "text")]
    pub mail_endpoint: Option<String>,
    /// Mail provider API key. Mail is only logged when unset.
    #[serde(default, deserialize_with = "text")]
    pub mail_api_key: Option<String>,
    /// Sender address for notification and welcome emails.
    #[serde(default, deserialize_with = "text")]
    pub mail_from: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub mailchimp_api_key: Option<String>,
    /// Mailchimp data-centre prefix, e.g. `us6`.
    #[serde(default, deserialize_with = "text")]
    pub mailchimp_data_center: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub mailchimp_list_id: Option<String>,
    /// Timeout in seconds for calls to mail and mailing-list providers.
    #[ortho_config(default = 10)]
    pub outbound_timeout_secs: u64,
}

fn pair<'a>(
    first: (&'static str, Option<&'a str>),
    second: (&'static str, Option<&'a str>),
) -> Result<Option<(&'a str, &'a str)>, SettingsError> {
    match (first.1, second.1) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(SettingsError::Incomplete {
            present: first.0,
            missing: second.0,
        }),
        (None, Some(_)) => Err(SettingsError::Incomplete {
            present: second.0,
            missing: first.0,
        }),
    }
}

impl AppSettings {
    /// Socket address assembled from host and port.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::BindHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }

    /// Sender identity for outbound mail.
    pub fn notification_settings(&self) -> Result<NotificationSettings, SettingsError> {
        let raw = self.mail_from.as_deref().unwrap_or(DEFAULT_FROM_ADDRESS);
        let from_address =
            EmailAddress::new(raw).map_err(|err| SettingsError::invalid("mail_from", err))?;
        Ok(NotificationSettings { from_address })
    }

    /// Mail provider settings, or `None` when no API key is configured.
    pub fn mail_settings(&self) -> Result<Option<MailSettings>, SettingsError> {
        let Some(api_key) = self.mail_api_key.clone() else {
            return Ok(None);
        };
        let raw = self.mail_endpoint.as_deref().unwrap_or(DEFAULT_MAIL_ENDPOINT);
        let endpoint =
            Url::parse(raw).map_err(|err| SettingsError::invalid("mail_endpoint", err))?;
        Ok(Some(MailSettings {
            endpoint,
            api_key,
            timeout: self.outbound_timeout(),
        }))
    }

    /// Mailchimp settings when the key, data centre and list are all set.
    pub fn mailchimp_settings(&self) -> Result<Option<MailchimpSettings>, SettingsError> {
        let Some((api_key, data_center)) = pair(
            ("mailchimp_api_key", self.mailchimp_api_key.as_deref()),
            ("mailchimp_data_center", self.mailchimp_data_center.as_deref()),
        )?
        else {
            return match self.mailchimp_list_id {
                Some(_) => Err(SettingsError::Incomplete {
                    present: "mailchimp_list_id",
                    missing: "mailchimp_api_key",
                }),
                None => Ok(None),
            };
        };
        let list_id = self
            .mailchimp_list_id
            .clone()
            .ok_or(SettingsError::Incomplete {
                present: "mailchimp_api_key",
                missing: "mailchimp_list_id",
            })?;
        Ok(Some(MailchimpSettings {
            api_key: api_key.to_owned(),
            data_center: data_center.to_owned(),
            list_id,
            timeout: self.outbound_timeout(),
        }))
    }

    /// Staff bootstrap credentials when username, email and password are set.
    pub fn staff_account(&self) -> Result<Option<StaffAccount>, SettingsError> {
        let Some((username, email)) = pair(
            ("staff_username", self.staff_username.as_deref()),
            ("staff_email", self.staff_email.as_deref()),
        )?
        else {
            return match self.staff_password {
                Some(_) => Err(SettingsError::Incomplete {
                    present: "staff_password",
                    missing: "staff_username",
                }),
                None => Ok(None),
            };
        };
        let password = self
            .staff_password
            .as_deref()
            .ok_or(SettingsError::Incomplete {
                present: "staff_username",
                missing: "staff_password",
            })?;
        let username = Username::new(username)
            .map_err(|err: UserValidationError| SettingsError::invalid("staff_username", err))?;
        let email = EmailAddress::new(email)
            .map_err(|err: UserValidationError| SettingsError::invalid("staff_email", err))?;
        let password = NewPassword::new(password, password).map_err(
            |err: CredentialValidationError| SettingsError::invalid("staff_password", err),
        )?;
        Ok(Some(StaffAccount {
            username,
            email,
            password,
        }))
    }
}
