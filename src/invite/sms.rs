//! Sending invite links by SMS through the Twilio REST API.

use reqwest::Client;

use crate::Error;

/// Credentials and sender number for the Twilio messaging API, read from the
/// environment at start-up.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// The phone number messages are sent from, in E.164 format.
    pub from_number: String,
}

impl SmsConfig {
    /// Read the messaging credentials from the `TWILIO_ACCOUNT_SID`,
    /// `TWILIO_AUTH_TOKEN` and `TWILIO_FROM_NUMBER` environment variables.
    ///
    /// Returns `None` if any of them is unset, in which case SMS invites are
    /// disabled and users have to share invite links themselves.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok()?,
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok()?,
            from_number: std::env::var("TWILIO_FROM_NUMBER").ok()?,
        })
    }
}

/// A client for sending SMS messages.
#[derive(Debug, Clone)]
pub struct SmsSender {
    client: Client,
    config: SmsConfig,
}

impl SmsSender {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send an SMS with the given body to `to` (E.164 format).
    ///
    /// # Errors
    ///
    /// Returns an [Error::SmsFailed] if the messaging API could not be
    /// reached or rejected the request.
    pub async fn send(&self, to: &str, body: &str) -> Result<(), Error> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|error| Error::SmsFailed(error.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::error!("SMS to {to} rejected with status {status}: {details}");
            return Err(Error::SmsFailed(format!("status {status}")));
        }

        Ok(())
    }
}
