//! Transactional SMS delivery over a Twilio-compatible HTTP API.
//!
//! [`SmsApiChannel`] POSTs one form-encoded message-create request per
//! destination number, authenticated with HTTP basic auth. All
//! destinations are dispatched concurrently; the channel succeeds only
//! when every request is accepted.

use std::time::Duration;

use async_trait::async_trait;

use rangewatch_core::Notification;

use crate::channel::{
    join_dispatch, ChannelConfigError, DeliveryError, NotificationChannel,
};

/// HTTP request timeout for a single message-create attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a single SMS API dispatch.
#[derive(Debug, thiserror::Error)]
pub enum SmsApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("SMS API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// SmsApiChannel
// ---------------------------------------------------------------------------

/// Configuration for the transactional SMS API channel.
#[derive(Debug, Clone)]
pub struct SmsApiConfig {
    /// Full message-create endpoint, e.g.
    /// `https://api.twilio.com/2010-04-01/Accounts/<sid>/Messages.json`.
    pub api_url: String,
    /// Account identifier, used as the basic-auth username.
    pub account_sid: String,
    /// API secret, used as the basic-auth password.
    pub auth_token: String,
    /// Sender number in E.164 form.
    pub from_number: String,
    /// Destination numbers in E.164 form. Must be non-empty.
    pub to_numbers: Vec<String>,
}

/// Sends alert SMS messages through a transactional HTTP API.
#[derive(Debug)]
pub struct SmsApiChannel {
    client: reqwest::Client,
    config: SmsApiConfig,
}

impl SmsApiChannel {
    /// Build the channel, validating the destination list up front.
    pub fn new(config: SmsApiConfig) -> Result<Self, ChannelConfigError> {
        if config.to_numbers.is_empty() {
            return Err(ChannelConfigError::NoDestinations);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");

        Ok(Self { client, config })
    }

    /// Execute one message-create request and check the response
    /// status.
    async fn send_one(&self, to: &str, body: &str) -> Result<(), SmsApiError> {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&self.config.api_url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SmsApiError::ApiError { status, body });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SmsApiChannel {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let body = notification.render_body();
        let body = &body;

        let attempts: Vec<_> = self
            .config
            .to_numbers
            .iter()
            .map(|to| {
                (to.clone(), async move {
                    self.send_one(to, body).await.map_err(|e| e.to_string())
                })
            })
            .collect();

        join_dispatch(attempts).await?;
        tracing::info!(
            recipients = self.config.to_numbers.len(),
            severity = %notification.severity,
            "SMS notifications sent",
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sms-direct ({} recipient(s))", self.config.to_numbers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(to_numbers: Vec<String>) -> SmsApiConfig {
        SmsApiConfig {
            api_url: "https://api.example.test/messages".to_string(),
            account_sid: "AC0000".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550009999".to_string(),
            to_numbers,
        }
    }

    #[test]
    fn rejects_empty_destination_list() {
        let err = SmsApiChannel::new(config(Vec::new())).unwrap_err();
        assert!(matches!(err, ChannelConfigError::NoDestinations));
    }

    #[test]
    fn describe_includes_recipient_count() {
        let channel = SmsApiChannel::new(config(vec![
            "+15550001111".to_string(),
            "+15550002222".to_string(),
        ]))
        .unwrap();
        assert_eq!(channel.describe(), "sms-direct (2 recipient(s))");
    }

    #[test]
    fn sms_api_error_display_includes_status() {
        let err = SmsApiError::ApiError {
            status: 401,
            body: "authentication failed".to_string(),
        };
        assert_eq!(err.to_string(), "SMS API error (401): authentication failed");
    }
}
