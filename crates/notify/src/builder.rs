//! Configuration-driven channel construction.
//!
//! Selection is a pure data-driven step: the orchestrator parses its
//! environment into a [`ChannelConfig`] variant and [`build_channel`]
//! turns it into the one concrete channel for the process lifetime.

use crate::channel::{ChannelConfigError, NotificationChannel};
use crate::console::ConsoleChannel;
use crate::sms_api::{SmsApiChannel, SmsApiConfig};
use crate::smtp_gateway::{SmtpGatewayChannel, SmtpGatewayConfig};
use crate::sns::{SnsChannel, SnsConfig};

/// Fully-resolved configuration for exactly one channel variant.
#[derive(Debug, Clone)]
pub enum ChannelConfig {
    Console,
    SmsApi(SmsApiConfig),
    SmtpGateway(SmtpGatewayConfig),
    Sns(SnsConfig),
}

/// Construct the configured channel, failing fast on invalid
/// configuration (empty destination lists, bad addresses, relay setup).
pub async fn build_channel(
    config: ChannelConfig,
) -> Result<Box<dyn NotificationChannel>, ChannelConfigError> {
    match config {
        ChannelConfig::Console => Ok(Box::new(ConsoleChannel::new())),
        ChannelConfig::SmsApi(c) => Ok(Box::new(SmsApiChannel::new(c)?)),
        ChannelConfig::SmtpGateway(c) => Ok(Box::new(SmtpGatewayChannel::new(c)?)),
        ChannelConfig::Sns(c) => Ok(Box::new(SnsChannel::new(c).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_channel_builds_without_credentials() {
        let channel = build_channel(ChannelConfig::Console).await.unwrap();
        assert_eq!(channel.describe(), "console");
    }

    #[tokio::test]
    async fn direct_channel_with_no_destinations_fails_fast() {
        let err = build_channel(ChannelConfig::SmsApi(SmsApiConfig {
            api_url: "https://api.example.test/messages".to_string(),
            account_sid: "AC0000".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550009999".to_string(),
            to_numbers: Vec::new(),
        }))
        .await
        .unwrap_err();
        assert!(matches!(err, ChannelConfigError::NoDestinations));
    }
}
