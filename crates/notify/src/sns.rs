//! Direct-to-phone SMS delivery via AWS SNS.
//!
//! [`SnsChannel`] publishes the rendered alert body straight to each
//! configured phone number. Region and credentials resolve once at
//! construction through the standard AWS configuration chain
//! (environment, profile, instance metadata).

use async_trait::async_trait;

use rangewatch_core::Notification;

use crate::channel::{
    join_dispatch, ChannelConfigError, DeliveryError, NotificationChannel,
};

/// Configuration for the SNS channel.
#[derive(Debug, Clone)]
pub struct SnsConfig {
    /// AWS region to publish from, e.g. `us-east-1`.
    pub region: String,
    /// Destination numbers in E.164 form. Must be non-empty.
    pub to_numbers: Vec<String>,
}

/// Publishes alert SMS messages through AWS SNS.
#[derive(Debug)]
pub struct SnsChannel {
    client: aws_sdk_sns::Client,
    to_numbers: Vec<String>,
    region: String,
}

impl SnsChannel {
    /// Build the channel, resolving AWS configuration for the given
    /// region. Credential problems surface on the first publish, not
    /// here — the AWS chain is lazy by design.
    pub async fn new(config: SnsConfig) -> Result<Self, ChannelConfigError> {
        if config.to_numbers.is_empty() {
            return Err(ChannelConfigError::NoDestinations);
        }

        let region = aws_config::Region::new(config.region.clone());
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        Ok(Self {
            client: aws_sdk_sns::Client::new(&aws_config),
            to_numbers: config.to_numbers,
            region: config.region,
        })
    }

    /// Publish one SMS to one phone number.
    async fn publish_one(&self, number: &str, body: &str) -> Result<(), String> {
        self.client
            .publish()
            .phone_number(number)
            .message(body)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| aws_sdk_sns::error::DisplayErrorContext(&e).to_string())
    }
}

#[async_trait]
impl NotificationChannel for SnsChannel {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let body = notification.render_body();
        let body = &body;

        let attempts: Vec<_> = self
            .to_numbers
            .iter()
            .map(|number| {
                (number.clone(), async move {
                    self.publish_one(number, body).await
                })
            })
            .collect();

        join_dispatch(attempts).await?;
        tracing::info!(
            recipients = self.to_numbers.len(),
            severity = %notification.severity,
            "SNS notifications published",
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "cloud-sns in {} ({} recipient(s))",
            self.region,
            self.to_numbers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_destination_list() {
        let err = SnsChannel::new(SnsConfig {
            region: "us-east-1".to_string(),
            to_numbers: Vec::new(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ChannelConfigError::NoDestinations));
    }
}
