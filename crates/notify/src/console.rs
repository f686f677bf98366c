//! Console notification channel.
//!
//! Formats the alert as a structured `tracing` event. Useful for local
//! runs and as the default when no messaging credentials are
//! configured. Always succeeds.

use async_trait::async_trait;

use rangewatch_core::Notification;

use crate::channel::{DeliveryError, NotificationChannel};

#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            severity = %notification.severity,
            vehicle = %notification.vehicle,
            range_miles = notification.range_miles,
            triggered_at = %notification.triggered_at.to_rfc3339(),
            "{}",
            notification.render_body(),
        );
        Ok(())
    }

    fn describe(&self) -> String {
        "console".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rangewatch_core::Severity;

    #[tokio::test]
    async fn console_send_always_succeeds() {
        let channel = ConsoleChannel::new();
        let notification = Notification::new(Severity::Critical, 9.0, "Outback", Utc::now());
        assert!(channel.send(&notification).await.is_ok());
    }

    #[test]
    fn describe_names_the_channel() {
        assert_eq!(ConsoleChannel::new().describe(), "console");
    }
}
