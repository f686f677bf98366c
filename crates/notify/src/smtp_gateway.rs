//! SMS delivery via SMTP relay to carrier email-to-SMS gateways.
//!
//! [`SmtpGatewayChannel`] wraps the `lettre` async SMTP transport and
//! sends one short plain-text email per configured gateway address
//! (e.g. `5551234567@vtext.com`). Addresses and the relay are validated
//! at construction; dispatch fans out to every address concurrently.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use rangewatch_core::Notification;

use crate::channel::{
    join_dispatch, ChannelConfigError, DeliveryError, NotificationChannel,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a single gateway email dispatch.
#[derive(Debug, thiserror::Error)]
pub enum SmtpGatewayError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// SmtpGatewayChannel
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the carrier-gateway SMTP channel.
#[derive(Debug, Clone)]
pub struct SmtpGatewayConfig {
    /// SMTP relay hostname.
    pub smtp_host: String,
    /// SMTP relay port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Phone-number-derived carrier gateway addresses. Must be
    /// non-empty.
    pub gateway_addresses: Vec<String>,
}

/// Sends alert messages as short emails to carrier SMS gateways.
#[derive(Debug)]
pub struct SmtpGatewayChannel {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Raw address alongside its parsed mailbox, for reporting.
    recipients: Vec<(String, Mailbox)>,
    smtp_host: String,
}

impl SmtpGatewayChannel {
    /// Build the channel: parse every address and set up the STARTTLS
    /// relay. Any bad address or relay parameter fails construction.
    pub fn new(config: SmtpGatewayConfig) -> Result<Self, ChannelConfigError> {
        if config.gateway_addresses.is_empty() {
            return Err(ChannelConfigError::NoDestinations);
        }

        let from: Mailbox =
            config
                .from_address
                .parse()
                .map_err(|e: lettre::address::AddressError| ChannelConfigError::InvalidAddress {
                    address: config.from_address.clone(),
                    reason: e.to_string(),
                })?;

        let mut recipients = Vec::with_capacity(config.gateway_addresses.len());
        for address in &config.gateway_addresses {
            let mailbox: Mailbox = address.parse().map_err(|e: lettre::address::AddressError| {
                ChannelConfigError::InvalidAddress {
                    address: address.clone(),
                    reason: e.to_string(),
                }
            })?;
            recipients.push((address.clone(), mailbox));
        }

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: transport_builder.build(),
            from,
            recipients,
            smtp_host: config.smtp_host,
        })
    }

    /// Assemble and send one gateway email.
    async fn send_one(
        &self,
        to: Mailbox,
        subject: &str,
        body: String,
    ) -> Result<(), SmtpGatewayError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| SmtpGatewayError::Build(e.to_string()))?;

        self.mailer.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SmtpGatewayChannel {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let subject = notification.render_subject();
        let body = notification.render_body();
        let subject = &subject;
        let body = &body;

        let attempts: Vec<_> = self
            .recipients
            .iter()
            .map(|(address, mailbox)| {
                let mailbox = mailbox.clone();
                (address.clone(), async move {
                    self.send_one(mailbox, subject, body.clone())
                        .await
                        .map_err(|e| e.to_string())
                })
            })
            .collect();

        join_dispatch(attempts).await?;
        tracing::info!(
            recipients = self.recipients.len(),
            severity = %notification.severity,
            "Gateway notification emails sent",
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "sms-gateway-email via {} ({} recipient(s))",
            self.smtp_host,
            self.recipients.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(gateway_addresses: Vec<String>) -> SmtpGatewayConfig {
        SmtpGatewayConfig {
            smtp_host: "smtp.example.test".to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: "alerts@example.test".to_string(),
            smtp_user: Some("alerts".to_string()),
            smtp_password: Some("secret".to_string()),
            gateway_addresses,
        }
    }

    #[test]
    fn rejects_empty_destination_list() {
        let err = SmtpGatewayChannel::new(config(Vec::new())).unwrap_err();
        assert!(matches!(err, ChannelConfigError::NoDestinations));
    }

    #[test]
    fn rejects_unparseable_gateway_address() {
        let err =
            SmtpGatewayChannel::new(config(vec!["not an address".to_string()])).unwrap_err();
        assert!(matches!(
            err,
            ChannelConfigError::InvalidAddress { .. }
        ));
    }

    #[test]
    fn rejects_unparseable_from_address() {
        let mut cfg = config(vec!["5551234567@vtext.com".to_string()]);
        cfg.from_address = "@@".to_string();
        let err = SmtpGatewayChannel::new(cfg).unwrap_err();
        assert!(matches!(
            err,
            ChannelConfigError::InvalidAddress { .. }
        ));
    }

    #[test]
    fn describe_includes_relay_and_recipient_count() {
        let channel = SmtpGatewayChannel::new(config(vec![
            "5551234567@vtext.com".to_string(),
            "5557654321@txt.att.net".to_string(),
        ]))
        .unwrap();
        assert_eq!(
            channel.describe(),
            "sms-gateway-email via smtp.example.test (2 recipient(s))"
        );
    }
}
