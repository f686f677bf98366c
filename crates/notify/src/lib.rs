//! Pluggable notification delivery for rangewatch alerts.
//!
//! This crate provides the [`NotificationChannel`] capability and its
//! variants:
//!
//! - [`ConsoleChannel`] — structured log output, always succeeds.
//! - [`SmsApiChannel`] — transactional SMS HTTP API (Twilio-compatible
//!   message endpoint).
//! - [`SmtpGatewayChannel`] — SMTP relay to phone-number-derived
//!   carrier gateway addresses.
//! - [`SnsChannel`] — direct-to-phone publish via AWS SNS.
//!
//! Exactly one channel is active per process, chosen from configuration
//! at startup via [`build_channel`] and never switched at runtime.
//! Direct-message variants fan out to every destination concurrently
//! and report a [`DeliveryError`] carrying per-destination detail when
//! any dispatch fails; sibling dispatches are never cancelled.

pub mod builder;
pub mod channel;
pub mod console;
pub mod sms_api;
pub mod smtp_gateway;
pub mod sns;

pub use builder::{build_channel, ChannelConfig};
pub use channel::{ChannelConfigError, DeliveryError, DispatchOutcome, NotificationChannel};
pub use console::ConsoleChannel;
pub use sms_api::{SmsApiChannel, SmsApiConfig};
pub use smtp_gateway::{SmtpGatewayChannel, SmtpGatewayConfig};
pub use sns::{SnsChannel, SnsConfig};
