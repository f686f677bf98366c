//! Environment-driven monitor configuration.
//!
//! Everything is read once at process start into [`MonitorConfig`] and
//! passed down by parameter; nothing below `main` touches the
//! environment. Validation collects every problem it finds so a
//! misconfigured deployment sees the full list at once, not just the
//! first missing key.

use std::path::PathBuf;
use std::str::FromStr;

use rangewatch_core::thresholds::{DEFAULT_CRITICAL_MILES, DEFAULT_LOW_MILES};
use rangewatch_core::{Severity, Thresholds};
use rangewatch_notify::smtp_gateway::DEFAULT_SMTP_PORT;
use rangewatch_notify::{ChannelConfig, SmsApiConfig, SmtpGatewayConfig, SnsConfig};

use crate::telematics::TelematicsConfig;

/// Default location of the persisted alert state record.
pub const DEFAULT_STATE_PATH: &str = "/var/lib/rangewatch/state.json";

/// Default vehicle label used in notification bodies.
const DEFAULT_VEHICLE: &str = "Vehicle";

/// Startup configuration failure. Aborts the process before any cycle
/// runs; `problems` enumerates every missing or invalid input.
#[derive(Debug, thiserror::Error)]
#[error("Invalid configuration: {}", .problems.join("; "))]
pub struct ConfigError {
    pub problems: Vec<String>,
}

/// Fully-resolved monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Operator-facing vehicle label.
    pub vehicle: String,
    pub thresholds: Thresholds,
    /// Path of the persisted alert state record.
    pub state_path: PathBuf,
    pub telematics: TelematicsConfig,
    /// The one channel variant active for this process.
    pub channel: ChannelConfig,
    /// Optional forced-severity test override; when set, the cycle is
    /// bypassed entirely and one synthetic notification is sent.
    pub force_severity: Option<Severity>,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable            | Required           | Default                          |
    /// |---------------------|--------------------|----------------------------------|
    /// | `TELEMATICS_URL`    | yes                | —                                |
    /// | `TELEMATICS_TOKEN`  | no                 | —                                |
    /// | `NOTIFY_CHANNEL`    | no                 | `console`                        |
    /// | `VEHICLE_NAME`      | no                 | `Vehicle`                        |
    /// | `LOW_MILES`         | no                 | `50`                             |
    /// | `CRITICAL_MILES`    | no                 | `15`                             |
    /// | `STATE_PATH`        | no                 | `/var/lib/rangewatch/state.json` |
    /// | `FORCE_SEVERITY`    | no                 | —                                |
    /// | `SMS_*`             | for `sms-direct`   | —                                |
    /// | `SMTP_*`, `GATEWAY_ADDRESSES` | for `sms-gateway-email` | —         |
    /// | `AWS_REGION`, `SNS_TO_NUMBERS` | for `cloud-sns`        | —         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key/value lookup. Used by
    /// `from_env` and directly by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();

        let vehicle = lookup("VEHICLE_NAME").unwrap_or_else(|| DEFAULT_VEHICLE.to_string());

        let low_miles = parse_or(&lookup, "LOW_MILES", DEFAULT_LOW_MILES, &mut problems);
        let critical_miles = parse_or(
            &lookup,
            "CRITICAL_MILES",
            DEFAULT_CRITICAL_MILES,
            &mut problems,
        );
        let thresholds = match Thresholds::new(low_miles, critical_miles) {
            Ok(t) => t,
            Err(e) => {
                problems.push(e.to_string());
                Thresholds::default()
            }
        };

        let state_path =
            PathBuf::from(lookup("STATE_PATH").unwrap_or_else(|| DEFAULT_STATE_PATH.to_string()));

        let url = require(&lookup, "TELEMATICS_URL", &mut problems);
        let telematics = TelematicsConfig {
            url,
            token: lookup("TELEMATICS_TOKEN"),
        };

        let force_severity = match lookup("FORCE_SEVERITY") {
            None => None,
            Some(raw) => match Severity::from_str(&raw) {
                Ok(severity) => Some(severity),
                Err(e) => {
                    problems.push(format!("FORCE_SEVERITY: {e}"));
                    None
                }
            },
        };

        let channel = channel_from_lookup(&lookup, &mut problems);

        if problems.is_empty() {
            Ok(Self {
                vehicle,
                thresholds,
                state_path,
                telematics,
                channel,
                force_severity,
            })
        } else {
            Err(ConfigError { problems })
        }
    }
}

/// Resolve the channel selector and its per-variant inputs.
fn channel_from_lookup<F>(lookup: &F, problems: &mut Vec<String>) -> ChannelConfig
where
    F: Fn(&str) -> Option<String>,
{
    let selector = lookup("NOTIFY_CHANNEL").unwrap_or_else(|| "console".to_string());

    match selector.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "console" | "log" => ChannelConfig::Console,
        "sms-direct" | "sms" => ChannelConfig::SmsApi(SmsApiConfig {
            api_url: require(lookup, "SMS_API_URL", problems),
            account_sid: require(lookup, "SMS_ACCOUNT_SID", problems),
            auth_token: require(lookup, "SMS_AUTH_TOKEN", problems),
            from_number: require(lookup, "SMS_FROM_NUMBER", problems),
            to_numbers: require_list(lookup, "SMS_TO_NUMBERS", problems),
        }),
        "sms-gateway-email" | "gateway-email" | "email" => {
            ChannelConfig::SmtpGateway(SmtpGatewayConfig {
                smtp_host: require(lookup, "SMTP_HOST", problems),
                smtp_port: parse_or(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT, problems),
                from_address: require(lookup, "SMTP_FROM", problems),
                smtp_user: lookup("SMTP_USER"),
                smtp_password: lookup("SMTP_PASSWORD"),
                gateway_addresses: require_list(lookup, "GATEWAY_ADDRESSES", problems),
            })
        }
        "cloud-sns" | "sns" => ChannelConfig::Sns(SnsConfig {
            region: require(lookup, "AWS_REGION", problems),
            to_numbers: require_list(lookup, "SNS_TO_NUMBERS", problems),
        }),
        other => {
            problems.push(format!(
                "NOTIFY_CHANNEL: unknown channel '{other}' (expected console, sms-direct, sms-gateway-email, or cloud-sns)"
            ));
            ChannelConfig::Console
        }
    }
}

/// Fetch a required key, recording a problem when it is missing.
fn require<F>(lookup: &F, key: &str, problems: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            problems.push(format!("{key} is required"));
            String::new()
        }
    }
}

/// Fetch a required comma-separated list, recording a problem when it
/// is missing or empty.
fn require_list<F>(lookup: &F, key: &str, problems: &mut Vec<String>) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let values: Vec<String> = lookup(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if values.is_empty() {
        problems.push(format!("{key} must list at least one destination"));
    }
    values
}

/// Parse an optional key, falling back to the default and recording a
/// problem when the value is present but unparseable.
fn parse_or<F, T>(lookup: &F, key: &str, default: T, problems: &mut Vec<String>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
    <T as FromStr>::Err: std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                problems.push(format!("{key}: {e} (got '{raw}')"));
                default
            }
        },
    }
}
