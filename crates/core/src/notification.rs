//! Notification value object and shared message rendering.
//!
//! Every delivery channel renders the same body text via
//! [`Notification::render_body`], so the wording of an alert does not
//! depend on which transport carries it. Bodies are kept short (soft
//! 160-character budget) because two of the channels end up as SMS.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Alert severity, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "critical" => Ok(Severity::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown severity '{other}' (expected 'low' or 'critical')"
            ))),
        }
    }
}

/// A single alert handed to the configured delivery channel.
///
/// Ephemeral — built by the engine, dispatched within the same cycle,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    /// The range reading that triggered the alert, in miles.
    pub range_miles: f64,
    /// Operator-facing vehicle label, e.g. "Outback".
    pub vehicle: String,
    pub triggered_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        severity: Severity,
        range_miles: f64,
        vehicle: impl Into<String>,
        triggered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            severity,
            range_miles,
            vehicle: vehicle.into(),
            triggered_at,
        }
    }

    /// Short subject line, used where the transport has one (the
    /// carrier-gateway email channel).
    pub fn render_subject(&self) -> String {
        match self.severity {
            Severity::Low => "Fuel range low".to_string(),
            Severity::Critical => "URGENT: fuel range critical".to_string(),
        }
    }

    /// Plain-text message body shared by every channel.
    pub fn render_body(&self) -> String {
        match self.severity {
            Severity::Low => format!(
                "{} is down to {:.0} miles of fuel range. Plan to refuel soon.",
                self.vehicle, self.range_miles
            ),
            Severity::Critical => format!(
                "URGENT: {} has only {:.0} miles of fuel range left. Refuel immediately.",
                self.vehicle, self.range_miles
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(severity: Severity) -> Notification {
        Notification::new(severity, 12.0, "Outback", Utc::now())
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("low".parse::<Severity>().unwrap(), Severity::Low);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" Critical ".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("urgent".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn critical_body_carries_urgent_marker() {
        let body = notification(Severity::Critical).render_body();
        assert!(body.contains("URGENT"));
        assert!(body.contains("Outback"));
        assert!(body.contains("12"));
        assert!(body.contains("miles"));
    }

    #[test]
    fn low_body_is_advisory() {
        let body = notification(Severity::Low).render_body();
        assert!(!body.contains("URGENT"));
        assert!(body.contains("Outback"));
        assert!(body.contains("12"));
        assert!(body.contains("miles"));
    }

    #[test]
    fn bodies_fit_an_sms_segment() {
        for severity in [Severity::Low, Severity::Critical] {
            let body = Notification::new(severity, 148.0, "Family Wagon", Utc::now()).render_body();
            assert!(
                body.len() <= 160,
                "{severity} body exceeds one SMS segment: {} chars",
                body.len()
            );
        }
    }
}
