//! Core value objects: range readings and persisted alert state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single remaining-range observation from the telematics provider.
///
/// Readings are produced by the external collaborator, consumed by one
/// monitor cycle, and never persisted. The provider serves cached
/// values, so `observed_at` can lag wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReading {
    /// Remaining distance-to-empty estimate, in miles. Non-negative;
    /// the telematics client rejects malformed values before a reading
    /// is constructed.
    pub miles: f64,
    /// When the provider recorded this value.
    pub observed_at: DateTime<Utc>,
}

impl RangeReading {
    pub fn new(miles: f64, observed_at: DateTime<Utc>) -> Self {
        Self { miles, observed_at }
    }
}

/// Persisted per-vehicle alert flags.
///
/// This is the only durable record in the system. It is loaded at the
/// start of every monitor cycle, replaced by the engine's output, and
/// written back at the end. Both flags are cleared whenever a reading
/// comes back strictly above the low threshold.
///
/// Unknown or missing fields in an on-disk record fall back to their
/// defaults, so older state files keep loading after field additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertState {
    /// True iff a `low` notification has been sent since the last
    /// recovery above the low threshold.
    pub low_alert_sent: bool,
    /// True iff a `critical` notification has been sent since the last
    /// recovery above the low threshold.
    pub critical_alert_sent: bool,
    /// Most recently observed range, kept for diagnostics only — the
    /// engine never reads it.
    pub last_range: f64,
    /// Timestamp of the most recent completed check, `None` before the
    /// first cycle.
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Default for AlertState {
    fn default() -> Self {
        Self {
            low_alert_sent: false,
            critical_alert_sent: false,
            last_range: 0.0,
            last_checked_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_no_alerts_sent() {
        let state = AlertState::default();
        assert!(!state.low_alert_sent);
        assert!(!state.critical_alert_sent);
        assert_eq!(state.last_range, 0.0);
        assert!(state.last_checked_at.is_none());
    }

    #[test]
    fn state_deserializes_with_missing_fields() {
        // An older record that predates `last_checked_at` still loads.
        let state: AlertState =
            serde_json::from_str(r#"{"low_alert_sent": true, "last_range": 42.0}"#)
                .expect("partial record should deserialize");
        assert!(state.low_alert_sent);
        assert!(!state.critical_alert_sent);
        assert_eq!(state.last_range, 42.0);
        assert!(state.last_checked_at.is_none());
    }

    #[test]
    fn state_round_trips_through_json() {
        let state = AlertState {
            low_alert_sent: true,
            critical_alert_sent: false,
            last_range: 37.5,
            last_checked_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&state).expect("state should serialize");
        let back: AlertState = serde_json::from_str(&json).expect("state should deserialize");
        assert_eq!(state, back);
    }
}
