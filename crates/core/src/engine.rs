//! Threshold alert decision logic.
//!
//! [`decide`] is a pure transition function: given the current reading,
//! the prior persisted state, and the configured thresholds, it returns
//! the next state plus at most one notification to send. The caller
//! owns all IO — loading state, dispatching the notification, and
//! persisting the result.
//!
//! Evaluation order matters: the recovery reset runs first, so a
//! reading that jumps from "comfortably above low" straight to "at or
//! below critical" starts with clear flags and fires the critical
//! alert, never the low one. A reading exactly at the low threshold
//! still counts as low; only a reading strictly above it recovers.

use crate::notification::{Notification, Severity};
use crate::thresholds::Thresholds;
use crate::types::{AlertState, RangeReading};

/// Output of one engine evaluation: the replacement alert state and an
/// optional notification for the caller to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub next: AlertState,
    pub notification: Option<Notification>,
}

/// Evaluate one reading against the prior state.
///
/// Total over its domain: `reading.miles >= 0` (enforced by the
/// telematics client) and a validated [`Thresholds`] pair. At most one
/// notification is produced per call, and the same severity is never
/// re-emitted until the range has recovered above the low threshold.
pub fn decide(
    reading: &RangeReading,
    prior: &AlertState,
    thresholds: &Thresholds,
    vehicle: &str,
) -> Decision {
    let mut next = prior.clone();

    // Recovery: strictly above the low threshold clears both flags,
    // whatever their prior values.
    if reading.miles > thresholds.low_miles {
        next.low_alert_sent = false;
        next.critical_alert_sent = false;
    }

    let notification = if reading.miles <= thresholds.critical_miles && !next.critical_alert_sent {
        next.critical_alert_sent = true;
        Some(Notification::new(
            Severity::Critical,
            reading.miles,
            vehicle,
            reading.observed_at,
        ))
    } else if reading.miles > thresholds.critical_miles
        && reading.miles <= thresholds.low_miles
        && !next.low_alert_sent
    {
        next.low_alert_sent = true;
        Some(Notification::new(
            Severity::Low,
            reading.miles,
            vehicle,
            reading.observed_at,
        ))
    } else {
        None
    };

    next.last_range = reading.miles;
    next.last_checked_at = Some(reading.observed_at);

    Decision { next, notification }
}
