//! The monitor cycle: one linear pass per invocation.
//!
//! Periodicity belongs to the external scheduler (cron, container
//! orchestration); this module never loops. Per cycle: read range →
//! load state → decide → dispatch → persist → report. A telematics
//! failure aborts the cycle with state untouched. A delivery or
//! persistence failure is logged and the cycle still completes —
//! the alert flag is recorded even when delivery failed, trading a
//! possible silently-missed alert for never spamming on a flaky
//! channel. Failed-but-flagged alerts are NOT redelivered on later
//! cycles; only recovery above the low threshold re-arms them.

use chrono::Utc;

use rangewatch_core::{decide, AlertState, Notification, Severity, Thresholds};
use rangewatch_notify::NotificationChannel;

use crate::store::StateStore;
use crate::telematics::{RangeSource, TelematicsError};

/// Synthetic range used by the forced low-severity test notification.
const TEST_LOW_RANGE_MILES: f64 = 45.0;
/// Synthetic range used by the forced critical-severity test
/// notification.
const TEST_CRITICAL_RANGE_MILES: f64 = 10.0;

/// Error that aborts a cycle. Delivery and persistence failures are
/// deliberately absent — they are recovered in place.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Telematics(#[from] TelematicsError),
}

/// What one completed cycle did, for the caller and for tests.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The range reading this cycle evaluated.
    pub range_miles: f64,
    /// Severity of the notification sent this cycle, if any.
    pub severity_sent: Option<Severity>,
    /// True when a notification was produced but its delivery failed.
    pub delivery_failed: bool,
    /// The alert state as persisted (or as attempted, on write
    /// failure).
    pub state: AlertState,
}

/// Run one monitor cycle.
pub async fn run_cycle(
    source: &dyn RangeSource,
    store: &StateStore,
    channel: &dyn NotificationChannel,
    thresholds: &Thresholds,
    vehicle: &str,
) -> Result<CycleReport, CycleError> {
    let reading = source.current_range().await?;
    tracing::info!(
        miles = reading.miles,
        observed_at = %reading.observed_at.to_rfc3339(),
        "Range reading obtained",
    );

    let prior = store.load();
    let decision = decide(&reading, &prior, thresholds, vehicle);
    let severity_sent = decision.notification.as_ref().map(|n| n.severity);

    let mut delivery_failed = false;
    if let Some(notification) = &decision.notification {
        tracing::info!(
            severity = %notification.severity,
            range_miles = notification.range_miles,
            "Threshold crossed, dispatching notification",
        );
        if let Err(e) = channel.send(notification).await {
            delivery_failed = true;
            for outcome in e.outcomes.iter().filter(|o| !o.delivered()) {
                tracing::error!(
                    destination = %outcome.destination,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "Destination dispatch failed",
                );
            }
            tracing::error!(
                error = %e,
                severity = %notification.severity,
                "Notification delivery failed; the alert flag is kept set and will not be redelivered",
            );
        }
    }

    if let Err(e) = store.save(&decision.next) {
        tracing::error!(
            error = %e,
            "Failed to persist alert state; the next cycle may repeat this alert",
        );
    }

    tracing::info!(
        range_miles = decision.next.last_range,
        low_alert_sent = decision.next.low_alert_sent,
        critical_alert_sent = decision.next.critical_alert_sent,
        notification = severity_sent
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string())
            .as_str(),
        channel = %channel.describe(),
        "Monitor cycle complete",
    );

    Ok(CycleReport {
        range_miles: reading.miles,
        severity_sent,
        delivery_failed,
        state: decision.next,
    })
}

/// Send one synthetic notification of the given severity, bypassing
/// the alert engine and the state store entirely. Used to verify a
/// delivery channel end to end.
pub async fn send_test_notification(
    channel: &dyn NotificationChannel,
    vehicle: &str,
    severity: Severity,
) -> Result<(), rangewatch_notify::DeliveryError> {
    let range_miles = match severity {
        Severity::Low => TEST_LOW_RANGE_MILES,
        Severity::Critical => TEST_CRITICAL_RANGE_MILES,
    };
    let notification = Notification::new(severity, range_miles, vehicle, Utc::now());

    tracing::info!(
        severity = %severity,
        channel = %channel.describe(),
        "Sending forced test notification",
    );
    channel.send(&notification).await
}
