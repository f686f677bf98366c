//! The notification channel capability and the concurrent fan-out
//! primitive shared by the direct-message variants.

use async_trait::async_trait;

use rangewatch_core::Notification;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-time channel misconfiguration. Fatal at startup; a
/// channel that constructs successfully never raises these again.
#[derive(Debug, thiserror::Error)]
pub enum ChannelConfigError {
    /// The destination list for a direct-message channel is empty.
    #[error("Destination list is empty")]
    NoDestinations,

    /// A configured address could not be parsed.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The SMTP relay could not be set up.
    #[error("SMTP relay setup failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outcome of one per-destination dispatch attempt.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Destination label (phone number or gateway address).
    pub destination: String,
    /// `None` when the message was delivered.
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Partial or total delivery failure. Every destination was attempted;
/// `outcomes` records what happened to each.
#[derive(Debug, thiserror::Error)]
#[error("Delivery failed for {failed} of {total} destination(s)")]
pub struct DeliveryError {
    pub failed: usize,
    pub total: usize,
    pub outcomes: Vec<DispatchOutcome>,
}

// ---------------------------------------------------------------------------
// NotificationChannel
// ---------------------------------------------------------------------------

/// A delivery mechanism for alert notifications.
///
/// `send` succeeds only if every destination accepted the message;
/// `describe` is operator-facing status text, never used for logic.
#[async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;

    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// Fan-out
// ---------------------------------------------------------------------------

/// Launch one dispatch future per destination, wait for all of them,
/// and aggregate the results.
///
/// There is no short-circuit: a failing destination never cancels its
/// siblings. Returns `Ok(())` only when every attempt succeeded.
pub async fn join_dispatch<F>(attempts: Vec<(String, F)>) -> Result<(), DeliveryError>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    let (destinations, futures): (Vec<_>, Vec<_>) = attempts.into_iter().unzip();
    let results = futures::future::join_all(futures).await;

    let outcomes: Vec<DispatchOutcome> = destinations
        .into_iter()
        .zip(results)
        .map(|(destination, result)| DispatchOutcome {
            destination,
            error: result.err(),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.delivered()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(DeliveryError {
            failed,
            total: outcomes.len(),
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// One fake dispatch attempt: count the call, then succeed or fail.
    async fn attempt(
        attempted: &AtomicUsize,
        failure: Option<&'static str>,
    ) -> Result<(), String> {
        attempted.fetch_add(1, Ordering::SeqCst);
        match failure {
            None => Ok(()),
            Some(reason) => Err(reason.to_string()),
        }
    }

    #[tokio::test]
    async fn join_dispatch_succeeds_when_all_succeed() {
        let attempted = AtomicUsize::new(0);
        let attempts = vec![
            ("+15550001111".to_string(), attempt(&attempted, None)),
            ("+15550002222".to_string(), attempt(&attempted, None)),
        ];
        assert!(join_dispatch(attempts).await.is_ok());
        assert_eq!(attempted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn join_dispatch_reports_partial_failure_with_detail() {
        let attempted = AtomicUsize::new(0);
        let attempts = vec![
            ("+15550001111".to_string(), attempt(&attempted, None)),
            (
                "+15550002222".to_string(),
                attempt(&attempted, Some("HTTP 401")),
            ),
        ];

        let err = join_dispatch(attempts).await.unwrap_err();
        assert_eq!(err.failed, 1);
        assert_eq!(err.total, 2);
        assert!(err.outcomes[0].delivered());
        assert_eq!(err.outcomes[1].destination, "+15550002222");
        assert_eq!(err.outcomes[1].error.as_deref(), Some("HTTP 401"));
    }

    /// A failing destination must not stop the others from being
    /// attempted.
    #[tokio::test]
    async fn join_dispatch_attempts_every_destination() {
        let attempted = AtomicUsize::new(0);
        let attempts = vec![
            ("a".to_string(), attempt(&attempted, Some("boom"))),
            ("b".to_string(), attempt(&attempted, None)),
            ("c".to_string(), attempt(&attempted, Some("boom"))),
        ];

        let err = join_dispatch(attempts).await.unwrap_err();
        assert_eq!(attempted.load(Ordering::SeqCst), 3);
        assert_eq!(err.failed, 2);
        assert_eq!(err.total, 3);
    }

    #[tokio::test]
    async fn delivery_error_display_counts() {
        let attempted = AtomicUsize::new(0);
        let attempts = vec![("a".to_string(), attempt(&attempted, Some("x")))];
        let err = join_dispatch(attempts).await.unwrap_err();
        assert_eq!(err.to_string(), "Delivery failed for 1 of 1 destination(s)");
    }
}
