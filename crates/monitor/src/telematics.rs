//! Telematics range source.
//!
//! The monitor consumes the vehicle's telematics provider through the
//! [`RangeSource`] capability; authentication, session handling, and
//! cache refresh all live behind the provider's endpoint and are opaque
//! here. [`HttpRangeSource`] is the production implementation: one GET
//! against a configured JSON endpoint serving the provider's cached
//! range value.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use rangewatch_core::RangeReading;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the telematics boundary. All of them are fatal for the
/// current cycle; the next scheduled invocation retries independently.
#[derive(Debug, thiserror::Error)]
pub enum TelematicsError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout),
    /// or the response body was not valid JSON.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Telematics API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The provider returned a value outside the reading domain.
    #[error("Invalid range reading: {0}")]
    InvalidReading(String),
}

// ---------------------------------------------------------------------------
// RangeSource
// ---------------------------------------------------------------------------

/// Source of current-range observations.
#[async_trait]
pub trait RangeSource: Send + Sync {
    async fn current_range(&self) -> Result<RangeReading, TelematicsError>;
}

/// Connection parameters for the HTTP range endpoint.
#[derive(Debug, Clone)]
pub struct TelematicsConfig {
    /// Range endpoint URL.
    pub url: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

/// Response body served by the range endpoint.
#[derive(Debug, Deserialize)]
struct RangePayload {
    range_miles: f64,
    /// When the provider recorded the value. Falls back to the fetch
    /// time when absent.
    as_of: Option<DateTime<Utc>>,
}

/// HTTP implementation of [`RangeSource`].
pub struct HttpRangeSource {
    client: reqwest::Client,
    config: TelematicsConfig,
}

impl HttpRangeSource {
    pub fn new(config: TelematicsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl RangeSource for HttpRangeSource {
    async fn current_range(&self) -> Result<RangeReading, TelematicsError> {
        let mut request = self.client.get(&self.config.url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TelematicsError::ApiError { status, body });
        }

        let payload: RangePayload = response.json().await?;
        reading_from_payload(payload)
    }
}

/// Validate a provider payload into a [`RangeReading`].
///
/// The alert engine is total only over non-negative finite ranges, so
/// malformed values are rejected here, before a reading exists at all.
fn reading_from_payload(payload: RangePayload) -> Result<RangeReading, TelematicsError> {
    if !payload.range_miles.is_finite() || payload.range_miles < 0.0 {
        return Err(TelematicsError::InvalidReading(format!(
            "range_miles must be a non-negative number, got {}",
            payload.range_miles
        )));
    }
    let observed_at = payload.as_of.unwrap_or_else(Utc::now);
    Ok(RangeReading::new(payload.range_miles, observed_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_payload() {
        let at = Utc::now();
        let reading = reading_from_payload(RangePayload {
            range_miles: 63.5,
            as_of: Some(at),
        })
        .unwrap();
        assert_eq!(reading.miles, 63.5);
        assert_eq!(reading.observed_at, at);
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let reading = reading_from_payload(RangePayload {
            range_miles: 10.0,
            as_of: None,
        })
        .unwrap();
        assert!(reading.observed_at >= before);
    }

    #[test]
    fn rejects_negative_range() {
        let err = reading_from_payload(RangePayload {
            range_miles: -4.0,
            as_of: None,
        })
        .unwrap_err();
        assert!(matches!(err, TelematicsError::InvalidReading(_)));
    }

    #[test]
    fn rejects_non_finite_range() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = reading_from_payload(RangePayload {
                range_miles: bad,
                as_of: None,
            })
            .unwrap_err();
            assert!(matches!(err, TelematicsError::InvalidReading(_)));
        }
    }

    #[test]
    fn payload_deserializes_from_provider_json() {
        let payload: RangePayload =
            serde_json::from_str(r#"{"range_miles": 48.2, "as_of": "2026-08-06T07:30:00Z"}"#)
                .expect("payload should deserialize");
        assert_eq!(payload.range_miles, 48.2);
        assert!(payload.as_of.is_some());
    }
}
