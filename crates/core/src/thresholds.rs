//! Alert threshold configuration and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default low-range threshold in miles.
pub const DEFAULT_LOW_MILES: f64 = 50.0;
/// Default critical-range threshold in miles.
pub const DEFAULT_CRITICAL_MILES: f64 = 15.0;

/// The two ordered range boundaries that gate advisory vs. urgent
/// alerts. Configuration, not runtime state — constructed once at
/// startup and passed down by parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Advisory boundary. Readings at or below this (but above
    /// critical) are "low".
    pub low_miles: f64,
    /// Urgent boundary. Readings at or below this are "critical".
    pub critical_miles: f64,
}

impl Thresholds {
    /// Build a validated threshold pair.
    ///
    /// Rejects non-finite or negative values and any pair where the
    /// critical boundary is not strictly below the low boundary.
    pub fn new(low_miles: f64, critical_miles: f64) -> Result<Self, CoreError> {
        let finite = low_miles.is_finite() && critical_miles.is_finite();
        if !finite || low_miles < 0.0 || critical_miles < 0.0 || critical_miles >= low_miles {
            return Err(CoreError::InvalidThresholds {
                low: low_miles,
                critical: critical_miles,
            });
        }
        Ok(Self {
            low_miles,
            critical_miles,
        })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_miles: DEFAULT_LOW_MILES,
            critical_miles: DEFAULT_CRITICAL_MILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_are_ordered() {
        let t = Thresholds::default();
        assert_eq!(t.low_miles, 50.0);
        assert_eq!(t.critical_miles, 15.0);
        assert!(t.critical_miles < t.low_miles);
    }

    #[test]
    fn accepts_valid_pairs() {
        assert!(Thresholds::new(50.0, 15.0).is_ok());
        assert!(Thresholds::new(1.0, 0.0).is_ok());
        assert!(Thresholds::new(200.0, 199.5).is_ok());
    }

    #[test]
    fn rejects_unordered_or_negative_pairs() {
        assert!(Thresholds::new(15.0, 50.0).is_err());
        assert!(Thresholds::new(50.0, 50.0).is_err());
        assert!(Thresholds::new(-1.0, -5.0).is_err());
        assert!(Thresholds::new(50.0, -1.0).is_err());
        assert!(Thresholds::new(f64::NAN, 15.0).is_err());
        assert!(Thresholds::new(f64::INFINITY, 15.0).is_err());
    }
}
