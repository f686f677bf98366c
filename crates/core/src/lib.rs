//! Rangewatch domain types and alert decision logic.
//!
//! This crate provides the core building blocks for the fuel-range
//! monitor:
//!
//! - [`RangeReading`] — a point-in-time range observation from the
//!   vehicle's telematics provider.
//! - [`AlertState`] — the persisted per-vehicle alert flags.
//! - [`Thresholds`] — the low / critical range boundaries.
//! - [`engine::decide`] — the pure threshold-alerting transition
//!   function.
//! - [`Notification`] / [`Severity`] — the value object handed to a
//!   delivery channel.
//!
//! Everything here is synchronous and side-effect free; IO (telematics
//! reads, state persistence, notification delivery) lives in the
//! `rangewatch-notify` and `rangewatch-monitor` crates.

pub mod engine;
pub mod error;
pub mod notification;
pub mod thresholds;
pub mod types;

pub use engine::{decide, Decision};
pub use error::CoreError;
pub use notification::{Notification, Severity};
pub use thresholds::Thresholds;
pub use types::{AlertState, RangeReading};
