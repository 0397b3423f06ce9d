//! Sensor models
//!
//! - [`battery`]: charge integration over elapsed simulation time
//! - [`zone`]: charging-zone lookup against a scene snapshot

pub mod battery;
pub mod zone;

pub use battery::{BatterySensor, BatteryState, ChargeIntegrator, ChargeStatus};
pub use zone::ZoneLocator;
