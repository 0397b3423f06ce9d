//! Outbound message contracts
//!
//! The battery-state message is a fixed external contract consumed by
//! monitoring bridges. It is derived from the published sensor record, not
//! from the sensor internals, so any record with the battery fields present
//! can feed it.

use crate::core::types::SensorGroupData;
use serde::{Deserialize, Serialize};

/// Sentinel for an unknown remaining life time
pub const LIFE_TIME_UNKNOWN: i32 = -1;

/// Battery state published on the `battery_state` topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryStateMessage {
    /// Percentage of battery life remaining, truncated to a whole percent
    pub life_percent: i32,
    /// Remaining life time in seconds; unknown, therefore -1
    pub life_time_s: i32,
    /// Whether the battery is currently receiving charge
    pub charging: bool,
    /// Whether an external power supply is present. Sourced from its own
    /// sensor signal, independent of the charging flag.
    pub power_supply_present: bool,
}

impl BatteryStateMessage {
    /// Build the message from a sensor record
    ///
    /// Returns None when the record does not carry the battery fields.
    pub fn from_group(group: &SensorGroupData) -> Option<Self> {
        let charge = group.get_f32("charge")?;
        Some(Self {
            life_percent: charge as i32,
            life_time_s: LIFE_TIME_UNKNOWN,
            charging: group.get_bool("charging").unwrap_or(false),
            power_supply_present: group.get_bool("power_supply_present").unwrap_or(false),
        })
    }
}
