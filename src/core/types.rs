//! Sensor data records exchanged between the simulation thread and the
//! streaming layer.
//!
//! The driver fills a [`SensorGroupData`] per tick and pushes it through a
//! bounded channel; the publisher serializes it for connected clients. The
//! typed getters exist for the outbound bridge, which reads individual
//! fields out of the record when converting to its message contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime sensor values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensorValue {
    Bool(bool),
    U8(u8),
    I32(i32),
    F32(f32),
    F64(f64),
    String(String),
}

/// Runtime sensor group data (shared between threads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorGroupData {
    pub group_id: String,
    pub timestamp_us: u64,
    pub values: HashMap<String, SensorValue>,
}

impl SensorGroupData {
    /// Create a new empty group
    pub fn new(group_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            timestamp_us: 0,
            values: HashMap::new(),
        }
    }

    /// Set a value (create or update in-place)
    #[inline]
    pub fn set(&mut self, key: &str, value: SensorValue) {
        if let Some(v) = self.values.get_mut(key) {
            *v = value;
        } else {
            self.values.insert(key.to_string(), value);
        }
    }

    /// Read a float value, if present with that type
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.values.get(key) {
            Some(SensorValue::F32(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read a boolean value, if present with that type
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(SensorValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read a string value, if present with that type
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(SensorValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Update timestamp to current wall time
    #[inline]
    pub fn touch(&mut self) {
        self.timestamp_us = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
    }
}

/// Sending half of a sensor streaming channel
pub type StreamSender = crossbeam_channel::Sender<SensorGroupData>;
/// Receiving half of a sensor streaming channel
pub type StreamReceiver = crossbeam_channel::Receiver<SensorGroupData>;

/// Capacity of the streaming channel. About three seconds of buffering at
/// the default 20 Hz tick rate; the simulation thread drops ticks with
/// `try_send` when the publisher falls behind.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Create a bounded streaming channel for sensor group data
pub fn create_stream_channel() -> (StreamSender, StreamReceiver) {
    crossbeam_channel::bounded(STREAM_CHANNEL_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_typed_getters() {
        let mut group = SensorGroupData::new("sensor_status");
        group.set("charge", SensorValue::F32(73.5));
        group.set("charging", SensorValue::Bool(true));
        group.set("status", SensorValue::String("Charging".to_string()));

        assert_eq!(group.get_f32("charge"), Some(73.5));
        assert_eq!(group.get_bool("charging"), Some(true));
        assert_eq!(group.get_str("status"), Some("Charging"));

        // Wrong type or missing key reads as absent
        assert_eq!(group.get_bool("charge"), None);
        assert_eq!(group.get_f32("missing"), None);
    }

    #[test]
    fn test_set_updates_in_place() {
        let mut group = SensorGroupData::new("sensor_status");
        group.set("charge", SensorValue::F32(50.0));
        group.set("charge", SensorValue::F32(49.5));
        assert_eq!(group.get_f32("charge"), Some(49.5));
        assert_eq!(group.values.len(), 1);
    }

    #[test]
    fn test_touch_sets_timestamp() {
        let mut group = SensorGroupData::new("sensor_status");
        assert_eq!(group.timestamp_us, 0);
        group.touch();
        assert!(group.timestamp_us > 0);
    }
}
