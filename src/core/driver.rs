//! SensorDriver trait definition

use crate::core::types::{SensorGroupData, StreamReceiver};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of driver initialization
pub struct DriverInitResult {
    /// Sensor group records, shared with consumers that poll current state
    pub sensor_data: HashMap<String, Arc<Mutex<SensorGroupData>>>,
    /// Streaming channel receivers for groups updated every tick
    pub stream_receivers: HashMap<String, StreamReceiver>,
}

/// Driver trait for sensor sources
///
/// A driver owns whatever produces sensor readings, real hardware or a
/// simulation. `initialize` starts its internal threads and hands the sensor
/// group records plus streaming channels to the caller; `shutdown` stops the
/// threads and joins them.
pub trait SensorDriver: Send {
    /// Start the driver and return its sensor groups
    fn initialize(&mut self) -> Result<DriverInitResult>;

    /// Stop internal threads and release resources
    fn shutdown(&mut self);
}
