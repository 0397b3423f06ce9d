//! Core abstractions shared by the simulation driver and the streaming layer

pub mod driver;
pub mod types;

pub use driver::{DriverInitResult, SensorDriver};
pub use types::{SensorGroupData, SensorValue, StreamReceiver, StreamSender};
