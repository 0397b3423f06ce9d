//! TCP streaming module for UrjaSense

pub mod messages;
pub mod tcp_publisher;
pub mod wire;

pub use messages::BatteryStateMessage;
pub use tcp_publisher::TcpPublisher;
pub use wire::{Serializer, WireFormat};
