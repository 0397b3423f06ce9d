//! Wire format serialization abstraction
//!
//! All published frames share a length-prefixed framing:
//!
//! ```text
//! +------------------+---------------------+--------------------------+
//! | Length (4 bytes) | Topic (NUL-ended)   | Payload (variable)       |
//! | Big-endian u32   | e.g. "battery_state"| JSON or Postcard binary  |
//! +------------------+---------------------+--------------------------+
//! ```
//!
//! The length covers topic, terminator, and payload. Two payload formats
//! are supported:
//!
//! - **JSON** (default): human-readable, easy to debug from any language.
//! - **Postcard** (binary): compact and fast, for high-rate streaming.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// JSON format - human-readable for debugging
    #[default]
    Json,
    /// Binary format using postcard - fast and compact
    Postcard,
}

/// Serializer that can handle both formats
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    /// Create a new serializer for the given format
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Serialize a message to payload bytes
    pub fn serialize<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => {
                postcard::to_allocvec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Deserialize payload bytes to a message
    pub fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            WireFormat::Postcard => {
                postcard::from_bytes(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::messages::BatteryStateMessage;

    #[test]
    fn test_round_trip_both_formats() {
        let msg = BatteryStateMessage {
            life_percent: 49,
            life_time_s: -1,
            charging: false,
            power_supply_present: true,
        };

        for format in [WireFormat::Json, WireFormat::Postcard] {
            let serializer = Serializer::new(format);
            let bytes = serializer.serialize(&msg).unwrap();
            let back: BatteryStateMessage = serializer.deserialize(&bytes).unwrap();
            assert_eq!(back, msg);
        }
    }

    #[test]
    fn test_format_names_in_config() {
        let json: WireFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(json, WireFormat::Json);
        let postcard: WireFormat = serde_json::from_str("\"postcard\"").unwrap();
        assert_eq!(postcard, WireFormat::Postcard);
    }
}
