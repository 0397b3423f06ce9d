//! Configuration for the UrjaSense daemon
//!
//! Loads configuration from a TOML file. Every parameter has a sensible
//! default so a minimal file only needs to name the scene:
//!
//! ```toml
//! [simulation]
//! scene_file = "scenes/depot.toml"
//! route = [[4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [0.0, 0.0]]
//!
//! [network]
//! bind_address = "0.0.0.0:5555"
//! wire_format = "json"
//! ```

use crate::error::Result;
use crate::streaming::wire::WireFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Scene file path (TOML object list)
    pub scene_file: String,

    /// Tick rate of the sensor update loop (Hz)
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: f32,

    /// Simulation speed multiplier (1.0 = real-time)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,

    /// Patrol route waypoints as [x, y] pairs (meters). Empty = stationary.
    #[serde(default)]
    pub route: Vec<[f32; 2]>,

    /// Robot parameters
    #[serde(default)]
    pub robot: RobotConfig,

    /// Battery model parameters
    #[serde(default)]
    pub battery: BatteryConfig,

    /// Fixed auxiliary sensor states
    #[serde(default)]
    pub sensors: SensorsConfig,
}

fn default_tick_rate_hz() -> f32 {
    20.0
}
fn default_speed_factor() -> f32 {
    1.0
}

/// Robot parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RobotConfig {
    /// Name of the robot's anchor object in the scene
    #[serde(default = "default_anchor")]
    pub anchor: String,

    /// Travel speed along the route (m/s)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Distance at which a waypoint counts as reached (meters)
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f32,
}

fn default_anchor() -> String {
    "robot".to_string()
}
fn default_speed() -> f32 {
    0.3
}
fn default_arrival_radius() -> f32 {
    0.1
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            anchor: default_anchor(),
            speed: default_speed(),
            arrival_radius: default_arrival_radius(),
        }
    }
}

/// Battery model parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatteryConfig {
    /// Battery discharging rate, in percent per second
    #[serde(default = "default_discharging_rate")]
    pub discharging_rate: f32,

    /// Distance beyond which a charging zone is out of reach (meters)
    #[serde(default = "default_zone_range")]
    pub zone_range: f32,

    /// Initial battery level, in percent
    #[serde(default = "default_initial_charge")]
    pub initial_charge: f32,
}

fn default_discharging_rate() -> f32 {
    0.05
}
fn default_zone_range() -> f32 {
    1.0
}
fn default_initial_charge() -> f32 {
    100.0
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            discharging_rate: default_discharging_rate(),
            zone_range: default_zone_range(),
            initial_charge: default_initial_charge(),
        }
    }
}

/// Fixed auxiliary sensor states
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorsConfig {
    /// External power supply present flag, reported as-is to consumers
    #[serde(default)]
    pub power_supply_present: bool,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            power_supply_present: false,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// TCP bind address for outbound sensor streaming
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Wire format for published frames
    #[serde(default)]
    pub wire_format: WireFormat,
}

fn default_bind_address() -> String {
    "0.0.0.0:5555".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            wire_format: WireFormat::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::error::Error::Serialization(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration pointing at the bundled depot scene
    pub fn depot_defaults() -> Self {
        Self {
            simulation: SimulationConfig {
                scene_file: "scenes/depot.toml".to_string(),
                tick_rate_hz: default_tick_rate_hz(),
                speed_factor: default_speed_factor(),
                route: vec![[4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [0.0, 0.0]],
                robot: RobotConfig::default(),
                battery: BatteryConfig::default(),
                sensors: SensorsConfig::default(),
            },
            network: NetworkConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::depot_defaults()
    }
}
