//! Simulation driver hosting the battery sensor
//!
//! This module stands in for the simulation engine the sensor runs inside.
//! It owns the scene, moves the robot, and calls the sensor once per tick,
//! the same contract a full engine would honor.
//!
//! # Simulation Loop
//!
//! ```text
//! Every tick (default 20 Hz):
//! 1. Scale wall-clock delta by speed_factor into simulation time
//! 2. Ask the route planner where to head (waypoints, or a charging
//!    zone when the battery is low)
//! 3. Move the robot's anchor object and refresh the scene
//! 4. Update the battery sensor against the scene snapshot
//! 5. Fill the sensor_status group and push it to the streaming channel
//! ```
//!
//! # Thread Model
//!
//! ```text
//! +-----------------+         +-----------------+
//! | Simulation Loop |-------->| Streaming Chan  |
//! |  (battery-sim)  |         | (sensor_status) |
//! +-----------------+         +-----------------+
//! ```
//!
//! The loop never blocks on consumers: groups are pushed with `try_send`
//! and dropped when the publisher falls behind.

pub mod route;

use crate::config::SimulationConfig;
use crate::core::driver::{DriverInitResult, SensorDriver};
use crate::core::types::{self, SensorGroupData, SensorValue, StreamSender};
use crate::error::{Error, Result};
use crate::scene::Scene;
use crate::sensors::battery::{BatterySensor, BatteryState, ChargeStatus};
use route::{step_towards, RoutePlanner};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Shared state for thread communication
struct SharedState {
    shutdown: AtomicBool,
}

/// Simulation driver producing battery sensor data
pub struct SimDriver {
    config: SimulationConfig,
    shared: Arc<SharedState>,
    simulation_handle: Option<JoinHandle<()>>,
}

impl SimDriver {
    /// Create a new simulation driver from configuration
    pub fn new(config: SimulationConfig) -> Result<Self> {
        if config.tick_rate_hz <= 0.0 {
            return Err(Error::Config(format!(
                "tick_rate_hz must be positive, got {}",
                config.tick_rate_hz
            )));
        }
        if config.speed_factor <= 0.0 {
            return Err(Error::Config(format!(
                "speed_factor must be positive, got {}",
                config.speed_factor
            )));
        }

        Ok(Self {
            config,
            shared: Arc::new(SharedState {
                shutdown: AtomicBool::new(false),
            }),
            simulation_handle: None,
        })
    }

    fn shutdown_all(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.simulation_handle.take() {
            let _ = handle.join();
        }
    }
}

impl SensorDriver for SimDriver {
    fn initialize(&mut self) -> Result<DriverInitResult> {
        log::info!("Initializing simulation driver");

        let scene = Scene::from_file(&self.config.scene_file)?;
        log::info!(
            "Loaded scene: {} objects, {} charging zones",
            scene.objects().len(),
            scene.charging_zones().count()
        );

        let anchor = self.config.robot.anchor.clone();
        if scene.object(&anchor).is_none() {
            return Err(Error::Config(format!(
                "Robot anchor object '{}' not found in scene",
                anchor
            )));
        }

        let battery = &self.config.battery;
        let sensor = BatterySensor::new(
            battery.discharging_rate,
            battery.zone_range,
            battery.initial_charge,
            0.0,
        );
        let planner = RoutePlanner::new(
            self.config.route.clone(),
            self.config.robot.arrival_radius,
        );

        let state = SimState {
            scene,
            anchor,
            sensor,
            planner,
            sim_time: 0.0,
        };

        let sensor_status = Arc::new(Mutex::new(SensorGroupData::new("sensor_status")));
        let (stream_tx, stream_rx) = types::create_stream_channel();

        let sim_config = self.config.clone();
        let shared = Arc::clone(&self.shared);
        let sensor_status_clone = Arc::clone(&sensor_status);

        let handle = thread::Builder::new()
            .name("battery-sim".to_string())
            .spawn(move || {
                simulation_loop(sim_config, shared, state, sensor_status_clone, stream_tx);
            })
            .map_err(|e| Error::Other(format!("Failed to spawn simulation thread: {}", e)))?;

        self.simulation_handle = Some(handle);
        log::info!("Simulation driver initialized");

        let mut sensor_data = HashMap::new();
        sensor_data.insert("sensor_status".to_string(), sensor_status);

        let mut stream_receivers = HashMap::new();
        stream_receivers.insert("sensor_status".to_string(), stream_rx);

        Ok(DriverInitResult {
            sensor_data,
            stream_receivers,
        })
    }

    fn shutdown(&mut self) {
        self.shutdown_all();
    }
}

impl Drop for SimDriver {
    fn drop(&mut self) {
        self.shutdown_all();
    }
}

/// Mutable simulation state owned by the loop thread
struct SimState {
    scene: Scene,
    anchor: String,
    sensor: BatterySensor,
    planner: RoutePlanner,
    sim_time: f64,
}

impl SimState {
    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32, robot_speed: f32) -> Option<BatteryState> {
        self.sim_time += dt as f64;

        let robot = self.scene.object(&self.anchor).cloned()?;

        if let Some(target) = self.planner.target(&robot, self.sensor.state(), &self.scene) {
            let (x, y) = step_towards((robot.x, robot.y), target, robot_speed * dt);
            self.scene.set_position(&self.anchor, x, y);
        }

        let robot = self.scene.object(&self.anchor).cloned()?;
        Some(self.sensor.update(self.sim_time, &robot, self.scene.objects()))
    }

    fn robot_position(&self) -> Option<(f32, f32)> {
        self.scene.object(&self.anchor).map(|o| (o.x, o.y))
    }
}

/// Main simulation loop
fn simulation_loop(
    config: SimulationConfig,
    shared: Arc<SharedState>,
    mut state: SimState,
    sensor_status: Arc<Mutex<SensorGroupData>>,
    stream_tx: StreamSender,
) {
    let interval = Duration::from_micros((1_000_000.0 / config.tick_rate_hz) as u64);
    let mut last_time = Instant::now();
    let mut last_status: Option<ChargeStatus> = None;

    log::info!(
        "Simulation loop started: tick_rate={}Hz, speed_factor={}",
        config.tick_rate_hz,
        config.speed_factor
    );

    while !shared.shutdown.load(Ordering::Relaxed) {
        let loop_start = Instant::now();

        let now = Instant::now();
        let wall_dt = now.duration_since(last_time).as_secs_f32();
        let sim_dt = wall_dt * config.speed_factor;
        last_time = now;

        let battery = match state.step(sim_dt, config.robot.speed) {
            Some(b) => b,
            None => {
                log::error!("Robot anchor '{}' vanished from scene", state.anchor);
                break;
            }
        };

        if last_status != Some(battery.status) {
            log::info!("Battery {} at {:.1}%", battery.status, battery.charge);
            last_status = Some(battery.status);
        }

        if let Ok(mut status) = sensor_status.lock() {
            if let Some((x, y)) = state.robot_position() {
                status.set("x", SensorValue::F32(x));
                status.set("y", SensorValue::F32(y));
            }
            status.set("charge", SensorValue::F32(battery.charge));
            status.set("status", SensorValue::String(battery.status.to_string()));
            status.set("charging", SensorValue::Bool(state.sensor.charging()));
            status.set(
                "power_supply_present",
                SensorValue::Bool(config.sensors.power_supply_present),
            );
            status.set("sim_time", SensorValue::F64(state.sim_time));
            status.touch();

            // Send to streaming channel; drop the tick if the consumer lags
            let _ = stream_tx.try_send(status.clone());
        }

        let elapsed = loop_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }

    log::info!("Simulation loop terminated");
}
