//! UrjaSense - Battery sensing daemon for simulated robots
//!
//! Loads a scene and a patrol route, runs the battery simulation loop, and
//! streams sensor data to TCP clients on the configured bind address.

use urja_sense::config::AppConfig;
use urja_sense::core::driver::SensorDriver;
use urja_sense::error::{Error, Result};
use urja_sense::sim::SimDriver;
use urja_sense::streaming::{Serializer, TcpPublisher};

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Parse config path from command line arguments.
///
/// Supports `urja-sense <path>` and `urja-sense --config <path>`, defaulting
/// to `/etc/urja-sense.toml`.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/urja-sense.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = AppConfig::from_file(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    log::info!("UrjaSense v0.2.0 starting...");
    log::info!("Using config: {}", config_path);
    log::info!("Scene: {}", config.simulation.scene_file);

    // Create and start the simulation driver
    let mut driver: Box<dyn SensorDriver> = Box::new(SimDriver::new(config.simulation.clone())?);
    let mut init_result = driver.initialize()?;
    log::info!(
        "Initialized {} sensor groups ({} with streaming channels)",
        init_result.sensor_data.len(),
        init_result.stream_receivers.len()
    );

    let stream_rx = init_result
        .stream_receivers
        .remove("sensor_status")
        .ok_or_else(|| Error::Other("Driver returned no sensor_status stream".to_string()))?;

    // Start the TCP publisher
    let serializer = Serializer::new(config.network.wire_format);
    let publisher = TcpPublisher::new(&config.network.bind_address, serializer, stream_rx)?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    log::info!("UrjaSense running. Press Ctrl-C to stop.");

    // Main loop: keep alive and log battery statistics periodically
    let sensor_status = init_result.sensor_data.get("sensor_status").cloned();
    let mut last_stats = Instant::now();

    while running.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(100));

        if last_stats.elapsed().as_secs() >= 10 {
            if let Some(ref status) = sensor_status {
                let status = status
                    .lock()
                    .map_err(|e| Error::MutexPoisoned(format!("sensor_status lock: {}", e)))?;
                if let (Some(charge), Some(state)) =
                    (status.get_f32("charge"), status.get_str("status"))
                {
                    log::info!("Battery: {:.1}% ({})", charge, state);
                }
            }
            last_stats = Instant::now();
        }
    }

    // Shutdown
    log::info!("Shutting down...");
    publisher.stop();
    driver.shutdown();
    log::info!("UrjaSense stopped");
    Ok(())
}
