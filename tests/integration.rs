//! End-to-end tests driving the battery simulation through its public API

use urja_sense::config::{BatteryConfig, RobotConfig, SensorsConfig, SimulationConfig};
use urja_sense::core::driver::SensorDriver;
use urja_sense::scene::{Scene, SceneObject};
use urja_sense::sensors::battery::{BatterySensor, ChargeStatus};
use urja_sense::sim::route::{step_towards, RoutePlanner};
use urja_sense::sim::SimDriver;

use std::io::Write;
use std::time::Duration;

fn obj(name: &str, x: f32, y: f32, zone: bool) -> SceneObject {
    SceneObject {
        name: name.to_string(),
        x,
        y,
        charging_zone: zone,
    }
}

/// A low robot diverts to the dock, charges to full, and resumes its route.
/// Pure simulation arithmetic, no threads involved.
#[test]
fn full_patrol_charge_cycle() {
    let mut scene =
        Scene::from_objects(vec![obj("robot", 0.0, 0.0, false), obj("dock", 5.0, 0.0, true)])
            .unwrap();

    // 2 %/s both ways, 1 m zone range, battery already low
    let mut sensor = BatterySensor::new(2.0, 1.0, 15.0, 0.0);
    let mut planner = RoutePlanner::new(vec![[10.0, 0.0]], 0.1);

    let speed = 1.0;
    let dt = 0.5;
    let mut sim_time = 0.0f64;
    let mut min_charge = f32::MAX;

    for _ in 0..400 {
        let robot = scene.object("robot").cloned().unwrap();
        if let Some(target) = planner.target(&robot, sensor.state(), &scene) {
            let (x, y) = step_towards((robot.x, robot.y), target, speed * dt);
            scene.set_position("robot", x, y);
        }

        sim_time += dt as f64;
        let robot = scene.object("robot").cloned().unwrap();
        let state = sensor.update(sim_time, &robot, scene.objects());
        min_charge = min_charge.min(state.charge);

        if state.status == ChargeStatus::Charged {
            break;
        }
    }

    // The diversion got the robot charged before the battery bottomed out
    let state = *sensor.state();
    assert_eq!(state.status, ChargeStatus::Charged);
    assert_eq!(state.charge, 100.0);
    assert!(min_charge > 0.0);
    assert!(planner.seeking_charge());

    // Once full, the planner hands back the patrol waypoint
    let robot = scene.object("robot").cloned().unwrap();
    let target = planner.target(&robot, sensor.state(), &scene);
    assert_eq!(target, Some((10.0, 0.0)));
    assert!(!planner.seeking_charge());
}

/// The driver spins up its simulation thread, streams sensor groups, and
/// shuts down cleanly.
#[test]
fn driver_streams_sensor_groups() {
    let mut scene_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        scene_file,
        r#"
[[objects]]
name = "robot"
x = 0.0
y = 0.0

[[objects]]
name = "dock"
x = 50.0
y = 0.0
charging_zone = true
"#
    )
    .unwrap();

    let config = SimulationConfig {
        scene_file: scene_file.path().to_string_lossy().into_owned(),
        tick_rate_hz: 200.0,
        speed_factor: 50.0,
        route: vec![],
        robot: RobotConfig::default(),
        battery: BatteryConfig {
            discharging_rate: 1.0,
            zone_range: 1.0,
            initial_charge: 100.0,
        },
        sensors: SensorsConfig::default(),
    };

    let mut driver = SimDriver::new(config).unwrap();
    let mut init = driver.initialize().unwrap();

    let stream_rx = init.stream_receivers.remove("sensor_status").unwrap();
    let group = stream_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("no sensor group streamed");
    assert_eq!(group.group_id, "sensor_status");
    assert!(group.get_f32("charge").is_some());
    assert_eq!(group.get_str("status"), Some("Discharging"));
    assert_eq!(group.get_bool("charging"), Some(false));

    // Far from the dock, time-scaled discharge must show up quickly
    std::thread::sleep(Duration::from_millis(300));
    let status = init.sensor_data.get("sensor_status").unwrap();
    let charge = status.lock().unwrap().get_f32("charge").unwrap();
    assert!(charge < 100.0);
    assert!(charge >= 0.0);

    driver.shutdown();
}

/// A missing anchor object is a configuration error, caught at initialize.
#[test]
fn driver_rejects_missing_anchor() {
    let mut scene_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        scene_file,
        r#"
[[objects]]
name = "dock"
x = 1.0
y = 0.0
charging_zone = true
"#
    )
    .unwrap();

    let config = SimulationConfig {
        scene_file: scene_file.path().to_string_lossy().into_owned(),
        tick_rate_hz: 20.0,
        speed_factor: 1.0,
        route: vec![],
        robot: RobotConfig::default(),
        battery: BatteryConfig::default(),
        sensors: SensorsConfig::default(),
    };

    let mut driver = SimDriver::new(config).unwrap();
    assert!(driver.initialize().is_err());
}
