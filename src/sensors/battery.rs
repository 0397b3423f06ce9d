//! Battery charge simulation
//!
//! The battery charge decreases with time at a fixed rate, independent of
//! what the robot is doing, and recharges at the same rate while the robot
//! sits inside a charging zone. The model is intentionally a pure function
//! of elapsed time and zone membership; it is an informative measure for
//! planning, not a power budget.

use crate::scene::SceneObject;
use crate::sensors::zone::ZoneLocator;
use std::fmt;

/// Maximum charge level (percent)
pub const FULL_CHARGE: f32 = 100.0;

/// Charge level below which the battery counts as low (percent)
const LOW_CHARGE: f32 = 20.0;

/// Charge level below which the battery counts as critical (percent)
const CRITICAL_CHARGE: f32 = 10.0;

/// Charging status of the battery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    /// Battery is full
    Charged,
    /// Inside a charging zone, charge rising
    Charging,
    /// Outside all charging zones, charge falling
    Discharging,
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeStatus::Charged => write!(f, "Charged"),
            ChargeStatus::Charging => write!(f, "Charging"),
            ChargeStatus::Discharging => write!(f, "Discharging"),
        }
    }
}

/// Battery state owned by the sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    /// Charge level (0-100%)
    pub charge: f32,
    /// Charging status
    pub status: ChargeStatus,
}

impl BatteryState {
    /// Check if battery is low
    pub fn is_low(&self) -> bool {
        self.charge < LOW_CHARGE
    }

    /// Check if battery is critical
    pub fn is_critical(&self) -> bool {
        self.charge < CRITICAL_CHARGE
    }

    /// Charge truncated to a whole percent, as reported externally
    pub fn life_percent(&self) -> i32 {
        self.charge as i32
    }
}

impl Default for BatteryState {
    fn default() -> Self {
        Self {
            charge: FULL_CHARGE,
            status: ChargeStatus::Charged,
        }
    }
}

/// Advances a charge value over an elapsed time delta
///
/// The rate applies symmetrically to charging and discharging, and the
/// result is always clamped to [0, 100].
#[derive(Debug, Clone, Copy)]
pub struct ChargeIntegrator {
    /// Charge rate of change (percent per second)
    rate: f32,
}

impl ChargeIntegrator {
    /// Create an integrator with the given rate (percent per second)
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }

    /// Advance `charge` by `dt` seconds. `dt` is expected to be
    /// non-negative; the host clock never runs backwards.
    pub fn advance(&self, charge: f32, dt: f32, in_zone: bool) -> (f32, ChargeStatus) {
        if in_zone {
            let charged = charge + dt * self.rate;
            if charged >= FULL_CHARGE {
                (FULL_CHARGE, ChargeStatus::Charged)
            } else {
                (charged, ChargeStatus::Charging)
            }
        } else {
            let drained = charge - dt * self.rate;
            (drained.max(0.0), ChargeStatus::Discharging)
        }
    }
}

/// Battery sensor for one robot
///
/// Owns the battery state and the last-update bookkeeping. The host calls
/// [`update`](BatterySensor::update) once per tick with the current
/// simulation time and a read-only view of the scene.
pub struct BatterySensor {
    integrator: ChargeIntegrator,
    locator: ZoneLocator,
    state: BatteryState,
    /// Simulation time of the previous update (seconds)
    last_update: f64,
}

impl BatterySensor {
    /// Create a sensor starting at `initial_charge` percent at time `now`
    pub fn new(rate: f32, zone_range: f32, initial_charge: f32, now: f64) -> Self {
        let charge = initial_charge.clamp(0.0, FULL_CHARGE);
        let status = if charge >= FULL_CHARGE {
            ChargeStatus::Charged
        } else {
            ChargeStatus::Discharging
        };
        Self {
            integrator: ChargeIntegrator::new(rate),
            locator: ZoneLocator::new(zone_range),
            state: BatteryState { charge, status },
            last_update: now,
        }
    }

    /// Current battery state
    pub fn state(&self) -> &BatteryState {
        &self.state
    }

    /// Whether the robot was inside a charging zone on the last update
    pub fn charging(&self) -> bool {
        matches!(
            self.state.status,
            ChargeStatus::Charging | ChargeStatus::Charged
        )
    }

    /// Advance the battery to simulation time `now`
    ///
    /// `robot` is the robot's anchor object and `objects` the scene
    /// collection it appears in; the locator excludes the anchor itself.
    pub fn update(&mut self, now: f64, robot: &SceneObject, objects: &[SceneObject]) -> BatteryState {
        let dt = (now - self.last_update).max(0.0) as f32;
        let in_zone = self.locator.in_charging_zone(robot, objects);

        let (charge, status) = self.integrator.advance(self.state.charge, dt, in_zone);
        self.state = BatteryState { charge, status };
        self.last_update = now;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    const RATE: f32 = 0.05;

    fn obj(name: &str, x: f32, y: f32, zone: bool) -> SceneObject {
        SceneObject {
            name: name.to_string(),
            x,
            y,
            charging_zone: zone,
        }
    }

    #[test]
    fn test_discharge_step() {
        let integrator = ChargeIntegrator::new(RATE);
        let (charge, status) = integrator.advance(50.0, 10.0, false);
        assert!((charge - 49.5).abs() < 1e-5);
        assert_eq!(status, ChargeStatus::Discharging);
    }

    #[test]
    fn test_charge_saturates() {
        let integrator = ChargeIntegrator::new(RATE);
        let (charge, status) = integrator.advance(99.8, 10.0, true);
        assert_eq!(charge, 100.0);
        assert_eq!(status, ChargeStatus::Charged);
    }

    #[test]
    fn test_charging_below_full() {
        let integrator = ChargeIntegrator::new(RATE);
        let (charge, status) = integrator.advance(50.0, 10.0, true);
        assert!((charge - 50.5).abs() < 1e-5);
        assert_eq!(status, ChargeStatus::Charging);
    }

    #[test]
    fn test_clamping_law() {
        let integrator = ChargeIntegrator::new(RATE);
        for &charge in &[0.0, 0.1, 50.0, 99.9, 100.0] {
            for &dt in &[0.0, 0.5, 10.0, 1e6] {
                for &in_zone in &[false, true] {
                    let (new_charge, _) = integrator.advance(charge, dt, in_zone);
                    assert!(
                        (0.0..=100.0).contains(&new_charge),
                        "charge={} dt={} in_zone={} -> {}",
                        charge,
                        dt,
                        in_zone,
                        new_charge
                    );
                }
            }
        }
    }

    #[test]
    fn test_saturation_idempotent() {
        let integrator = ChargeIntegrator::new(RATE);
        let mut charge = 100.0;
        for _ in 0..10 {
            let (next, status) = integrator.advance(charge, 1.0, true);
            assert_eq!(next, 100.0);
            assert_eq!(status, ChargeStatus::Charged);
            charge = next;
        }
    }

    #[test]
    fn test_floor_idempotent() {
        let integrator = ChargeIntegrator::new(RATE);
        let mut charge = 0.0;
        for _ in 0..10 {
            let (next, status) = integrator.advance(charge, 1.0, false);
            assert_eq!(next, 0.0);
            assert_eq!(status, ChargeStatus::Discharging);
            charge = next;
        }
    }

    #[test]
    fn test_monotonic_within_step() {
        let integrator = ChargeIntegrator::new(RATE);
        let (up, _) = integrator.advance(50.0, 3.0, true);
        assert!(up >= 50.0);
        let (down, _) = integrator.advance(50.0, 3.0, false);
        assert!(down <= 50.0);
    }

    #[test]
    fn test_sensor_tracks_time() {
        let objects = vec![obj("robot", 0.0, 0.0, false), obj("dock", 50.0, 0.0, true)];
        let robot = objects[0].clone();

        let mut sensor = BatterySensor::new(RATE, 1.0, 50.0, 0.0);
        let state = sensor.update(10.0, &robot, &objects);
        assert!((state.charge - 49.5).abs() < 1e-5);
        assert_eq!(state.status, ChargeStatus::Discharging);

        // No elapsed time means no change
        let state = sensor.update(10.0, &robot, &objects);
        assert!((state.charge - 49.5).abs() < 1e-5);
    }

    #[test]
    fn test_sensor_recharges_in_zone() {
        let objects = vec![obj("robot", 0.0, 0.0, false), obj("dock", 0.5, 0.0, true)];
        let robot = objects[0].clone();

        let mut sensor = BatterySensor::new(RATE, 1.0, 99.8, 0.0);
        let state = sensor.update(10.0, &robot, &objects);
        assert_eq!(state.charge, 100.0);
        assert_eq!(state.status, ChargeStatus::Charged);
    }

    #[test]
    fn test_charged_reenters_discharging() {
        let mut objects = vec![obj("robot", 0.0, 0.0, false), obj("dock", 0.5, 0.0, true)];
        let robot = objects[0].clone();

        let mut sensor = BatterySensor::new(RATE, 1.0, 100.0, 0.0);
        let state = sensor.update(1.0, &robot, &objects);
        assert_eq!(state.status, ChargeStatus::Charged);

        // Move the dock out of range; the full battery starts draining
        objects[1].x = 10.0;
        let state = sensor.update(2.0, &robot, &objects);
        assert_eq!(state.status, ChargeStatus::Discharging);
        assert!(state.charge < 100.0);
    }

    #[test]
    fn test_state_thresholds() {
        let state = BatteryState {
            charge: 19.9,
            status: ChargeStatus::Discharging,
        };
        assert!(state.is_low());
        assert!(!state.is_critical());
        assert_eq!(state.life_percent(), 19);

        let state = BatteryState {
            charge: 9.0,
            status: ChargeStatus::Discharging,
        };
        assert!(state.is_critical());
    }

    #[test]
    fn test_initial_charge_clamped() {
        let sensor = BatterySensor::new(RATE, 1.0, 150.0, 0.0);
        assert_eq!(sensor.state().charge, 100.0);
        assert_eq!(sensor.state().status, ChargeStatus::Charged);

        let sensor = BatterySensor::new(RATE, 1.0, 42.0, 0.0);
        assert_eq!(sensor.state().status, ChargeStatus::Discharging);
    }
}
