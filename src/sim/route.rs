//! Patrol route planning with low-battery docking
//!
//! The robot cycles through its configured waypoints. When the battery runs
//! low it diverts to the nearest charging zone and parks there until the
//! battery reports full, then resumes the patrol where it left off.

use crate::scene::{Scene, SceneObject};
use crate::sensors::battery::{BatteryState, ChargeStatus};

/// Waypoint cycling with a low-battery diversion
pub struct RoutePlanner {
    waypoints: Vec<[f32; 2]>,
    next: usize,
    arrival_radius: f32,
    /// Active charging diversion, if any
    dock_target: Option<(f32, f32)>,
}

impl RoutePlanner {
    /// Create a planner for the given waypoints
    pub fn new(waypoints: Vec<[f32; 2]>, arrival_radius: f32) -> Self {
        Self {
            waypoints,
            next: 0,
            arrival_radius,
            dock_target: None,
        }
    }

    /// Whether the robot is currently diverting to a charging zone
    pub fn seeking_charge(&self) -> bool {
        self.dock_target.is_some()
    }

    /// Pick the position the robot should head for this tick
    ///
    /// Returns None when there is nowhere to go: no waypoints configured
    /// and no diversion active.
    pub fn target(
        &mut self,
        robot: &SceneObject,
        battery: &BatteryState,
        scene: &Scene,
    ) -> Option<(f32, f32)> {
        if let Some(target) = self.dock_target {
            if battery.status == ChargeStatus::Charged {
                log::info!("Battery full, resuming patrol");
                self.dock_target = None;
            } else {
                return Some(target);
            }
        }

        if battery.is_low() {
            if let Some(zone) = nearest_zone(robot, scene) {
                log::info!(
                    "Battery low ({:.1}%), heading to charging zone {}",
                    battery.charge,
                    zone.name
                );
                let target = (zone.x, zone.y);
                self.dock_target = Some(target);
                return Some(target);
            }
        }

        if self.waypoints.is_empty() {
            return None;
        }

        let [wx, wy] = self.waypoints[self.next];
        let dx = wx - robot.x;
        let dy = wy - robot.y;
        if (dx * dx + dy * dy).sqrt() <= self.arrival_radius {
            self.next = (self.next + 1) % self.waypoints.len();
        }

        let [wx, wy] = self.waypoints[self.next];
        Some((wx, wy))
    }
}

/// Closest charging zone to the robot, excluding its own anchor
fn nearest_zone<'a>(robot: &SceneObject, scene: &'a Scene) -> Option<&'a SceneObject> {
    scene
        .charging_zones()
        .filter(|zone| zone.name != robot.name)
        .min_by(|a, b| {
            robot
                .distance_to(a)
                .partial_cmp(&robot.distance_to(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Move from `from` towards `to` by at most `max_step`
pub fn step_towards(from: (f32, f32), to: (f32, f32), max_step: f32) -> (f32, f32) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance <= max_step {
        to
    } else {
        let angle = dy.atan2(dx);
        (
            from.0 + max_step * angle.cos(),
            from.1 + max_step * angle.sin(),
        )
    }
}
