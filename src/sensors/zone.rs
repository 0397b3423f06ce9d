//! Charging-zone lookup
//!
//! Answers one question per tick: is the robot close enough to any object
//! flagged as a charging zone? The scene collection is passed in as a
//! read-only slice so the lookup has no dependency on who owns the scene.

use crate::scene::SceneObject;

/// Locates charging zones within range of a robot
#[derive(Debug, Clone, Copy)]
pub struct ZoneLocator {
    /// Distance beyond which a charging zone is out of reach (meters)
    range: f32,
}

impl ZoneLocator {
    /// Create a locator with the given range
    pub fn new(range: f32) -> Self {
        Self { range }
    }

    /// Check whether `robot` is within range of any charging zone
    ///
    /// Objects without the charging-zone flag are skipped, as is the robot's
    /// own anchor object. The boundary is inclusive: a zone exactly at
    /// `range` counts. Returns false for an empty collection.
    pub fn in_charging_zone(&self, robot: &SceneObject, objects: &[SceneObject]) -> bool {
        for obj in objects {
            if !obj.charging_zone {
                continue;
            }
            // Skip distance to self
            if obj.name == robot.name {
                continue;
            }
            let distance = robot.distance_to(obj);
            log::trace!("Distance from {} to zone {} = {}", robot.name, obj.name, distance);
            if distance <= self.range {
                return true;
            }
        }
        false
    }
}
