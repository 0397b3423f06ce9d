//! Scene description for the simulation
//!
//! A scene is a flat list of named objects on a 2D plane, loaded from a TOML
//! file. Objects that can recharge a robot carry the `charging_zone` flag;
//! for every other object the flag is simply absent. The robot's own anchor
//! is one of the objects and the driver moves it each tick.
//!
//! Example scene file:
//!
//! ```toml
//! [[objects]]
//! name = "robot"
//! x = 0.0
//! y = 0.0
//!
//! [[objects]]
//! name = "dock_alpha"
//! x = 4.0
//! y = 3.0
//! charging_zone = true
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A named object in the scene
#[derive(Debug, Clone, Deserialize)]
pub struct SceneObject {
    /// Unique object name
    pub name: String,

    /// X position in world frame (meters)
    pub x: f32,

    /// Y position in world frame (meters)
    pub y: f32,

    /// Whether this object recharges robots within range
    #[serde(default)]
    pub charging_zone: bool,
}

impl SceneObject {
    /// Euclidean distance to another object
    pub fn distance_to(&self, other: &SceneObject) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Scene contents loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    objects: Vec<SceneObject>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let scene: Scene = toml::from_str(&contents)?;
        scene.check_unique_names()?;
        Ok(scene)
    }

    /// Build a scene from a list of objects (for tests and embedding)
    pub fn from_objects(objects: Vec<SceneObject>) -> Result<Self> {
        let scene = Scene { objects };
        scene.check_unique_names()?;
        Ok(scene)
    }

    fn check_unique_names(&self) -> Result<()> {
        for (i, obj) in self.objects.iter().enumerate() {
            if self.objects[..i].iter().any(|o| o.name == obj.name) {
                return Err(Error::Config(format!(
                    "Duplicate scene object name: {}",
                    obj.name
                )));
            }
        }
        Ok(())
    }

    /// All objects in the scene
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Look up an object by name
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Move an object to a new position. Returns false if no object with
    /// that name exists.
    pub fn set_position(&mut self, name: &str, x: f32, y: f32) -> bool {
        match self.objects.iter_mut().find(|o| o.name == name) {
            Some(obj) => {
                obj.x = x;
                obj.y = y;
                true
            }
            None => false,
        }
    }

    /// Objects flagged as charging zones
    pub fn charging_zones(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.charging_zone)
    }
}
