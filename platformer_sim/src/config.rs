//! Host configuration.

use anyhow::{ensure, Context};
use platformer_shared::{
    config::{ensure_positive, MovementConfig},
    math::{Rect, Vec2},
};
use serde::{Deserialize, Serialize};

/// A static platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub min: Vec2,
    pub max: Vec2,
    /// Layer index (0..32).
    #[serde(default = "default_ground_layer")]
    pub layer: u32,
}

impl PlatformConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.min, self.max)
    }
}

/// Root configuration for the headless host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Rendered frames per second.
    #[serde(default = "default_frame_hz")]
    pub frame_hz: u32,
    /// Fixed physics steps per second.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Cap on physics steps run in one frame; extra time is dropped.
    #[serde(default = "default_max_steps_per_frame")]
    pub max_steps_per_frame: u32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_body_mass")]
    pub body_mass: f32,
    #[serde(default = "default_spawn")]
    pub spawn: Vec2,
    /// Ground-check anchor relative to the body origin.
    #[serde(default = "default_ground_check_offset")]
    pub ground_check_offset: Vec2,
    /// Layer index probed by the ground check.
    #[serde(default = "default_ground_layer")]
    pub ground_layer: u32,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<PlatformConfig>,
}

fn default_frame_hz() -> u32 {
    60
}

fn default_tick_hz() -> u32 {
    50
}

fn default_max_steps_per_frame() -> u32 {
    8
}

fn default_gravity() -> f32 {
    -9.81
}

fn default_body_mass() -> f32 {
    1.0
}

fn default_spawn() -> Vec2 {
    Vec2::new(0.0, 0.5)
}

fn default_ground_check_offset() -> Vec2 {
    Vec2::new(0.0, -0.5)
}

fn default_ground_layer() -> u32 {
    3
}

fn default_platforms() -> Vec<PlatformConfig> {
    vec![PlatformConfig {
        min: Vec2::new(-100.0, -1.0),
        max: Vec2::new(100.0, 0.0),
        layer: default_ground_layer(),
    }]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_hz: default_frame_hz(),
            tick_hz: default_tick_hz(),
            max_steps_per_frame: default_max_steps_per_frame(),
            gravity: default_gravity(),
            body_mass: default_body_mass(),
            spawn: default_spawn(),
            ground_check_offset: default_ground_check_offset(),
            ground_layer: default_ground_layer(),
            movement: MovementConfig::default(),
            platforms: default_platforms(),
        }
    }
}

impl SimConfig {
    /// Parses and validates config from JSON.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse sim config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.frame_hz > 0, "frame_hz must be > 0");
        ensure!(self.tick_hz > 0, "tick_hz must be > 0");
        ensure!(self.max_steps_per_frame > 0, "max_steps_per_frame must be > 0");
        ensure!(self.gravity.is_finite(), "gravity must be finite");
        ensure_positive("body_mass", self.body_mass)?;
        ensure!(
            self.spawn.is_finite() && self.ground_check_offset.is_finite(),
            "spawn and ground_check_offset must be finite"
        );
        ensure!(self.ground_layer < 32, "ground_layer must be < 32");
        for (i, p) in self.platforms.iter().enumerate() {
            ensure!(p.layer < 32, "platform {i}: layer must be < 32");
            ensure!(
                p.min.x <= p.max.x && p.min.y <= p.max.y,
                "platform {i}: min must not exceed max"
            );
        }
        self.movement.validate().context("movement")?;
        Ok(())
    }

    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_hz as f32
    }

    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = SimConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg.tick_hz, 50);
        assert_eq!(cfg.movement, MovementConfig::default());
        assert_eq!(cfg.platforms.len(), 1);
    }

    #[test]
    fn nested_movement_is_validated() {
        let err = SimConfig::from_json_str(r#"{ "movement": { "move_speed": -2.0 } }"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_rates_and_layers() {
        assert!(SimConfig::from_json_str(r#"{ "tick_hz": 0 }"#).is_err());
        assert!(SimConfig::from_json_str(r#"{ "ground_layer": 32 }"#).is_err());
        assert!(SimConfig::from_json_str(r#"{ "body_mass": 0.0 }"#).is_err());
    }
}
