//! Configuration system.
//!
//! Loads movement configuration from JSON strings (file IO left to app).

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Tuning for the player movement controller.
///
/// Immutable once handed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Horizontal speed at full axis deflection, units/sec.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Magnitude of the upward impulse applied on jump.
    #[serde(default = "default_jump_impulse", alias = "jump_force")]
    pub jump_impulse: f32,
    /// Radius of the ground-contact probe circle.
    #[serde(default = "default_ground_check_radius")]
    pub ground_check_radius: f32,
}

fn default_move_speed() -> f32 {
    8.0
}

fn default_jump_impulse() -> f32 {
    12.0
}

fn default_ground_check_radius() -> f32 {
    0.15
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: default_move_speed(),
            jump_impulse: default_jump_impulse(),
            ground_check_radius: default_ground_check_radius(),
        }
    }
}

impl MovementConfig {
    /// Parses and validates config from JSON.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse movement config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values that are not finite and strictly positive.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure_positive("move_speed", self.move_speed)?;
        ensure_positive("jump_impulse", self.jump_impulse)?;
        ensure_positive("ground_check_radius", self.ground_check_radius)?;
        Ok(())
    }
}

/// Fails unless `value` is finite and `> 0`.
pub fn ensure_positive(name: &str, value: f32) -> anyhow::Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be finite and > 0, got {value}"
    );
    Ok(())
}
