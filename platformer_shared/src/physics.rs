//! Physics abstraction.
//!
//! The movement code never integrates anything itself. It reads and writes
//! velocity on a [`Body2d`] and asks a [`SpatialQuery`] whether the feet
//! touch ground.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

bitflags::bitflags! {
    /// Collision layer set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        const NONE = 0;
        const DEFAULT = 1 << 0;
        const WATER = 1 << 2;
        const GROUND = 1 << 3;
        const PLAYER = 1 << 6;
        const ALL = u32::MAX;
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl LayerMask {
    /// Mask for a single layer index (0..32).
    pub fn layer(index: u32) -> Self {
        Self::from_bits_retain(1u32.checked_shl(index).unwrap_or(0))
    }
}

/// Physics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: Vec2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
        }
    }
}

/// Dynamic rigid body as seen by gameplay code.
pub trait Body2d {
    fn position(&self) -> Vec2;
    fn linear_velocity(&self) -> Vec2;
    fn set_linear_velocity(&mut self, velocity: Vec2);
    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Region occupancy queries.
pub trait SpatialQuery {
    /// True if any collider on a layer in `mask` intersects the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool;
}

/// No-op physics: nothing is ever there.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPhysics;

impl SpatialQuery for NullPhysics {
    fn overlap_circle(&self, _center: Vec2, _radius: f32, _mask: LayerMask) -> bool {
        false
    }
}

/// Ground-check anchor attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundCheck {
    /// Anchor position relative to the body origin.
    pub offset: Vec2,
    pub radius: f32,
    pub layers: LayerMask,
}

impl GroundCheck {
    pub fn new(offset: Vec2, radius: f32, layers: LayerMask) -> Self {
        Self {
            offset,
            radius,
            layers,
        }
    }

    /// World-space anchor for a body at `body_position`.
    pub fn anchor(&self, body_position: Vec2) -> Vec2 {
        body_position + self.offset
    }

    pub fn probe(&self, body_position: Vec2, query: &dyn SpatialQuery) -> bool {
        query.overlap_circle(self.anchor(body_position), self.radius, self.layers)
    }
}
