//! Toy physics world.
//!
//! One dynamic box body against static axis-aligned colliders. Just enough
//! integration to drive the movement component headlessly:
//! - semi-implicit Euler under gravity
//! - landing on collider tops while falling
//! - circle overlap queries filtered by layer

use anyhow::Context;
use platformer_shared::{
    config::ensure_positive,
    math::{Rect, Vec2},
    physics::{Body2d, LayerMask, PhysicsConfig, SpatialQuery},
};
use tracing::trace;

use crate::config::SimConfig;

/// Tolerance when deciding whether the feet started above a collider top.
const LANDING_EPSILON: f32 = 1e-4;

/// Static collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub bounds: Rect,
    pub layer: LayerMask,
}

/// Dynamic box body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    mass: f32,
}

impl RigidBody {
    pub fn new(position: Vec2, mass: f32) -> anyhow::Result<Self> {
        ensure_positive("mass", mass)?;
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(0.5, 0.5),
            mass,
        })
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn feet(&self) -> f32 {
        self.position.y - self.half_extents.y
    }
}

impl Body2d for RigidBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * (1.0 / self.mass);
    }
}

/// Static level geometry plus gravity.
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    pub config: PhysicsConfig,
    colliders: Vec<Collider>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            colliders: Vec::new(),
        }
    }

    /// Builds gravity and platforms from host config.
    pub fn from_config(cfg: &SimConfig) -> anyhow::Result<Self> {
        let mut world = Self::new(PhysicsConfig {
            gravity: Vec2::new(0.0, cfg.gravity),
        });
        for (i, p) in cfg.platforms.iter().enumerate() {
            anyhow::ensure!(p.layer < 32, "platform {i}: layer out of range");
            world.add_collider(p.bounds(), LayerMask::layer(p.layer));
        }
        Ok(world)
    }

    pub fn add_collider(&mut self, bounds: Rect, layer: LayerMask) {
        self.colliders.push(Collider { bounds, layer });
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Advances `body` by `dt_sec`. Returns true if it landed this step.
    pub fn step(&self, body: &mut RigidBody, dt_sec: f32) -> bool {
        let prev_feet = body.feet();
        body.velocity += self.config.gravity * dt_sec;
        body.position += body.velocity * dt_sec;

        if body.velocity.y > 0.0 {
            return false;
        }

        let min_x = body.position.x - body.half_extents.x;
        let max_x = body.position.x + body.half_extents.x;
        let feet = body.feet();
        let landing = self
            .colliders
            .iter()
            .map(|c| c.bounds)
            .filter(|b| b.overlaps_x(min_x, max_x))
            .filter(|b| prev_feet >= b.max.y - LANDING_EPSILON && feet <= b.max.y)
            .map(|b| b.max.y)
            .reduce(f32::max);

        match landing {
            Some(top) => {
                body.position.y = top + body.half_extents.y;
                body.velocity.y = 0.0;
                trace!(top, x = body.position.x, "Body landed");
                true
            }
            None => false,
        }
    }
}

impl SpatialQuery for PhysicsWorld {
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .any(|c| mask.intersects(c.layer) && c.bounds.overlaps_circle(center, radius))
    }
}

/// Spawns the player body described by `cfg`.
pub fn spawn_body(cfg: &SimConfig) -> anyhow::Result<RigidBody> {
    RigidBody::new(cfg.spawn, cfg.body_mass).context("spawn player body")
}
