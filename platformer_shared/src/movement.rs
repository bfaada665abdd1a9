//! Movement controller.
//!
//! Turns the latest sampled input into physics actuation once per fixed
//! step. The only state carried between steps is the horizontal sample and
//! the one-shot jump latch:
//! - `on_frame` stores the axis value.
//! - `on_jump_triggered` (or a [`JumpLatch`] clone held by an input
//!   callback) latches a jump.
//! - `on_physics_step` consumes the latch, jump or no jump.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{config::MovementConfig, math::Vec2, render::SpriteRenderer};

/// Axis magnitude below which facing is left alone.
pub const FACING_DEADZONE: f32 = 0.01;

/// Which way the sprite should face after an input sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingDirection {
    Left,
    Right,
    Unchanged,
}

/// Resolves facing from a horizontal axis value.
pub fn update_facing(horizontal_input: f32) -> FacingDirection {
    if horizontal_input > FACING_DEADZONE {
        FacingDirection::Right
    } else if horizontal_input < -FACING_DEADZONE {
        FacingDirection::Left
    } else {
        FacingDirection::Unchanged
    }
}

/// Applies a facing decision to a sprite. Art is assumed to face right.
pub fn apply_facing(sprite: &mut dyn SpriteRenderer, direction: FacingDirection) {
    match direction {
        FacingDirection::Right => sprite.set_flip_x(false),
        FacingDirection::Left => sprite.set_flip_x(true),
        FacingDirection::Unchanged => {}
    }
}

/// One-shot jump flag shared with input callbacks.
#[derive(Debug, Clone, Default)]
pub struct JumpLatch(Arc<AtomicBool>);

impl JumpLatch {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns the latched value and clears it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Per-activation movement state.
#[derive(Debug, Default)]
pub struct MovementState {
    pub horizontal_input: f32,
    jump: JumpLatch,
}

/// Copies the latched value into a fresh latch; clones never share it.
impl Clone for MovementState {
    fn clone(&self) -> Self {
        let jump = JumpLatch::default();
        if self.jump.is_set() {
            jump.trigger();
        }
        Self {
            horizontal_input: self.horizontal_input,
            jump,
        }
    }
}

impl MovementState {
    pub fn jump_requested(&self) -> bool {
        self.jump.is_set()
    }
}

/// Result of one physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub velocity: Vec2,
    /// Caller applies `Vec2::UP * jump_impulse` after writing `velocity`.
    pub apply_impulse: bool,
}

/// Input-to-actuation resolver for a single player body.
#[derive(Debug, Clone)]
pub struct MovementController {
    config: MovementConfig,
    state: MovementState,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            state: MovementState::default(),
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    /// Handle for input callbacks. Stays valid until [`Self::reset`].
    pub fn jump_latch(&self) -> JumpLatch {
        self.state.jump.clone()
    }

    /// Discards all state, detaching previously handed-out latches.
    pub fn reset(&mut self) {
        self.state = MovementState::default();
    }

    /// Stores the latest horizontal sample.
    pub fn on_frame(&mut self, horizontal_axis: f32) {
        self.state.horizontal_input = horizontal_axis;
    }

    pub fn on_jump_triggered(&mut self) {
        self.state.jump.trigger();
    }

    /// Resolves one step given the current grounded state.
    pub fn on_physics_step(&mut self, current_velocity: Vec2, grounded: bool) -> StepOutcome {
        self.resolve_step(current_velocity, || grounded)
    }

    /// Like [`Self::on_physics_step`], but the ground probe only runs when a
    /// jump is latched.
    pub fn resolve_step(
        &mut self,
        current_velocity: Vec2,
        ground_probe: impl FnOnce() -> bool,
    ) -> StepOutcome {
        let mut velocity = current_velocity;
        velocity.x = self.state.horizontal_input * self.config.move_speed;

        // Cleared every step, grounded or not: no jump buffering.
        let jump_requested = self.state.jump.take();
        let apply_impulse = jump_requested && ground_probe();

        if apply_impulse {
            velocity.y = 0.0;
            debug!(vx = velocity.x, impulse = self.config.jump_impulse, "Jump fired");
        } else if jump_requested {
            debug!("Jump dropped: not grounded");
        }

        trace!(vx = velocity.x, vy = velocity.y, apply_impulse, "Physics step resolved");
        StepOutcome {
            velocity,
            apply_impulse,
        }
    }

    pub fn jump_impulse(&self) -> Vec2 {
        Vec2::UP * self.config.jump_impulse
    }
}
