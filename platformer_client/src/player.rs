//! Player movement component.
//!
//! Binds a [`MovementController`] to its collaborators:
//! - move/jump input actions (optional)
//! - a ground-check anchor (optional)
//! - the rigid body and spatial query, passed in per physics step
//! - the sprite, passed in per frame
//!
//! The host calls `activate`/`deactivate` around the component's lifetime,
//! `update` once per rendered frame and `fixed_update` once per physics step.

use platformer_shared::{
    config::MovementConfig,
    input::{AxisAction, ButtonAction, Subscription},
    math::Vec2,
    movement::{apply_facing, update_facing, FacingDirection, MovementController},
    physics::{Body2d, GroundCheck, LayerMask, SpatialQuery},
    render::SpriteRenderer,
};
use tracing::info;

/// Gameplay component driving one player body.
pub struct PlayerMovement {
    controller: MovementController,
    ground_check: Option<GroundCheck>,
    move_action: Option<Box<dyn AxisAction>>,
    jump_action: Option<Box<dyn ButtonAction>>,
    jump_subscription: Option<Subscription>,
    active: bool,
}

impl PlayerMovement {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            controller: MovementController::new(config),
            ground_check: None,
            move_action: None,
            jump_action: None,
            jump_subscription: None,
            active: false,
        }
    }

    pub fn with_move_action(mut self, action: impl AxisAction + 'static) -> Self {
        self.move_action = Some(Box::new(action));
        self
    }

    pub fn with_jump_action(mut self, action: impl ButtonAction + 'static) -> Self {
        self.jump_action = Some(Box::new(action));
        self
    }

    /// Sets the ground-check anchor; the probe radius comes from the config.
    pub fn with_ground_check(mut self, offset: Vec2, layers: LayerMask) -> Self {
        let radius = self.controller.config().ground_check_radius;
        self.ground_check = Some(GroundCheck::new(offset, radius, layers));
        self
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn ground_check(&self) -> Option<&GroundCheck> {
        self.ground_check.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enables input and subscribes the jump latch.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        if let Some(action) = self.move_action.as_mut() {
            action.enable();
        }
        if let Some(action) = self.jump_action.as_mut() {
            action.enable();
            let latch = self.controller.jump_latch();
            self.jump_subscription = Some(action.subscribe(Box::new(move || latch.trigger())));
        }
        self.active = true;
        info!(
            has_move = self.move_action.is_some(),
            has_jump = self.jump_action.is_some(),
            has_ground_check = self.ground_check.is_some(),
            "Player movement activated"
        );
    }

    /// Unsubscribes, disables input and drops all movement state.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        if let Some(action) = self.jump_action.as_mut() {
            if let Some(sub) = self.jump_subscription.take() {
                action.unsubscribe(sub);
            }
            action.disable();
        }
        if let Some(action) = self.move_action.as_mut() {
            action.disable();
        }
        self.controller.reset();
        self.active = false;
        info!("Player movement deactivated");
    }

    /// Latches a jump directly, bypassing the jump action.
    pub fn queue_jump(&mut self) {
        if self.active {
            self.controller.on_jump_triggered();
        }
    }

    /// Per-frame input sample. Returns the facing decision that was applied.
    pub fn update(&mut self, sprite: &mut dyn SpriteRenderer) -> FacingDirection {
        if !self.active {
            return FacingDirection::Unchanged;
        }
        let horizontal = self
            .move_action
            .as_ref()
            .map_or(0.0, |action| action.read_value().x);
        self.controller.on_frame(horizontal);

        let facing = update_facing(horizontal);
        apply_facing(sprite, facing);
        facing
    }

    /// Per-physics-step actuation. Returns true if a jump fired.
    pub fn fixed_update(&mut self, body: &mut dyn Body2d, world: &dyn SpatialQuery) -> bool {
        if !self.active {
            return false;
        }
        let position = body.position();
        let ground_check = self.ground_check;
        let outcome = self.controller.resolve_step(body.linear_velocity(), || {
            ground_check.is_some_and(|check| check.probe(position, world))
        });

        body.set_linear_velocity(outcome.velocity);
        if outcome.apply_impulse {
            body.apply_impulse(self.controller.jump_impulse());
        }
        outcome.apply_impulse
    }

    /// Ground contact for a body at `body_position`. False without an anchor.
    pub fn is_grounded(&self, body_position: Vec2, world: &dyn SpatialQuery) -> bool {
        self.ground_check
            .as_ref()
            .is_some_and(|check| check.probe(body_position, world))
    }
}

impl Drop for PlayerMovement {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use platformer_shared::{physics::NullPhysics, render::SpriteState};

    use super::*;
    use crate::input::{Key, Keyboard};

    #[derive(Default)]
    struct TestBody {
        position: Vec2,
        velocity: Vec2,
        impulses: Vec<Vec2>,
    }

    impl Body2d for TestBody {
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
            self.impulses.push(impulse);
            self.velocity += impulse;
        }
    }

    struct AlwaysGround;

    impl SpatialQuery for AlwaysGround {
        fn overlap_circle(&self, _center: Vec2, _radius: f32, mask: LayerMask) -> bool {
            mask.intersects(LayerMask::GROUND)
        }
    }

    fn player(kb: &Keyboard) -> PlayerMovement {
        PlayerMovement::new(MovementConfig::default())
            .with_move_action(kb.axis(Key::Left, Key::Right))
            .with_jump_action(kb.button(Key::Space))
            .with_ground_check(Vec2::new(0.0, -0.5), LayerMask::GROUND)
    }

    #[test]
    fn walks_and_faces_input_direction() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        p.activate();
        let mut sprite = SpriteState::default();
        let mut body = TestBody::default();

        kb.press(Key::Left);
        assert_eq!(p.update(&mut sprite), FacingDirection::Left);
        assert!(sprite.flip_x);
        p.fixed_update(&mut body, &NullPhysics);
        assert_eq!(body.velocity.x, -8.0);

        kb.release(Key::Left);
        assert_eq!(p.update(&mut sprite), FacingDirection::Unchanged);
        assert!(sprite.flip_x);
        p.fixed_update(&mut body, &NullPhysics);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn jump_key_fires_impulse_once_when_grounded() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        p.activate();
        let mut body = TestBody {
            velocity: Vec2::new(0.0, -2.0),
            ..TestBody::default()
        };

        kb.press(Key::Space);
        assert!(p.fixed_update(&mut body, &AlwaysGround));
        assert_eq!(body.impulses, vec![Vec2::new(0.0, 12.0)]);
        assert_eq!(body.velocity.y, 12.0, "vertical velocity zeroed before impulse");

        assert!(!p.fixed_update(&mut body, &AlwaysGround));
        assert_eq!(body.impulses.len(), 1);
    }

    #[test]
    fn missing_ground_check_never_jumps() {
        let kb = Keyboard::new();
        let mut p = PlayerMovement::new(MovementConfig::default())
            .with_jump_action(kb.button(Key::Space));
        p.activate();
        let mut body = TestBody::default();

        kb.press(Key::Space);
        assert!(!p.is_grounded(Vec2::ZERO, &AlwaysGround));
        assert!(!p.fixed_update(&mut body, &AlwaysGround));
        assert!(!p.controller().state().jump_requested());
    }

    #[test]
    fn missing_move_action_reads_zero() {
        let mut p = PlayerMovement::new(MovementConfig::default());
        p.activate();
        let mut body = TestBody {
            velocity: Vec2::new(3.0, 0.0),
            ..TestBody::default()
        };
        p.update(&mut SpriteState::default());
        p.fixed_update(&mut body, &NullPhysics);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn deactivate_drops_latched_jump_and_unsubscribes() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        p.activate();
        kb.press(Key::Space);
        assert!(p.controller().state().jump_requested());

        p.deactivate();
        assert!(!p.is_active());
        assert!(!p.controller().state().jump_requested());

        kb.release(Key::Space);
        kb.press(Key::Space);
        p.activate();
        let mut body = TestBody::default();
        assert!(!p.fixed_update(&mut body, &AlwaysGround));
    }

    #[test]
    fn activation_cycles_keep_a_single_subscription() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        assert_eq!(kb.subscriber_count(Key::Space), 0);

        for _ in 0..3 {
            p.activate();
            p.activate();
            assert_eq!(kb.subscriber_count(Key::Space), 1);
            p.deactivate();
            assert_eq!(kb.subscriber_count(Key::Space), 0);
        }

        p.activate();
        drop(p);
        assert_eq!(kb.subscriber_count(Key::Space), 0);
    }

    #[test]
    fn inactive_component_is_inert() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        kb.press(Key::Right);
        p.queue_jump();
        let mut body = TestBody {
            velocity: Vec2::new(1.0, 1.0),
            ..TestBody::default()
        };
        assert_eq!(p.update(&mut SpriteState::default()), FacingDirection::Unchanged);
        assert!(!p.fixed_update(&mut body, &AlwaysGround));
        assert_eq!(body.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn activate_and_deactivate_are_idempotent() {
        let kb = Keyboard::new();
        let mut p = player(&kb);
        p.activate();
        p.activate();
        assert!(p.is_active());

        p.deactivate();
        p.deactivate();
        assert!(!p.is_active());
        kb.press(Key::Space);
        assert!(!p.controller().state().jump_requested());
    }
}
