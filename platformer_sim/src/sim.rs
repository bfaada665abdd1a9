//! Simulation loop.
//!
//! Frame-driven host with a fixed physics timestep. Each frame:
//! 1. Apply scripted key transitions for this frame (may latch a jump).
//! 2. Sample input (`PlayerMovement::update`).
//! 3. Run the physics steps that fall due (`fixed_update`, then integrate).
//!
//! Sampling always completes before the steps that consume it.
//!
//! Determinism notes:
//! - Step scheduling uses integer frame/tick arithmetic, not an
//!   accumulating float.
//! - No wall-clock-dependent branching; realtime mode only sleeps.

use std::time::Duration;

use platformer_client::{
    input::{Key, Keyboard},
    PlayerMovement,
};
use platformer_shared::{
    math::Vec2,
    physics::{Body2d, LayerMask},
    render::SpriteState,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    config::SimConfig,
    script::{InputScript, ScriptPlayer},
    world::{spawn_body, PhysicsWorld, RigidBody},
};

/// Observable host state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub frame: u64,
    pub tick: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub flip_x: bool,
    pub jumps: u32,
}

/// Headless host for one player.
pub struct Simulation {
    cfg: SimConfig,
    world: PhysicsWorld,
    body: RigidBody,
    sprite: SpriteState,
    player: PlayerMovement,
    keyboard: Keyboard,
    script: ScriptPlayer,

    frame: u64,
    tick: u64,
    dropped_ticks: u64,
    jumps: u32,
}

impl Simulation {
    /// Builds the level, spawns the body and activates the player.
    ///
    /// Bindings: arrows drive the move axis, space jumps.
    pub fn new(cfg: SimConfig, script: InputScript) -> anyhow::Result<Self> {
        cfg.validate()?;
        let world = PhysicsWorld::from_config(&cfg)?;
        let body = spawn_body(&cfg)?;

        let keyboard = Keyboard::new();
        let mut player = PlayerMovement::new(cfg.movement)
            .with_move_action(keyboard.axis_2d(Key::Left, Key::Right, Key::Down, Key::Up))
            .with_jump_action(keyboard.button(Key::Space))
            .with_ground_check(cfg.ground_check_offset, LayerMask::layer(cfg.ground_layer));
        player.activate();

        info!(
            frame_hz = cfg.frame_hz,
            tick_hz = cfg.tick_hz,
            platforms = world.colliders().len(),
            "Simulation created"
        );

        Ok(Self {
            cfg,
            world,
            body,
            sprite: SpriteState::default(),
            player,
            keyboard,
            script: ScriptPlayer::new(script),
            frame: 0,
            tick: 0,
            dropped_ticks: 0,
            jumps: 0,
        })
    }

    /// Validated at construction; read-only afterwards.
    pub fn cfg(&self) -> &SimConfig {
        &self.cfg
    }

    /// Keyboard handle for feeding input outside the script.
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn player(&self) -> &PlayerMovement {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerMovement {
        &mut self.player
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            frame: self.frame,
            tick: self.tick,
            position: self.body.position,
            velocity: self.body.velocity,
            grounded: self.player.is_grounded(self.body.position(), &self.world),
            flip_x: self.sprite.flip_x,
            jumps: self.jumps,
        }
    }

    /// Runs one rendered frame and the physics steps due after it.
    /// Returns the number of physics steps run.
    pub fn advance_frame(&mut self) -> u32 {
        self.script.apply(self.frame, &self.keyboard);
        self.player.update(&mut self.sprite);
        self.frame += 1;

        let due = self.frame * u64::from(self.cfg.tick_hz) / u64::from(self.cfg.frame_hz)
            - self.dropped_ticks;
        let mut steps = due.saturating_sub(self.tick);
        let cap = u64::from(self.cfg.max_steps_per_frame);
        if steps > cap {
            warn!(frame = self.frame, due = steps, cap, "Too many physics steps, dropping time");
            self.dropped_ticks += steps - cap;
            steps = cap;
        }

        let dt = self.cfg.tick_dt();
        for _ in 0..steps {
            self.physics_step(dt);
        }
        // Bounded by `max_steps_per_frame`.
        steps as u32
    }

    fn physics_step(&mut self, dt_sec: f32) {
        if self.player.fixed_update(&mut self.body, &self.world) {
            self.jumps += 1;
            debug!(tick = self.tick, x = self.body.position.x, "Player jumped");
        }
        self.world.step(&mut self.body, dt_sec);
        self.tick += 1;
    }

    /// Runs `frames` frames as fast as possible.
    pub fn run_frames(&mut self, frames: u64) -> SimSnapshot {
        for _ in 0..frames {
            self.advance_frame();
        }
        self.snapshot()
    }

    /// Runs `frames` frames paced at `frame_hz` of wall-clock time.
    pub async fn run_realtime(&mut self, frames: u64) -> SimSnapshot {
        let dt = Duration::from_secs_f32(self.cfg.frame_dt());
        let mut next = Instant::now();

        for _ in 0..frames {
            next += dt;
            self.advance_frame();
            tokio::time::sleep_until(next).await;
        }
        self.snapshot()
    }

    pub fn script_finished(&self) -> bool {
        self.script.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_tick_rate() {
        let mut sim = Simulation::new(SimConfig::default(), InputScript::new()).unwrap();
        sim.run_frames(60);
        assert_eq!(sim.tick(), 50);
        sim.run_frames(120);
        assert_eq!(sim.tick(), 150);
    }

    #[test]
    fn step_cap_drops_time() {
        let cfg = SimConfig {
            frame_hz: 10,
            tick_hz: 100,
            max_steps_per_frame: 4,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(cfg, InputScript::new()).unwrap();
        assert_eq!(sim.advance_frame(), 4);
        assert_eq!(sim.advance_frame(), 4);
        assert_eq!(sim.tick(), 8);
    }

    #[test]
    fn config_is_exposed_read_only() {
        let cfg = SimConfig {
            frame_hz: 30,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(cfg, InputScript::new()).unwrap();
        assert_eq!(sim.cfg().frame_hz, 30);
        sim.run_frames(30);
        assert_eq!(sim.tick(), 50);
    }

    #[test]
    fn invalid_rates_are_rejected_up_front() {
        let cfg = SimConfig {
            frame_hz: 0,
            ..SimConfig::default()
        };
        assert!(Simulation::new(cfg, InputScript::new()).is_err());
    }

    #[test]
    fn idle_player_rests_on_floor() {
        let mut sim = Simulation::new(SimConfig::default(), InputScript::new()).unwrap();
        let snap = sim.run_frames(30);
        assert!(snap.grounded);
        assert_eq!(snap.position, Vec2::new(0.0, 0.5));
        assert_eq!(snap.jumps, 0);
    }
}
