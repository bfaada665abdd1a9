//! Shared fixtures for the integration tests.

use platformer_shared::math::Vec2;
use platformer_sim::config::{PlatformConfig, SimConfig};

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Default host config with the given platforms instead of the wide floor.
pub fn level(platforms: Vec<PlatformConfig>) -> SimConfig {
    SimConfig {
        platforms,
        ..SimConfig::default()
    }
}

/// Platform whose top surface is at y = 0.
pub fn floor(min_x: f32, max_x: f32, layer: u32) -> PlatformConfig {
    PlatformConfig {
        min: Vec2::new(min_x, -1.0),
        max: Vec2::new(max_x, 0.0),
        layer,
    }
}
