//! `platformer_shared`
//!
//! Shared libraries used by the input client and the simulation host.
//!
//! Design goals:
//! - Deterministic and modular where practical.
//! - Collaborators (input, physics, rendering) behind traits, with null
//!   objects for the ones a caller may not have.
//! - No `unsafe`.

pub mod config;
pub mod input;
pub mod math;
pub mod movement;
pub mod physics;
pub mod render;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::input::*;
    pub use crate::math::*;
    pub use crate::movement::*;
    pub use crate::physics::*;
    pub use crate::render::*;
}
