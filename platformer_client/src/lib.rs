//! `platformer_client`
//!
//! Client-side systems:
//! - Headless keyboard device and the input actions built on it
//! - The `PlayerMovement` component wiring input, physics and sprite
//!   collaborators to the movement controller

pub mod input;
pub mod player;

pub use player::PlayerMovement;
