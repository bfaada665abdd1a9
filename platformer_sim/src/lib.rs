//! `platformer_sim`
//!
//! Headless host for the player movement component:
//! - Fixed timestep physics stepped from a frame loop
//! - Toy physics world (gravity, static platforms, layer queries)
//! - Scripted keyboard input
//!
//! This is a harness for driving the component end to end, not an engine.

pub mod config;
pub mod script;
pub mod sim;
pub mod world;

pub use sim::Simulation;
