//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! Gameplay only needs to flip a sprite horizontally.

/// A sprite with a horizontal flip flag.
pub trait SpriteRenderer {
    fn flip_x(&self) -> bool;
    fn set_flip_x(&mut self, flip: bool);
}

/// A no-op sprite useful for headless tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSprite;

impl SpriteRenderer for NullSprite {
    fn flip_x(&self) -> bool {
        false
    }

    fn set_flip_x(&mut self, _flip: bool) {}
}

/// Plain in-memory sprite state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpriteState {
    pub flip_x: bool,
}

impl SpriteRenderer for SpriteState {
    fn flip_x(&self) -> bool {
        self.flip_x
    }

    fn set_flip_x(&mut self, flip: bool) {
        self.flip_x = flip;
    }
}
