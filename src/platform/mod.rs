//! Platform abstraction layer
//!
//! Contracts between the simulation core and its host:
//! - Input events
//! - Audio (background music start/stop)
//! - Best-score storage
//!
//! Rendering lives in [`crate::renderer`].

pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use storage::{MemoryScoreStore, ScoreStore};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileScoreStore;

/// Discrete player input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Shift the active fruit left by `step` pixels
    MoveLeft(f32),
    /// Shift the active fruit right by `step` pixels
    MoveRight(f32),
    /// Release the active fruit
    Drop,
    /// Touch at a playfield point (tap mode only)
    TapAt(Vec2),
}

/// Background music control
pub trait AudioController {
    /// Entering Playing
    fn play(&mut self);
    /// Entering GameOver
    fn pause(&mut self);
}

/// Audio sink that does nothing (headless/tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioController for NullAudio {
    fn play(&mut self) {}
    fn pause(&mut self) {}
}
