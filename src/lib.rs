//! Fruit Merge - a falling-fruit merge game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiers, entities, physics, merges, game state)
//! - `score`: Current and best score
//! - `settings`: Data-driven tuning
//! - `platform`: Input events, audio and best-score storage contracts
//! - `renderer`: Rendering contract

pub mod error;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use score::ScoreTracker;
pub use settings::{GameMode, LossPolicy, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield size in pixels
    pub const BOUNDS_WIDTH: f32 = 400.0;
    pub const BOUNDS_HEIGHT: f32 = 600.0;

    /// Tier geometry: size = base * (1 + index * growth)
    pub const TIER_COUNT: usize = 11;
    /// Largest tier table a settings file may ask for
    pub const MAX_TIERS: usize = 32;
    pub const TIER_BASE_SIZE: f32 = 60.0;
    pub const TIER_GROWTH: f32 = 0.22;

    /// Active fruit spawn height (just under the cloud)
    pub const SPAWN_Y: f32 = 60.0;
    /// Downward velocity on drop, pixels per tick
    pub const DROP_VELOCITY: f32 = 2.0;
    /// Horizontal step per move input
    pub const MOVE_STEP: f32 = 10.0;

    /// Random velocity scale after a bounce
    pub const BOUNCE_FACTOR_MIN: f32 = 0.5;
    pub const BOUNCE_FACTOR_MAX: f32 = 2.0;

    /// Fixed simulation interval (100 Hz)
    pub const TICK_INTERVAL_MS: u32 = 10;
    /// Ready screen duration before play starts
    pub const READY_DELAY_MS: u32 = 3000;
    /// Delay between a drop and the next active fruit
    pub const RESPAWN_DELAY_MS: u32 = 1000;

    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame credited to the tick accumulator
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Storage key of the persisted best score
    pub const SCORE_STORAGE_KEY: &str = "maxScore";
}
