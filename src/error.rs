//! Crate error type

use thiserror::Error;

use crate::sim::FruitId;

/// Errors raised by the simulation core and its storage adapters
#[derive(Debug, Error)]
pub enum Error {
    /// `spawn_active` called while a fruit is still under player control
    #[error("an active fruit already exists (id {0})")]
    ActiveFruitExists(FruitId),
    /// `drop_active` called with nothing to drop
    #[error("no active fruit to drop")]
    NoActiveFruit,
    /// Fruit id is not in the falling set
    #[error("unknown fruit id {0}")]
    UnknownFruit(FruitId),
    /// Tier index outside the table
    #[error("tier index {index} out of range (table has {len} tiers)")]
    InvalidTier { index: usize, len: usize },
    /// Rejected settings value
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
