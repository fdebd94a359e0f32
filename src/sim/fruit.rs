//! Fruit entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entity identifier, unique within an [`EntityStore`](super::EntityStore)
pub type FruitId = u32;

/// A fruit piece
///
/// The box is square with side `size`, anchored at its top-left corner
/// (`pos`). `size` is always derived from `tier` through the tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: FruitId,
    pub tier: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Fruit {
    pub fn new(id: FruitId, tier: usize, size: f32, pos: Vec2) -> Self {
        Self {
            id,
            tier,
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Bottom edge (y grows downward)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    /// Whether `point` lies inside the box (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.right()
            && point.y >= self.pos.y
            && point.y <= self.bottom()
    }
}
