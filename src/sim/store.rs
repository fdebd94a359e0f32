//! Entity store
//!
//! Owns the falling set and the single active (player-controlled) fruit.
//! Merges mutate the surviving fruit in place and remove the consumed one;
//! entities are never duplicated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitId};
use super::tier::TierTable;
use crate::error::{Error, Result};

/// Falling set plus the optional active fruit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    /// Playfield size (width, height)
    bounds: Vec2,
    /// Spawn height of a new active fruit
    spawn_y: f32,
    /// Downward velocity given on drop
    drop_velocity: f32,
    /// Fruit subject to physics, in insertion order
    falling: Vec<Fruit>,
    active: Option<Fruit>,
    /// Next entity ID
    next_id: FruitId,
}

impl EntityStore {
    pub fn new(bounds: Vec2, spawn_y: f32, drop_velocity: f32) -> Self {
        Self {
            bounds,
            spawn_y,
            drop_velocity,
            falling: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> FruitId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn falling(&self) -> &[Fruit] {
        &self.falling
    }

    /// Mutable access for the integrator and resolver
    pub(crate) fn falling_mut(&mut self) -> &mut [Fruit] {
        &mut self.falling
    }

    pub fn active(&self) -> Option<&Fruit> {
        self.active.as_ref()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn len(&self) -> usize {
        self.falling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.falling.is_empty()
    }

    pub fn get(&self, id: FruitId) -> Option<&Fruit> {
        self.falling.iter().find(|f| f.id == id)
    }

    /// Create the active fruit, centered horizontally at the spawn height
    pub fn spawn_active(&mut self, tier: usize, tiers: &TierTable) -> Result<&Fruit> {
        if let Some(active) = &self.active {
            return Err(Error::ActiveFruitExists(active.id));
        }
        let tier = tiers.check(tier)?;
        let size = tiers.size_of(tier);
        let id = self.next_entity_id();
        let pos = Vec2::new(self.bounds.x / 2.0 - size / 2.0, self.spawn_y);
        log::debug!("Spawned active fruit {} at tier {}", id, tier);
        let fruit = self.active.insert(Fruit::new(id, tier, size, pos));
        Ok(&*fruit)
    }

    /// Release the active fruit into the falling set
    pub fn drop_active(&mut self) -> Result<FruitId> {
        let mut fruit = self.active.take().ok_or(Error::NoActiveFruit)?;
        fruit.vel.y = self.drop_velocity;
        let id = fruit.id;
        self.falling.push(fruit);
        Ok(id)
    }

    /// Shift the active fruit horizontally, clamped to `[0, width - size]`.
    ///
    /// Returns false when there is no active fruit.
    pub fn move_active(&mut self, dx: f32) -> bool {
        let width = self.bounds.x;
        match self.active.as_mut() {
            Some(fruit) => {
                let max_x = (width - fruit.size).max(0.0);
                fruit.pos.x = (fruit.pos.x + dx).clamp(0.0, max_x);
                true
            }
            None => false,
        }
    }

    /// Place a fruit directly into the falling set
    pub fn insert_falling(
        &mut self,
        tier: usize,
        pos: Vec2,
        vel: Vec2,
        tiers: &TierTable,
    ) -> Result<FruitId> {
        let tier = tiers.check(tier)?;
        let id = self.next_entity_id();
        let mut fruit = Fruit::new(id, tier, tiers.size_of(tier), pos);
        fruit.vel = vel;
        self.falling.push(fruit);
        Ok(id)
    }

    /// Remove a consumed fruit from the falling set
    pub fn remove_merged(&mut self, id: FruitId) -> Result<Fruit> {
        let index = self
            .falling
            .iter()
            .position(|f| f.id == id)
            .ok_or(Error::UnknownFruit(id))?;
        Ok(self.falling.remove(index))
    }

    /// Change a falling fruit's tier, resizing it
    pub fn upgrade(&mut self, id: FruitId, new_tier: usize, tiers: &TierTable) -> Result<()> {
        let new_tier = tiers.check(new_tier)?;
        let fruit = self
            .falling
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(Error::UnknownFruit(id))?;
        fruit.tier = new_tier;
        fruit.size = tiers.size_of(new_tier);
        Ok(())
    }

    /// Topmost falling fruit whose box contains `point`
    ///
    /// Later fruit are drawn over earlier ones, so the search runs backwards.
    pub fn fruit_at(&self, point: Vec2) -> Option<FruitId> {
        self.falling
            .iter()
            .rev()
            .find(|f| f.contains(point))
            .map(|f| f.id)
    }

    /// Clear the falling set and the active fruit
    pub fn reset(&mut self) {
        self.falling.clear();
        self.active = None;
    }
}
