//! Collision detection and merge/bounce resolution
//!
//! Two fruit collide when the distance between their top-left anchors is
//! less than the mean of their sizes. This is an anchor-distance heuristic,
//! not a box or circle overlap test, and is kept that way on purpose: it
//! defines how the game feels.
//!
//! Pairs are visited in ascending `(i, j)` order. Consumed fruit are
//! tombstoned during the scan and removed from the store afterwards, so
//! removal never shifts indices under the scan.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitId};
use super::store::EntityStore;
use super::tier::TierTable;
use crate::consts::{BOUNCE_FACTOR_MAX, BOUNCE_FACTOR_MIN};
use crate::error::Result;

/// Outcome of a colliding pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Same tier: `consumed` was removed and `survivor` moved to `tier`
    Merged {
        survivor: FruitId,
        consumed: FruitId,
        tier: usize,
    },
    /// Different tiers: horizontal velocities were exchanged
    Bounced { a: FruitId, b: FruitId },
}

/// Random scale applied to each fruit's horizontal velocity after a bounce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceFactor {
    pub min: f32,
    pub max: f32,
}

impl Default for BounceFactor {
    fn default() -> Self {
        Self {
            min: BOUNCE_FACTOR_MIN,
            max: BOUNCE_FACTOR_MAX,
        }
    }
}

impl BounceFactor {
    /// No random scaling (plain velocity swap)
    pub const UNIT: Self = Self { min: 1.0, max: 1.0 };

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }
}

/// Anchor-distance collision test
#[inline]
pub fn is_colliding(a: &Fruit, b: &Fruit) -> bool {
    a.pos.distance(b.pos) < (a.size + b.size) / 2.0
}

/// Exchange horizontal velocities, each scaled by its own random factor
pub fn bounce_off<R: Rng>(a: &mut Fruit, b: &mut Fruit, factor: BounceFactor, rng: &mut R) {
    std::mem::swap(&mut a.vel.x, &mut b.vel.x);
    a.vel.x *= factor.sample(rng);
    b.vel.x *= factor.sample(rng);
}

/// Mutable references to two distinct slice elements, `i < j`
fn pair_mut(fruits: &mut [Fruit], i: usize, j: usize) -> (&mut Fruit, &mut Fruit) {
    debug_assert!(i < j);
    let (head, tail) = fruits.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Resolve every colliding pair in the falling set for one tick.
///
/// For each `i`, the scan over `j > i` stops at the first merge since `i` is
/// gone. A fruit that was upgraded this pass sits out the rest of the pass,
/// so chain merges happen on later ticks.
pub fn resolve_collisions<R: Rng>(
    store: &mut EntityStore,
    tiers: &TierTable,
    bounce: BounceFactor,
    rng: &mut R,
) -> Result<Vec<CollisionEvent>> {
    let fruits = store.falling_mut();
    let n = fruits.len();
    let mut settled = vec![false; n];
    let mut events = Vec::new();

    for i in 0..n {
        if settled[i] {
            continue;
        }
        for j in (i + 1)..n {
            if settled[j] {
                continue;
            }
            let (a, b) = pair_mut(fruits, i, j);
            if !is_colliding(a, b) {
                continue;
            }

            if a.tier == b.tier {
                let tier = tiers.merge_result(a.tier);
                events.push(CollisionEvent::Merged {
                    survivor: b.id,
                    consumed: a.id,
                    tier,
                });
                settled[i] = true;
                settled[j] = true;
                break;
            }

            bounce_off(a, b, bounce, rng);
            events.push(CollisionEvent::Bounced { a: a.id, b: b.id });
        }
    }

    // Compact: apply merges through the store now that the scan is done
    for event in &events {
        if let CollisionEvent::Merged {
            survivor,
            consumed,
            tier,
        } = *event
        {
            store.upgrade(survivor, tier, tiers)?;
            store.remove_merged(consumed)?;
            log::debug!("Merged fruit {} into {} (tier {})", consumed, survivor, tier);
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn store() -> EntityStore {
        EntityStore::new(Vec2::new(400.0, 600.0), 60.0, 2.0)
    }

    fn merges(events: &[CollisionEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, CollisionEvent::Merged { .. }))
            .count()
    }

    #[test]
    fn test_collision_predicate_uses_anchor_distance() {
        let a = Fruit::new(1, 0, 60.0, Vec2::new(0.0, 0.0));
        let near = Fruit::new(2, 0, 60.0, Vec2::new(59.9, 0.0));
        let touching = Fruit::new(3, 0, 60.0, Vec2::new(60.0, 0.0));
        assert!(is_colliding(&a, &near));
        // Strictly less than: exactly one mean size apart is not a hit
        assert!(!is_colliding(&a, &touching));
        // Diagonal: boxes overlap but anchors are 70.7 apart
        let diagonal = Fruit::new(4, 0, 60.0, Vec2::new(50.0, 50.0));
        assert!(!is_colliding(&a, &diagonal));
    }

    #[test]
    fn test_same_tier_merges_into_next() {
        let tiers = TierTable::classic();
        let mut store = store();
        let mut rng = Pcg32::seed_from_u64(1);
        let a = store
            .insert_falling(0, Vec2::new(100.0, 100.0), Vec2::ZERO, &tiers)
            .unwrap();
        let b = store
            .insert_falling(0, Vec2::new(100.0, 100.0), Vec2::ZERO, &tiers)
            .unwrap();

        let events = resolve_collisions(&mut store, &tiers, BounceFactor::default(), &mut rng)
            .unwrap();
        assert_eq!(
            events,
            vec![CollisionEvent::Merged {
                survivor: b,
                consumed: a,
                tier: 1
            }]
        );
        assert_eq!(store.len(), 1);
        let survivor = &store.falling()[0];
        assert_eq!(survivor.id, b);
        assert_eq!(survivor.tier, 1);
        assert!((survivor.size - tiers.size_of(1)).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_merge_resets_to_zero() {
        let tiers = TierTable::classic();
        let mut store = store();
        let mut rng = Pcg32::seed_from_u64(1);
        store
            .insert_falling(10, Vec2::new(0.0, 0.0), Vec2::ZERO, &tiers)
            .unwrap();
        store
            .insert_falling(10, Vec2::new(10.0, 0.0), Vec2::ZERO, &tiers)
            .unwrap();

        let events = resolve_collisions(&mut store, &tiers, BounceFactor::default(), &mut rng)
            .unwrap();
        assert_eq!(merges(&events), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.falling()[0].tier, 0);
        assert!((store.falling()[0].size - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_different_tiers_swap_velocity() {
        let tiers = TierTable::classic();
        let mut store = store();
        let mut rng = Pcg32::seed_from_u64(1);
        store
            .insert_falling(0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0), &tiers)
            .unwrap();
        store
            .insert_falling(1, Vec2::new(5.0, 0.0), Vec2::new(-3.0, 0.0), &tiers)
            .unwrap();

        let events =
            resolve_collisions(&mut store, &tiers, BounceFactor::UNIT, &mut rng).unwrap();
        assert!(matches!(events[..], [CollisionEvent::Bounced { .. }]));
        assert_eq!(store.len(), 2);
        assert_eq!(store.falling()[0].vel, Vec2::new(-3.0, 2.0));
        assert_eq!(store.falling()[1].vel, Vec2::new(1.0, 0.0));
        assert_eq!(store.falling()[0].tier, 0);
        assert_eq!(store.falling()[1].tier, 1);
    }

    #[test]
    fn test_bounce_factor_in_range() {
        let tiers = TierTable::classic();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let mut store = store();
            store
                .insert_falling(0, Vec2::ZERO, Vec2::new(1.0, 0.0), &tiers)
                .unwrap();
            store
                .insert_falling(2, Vec2::ZERO, Vec2::new(1.0, 0.0), &tiers)
                .unwrap();
            resolve_collisions(&mut store, &tiers, BounceFactor::default(), &mut rng).unwrap();
            for fruit in store.falling() {
                assert!((0.5..=2.0).contains(&fruit.vel.x), "vx {}", fruit.vel.x);
            }
        }
    }

    #[test]
    fn test_chain_merge_waits_for_next_pass() {
        // tier0, tier0, tier1 stacked on one spot
        let tiers = TierTable::classic();
        let mut store = store();
        let mut rng = Pcg32::seed_from_u64(3);
        for tier in [0, 0, 1] {
            store
                .insert_falling(tier, Vec2::new(50.0, 50.0), Vec2::ZERO, &tiers)
                .unwrap();
        }

        let events =
            resolve_collisions(&mut store, &tiers, BounceFactor::UNIT, &mut rng).unwrap();
        assert_eq!(merges(&events), 1);
        assert_eq!(store.len(), 2);
        assert!(store.falling().iter().all(|f| f.tier == 1));

        let events =
            resolve_collisions(&mut store, &tiers, BounceFactor::UNIT, &mut rng).unwrap();
        assert_eq!(merges(&events), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.falling()[0].tier, 2);
    }

    #[test]
    fn test_pair_order_is_ascending() {
        // Four tier-0 fruit at one point: (0,1) and (2,3) merge, in that order
        let tiers = TierTable::classic();
        let mut store = store();
        let mut rng = Pcg32::seed_from_u64(3);
        let ids: Vec<_> = (0..4)
            .map(|_| {
                store
                    .insert_falling(0, Vec2::new(50.0, 50.0), Vec2::ZERO, &tiers)
                    .unwrap()
            })
            .collect();

        let events =
            resolve_collisions(&mut store, &tiers, BounceFactor::UNIT, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![
                CollisionEvent::Merged {
                    survivor: ids[1],
                    consumed: ids[0],
                    tier: 1
                },
                CollisionEvent::Merged {
                    survivor: ids[3],
                    consumed: ids[2],
                    tier: 1
                },
            ]
        );
        let remaining: Vec<_> = store.falling().iter().map(|f| f.id).collect();
        assert_eq!(remaining, vec![ids[1], ids[3]]);
    }

    proptest! {
        #[test]
        fn prop_tiers_stay_in_range_and_count_is_conserved(
            seed in any::<u64>(),
            placements in prop::collection::vec((0usize..11, 0.0f32..300.0, 0.0f32..300.0), 0..15),
        ) {
            let tiers = TierTable::classic();
            let mut store = store();
            let mut rng = Pcg32::seed_from_u64(seed);
            for (tier, x, y) in &placements {
                store.insert_falling(*tier, Vec2::new(*x, *y), Vec2::ZERO, &tiers).unwrap();
            }
            let before = store.len();
            let events = resolve_collisions(&mut store, &tiers, BounceFactor::default(), &mut rng).unwrap();
            prop_assert_eq!(store.len(), before - merges(&events));
            for fruit in store.falling() {
                prop_assert!(fruit.tier < tiers.len());
            }
        }
    }
}
