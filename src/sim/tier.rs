//! Fruit tier progression
//!
//! An ordered, immutable table of tiers. Index 0 is the smallest fruit and the
//! last index is the terminal tier: merging two terminal fruit wraps back to 0.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TIERS, TIER_BASE_SIZE, TIER_GROWTH};
use crate::error::{Error, Result};

/// Visual keys of the classic 11-tier progression (smallest first)
pub const CLASSIC_KEYS: [&str; 11] = [
    "cherry",
    "strawberry",
    "grape",
    "pomelo",
    "persimmon",
    "apple",
    "pear",
    "peach",
    "pineapple",
    "melon",
    "watermelon",
];

/// One rung of the progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub index: usize,
    /// Asset lookup key for the renderer (never used by the simulation)
    pub visual_key: String,
    /// `1 + index * growth`
    pub size_multiplier: f32,
}

/// Ordered tier table with size-derived geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    tiers: Vec<Tier>,
    base_size: f32,
    growth: f32,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl TierTable {
    /// The 11-tier cherry → watermelon progression with default geometry
    pub fn classic() -> Self {
        Self::from_count(CLASSIC_KEYS.len(), TIER_BASE_SIZE, TIER_GROWTH)
    }

    /// Five-tier variant (cherry → persimmon)
    pub fn short() -> Self {
        Self::from_count(5, TIER_BASE_SIZE, TIER_GROWTH)
    }

    /// Table of `count` tiers. Classic names are used while they last,
    /// `tier-N` afterwards. Count is clamped to `1..=MAX_TIERS` and geometry
    /// to sane values.
    pub fn from_count(count: usize, base_size: f32, growth: f32) -> Self {
        let keys: Vec<String> = (0..count.clamp(1, MAX_TIERS))
            .map(|i| {
                CLASSIC_KEYS
                    .get(i)
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| format!("tier-{i}"))
            })
            .collect();
        let tiers = keys
            .iter()
            .enumerate()
            .map(|(index, key)| Tier {
                index,
                visual_key: key.clone(),
                size_multiplier: 1.0 + index as f32 * growth.max(0.0),
            })
            .collect();
        Self {
            tiers,
            base_size: base_size.max(1.0),
            growth: growth.max(0.0),
        }
    }

    /// Number of tiers (N)
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    /// Index of the terminal tier (N - 1)
    pub fn terminal(&self) -> usize {
        self.tiers.len() - 1
    }

    /// Box side length for a tier. Out-of-range indices use the terminal size.
    #[inline]
    pub fn size_of(&self, index: usize) -> f32 {
        let index = index.min(self.terminal());
        self.base_size * self.tiers[index].size_multiplier
    }

    /// Next tier, saturating at the terminal tier
    #[inline]
    pub fn next(&self, index: usize) -> usize {
        (index + 1).min(self.terminal())
    }

    #[inline]
    pub fn is_terminal(&self, index: usize) -> bool {
        index >= self.terminal()
    }

    /// Tier produced by merging two fruit of `index`
    ///
    /// Terminal pairs reset to tier 0.
    pub fn merge_result(&self, index: usize) -> usize {
        if self.is_terminal(index) {
            0
        } else {
            self.next(index)
        }
    }

    /// Validate a tier index against the table
    pub fn check(&self, index: usize) -> Result<usize> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(Error::InvalidTier {
                index,
                len: self.len(),
            })
        }
    }
}
