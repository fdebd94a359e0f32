//! Game settings and tuning
//!
//! Every simulation constant lives here so a host can tune the game from
//! JSON. Native builds read a file, web builds read LocalStorage.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{BounceFactor, TierTable};

/// When a session is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LossPolicy {
    /// A fruit crossed the floor line during this tick (before clamping)
    #[default]
    FloorPenetration,
    /// Floor penetration, or any fruit at or above the top boundary
    Strict,
}

impl LossPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossPolicy::FloorPenetration => "floor",
            LossPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for LossPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LossPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "floor" | "floor-penetration" => Ok(LossPolicy::FloorPenetration),
            "strict" => Ok(LossPolicy::Strict),
            other => Err(Error::InvalidSettings(format!(
                "unknown loss policy '{other}' (expected floor or strict)"
            ))),
        }
    }
}

/// Play mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Drop and merge
    #[default]
    Classic,
    /// Tapping a falling fruit removes it and scores
    Tap,
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub bounds_width: f32,
    pub bounds_height: f32,

    // === Tiers ===
    pub tier_count: usize,
    pub tier_base_size: f32,
    pub tier_growth: f32,
    /// Highest tier the spawner may pick (clamped to the table)
    pub spawn_max_tier: usize,

    // === Motion ===
    /// y of a freshly spawned active fruit
    pub spawn_y: f32,
    /// Downward velocity given on drop (pixels per tick)
    pub drop_velocity: f32,
    /// Horizontal step for one move input
    pub move_step: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    pub bounce: BounceFactor,

    // === Timing (milliseconds) ===
    pub tick_interval_ms: u32,
    pub ready_delay_ms: u32,
    pub respawn_delay_ms: u32,

    // === Rules ===
    pub loss_policy: LossPolicy,
    pub mode: GameMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bounds_width: BOUNDS_WIDTH,
            bounds_height: BOUNDS_HEIGHT,

            tier_count: TIER_COUNT,
            tier_base_size: TIER_BASE_SIZE,
            tier_growth: TIER_GROWTH,
            spawn_max_tier: TIER_COUNT - 1,

            spawn_y: SPAWN_Y,
            drop_velocity: DROP_VELOCITY,
            move_step: MOVE_STEP,
            gravity: 0.0,
            bounce: BounceFactor::default(),

            tick_interval_ms: TICK_INTERVAL_MS,
            ready_delay_ms: READY_DELAY_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,

            loss_policy: LossPolicy::default(),
            mode: GameMode::default(),
        }
    }
}

impl Settings {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.bounds_width > 0.0 && self.bounds_height > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "bounds must be positive, got {}x{}",
                self.bounds_width, self.bounds_height
            )));
        }
        if self.tier_count == 0 || self.tier_count > MAX_TIERS {
            return Err(Error::InvalidSettings(format!(
                "tier_count must be within 1..={MAX_TIERS}, got {}",
                self.tier_count
            )));
        }
        if !(self.tier_base_size > 0.0) || !(self.tier_growth >= 0.0) {
            return Err(Error::InvalidSettings(
                "tier_base_size must be positive and tier_growth non-negative".into(),
            ));
        }
        let largest = self.tier_table().size_of(self.tier_count - 1);
        if largest > self.bounds_width {
            return Err(Error::InvalidSettings(format!(
                "largest tier ({largest}) does not fit the playfield width ({})",
                self.bounds_width
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidSettings("tick_interval_ms must be non-zero".into()));
        }
        if !(self.bounce.min >= 0.0 && self.bounce.min <= self.bounce.max) {
            return Err(Error::InvalidSettings(format!(
                "bounce range {}..={} is empty",
                self.bounce.min, self.bounce.max
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.bounds_width, self.bounds_height)
    }

    pub fn tier_table(&self) -> TierTable {
        TierTable::from_count(self.tier_count, self.tier_base_size, self.tier_growth)
    }

    /// Whole ticks covering `ms`, rounded up
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        ms.div_ceil(self.tick_interval_ms.max(1))
    }

    pub fn ready_ticks(&self) -> u32 {
        self.ms_to_ticks(self.ready_delay_ms)
    }

    pub fn respawn_ticks(&self) -> u32 {
        self.ms_to_ticks(self.respawn_delay_ms)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_merge_settings";

    /// Settings file read by native builds when none is given
    pub const DEFAULT_PATH: &'static str = "fruit_merge_settings.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `path`. Falls back to defaults when the file is
    /// missing or invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(crate::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.ready_ticks(), 300);
        assert_eq!(settings.respawn_ticks(), 100);
        assert_eq!(settings.tier_table().len(), 11);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "tick_interval_ms": 100, "loss_policy": "Strict" }"#)
            .unwrap();
        assert_eq!(settings.tick_interval_ms, 100);
        assert_eq!(settings.loss_policy, LossPolicy::Strict);
        assert_eq!(settings.ready_ticks(), 30);
        assert_eq!(settings.bounds_width, BOUNDS_WIDTH);
    }

    #[test]
    fn test_ticks_round_up() {
        let settings = Settings {
            tick_interval_ms: 30,
            ready_delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(settings.ready_ticks(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            Settings {
                tick_interval_ms: 0,
                ..Default::default()
            },
            Settings {
                tier_count: 0,
                ..Default::default()
            },
            Settings {
                bounds_width: 100.0,
                ..Default::default()
            },
            Settings {
                bounce: BounceFactor { min: 2.0, max: 1.0 },
                ..Default::default()
            },
        ];
        for settings in &bad {
            assert!(
                matches!(settings.validate(), Err(Error::InvalidSettings(_))),
                "{settings:?}"
            );
        }
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            mode: GameMode::Tap,
            gravity: 0.1,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("STRICT".parse::<LossPolicy>().unwrap(), LossPolicy::Strict);
        let floor = LossPolicy::FloorPenetration.to_string();
        assert_eq!(floor.parse::<LossPolicy>().unwrap(), LossPolicy::FloorPenetration);
        assert!(matches!(
            "never".parse::<LossPolicy>(),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_huge_tier_count_is_rejected() {
        let result = Settings::from_json(r#"{ "tier_count": 1000000000000, "tier_growth": 0.0 }"#);
        assert!(matches!(result, Err(Error::InvalidSettings(_))));

        let at_cap = Settings {
            tier_count: MAX_TIERS,
            tier_growth: 0.0,
            ..Default::default()
        };
        at_cap.validate().unwrap();
        assert_eq!(at_cap.tier_table().len(), MAX_TIERS);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_load_and_save() {
        let dir = std::env::temp_dir().join(format!("fruit-merge-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        // Missing file falls back to defaults
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        let settings = Settings {
            loss_policy: LossPolicy::Strict,
            spawn_max_tier: 3,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path), settings);

        // Invalid file falls back to defaults too
        std::fs::write(&path, r#"{ "tier_count": 1000000000000 }"#).unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
