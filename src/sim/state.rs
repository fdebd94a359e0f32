//! Game state and session types
//!
//! A [`Game`] owns everything one session needs: settings, tier table,
//! entity store, score tracker, seeded RNG and the host collaborators.
//! There are no globals; a new session is a new `Game`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitId};
use super::store::EntityStore;
use super::tier::TierTable;
use crate::error::Result;
use crate::platform::{AudioController, MemoryScoreStore, NullAudio, ScoreStore};
use crate::renderer::{NullRenderer, Renderer};
use crate::score::ScoreTracker;
use crate::settings::Settings;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting out the start delay; nothing is simulated
    Ready,
    /// Ticking
    Playing,
    /// Terminal; ticks and input are ignored
    GameOver,
}

/// Host-side collaborators a game talks to
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioController>,
    pub scores: Box<dyn ScoreStore>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            renderer: Box::new(NullRenderer),
            audio: Box::new(NullAudio),
            scores: Box::new(MemoryScoreStore::default()),
        }
    }
}

impl Collaborators {
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioController + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_scores(mut self, scores: impl ScoreStore + 'static) -> Self {
        self.scores = Box::new(scores);
        self
    }
}

/// Phase, score and timers of one session
#[derive(Debug)]
pub struct GameSession {
    pub phase: GamePhase,
    pub score: ScoreTracker,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Playing ticks simulated so far
    pub time_ticks: u64,
    /// Ticks left before Ready turns into Playing
    pub(crate) ready_ticks_left: u32,
    /// Ticks until the next active fruit appears (None when one is present)
    pub(crate) respawn_ticks_left: Option<u32>,
}

/// Serializable view of a game, for hosts and replays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub time_ticks: u64,
    pub falling: Vec<Fruit>,
    pub active: Option<Fruit>,
}

/// One game session
pub struct Game {
    pub(crate) settings: Settings,
    pub(crate) tiers: TierTable,
    pub(crate) store: EntityStore,
    pub(crate) session: GameSession,
    pub(crate) rng: Pcg32,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) audio: Box<dyn AudioController>,
    /// Fruit that crossed the floor during the last tick
    pub(crate) floor_contacts: Vec<FruitId>,
}

impl Game {
    /// Create a session in the Ready phase
    pub fn new(settings: Settings, seed: u64, io: Collaborators) -> Result<Self> {
        settings.validate()?;
        let tiers = settings.tier_table();
        let store = EntityStore::new(settings.bounds(), settings.spawn_y, settings.drop_velocity);
        let session = GameSession {
            phase: GamePhase::Ready,
            score: ScoreTracker::new(io.scores),
            seed,
            time_ticks: 0,
            ready_ticks_left: settings.ready_ticks(),
            respawn_ticks_left: None,
        };
        log::info!(
            "New session (seed {}, {} tiers, {:?} mode, {:?} loss)",
            seed,
            tiers.len(),
            settings.mode,
            settings.loss_policy
        );

        Ok(Self {
            settings,
            tiers,
            store,
            session,
            rng: Pcg32::seed_from_u64(seed),
            renderer: io.renderer,
            audio: io.audio,
            floor_contacts: Vec::new(),
        })
    }

    /// Tear the session down, returning the collaborators for the next one
    pub fn into_collaborators(self) -> Collaborators {
        Collaborators {
            renderer: self.renderer,
            audio: self.audio,
            scores: self.session.score.into_store(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn is_running(&self) -> bool {
        self.session.phase != GamePhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.session.score.score()
    }

    pub fn best_score(&self) -> u32 {
        self.session.score.best()
    }

    pub fn seed(&self) -> u64 {
        self.session.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.session.time_ticks
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn falling(&self) -> &[Fruit] {
        self.store.falling()
    }

    pub fn active(&self) -> Option<&Fruit> {
        self.store.active()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.session.phase,
            score: self.score(),
            best_score: self.best_score(),
            time_ticks: self.session.time_ticks,
            falling: self.store.falling().to_vec(),
            active: self.store.active().cloned(),
        }
    }
}
