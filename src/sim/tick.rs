//! Fixed-interval simulation tick
//!
//! `integrate → resolve collisions → check loss` runs as one step inside
//! [`Game::tick`]. Input is applied between ticks through
//! [`Game::handle_input`]. Both take `&mut self`, so they can never overlap.

use glam::Vec2;
use rand::Rng;

use super::collision::{CollisionEvent, resolve_collisions};
use super::fruit::FruitId;
use super::physics::integrate;
use super::state::{Game, GamePhase};
use crate::error::{Error, Result};
use crate::platform::InputEvent;
use crate::settings::{GameMode, LossPolicy};

impl Game {
    /// Advance the session by one tick and return the resulting phase.
    ///
    /// Ready counts down its start delay and Playing simulates. Both render
    /// once per tick. GameOver is frozen: no simulation and no render.
    pub fn tick(&mut self) -> GamePhase {
        match self.session.phase {
            GamePhase::GameOver => return GamePhase::GameOver,
            GamePhase::Ready => {
                if self.session.ready_ticks_left <= 1 {
                    // start() renders the first frame
                    self.start();
                } else {
                    self.session.ready_ticks_left -= 1;
                    self.render();
                }
                return self.session.phase;
            }
            GamePhase::Playing => {}
        }

        self.session.time_ticks += 1;

        // Next active fruit after a drop
        if let Some(left) = self.session.respawn_ticks_left {
            if left <= 1 {
                self.session.respawn_ticks_left = None;
                self.spawn_next();
            } else {
                self.session.respawn_ticks_left = Some(left - 1);
            }
        }

        let report = integrate(
            self.store.falling_mut(),
            self.settings.bounds(),
            self.settings.gravity,
        );
        self.floor_contacts = report.floor_contacts;

        match resolve_collisions(
            &mut self.store,
            &self.tiers,
            self.settings.bounce,
            &mut self.rng,
        ) {
            Ok(events) => {
                for event in &events {
                    if matches!(event, CollisionEvent::Merged { .. })
                        && self.session.score.record_merge()
                    {
                        log::debug!("New best score: {}", self.session.score.best());
                    }
                }
            }
            Err(e) => self.invariant_violation(e),
        }

        if self.check_loss() {
            self.enter_game_over();
        }

        log::trace!(
            "tick {}: {} falling, score {}",
            self.session.time_ticks,
            self.store.len(),
            self.score()
        );
        self.render();
        self.session.phase
    }

    /// Leave Ready immediately. Returns false outside Ready.
    pub fn start(&mut self) -> bool {
        if self.session.phase != GamePhase::Ready {
            return false;
        }
        self.session.phase = GamePhase::Playing;
        self.session.ready_ticks_left = 0;
        self.session.score.reset();
        self.store.reset();
        self.floor_contacts.clear();
        self.spawn_next();
        self.audio.play();
        log::info!("Playing (best score {})", self.best_score());
        self.render();
        true
    }

    /// Whether the loss condition holds for the current state.
    ///
    /// Pure: calling it again without a tick gives the same answer.
    pub fn check_loss(&self) -> bool {
        let penetrated = self
            .floor_contacts
            .iter()
            .any(|id| self.store.get(*id).is_some());
        match self.settings.loss_policy {
            LossPolicy::FloorPenetration => penetrated,
            LossPolicy::Strict => {
                penetrated || self.store.falling().iter().any(|f| f.pos.y <= 0.0)
            }
        }
    }

    /// Apply one input event. Returns true when it changed the game.
    ///
    /// Input outside Playing is ignored; movement is clamped, never rejected.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.session.phase != GamePhase::Playing {
            return false;
        }

        let changed = match event {
            InputEvent::MoveLeft(step) => self.store.move_active(-step.abs()),
            InputEvent::MoveRight(step) => self.store.move_active(step.abs()),
            InputEvent::Drop => self.drop_active(),
            InputEvent::TapAt(point) => self.tap_at(point),
        };
        if changed {
            self.render();
        }
        changed
    }

    /// Move left by the configured step
    pub fn move_left(&mut self) -> bool {
        self.handle_input(InputEvent::MoveLeft(self.settings.move_step))
    }

    /// Move right by the configured step
    pub fn move_right(&mut self) -> bool {
        self.handle_input(InputEvent::MoveRight(self.settings.move_step))
    }

    /// Place a fruit straight into the falling set (scenario setup, replays)
    pub fn insert_fruit(&mut self, tier: usize, pos: Vec2, vel: Vec2) -> Result<FruitId> {
        self.store.insert_falling(tier, pos, vel, &self.tiers)
    }

    fn drop_active(&mut self) -> bool {
        if !self.store.has_active() {
            return false;
        }
        match self.store.drop_active() {
            Ok(id) => {
                log::debug!("Dropped fruit {}", id);
                self.session.respawn_ticks_left = Some(self.settings.respawn_ticks());
                true
            }
            Err(e) => {
                self.invariant_violation(e);
                false
            }
        }
    }

    fn tap_at(&mut self, point: Vec2) -> bool {
        if self.settings.mode != GameMode::Tap {
            return false;
        }
        let Some(id) = self.store.fruit_at(point) else {
            return false;
        };
        match self.store.remove_merged(id) {
            Ok(fruit) => {
                log::debug!("Tapped away fruit {} (tier {})", fruit.id, fruit.tier);
                self.session.score.record_merge();
                true
            }
            Err(e) => {
                self.invariant_violation(e);
                false
            }
        }
    }

    /// Spawn the next active fruit with a random tier
    fn spawn_next(&mut self) {
        let max_tier = self.settings.spawn_max_tier.min(self.tiers.terminal());
        let tier = self.rng.random_range(0..=max_tier);
        if let Err(e) = self.store.spawn_active(tier, &self.tiers) {
            self.invariant_violation(e);
        }
    }

    fn enter_game_over(&mut self) {
        self.session.phase = GamePhase::GameOver;
        self.session.respawn_ticks_left = None;
        self.audio.pause();
        log::info!(
            "Game over after {} ticks: score {} (best {})",
            self.session.time_ticks,
            self.score(),
            self.best_score()
        );
    }

    fn render(&mut self) {
        self.renderer.render(self.store.falling(), self.store.active());
    }

    /// Internal invariant broken: fatal in debug builds, logged in release
    fn invariant_violation(&self, err: Error) {
        log::error!("Simulation invariant violated: {}", err);
        if cfg!(debug_assertions) {
            panic!("simulation invariant violated: {err}");
        }
    }
}
