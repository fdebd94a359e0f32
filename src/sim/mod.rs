//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Ticks are driven from outside, never by a timer in here
//! - Seeded RNG only
//! - Stable iteration order (falling set insertion order)
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod collision;
pub mod driver;
pub mod fruit;
pub mod physics;
pub mod state;
pub mod store;
pub mod tick;
pub mod tier;

pub use collision::{BounceFactor, CollisionEvent, is_colliding, resolve_collisions};
pub use driver::FixedStepDriver;
pub use fruit::{Fruit, FruitId};
pub use physics::{IntegrationReport, integrate};
pub use state::{Collaborators, Game, GamePhase, GameSession, Snapshot};
pub use store::EntityStore;
pub use tier::{CLASSIC_KEYS, Tier, TierTable};
