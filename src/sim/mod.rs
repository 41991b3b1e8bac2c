//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied time only
//! - Seeded RNG only
//! - Stable iteration order (store insertion order)
//! - No rendering, audio or storage backends, only their traits

pub mod clock;
pub mod collision;
pub mod context;
pub mod entity;
pub mod handlers;
pub mod score;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use clock::FixedStep;
pub use collision::{
    CollisionDetector, CollisionEvent, CollisionHandler, RelationKind, aabb_overlap,
};
pub use context::SimContext;
pub use entity::{Arena, BulletOwner, EnemyKind, Entity, EntityKind, EntityType, PowerUpKind};
pub use score::{ScoreState, ScoreTracker};
pub use spawn::{SpawnScheduler, SpawnState};
pub use state::{Game, Phase};
pub use store::{EntityHandle, EntityStore};
pub use tick::TickTime;
