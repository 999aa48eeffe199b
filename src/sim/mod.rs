//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entities;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, HitOutcome, circles_overlap, resolve_collisions};
pub use entities::{EntityStore, Escapes, ParticleBurst};
pub use progression::{FanOut, ProgressionState, UpgradeKind, fan_out, shot_pattern};
pub use snapshot::Snapshot;
pub use state::{
    GameEvent, GamePhase, GameState, Particle, ParticleColor, Projectile, Sweet, SweetKind,
};
pub use tick::{TickInput, aim, claim_upgrade, fire, tick};
pub use wave::{WaveDirector, WavePhase};
