//! Sweet Shooter - A single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, progression)
//! - `audio`: Procedural envelope synthesis and fire-and-forget playback
//! - `game`: Host-facing facade (lifecycle, input, snapshots)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod game;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Starting (and maximum) lives
    pub const MAX_LIVES: u8 = 3;

    /// Highest weapon tier
    pub const MAX_WEAPON_LEVEL: u8 = 3;

    /// Speed multiplier applied to falling sweets while slow motion is active
    pub const SLOW_MOTION_SCALE: f32 = 0.3;

    /// Sweets are removed once they fall this far below the viewport
    pub const FALL_MARGIN: f32 = 50.0;

    /// Height above the viewport at which sweets appear
    pub const SPAWN_HEIGHT: f32 = -50.0;

    /// Score awarded for hitting dynamite
    pub const DYNAMITE_BONUS: u64 = 100;

    /// Hard cap on regular sweets issued per wave
    pub const MAX_SWEETS_PER_WAVE: u32 = 10;
}

/// Convert a tick count to seconds
#[inline]
pub fn ticks_to_secs(ticks: u32) -> f32 {
    ticks as f32 / consts::TICKS_PER_SECOND as f32
}

/// Convert seconds to the nearest whole tick count (negative clamps to zero)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs.max(0.0) * consts::TICKS_PER_SECOND as f32).round() as u32
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
