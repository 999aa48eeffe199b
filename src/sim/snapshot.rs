//! Read-only view of a tick's result for renderers and UI text

use glam::Vec2;
use serde::Serialize;

use super::state::{GameEvent, GamePhase, GameState, Particle, Projectile, Sweet};

/// Everything the host needs to draw a frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub projectiles: Vec<Projectile>,
    pub sweets: Vec<Sweet>,
    pub particles: Vec<Particle>,
    pub player: Vec2,
    pub aim_angle: f32,
    pub score: u64,
    pub wave: u32,
    pub lives: u8,
    pub weapon_level: u8,
    pub slow_motion_active: bool,
    /// Remaining slow motion in [0, 1]
    pub slow_motion_fraction: f32,
    pub upgrade_available: bool,
    pub upgrade_description: Option<&'static str>,
    pub game_over: bool,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        let progression = &state.progression;
        Self {
            phase: state.phase,
            tick: state.time_ticks,
            projectiles: state.entities.projectiles.clone(),
            sweets: state.entities.sweets.clone(),
            particles: state.entities.particles.clone(),
            player: state.player_position(),
            aim_angle: state.aim_angle,
            score: state.score,
            wave: state.wave.wave,
            lives: state.lives,
            weapon_level: progression.weapon_level,
            slow_motion_active: progression.slow_motion_active,
            slow_motion_fraction: progression
                .slow_motion_fraction(state.tuning.slow_motion_ticks),
            upgrade_available: progression.upgrade_available,
            upgrade_description: progression
                .pending_upgrade
                .filter(|_| progression.upgrade_available)
                .map(|kind| kind.description()),
            game_over: state.phase == GamePhase::GameOver,
            events,
        }
    }

    /// JSON for the web host
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
