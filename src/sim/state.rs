//! Game state and core simulation types
//!
//! Everything a run needs lives in one explicit `GameState` value; there is
//! no global instance, so tests can drive as many independent games as they
//! like.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::EntityStore;
use super::progression::{ProgressionState, UpgradeKind};
use super::wave::WaveDirector;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for `start`
    Ready,
    /// Active gameplay
    Playing,
    /// Ticks are ignored, pending timers keep their remaining time
    Paused,
    /// Lives ran out; frozen until restart
    GameOver,
}

/// Falling object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweetKind {
    Cookie,
    Marshmallow,
    Cake,
    /// Clears the whole screen when shot; harmless if it falls past
    Dynamite,
}

impl SweetKind {
    /// Hits needed to destroy
    pub fn max_health(self) -> u8 {
        match self {
            SweetKind::Cake => 2,
            _ => 1,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            SweetKind::Cookie | SweetKind::Marshmallow => 15.0,
            SweetKind::Cake => 20.0,
            SweetKind::Dynamite => 17.5,
        }
    }

    /// Score for destroying one
    pub fn points(self) -> u64 {
        match self {
            SweetKind::Cookie => 10,
            SweetKind::Marshmallow => 15,
            SweetKind::Cake => 30,
            SweetKind::Dynamite => DYNAMITE_BONUS,
        }
    }

    pub fn particle_color(self) -> ParticleColor {
        match self {
            SweetKind::Cookie => ParticleColor::Cookie,
            SweetKind::Marshmallow => ParticleColor::Marshmallow,
            SweetKind::Cake => ParticleColor::Cake,
            SweetKind::Dynamite => ParticleColor::Explosion,
        }
    }

    /// Whether letting it fall past the bottom costs a life
    pub fn costs_life(self) -> bool {
        self != SweetKind::Dynamite
    }
}

/// A player shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// A falling object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    pub id: u32,
    pub kind: SweetKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: u8,
    pub max_health: u8,
}

impl Sweet {
    pub fn new(id: u32, kind: SweetKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius: kind.radius(),
            health: kind.max_health(),
            max_health: kind.max_health(),
        }
    }

    /// Remaining health in [0, 1] for the renderer's health bar
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }

    /// True once a multi-hit sweet has taken damage
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }
}

/// Color tag the renderer maps to a palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Cookie,
    Marshmallow,
    Cake,
    Explosion,
    Upgrade,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    /// Ticks left before removal
    pub life: u32,
}

/// Things that happened during a tick, for sound and UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { count: usize },
    SweetHit { kind: SweetKind },
    SweetDestroyed { kind: SweetKind, points: u64 },
    DynamiteExploded { cleared: usize },
    LifeLost { lives: u8 },
    UpgradeAvailable(UpgradeKind),
    UpgradeClaimed(UpgradeKind),
    SlowMotionEnded,
    WaveStarted(u32),
    WaveCleared(u32),
    GameOver { score: u64, wave: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay balance
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Player lives
    pub lives: u8,
    /// Logical tick counter, drives every deferred effect
    pub time_ticks: u64,
    /// Player aim angle (radians, screen coordinates)
    pub aim_angle: f32,
    /// Projectiles, sweets and particles
    pub entities: EntityStore,
    /// Spawn scheduling and difficulty
    pub wave: WaveDirector,
    /// Weapon tier, upgrade gate and slow motion
    pub progression: ProgressionState,
    /// Events since the last snapshot
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed; call `start` to play
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let wave = WaveDirector::new(tuning.initial_sweet_speed);
        let progression = ProgressionState::new(tuning.upgrade_step);
        Self {
            seed,
            phase: GamePhase::Ready,
            score: 0,
            lives: MAX_LIVES,
            time_ticks: 0,
            aim_angle: -std::f32::consts::FRAC_PI_2, // Straight up
            entities: EntityStore::new(),
            wave,
            progression,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Where shots originate
    pub fn player_position(&self) -> Vec2 {
        self.tuning.player_position()
    }

    /// Clear the run and issue wave 1. Works from any phase.
    pub fn start(&mut self) {
        self.reset();
        self.phase = GamePhase::Playing;
        self.wave
            .start_wave(self.time_ticks, &self.tuning, &mut self.rng, &mut self.events);
        log::info!("Run started (seed {})", self.seed);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::info!("Resumed at tick {}", self.time_ticks);
        }
    }

    /// Flip between playing and paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Throw everything away (entities, timers, progression) and start over.
    /// The RNG keeps running so consecutive runs differ.
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Charge one life and apply the death resets. Returns true if that was
    /// the last one.
    pub fn lose_life(&mut self) -> bool {
        if self.lives == 0 {
            return true;
        }
        self.lives -= 1;
        self.progression
            .reset_on_life_lost(self.score, self.tuning.upgrade_step);
        self.events.push(GameEvent::LifeLost { lives: self.lives });
        log::info!("Life lost, {} remaining", self.lives);
        self.lives == 0
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = MAX_LIVES;
        self.time_ticks = 0;
        self.aim_angle = -std::f32::consts::FRAC_PI_2;
        self.entities.clear();
        self.wave = WaveDirector::new(self.tuning.initial_sweet_speed);
        self.progression = ProgressionState::new(self.tuning.upgrade_step);
        self.events.clear();
    }
}
