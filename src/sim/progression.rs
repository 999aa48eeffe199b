//! Score-gated upgrades, weapon tiers and the slow-motion buff

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_WEAPON_LEVEL, SLOW_MOTION_SCALE};
use crate::direction;

/// What the next claim will grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// One more weapon tier
    WeaponTier,
    /// Sweets fall at reduced speed for a while
    SlowMotion,
}

impl UpgradeKind {
    /// Button label for the UI
    pub fn description(self) -> &'static str {
        match self {
            UpgradeKind::WeaponTier => "Weapon upgrade: more barrels",
            UpgradeKind::SlowMotion => "Slow motion: sweets fall slower",
        }
    }
}

/// Shot pattern for a weapon tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanOut {
    pub count: usize,
    /// Angle between neighbouring shots (radians)
    pub spacing: f32,
    /// Sideways distance between neighbouring muzzles (pixels)
    pub lateral: f32,
}

/// Fan-out table, indexed by weapon level (clamped)
pub fn fan_out(level: u8) -> FanOut {
    match level.min(MAX_WEAPON_LEVEL) {
        0 => FanOut {
            count: 1,
            spacing: 0.0,
            lateral: 0.0,
        },
        1 => FanOut {
            count: 2,
            spacing: 0.08,
            lateral: 6.0,
        },
        2 => FanOut {
            count: 3,
            spacing: 0.12,
            lateral: 6.0,
        },
        _ => FanOut {
            count: 5,
            spacing: 0.18,
            lateral: 8.0,
        },
    }
}

/// Muzzle positions and headings for one trigger pull, centred on `angle`
pub fn shot_pattern(origin: Vec2, angle: f32, level: u8) -> Vec<(Vec2, f32)> {
    let fan = fan_out(level);
    let centre = (fan.count as f32 - 1.0) / 2.0;
    let side = Vec2::new(-angle.sin(), angle.cos());
    (0..fan.count)
        .map(|i| {
            let k = i as f32 - centre;
            (origin + side * k * fan.lateral, angle + k * fan.spacing)
        })
        .collect()
}

/// Velocities for a trigger pull at `speed`
pub fn shot_velocities(origin: Vec2, angle: f32, level: u8, speed: f32) -> Vec<(Vec2, Vec2)> {
    shot_pattern(origin, angle, level)
        .into_iter()
        .map(|(pos, heading)| (pos, direction(heading) * speed))
        .collect()
}

/// Weapon tier, upgrade gate and slow-motion timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub weapon_level: u8,
    pub next_upgrade_score: u64,
    pub upgrade_available: bool,
    /// Decided when the gate opens, applied on claim
    pub pending_upgrade: Option<UpgradeKind>,
    pub slow_motion_active: bool,
    pub slow_motion_remaining: u32,
}

impl ProgressionState {
    pub fn new(upgrade_step: u64) -> Self {
        Self {
            weapon_level: 0,
            next_upgrade_score: upgrade_step,
            upgrade_available: false,
            pending_upgrade: None,
            slow_motion_active: false,
            slow_motion_remaining: 0,
        }
    }

    /// Speed multiplier for falling sweets
    pub fn sweet_speed_scale(&self) -> f32 {
        if self.slow_motion_active {
            SLOW_MOTION_SCALE
        } else {
            1.0
        }
    }

    /// Open the gate if `score` reached the threshold. Returns the upgrade
    /// that just became available.
    pub fn check_threshold(
        &mut self,
        score: u64,
        slow_motion_chance: f64,
        rng: &mut impl Rng,
    ) -> Option<UpgradeKind> {
        if self.upgrade_available || score < self.next_upgrade_score {
            return None;
        }
        let roll = rng.random::<f64>();
        let kind = if roll < slow_motion_chance || self.weapon_level >= MAX_WEAPON_LEVEL {
            UpgradeKind::SlowMotion
        } else {
            UpgradeKind::WeaponTier
        };
        self.upgrade_available = true;
        self.pending_upgrade = Some(kind);
        log::info!("Upgrade available at {}: {:?}", score, kind);
        Some(kind)
    }

    /// Apply the pending upgrade, if any
    pub fn claim(&mut self, upgrade_step: u64, slow_motion_ticks: u32) -> Option<UpgradeKind> {
        if !self.upgrade_available {
            return None;
        }
        let kind = self.pending_upgrade.take()?;
        match kind {
            UpgradeKind::WeaponTier => {
                self.weapon_level = (self.weapon_level + 1).min(MAX_WEAPON_LEVEL);
            }
            UpgradeKind::SlowMotion => {
                self.slow_motion_active = true;
                self.slow_motion_remaining = slow_motion_ticks;
            }
        }
        self.next_upgrade_score += upgrade_step;
        self.upgrade_available = false;
        Some(kind)
    }

    /// Death resets: weapon back to tier 0, threshold moved to the next
    /// multiple of the step above `score`, gate closed, slow motion cancelled
    pub fn reset_on_life_lost(&mut self, score: u64, upgrade_step: u64) {
        let step = upgrade_step.max(1);
        self.weapon_level = 0;
        self.next_upgrade_score = (score / step + 1) * step;
        self.upgrade_available = false;
        self.pending_upgrade = None;
        self.slow_motion_active = false;
        self.slow_motion_remaining = 0;
    }

    /// Count down slow motion. Returns true on the tick it runs out.
    pub fn tick_slow_motion(&mut self) -> bool {
        if !self.slow_motion_active {
            return false;
        }
        self.slow_motion_remaining = self.slow_motion_remaining.saturating_sub(1);
        if self.slow_motion_remaining == 0 {
            self.slow_motion_active = false;
            return true;
        }
        false
    }

    /// Remaining slow motion in [0, 1]
    pub fn slow_motion_fraction(&self, total_ticks: u32) -> f32 {
        if !self.slow_motion_active || total_ticks == 0 {
            0.0
        } else {
            (self.slow_motion_remaining as f32 / total_ticks as f32).min(1.0)
        }
    }
}
