//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here.
//! `Tuning::default()` is the shipped balance; a JSON override can be loaded
//! with [`Tuning::from_json`], which validates before returning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a balance file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("viewport must have positive size, got {width}x{height}")]
    Viewport { width: f32, height: f32 },
    #[error("{field} must be non-zero")]
    Zero { field: &'static str },
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Distance of the player above the bottom edge
    pub player_offset: f32,

    /// Projectile speed (pixels per tick)
    pub projectile_speed: f32,
    /// Projectile collision radius
    pub projectile_radius: f32,

    /// Regular sweets in wave 1
    pub base_sweets_per_wave: u32,
    /// Ticks between consecutive sweet spawns
    pub spawn_interval_ticks: u32,
    /// Starting fall speed (pixels per tick)
    pub initial_sweet_speed: f32,
    /// Fall speed added each time a wave is cleared
    pub sweet_speed_step: f32,
    /// Extra per-sweet fall speed per wave number
    pub sweet_speed_per_wave: f32,

    /// Inter-wave delay before wave 2 (seconds)
    pub wave_delay_secs: f32,
    /// Delay shaved off per cleared wave (seconds)
    pub wave_delay_step_secs: f32,
    /// Inter-wave delay never drops below this (seconds)
    pub min_wave_delay_secs: f32,

    /// Score distance between upgrade thresholds
    pub upgrade_step: u64,
    /// Chance a freshly unlocked upgrade is slow motion
    pub slow_motion_chance: f64,
    /// Slow motion duration in ticks
    pub slow_motion_ticks: u32,

    /// Particle cap (oldest are evicted first)
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_offset: 100.0,

            projectile_speed: 8.0,
            projectile_radius: 4.0,

            base_sweets_per_wave: 5,
            spawn_interval_ticks: 60,
            initial_sweet_speed: 1.0,
            sweet_speed_step: 0.3,
            sweet_speed_per_wave: 0.1,

            wave_delay_secs: 4.0,
            wave_delay_step_secs: 0.25,
            min_wave_delay_secs: 2.0,

            upgrade_step: 150,
            slow_motion_chance: 0.4,
            slow_motion_ticks: 600,

            max_particles: 512,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance file. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject balance values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !positive {
            return Err(TuningError::Viewport {
                width: self.width,
                height: self.height,
            });
        }
        if self.base_sweets_per_wave == 0 {
            return Err(TuningError::Zero {
                field: "base_sweets_per_wave",
            });
        }
        if self.spawn_interval_ticks == 0 {
            return Err(TuningError::Zero {
                field: "spawn_interval_ticks",
            });
        }
        if self.upgrade_step == 0 {
            return Err(TuningError::Zero {
                field: "upgrade_step",
            });
        }
        for (field, value) in [
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("min_wave_delay_secs", self.min_wave_delay_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    /// Where projectiles are fired from
    pub fn player_position(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height - self.player_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "width": 1024.0, "upgrade_step": 200 }"#).unwrap();
        assert_eq!(tuning.width, 1024.0);
        assert_eq!(tuning.upgrade_step, 200);
        assert_eq!(tuning.height, 600.0);
        assert_eq!(tuning.slow_motion_ticks, 600);
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = Tuning::from_json(r#"{ "height": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Viewport { .. }));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Tuning::from_json(r#"{ "spawn_interval_ticks": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Zero {
                field: "spawn_interval_ticks"
            }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
