//! Wave scheduling and difficulty
//!
//! All deferred work (individual spawns, the end of a spawn window, the
//! break between waves) goes through one logical-tick timer queue. The queue
//! only moves when the simulation ticks, so pausing freezes every pending
//! spawn with its remaining time intact.

use glam::Vec2;
use rand::Rng;

use super::entities::EntityStore;
use super::state::{GameEvent, SweetKind};
use crate::consts::{MAX_SWEETS_PER_WAVE, SPAWN_HEIGHT};
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Where the director is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave issued yet
    Idle,
    /// Spawn window still open
    Spawning,
    /// Everything spawned, waiting for the screen to empty
    AwaitingClear,
    /// Wave cleared, next one is scheduled
    InterWaveDelay,
}

/// Deferred wave actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTimer {
    SpawnSweet,
    SpawnDynamite,
    EndSpawning,
    StartWave,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: u64,
    seq: u64,
    action: WaveTimer,
}

/// Timers keyed by absolute logical tick; ties fire in scheduling order
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<PendingTimer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, due: u64, action: WaveTimer) {
        self.entries.push(PendingTimer {
            due,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Remove and return every action due at or before `now`, oldest first
    pub fn drain_due(&mut self, now: u64) -> Vec<WaveTimer> {
        let mut due: Vec<PendingTimer> = Vec::new();
        self.entries.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Ticks until the next `action` fires, if one is pending
    pub fn remaining(&self, now: u64, action: WaveTimer) -> Option<u64> {
        self.entries
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.due.saturating_sub(now))
            .min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Number of regular sweets in a wave
pub fn sweets_in_wave(wave: u32, base: u32) -> u32 {
    (base + wave.saturating_sub(1) / 3).min(MAX_SWEETS_PER_WAVE)
}

/// Chance that a wave carries one dynamite
pub fn dynamite_chance(wave: u32) -> f64 {
    (0.1 + wave as f64 * 0.05).min(0.4)
}

/// Break after clearing `wave`, shrinking per wave down to the tuning floor
pub fn inter_wave_delay_ticks(wave: u32, tuning: &Tuning) -> u32 {
    let secs = tuning.wave_delay_secs - tuning.wave_delay_step_secs * wave.saturating_sub(1) as f32;
    secs_to_ticks(secs.max(tuning.min_wave_delay_secs))
}

/// Pick a regular sweet. Early waves lean on the easy kinds.
pub fn roll_kind(wave: u32, rng: &mut impl Rng) -> SweetKind {
    if wave <= 2 {
        match rng.random_range(0..100u32) {
            0..45 => SweetKind::Cookie,
            45..85 => SweetKind::Marshmallow,
            _ => SweetKind::Cake,
        }
    } else {
        match rng.random_range(0..3u32) {
            0 => SweetKind::Cookie,
            1 => SweetKind::Marshmallow,
            _ => SweetKind::Cake,
        }
    }
}

/// Spawn scheduling and wave completion
#[derive(Debug, Clone)]
pub struct WaveDirector {
    /// Current wave number (starts at 1)
    pub wave: u32,
    /// Base fall speed, grows each cleared wave
    pub sweet_speed_base: f32,
    /// True while the current wave's spawn window is open
    pub spawning: bool,
    /// True once the current wave's clear has been processed
    pub completed: bool,
    issued: bool,
    timers: TimerQueue,
}

impl WaveDirector {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            wave: 1,
            sweet_speed_base: initial_speed,
            spawning: false,
            completed: false,
            issued: false,
            timers: TimerQueue::default(),
        }
    }

    pub fn phase(&self) -> WavePhase {
        if !self.issued {
            WavePhase::Idle
        } else if self.completed {
            WavePhase::InterWaveDelay
        } else if self.spawning {
            WavePhase::Spawning
        } else {
            WavePhase::AwaitingClear
        }
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Schedule the current wave's spawns relative to `now`
    pub fn start_wave(
        &mut self,
        now: u64,
        tuning: &Tuning,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let count = sweets_in_wave(self.wave, tuning.base_sweets_per_wave);
        let interval = tuning.spawn_interval_ticks as u64;
        let window = count as u64 * interval;

        for i in 0..count as u64 {
            self.timers.schedule(now + i * interval, WaveTimer::SpawnSweet);
        }
        let with_dynamite = rng.random::<f64>() < dynamite_chance(self.wave);
        if with_dynamite {
            let offset = rng.random_range(0..window.max(1));
            self.timers.schedule(now + offset, WaveTimer::SpawnDynamite);
        }
        self.timers.schedule(now + window, WaveTimer::EndSpawning);

        self.spawning = true;
        self.issued = true;
        events.push(GameEvent::WaveStarted(self.wave));
        log::info!(
            "Wave {}: {} sweets{}, speed {:.2}",
            self.wave,
            count,
            if with_dynamite { " + dynamite" } else { "" },
            self.sweet_speed_base
        );
    }

    /// Fire every timer due at `now`
    pub fn advance(
        &mut self,
        now: u64,
        store: &mut EntityStore,
        tuning: &Tuning,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        for action in self.timers.drain_due(now) {
            match action {
                WaveTimer::SpawnSweet => {
                    let kind = roll_kind(self.wave, rng);
                    self.spawn(kind, store, tuning, rng);
                }
                WaveTimer::SpawnDynamite => {
                    self.spawn(SweetKind::Dynamite, store, tuning, rng);
                }
                WaveTimer::EndSpawning => self.spawning = false,
                WaveTimer::StartWave => {
                    self.completed = false;
                    self.start_wave(now, tuning, rng, events);
                }
            }
        }
    }

    /// Detect a cleared wave and schedule the next one. Fires at most once
    /// per clear; returns true when it did.
    pub fn check_completion(
        &mut self,
        now: u64,
        sweets_remaining: usize,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.issued || self.spawning || self.completed || sweets_remaining > 0 {
            return false;
        }

        self.completed = true;
        let cleared = self.wave;
        let delay = inter_wave_delay_ticks(cleared, tuning);
        self.wave += 1;
        self.sweet_speed_base += tuning.sweet_speed_step;
        self.timers.schedule(now + delay as u64, WaveTimer::StartWave);
        events.push(GameEvent::WaveCleared(cleared));
        log::info!("Wave {} cleared, next in {} ticks", cleared, delay);
        true
    }

    fn spawn(&self, kind: SweetKind, store: &mut EntityStore, tuning: &Tuning, rng: &mut impl Rng) {
        let radius = kind.radius();
        let span = (tuning.width - 2.0 * radius).max(0.0);
        let x = radius + rng.random::<f32>() * span;

        let vel = if kind == SweetKind::Dynamite {
            Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                self.sweet_speed_base * 2.0 + rng.random::<f32>() * 3.0,
            )
        } else {
            let wave_bonus = tuning.sweet_speed_per_wave * self.wave.saturating_sub(1) as f32;
            Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0,
                self.sweet_speed_base + wave_bonus + rng.random::<f32>() * 2.0,
            )
        };

        store.spawn_sweet(kind, Vec2::new(x, SPAWN_HEIGHT), vel);
    }
}
