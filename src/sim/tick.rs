//! Fixed-step simulation tick
//!
//! One call advances the game by exactly one logical frame, in a fixed
//! order: wave timers, motion and expiry, collisions, life loss, upgrade
//! gate, wave completion, slow-motion countdown.

use glam::Vec2;

use super::collision::{HitOutcome, resolve_collisions};
use super::entities::ParticleBurst;
use super::progression::{UpgradeKind, shot_velocities};
use super::snapshot::Snapshot;
use super::state::{GameEvent, GamePhase, GameState};
use crate::angle_between;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Point the player is aiming at (screen coordinates)
    pub aim: Option<Vec2>,
    /// Point clicked this frame
    pub fire: Option<Vec2>,
    /// Upgrade button pressed
    pub claim_upgrade: bool,
}

/// Validate a host-supplied point: non-finite is dropped, finite is clamped
/// into the viewport
fn sanitize_point(state: &GameState, point: Vec2) -> Option<Vec2> {
    if !point.is_finite() {
        log::debug!("Ignoring non-finite input point {:?}", point);
        return None;
    }
    Some(point.clamp(
        Vec2::ZERO,
        Vec2::new(state.tuning.width, state.tuning.height),
    ))
}

/// Turn the player toward `point`. Orientation only.
pub fn aim(state: &mut GameState, point: Vec2) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(point) = sanitize_point(state, point) else {
        return;
    };
    let origin = state.player_position();
    if point != origin {
        state.aim_angle = angle_between(origin, point);
    }
}

/// Fire the current weapon tier toward `point`. Returns the number of
/// projectiles created.
pub fn fire(state: &mut GameState, point: Vec2) -> usize {
    if state.phase != GamePhase::Playing {
        return 0;
    }
    let Some(point) = sanitize_point(state, point) else {
        return 0;
    };
    aim(state, point);

    let origin = state.player_position();
    let shots = shot_velocities(
        origin,
        state.aim_angle,
        state.progression.weapon_level,
        state.tuning.projectile_speed,
    );
    let count = shots.len();
    for (pos, vel) in shots {
        state
            .entities
            .spawn_projectile(pos, vel, state.tuning.projectile_radius);
    }
    state.events.push(GameEvent::Fired { count });
    count
}

/// Apply the pending upgrade. No-op unless one is available.
pub fn claim_upgrade(state: &mut GameState) -> Option<UpgradeKind> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    let kind = state
        .progression
        .claim(state.tuning.upgrade_step, state.tuning.slow_motion_ticks)?;
    let burst = ParticleBurst::upgrade(state.player_position());
    state
        .entities
        .emit_burst(&burst, &mut state.rng, state.tuning.max_particles);
    state.events.push(GameEvent::UpgradeClaimed(kind));
    log::info!("Upgrade claimed: {:?}", kind);
    Some(kind)
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    // Frozen unless playing
    if state.phase != GamePhase::Playing {
        let events = std::mem::take(&mut state.events);
        return Snapshot::capture(state, events);
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    if let Some(point) = input.aim {
        aim(state, point);
    }
    if let Some(point) = input.fire {
        fire(state, point);
    }
    if input.claim_upgrade {
        claim_upgrade(state);
    }

    state.wave.advance(
        now,
        &mut state.entities,
        &state.tuning,
        &mut state.rng,
        &mut state.events,
    );

    let sweet_scale = state.progression.sweet_speed_scale();
    state.entities.integrate(sweet_scale);
    let escapes = state
        .entities
        .expire(state.tuning.width, state.tuning.height);

    let report = resolve_collisions(&mut state.entities);
    state.score += report.score;
    for outcome in &report.outcomes {
        let event = match *outcome {
            HitOutcome::Damaged { kind, .. } => GameEvent::SweetHit { kind },
            HitOutcome::Destroyed { kind, points } => GameEvent::SweetDestroyed { kind, points },
            HitOutcome::Detonated { cleared } => GameEvent::DynamiteExploded { cleared },
        };
        state.events.push(event);
    }
    for burst in &report.bursts {
        state
            .entities
            .emit_burst(burst, &mut state.rng, state.tuning.max_particles);
    }

    for _ in 0..escapes.lives_lost() {
        if state.lose_life() {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver {
                score: state.score,
                wave: state.wave.wave,
            });
            log::info!(
                "Game over: score {} on wave {}",
                state.score,
                state.wave.wave
            );
            let events = std::mem::take(&mut state.events);
            return Snapshot::capture(state, events);
        }
    }

    if let Some(kind) = state.progression.check_threshold(
        state.score,
        state.tuning.slow_motion_chance,
        &mut state.rng,
    ) {
        state.events.push(GameEvent::UpgradeAvailable(kind));
    }

    state.wave.check_completion(
        now,
        state.entities.sweets.len(),
        &state.tuning,
        &mut state.events,
    );

    if state.progression.tick_slow_motion() {
        state.events.push(GameEvent::SlowMotionEnded);
    }

    let events = std::mem::take(&mut state.events);
    Snapshot::capture(state, events)
}
