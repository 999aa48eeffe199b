//! Entity collections and per-tick kinematics
//!
//! The store owns motion and expiry. Hit-driven mutation belongs to the
//! collision pass; nothing else touches these vectors during a tick.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleColor, Projectile, Sweet, SweetKind};
use crate::consts::FALL_MARGIN;

/// A request for a spray of particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub pos: Vec2,
    pub color: ParticleColor,
    pub count: usize,
    /// Each velocity component is drawn from [-speed, speed)
    pub speed: f32,
    /// Lifetime in ticks
    pub life: u32,
}

impl ParticleBurst {
    /// Small puff for a destroyed sweet
    pub fn sweet(pos: Vec2, kind: SweetKind) -> Self {
        Self {
            pos,
            color: kind.particle_color(),
            count: 8,
            speed: 3.0,
            life: 30,
        }
    }

    /// Big blast for dynamite
    pub fn explosion(pos: Vec2) -> Self {
        Self {
            pos,
            color: ParticleColor::Explosion,
            count: 20,
            speed: 6.0,
            life: 40,
        }
    }

    /// Sparkle around the player when an upgrade is claimed
    pub fn upgrade(pos: Vec2) -> Self {
        Self {
            pos,
            color: ParticleColor::Upgrade,
            count: 12,
            speed: 4.0,
            life: 35,
        }
    }
}

/// What fell off the bottom during an expiry pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Escapes {
    /// Kinds that left the screen, in collection order
    pub kinds: Vec<SweetKind>,
}

impl Escapes {
    /// Number of escapes that cost a life
    pub fn lives_lost(&self) -> u32 {
        self.kinds.iter().filter(|k| k.costs_life()).count() as u32
    }
}

/// The three live collections
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub projectiles: Vec<Projectile>,
    pub sweets: Vec<Sweet>,
    pub particles: Vec<Particle>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Drop every entity (ids keep counting up)
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.sweets.clear();
        self.particles.clear();
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_sweet(&mut self, kind: SweetKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.sweets.push(Sweet::new(id, kind, pos, vel));
        id
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, radius: f32) {
        self.projectiles.push(Projectile { pos, vel, radius });
    }

    /// Spawn a burst, evicting the oldest particles beyond `max_particles`
    pub fn emit_burst(&mut self, burst: &ParticleBurst, rng: &mut impl Rng, max_particles: usize) {
        let count = burst.count.min(max_particles);
        let overflow = (self.particles.len() + count).saturating_sub(max_particles);
        if overflow > 0 {
            let overflow = overflow.min(self.particles.len());
            self.particles.drain(..overflow);
        }
        for _ in 0..count {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * burst.speed,
                (rng.random::<f32>() - 0.5) * 2.0 * burst.speed,
            );
            self.particles.push(Particle {
                pos: burst.pos,
                vel,
                color: burst.color,
                life: burst.life,
            });
        }
    }

    /// Move everything one tick. Only sweets feel `sweet_scale` (slow motion).
    pub fn integrate(&mut self, sweet_scale: f32) {
        for projectile in &mut self.projectiles {
            projectile.pos += projectile.vel;
        }
        for sweet in &mut self.sweets {
            sweet.pos += sweet.vel * sweet_scale;
        }
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
    }

    /// Remove off-screen projectiles, fallen sweets and spent particles
    pub fn expire(&mut self, width: f32, height: f32) -> Escapes {
        self.projectiles.retain(|p| {
            p.pos.x >= 0.0 && p.pos.x <= width && p.pos.y >= 0.0 && p.pos.y <= height
        });

        let mut escapes = Escapes::default();
        self.sweets.retain(|s| {
            if s.pos.y > height + FALL_MARGIN {
                escapes.kinds.push(s.kind);
                false
            } else {
                true
            }
        });

        self.particles.retain(|p| p.life > 0);
        escapes
    }
}
