//! Projectile vs. sweet collision resolution
//!
//! Plain circle overlap, no swept tests: a projectile moving further than a
//! sweet's diameter in one tick can tunnel through it.

use glam::Vec2;

use super::entities::{EntityStore, ParticleBurst};
use super::state::SweetKind;
use crate::consts::DYNAMITE_BONUS;

/// What a single projectile hit did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Sweet survived with `health` left
    Damaged { kind: SweetKind, health: u8 },
    /// Sweet destroyed and scored
    Destroyed { kind: SweetKind, points: u64 },
    /// Dynamite wiped `cleared` sweets (itself included)
    Detonated { cleared: usize },
}

/// Accumulated side effects of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub score: u64,
    pub outcomes: Vec<HitOutcome>,
    pub bursts: Vec<ParticleBurst>,
}

/// Circle-circle overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Resolve every projectile against the sweets.
///
/// Projectiles are visited in collection order; each one consumes itself on
/// its first overlap and resolves exactly one outcome.
pub fn resolve_collisions(store: &mut EntityStore) -> CollisionReport {
    let mut report = CollisionReport::default();

    let mut i = 0;
    while i < store.projectiles.len() {
        let projectile = store.projectiles[i];
        let hit = store
            .sweets
            .iter()
            .position(|s| circles_overlap(projectile.pos, projectile.radius, s.pos, s.radius));

        match hit {
            Some(j) => {
                store.projectiles.remove(i);
                resolve_hit(store, j, &mut report);
            }
            None => i += 1,
        }
    }

    report
}

fn resolve_hit(store: &mut EntityStore, index: usize, report: &mut CollisionReport) {
    let sweet = &mut store.sweets[index];
    let pos = sweet.pos;

    if sweet.kind == SweetKind::Dynamite {
        let cleared = store.sweets.len();
        store.sweets.clear();
        report.score += DYNAMITE_BONUS;
        report.bursts.push(ParticleBurst::explosion(pos));
        report.outcomes.push(HitOutcome::Detonated { cleared });
        return;
    }

    sweet.health = sweet.health.saturating_sub(1);
    let kind = sweet.kind;
    if sweet.health == 0 {
        store.sweets.remove(index);
        let points = kind.points();
        report.score += points;
        report.bursts.push(ParticleBurst::sweet(pos, kind));
        report.outcomes.push(HitOutcome::Destroyed { kind, points });
    } else {
        report.outcomes.push(HitOutcome::Damaged {
            kind,
            health: sweet.health,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(sweets: &[(SweetKind, Vec2)]) -> EntityStore {
        let mut store = EntityStore::new();
        for &(kind, pos) in sweets {
            store.spawn_sweet(kind, pos, Vec2::ZERO);
        }
        store
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 4.0, Vec2::new(18.0, 0.0), 15.0));
        assert!(!circles_overlap(Vec2::ZERO, 4.0, Vec2::new(19.0, 0.0), 15.0));
        assert!(!circles_overlap(Vec2::ZERO, 4.0, Vec2::new(30.0, 0.0), 15.0));
    }

    #[test]
    fn test_single_hit_kinds() {
        for (kind, points) in [(SweetKind::Cookie, 10), (SweetKind::Marshmallow, 15)] {
            let mut store = store_with(&[(kind, Vec2::new(100.0, 100.0))]);
            store.spawn_projectile(Vec2::new(100.0, 110.0), Vec2::ZERO, 4.0);

            let report = resolve_collisions(&mut store);
            assert_eq!(report.score, points);
            assert!(store.sweets.is_empty());
            assert!(store.projectiles.is_empty());
            assert_eq!(report.bursts.len(), 1);
            assert_eq!(report.bursts[0].count, 8);
        }
    }

    #[test]
    fn test_cake_takes_two_hits() {
        let mut store = store_with(&[(SweetKind::Cake, Vec2::new(100.0, 100.0))]);
        store.spawn_projectile(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        assert_eq!(report.score, 0);
        assert_eq!(
            report.outcomes,
            vec![HitOutcome::Damaged {
                kind: SweetKind::Cake,
                health: 1
            }]
        );
        assert_eq!(store.sweets.len(), 1);
        assert!(store.sweets[0].is_damaged());

        store.spawn_projectile(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0);
        let report = resolve_collisions(&mut store);
        assert_eq!(report.score, 30);
        assert!(store.sweets.is_empty());
    }

    #[test]
    fn test_dynamite_clears_everything() {
        let mut store = store_with(&[
            (SweetKind::Cookie, Vec2::new(10.0, 10.0)),
            (SweetKind::Cake, Vec2::new(700.0, 500.0)),
            (SweetKind::Dynamite, Vec2::new(400.0, 300.0)),
            (SweetKind::Marshmallow, Vec2::new(790.0, 20.0)),
        ]);
        store.spawn_projectile(Vec2::new(400.0, 305.0), Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        assert!(store.sweets.is_empty());
        assert_eq!(report.score, 100);
        assert_eq!(report.outcomes, vec![HitOutcome::Detonated { cleared: 4 }]);
        assert_eq!(report.bursts[0].count, 20);
        assert_eq!(report.bursts[0].pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_one_sweet_per_projectile() {
        // Two overlapping cookies, one projectile: only the first dies
        let mut store = store_with(&[
            (SweetKind::Cookie, Vec2::new(100.0, 100.0)),
            (SweetKind::Cookie, Vec2::new(105.0, 100.0)),
        ]);
        store.spawn_projectile(Vec2::new(102.0, 100.0), Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        assert_eq!(report.score, 10);
        assert_eq!(store.sweets.len(), 1);
        assert_eq!(store.sweets[0].pos, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn test_misses_survive() {
        let mut store = store_with(&[(SweetKind::Cookie, Vec2::new(100.0, 100.0))]);
        store.spawn_projectile(Vec2::new(300.0, 300.0), Vec2::ZERO, 4.0);
        store.spawn_projectile(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0);
        store.spawn_projectile(Vec2::new(500.0, 300.0), Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        assert_eq!(report.score, 10);
        assert_eq!(store.projectiles.len(), 2);
        assert_eq!(store.projectiles[0].pos, Vec2::new(300.0, 300.0));
        assert_eq!(store.projectiles[1].pos, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_second_projectile_after_dynamite_finds_nothing() {
        let mut store = store_with(&[(SweetKind::Dynamite, Vec2::new(100.0, 100.0))]);
        store.spawn_projectile(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0);
        store.spawn_projectile(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        assert_eq!(report.score, 100);
        assert_eq!(store.projectiles.len(), 1);
    }
}
