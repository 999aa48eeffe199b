//! Property tests for the synthesizer and the run lifecycle

use glam::Vec2;
use proptest::prelude::*;

use sweet_shooter::audio::NullSink;
use sweet_shooter::audio::synth::{SynthParams, synthesize};
use sweet_shooter::consts::{DYNAMITE_BONUS, MAX_LIVES, MAX_WEAPON_LEVEL};
use sweet_shooter::sim::{
    EntityStore, GamePhase, GameState, SweetKind, fan_out, fire, resolve_collisions,
};
use sweet_shooter::{Game, Settings, Tuning};

/// Fast sweets so runs end quickly when nobody shoots
fn deadly_tuning() -> Tuning {
    Tuning {
        initial_sweet_speed: 20.0,
        spawn_interval_ticks: 10,
        ..Tuning::default()
    }
}

#[derive(Debug, Clone)]
enum Action {
    Tick,
    Aim(Vec2),
    Fire(Vec2),
    Claim,
    TogglePause,
}

fn action() -> impl Strategy<Value = Action> {
    let point = (-100.0f32..900.0, -100.0f32..700.0).prop_map(|(x, y)| Vec2::new(x, y));
    prop_oneof![
        4 => Just(Action::Tick),
        2 => point.clone().prop_map(Action::Aim),
        3 => point.prop_map(Action::Fire),
        1 => Just(Action::Claim),
        1 => Just(Action::TogglePause),
    ]
}

fn apply(game: &mut Game, action: &Action) {
    match action {
        Action::Tick => {}
        Action::Aim(p) => game.on_aim(*p),
        Action::Fire(p) => {
            game.on_fire(*p);
        }
        Action::Claim => {
            game.on_claim_upgrade();
        }
        Action::TogglePause => game.toggle_pause(),
    }
}

proptest! {
    #[test]
    fn synth_length_and_range(
        volume in -5.0f32..5.0,
        frequency in 0.0f32..5_000.0,
        attack in -1.0f32..2.0,
        decay in -1.0f32..2.0,
        sustain in -1.0f32..2.0,
        duration in 0.0f32..2.0,
        sample_rate in 8_000u32..48_000,
    ) {
        let params = SynthParams { volume, frequency, attack, decay, sustain, duration };
        let samples = synthesize(&params, sample_rate);

        let expected = (duration as f64 * sample_rate as f64).round() as usize;
        prop_assert_eq!(samples.len(), expected);
        prop_assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        if let Some(first) = samples.first() {
            prop_assert_eq!(*first, 0.0);
        }
    }

    #[test]
    fn lives_never_increase(seed in any::<u64>(), actions in prop::collection::vec(action(), 0..300)) {
        let mut game = Game::with_sink(seed, deadly_tuning(), Settings::default(), Box::new(NullSink))
            .unwrap();
        game.start();

        let mut lives = MAX_LIVES;
        let mut score = 0;
        for action in &actions {
            apply(&mut game, action);
            let snap = game.tick();
            prop_assert!(snap.lives <= lives);
            prop_assert!(snap.score >= score);
            prop_assert!(snap.weapon_level <= MAX_WEAPON_LEVEL);
            lives = snap.lives;
            score = snap.score;
        }
    }

    #[test]
    fn game_over_is_terminal(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..50)) {
        let mut game = Game::with_sink(seed, deadly_tuning(), Settings::default(), Box::new(NullSink))
            .unwrap();
        game.start();

        let mut ticks = 0;
        while !game.state().is_game_over() {
            game.tick();
            ticks += 1;
            prop_assert!(ticks < 10_000, "run never ended");
        }
        let frozen = game.tick();
        prop_assert_eq!(frozen.lives, 0);

        for action in &actions {
            apply(&mut game, action);
            let snap = game.tick();
            prop_assert_eq!(snap.phase, GamePhase::GameOver);
            prop_assert_eq!(snap.tick, frozen.tick);
            prop_assert_eq!(snap.score, frozen.score);
            prop_assert_eq!(snap.lives, 0);
            prop_assert_eq!(snap.sweets.len(), frozen.sweets.len());
            prop_assert_eq!(snap.projectiles.len(), frozen.projectiles.len());
        }

        game.restart();
        prop_assert_eq!(game.state().lives, MAX_LIVES);
        prop_assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn fire_matches_weapon_tier(level in 0u8..=MAX_WEAPON_LEVEL, x in 0.0f32..800.0, y in 0.0f32..400.0) {
        let mut state = GameState::new(3, Tuning::default());
        state.start();
        state.progression.weapon_level = level;

        let fired = fire(&mut state, Vec2::new(x, y));
        prop_assert_eq!(fired, fan_out(level).count);
        prop_assert_eq!(state.entities.projectiles.len(), fired);
    }

    #[test]
    fn dynamite_clears_everything(others in prop::collection::vec((0u8..3, 0.0f32..800.0, 0.0f32..600.0), 0..20)) {
        let mut store = EntityStore::new();
        let at = Vec2::new(400.0, 300.0);
        store.spawn_sweet(SweetKind::Dynamite, at, Vec2::ZERO);
        for (kind, x, y) in others {
            let kind = match kind {
                0 => SweetKind::Cookie,
                1 => SweetKind::Marshmallow,
                _ => SweetKind::Cake,
            };
            store.spawn_sweet(kind, Vec2::new(x, y), Vec2::ZERO);
        }
        store.spawn_projectile(at, Vec2::ZERO, 4.0);

        let report = resolve_collisions(&mut store);
        prop_assert_eq!(report.score, DYNAMITE_BONUS);
        prop_assert!(store.sweets.is_empty());
        prop_assert!(store.projectiles.is_empty());
    }
}
