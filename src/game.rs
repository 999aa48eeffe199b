//! Host-facing game facade
//!
//! Owns the simulation state and the audio manager. The host forwards
//! lifecycle buttons and pointer input, calls [`Game::tick`] once per frame
//! and draws the returned snapshot.

use glam::Vec2;

use crate::audio::{AudioManager, AudioSink};
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameState, Snapshot, TickInput, UpgradeKind};
use crate::tuning::{Tuning, TuningError};

#[derive(Debug)]
pub struct Game {
    state: GameState,
    audio: AudioManager,
    settings: Settings,
    /// Particle cap from the tuning, before the settings toggle
    particle_cap: usize,
    focused: bool,
}

impl Game {
    /// New game on the platform's default audio sink
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, TuningError> {
        Self::with_audio(seed, tuning, settings, AudioManager::new())
    }

    /// New game sending sound to `sink`
    pub fn with_sink(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self, TuningError> {
        Self::with_audio(seed, tuning, settings, AudioManager::with_sink(sink))
    }

    fn with_audio(
        seed: u64,
        mut tuning: Tuning,
        settings: Settings,
        audio: AudioManager,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let particle_cap = tuning.max_particles;
        tuning.max_particles = settings.max_particles(particle_cap);
        let mut game = Self {
            state: GameState::new(seed, tuning),
            audio,
            settings,
            particle_cap,
            focused: true,
        };
        game.apply_audio_settings();
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Replace player settings. Particle changes apply to new bursts.
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.tuning.max_particles = settings.max_particles(self.particle_cap);
        self.settings = settings;
        self.apply_audio_settings();
    }

    /// Window focus changed
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_audio_settings();
    }

    fn apply_audio_settings(&mut self) {
        self.audio.apply_settings(&self.settings);
        self.audio
            .set_muted(self.settings.effective_mute(self.focused));
    }

    /// Start a run from the ready or game-over screen
    pub fn start(&mut self) {
        self.audio.resume();
        self.state.start();
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.audio.resume();
        self.state.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    /// Wipe the run and start again at wave 1
    pub fn restart(&mut self) {
        self.audio.resume();
        self.state.restart();
    }

    /// Pointer moved
    pub fn on_aim(&mut self, point: Vec2) {
        sim::aim(&mut self.state, point);
    }

    /// Pointer clicked. Returns the number of projectiles fired.
    pub fn on_fire(&mut self, point: Vec2) -> usize {
        self.audio.resume();
        sim::fire(&mut self.state, point)
    }

    /// Upgrade button pressed
    pub fn on_claim_upgrade(&mut self) -> Option<UpgradeKind> {
        sim::claim_upgrade(&mut self.state)
    }

    /// Advance one frame and play the sounds it produced
    pub fn tick(&mut self) -> Snapshot {
        let snapshot = sim::tick(&mut self.state, &TickInput::default());
        self.audio.play_events(&snapshot.events);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::RecordingSink;
    use crate::sim::GameEvent;

    fn game_with_sink(settings: Settings) -> (Game, RecordingSink) {
        let sink = RecordingSink::default();
        let game = Game::with_sink(42, Tuning::default(), settings, Box::new(sink.clone()))
            .unwrap();
        (game, sink)
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            width: 0.0,
            ..Tuning::default()
        };
        let sink = Box::new(RecordingSink::default());
        let result = Game::with_sink(1, tuning, Settings::default(), sink);
        assert!(matches!(result, Err(TuningError::Viewport { .. })));
    }

    #[test]
    fn test_ready_until_started() {
        let (mut game, _) = game_with_sink(Settings::default());
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.on_fire(Vec2::new(400.0, 100.0)), 0);
        let snap = game.tick();
        assert_eq!(snap.tick, 0);
        assert!(snap.projectiles.is_empty());

        game.start();
        assert_eq!(game.tick().tick, 1);
    }

    #[test]
    fn test_events_become_sounds() {
        let (mut game, sink) = game_with_sink(Settings::default());
        game.start();
        let first = game.tick();
        assert!(first.events.contains(&GameEvent::WaveStarted(1)));

        assert_eq!(game.on_fire(Vec2::new(400.0, 100.0)), 1);
        let second = game.tick();
        assert!(second.events.contains(&GameEvent::Fired { count: 1 }));

        let expected = first.events.len() + second.events.len();
        assert_eq!(sink.played.borrow().len(), expected);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut game, _) = game_with_sink(Settings::default());
        game.start();
        for _ in 0..30 {
            game.tick();
        }
        let before = game.tick();

        game.pause();
        for _ in 0..100 {
            let snap = game.tick();
            assert_eq!(snap.tick, before.tick);
            assert_eq!(snap.sweets.len(), before.sweets.len());
        }
        let timers = game.state().wave.timers().len();

        game.resume();
        assert_eq!(game.state().wave.timers().len(), timers);
        assert_eq!(game.tick().tick, before.tick + 1);
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut game, _) = game_with_sink(Settings::default());
        game.start();
        for _ in 0..200 {
            game.on_fire(Vec2::new(400.0, 0.0));
            game.tick();
        }
        game.restart();
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.wave.wave, 1);
        assert!(state.entities.projectiles.is_empty());
        assert!(state.entities.sweets.is_empty());
    }

    #[test]
    fn test_particles_setting_disables_bursts() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let (mut game, _) = game_with_sink(settings);
        assert_eq!(game.state().tuning.max_particles, 0);

        game.set_settings(Settings::default());
        assert_eq!(game.state().tuning.max_particles, 512);
    }

    #[test]
    fn test_blur_mutes() {
        let (mut game, sink) = game_with_sink(Settings::default());
        game.set_focused(false);
        game.start();
        game.tick();
        assert!(sink.played.borrow().is_empty());

        game.set_focused(true);
        game.on_fire(Vec2::new(400.0, 100.0));
        game.tick();
        assert!(!sink.played.borrow().is_empty());
    }
}
