//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! Every effect is a parameter vector for the envelope synthesizer; the
//! rendered buffer is handed to an [`AudioSink`] (Web Audio in the browser,
//! a silent sink everywhere else).

pub mod synth;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::{GameEvent, SweetKind};
use synth::{DEFAULT_SAMPLE_RATE, SynthParams, synthesize};

/// Playback failures. Never fatal: the manager logs and drops them.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("synthesizer produced no samples")]
    EmptyBuffer,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Somewhere to send rendered samples
pub trait AudioSink {
    /// Preferred sample rate for buffers sent to this sink
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    /// Queue a mono buffer for immediate playback
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError>;

    /// Resume after a user gesture (browsers start suspended)
    fn resume(&mut self) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Trigger pulled
    Fire,
    /// Sweet damaged but still standing
    Hit,
    /// Sweet destroyed
    Pop(SweetKind),
    /// Dynamite cleared the field
    Explosion,
    /// Sweet reached the bottom
    LifeLost,
    /// New wave begins
    WaveStart,
    /// Wave cleared
    WaveClear,
    /// Upgrade button lit up
    UpgradeReady,
    /// Upgrade claimed
    UpgradeClaim,
    /// Slow motion wore off
    SlowMotionEnd,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Synth parameters for this effect at full volume
    pub fn params(self) -> SynthParams {
        // [volume, _, frequency, attack, decay, sustain], duration
        let (raw, duration): ([f32; 6], f32) = match self {
            SoundEffect::Fire => ([0.3, 0.0, 880.0, 0.005, 0.05, 0.1], 0.12),
            SoundEffect::Hit => ([0.4, 0.0, 330.0, 0.005, 0.05, 0.2], 0.1),
            SoundEffect::Pop(kind) => {
                let freq = match kind {
                    SweetKind::Cookie => 520.0,
                    SweetKind::Marshmallow => 660.0,
                    SweetKind::Cake => 260.0,
                    SweetKind::Dynamite => 90.0,
                };
                ([0.5, 0.0, freq, 0.01, 0.1, 0.3], 0.25)
            }
            SoundEffect::Explosion => ([0.8, 0.0, 70.0, 0.005, 0.3, 0.4], 0.8),
            SoundEffect::LifeLost => ([0.6, 0.0, 150.0, 0.02, 0.3, 0.3], 0.6),
            SoundEffect::WaveStart => ([0.4, 0.0, 587.0, 0.02, 0.1, 0.3], 0.35),
            SoundEffect::WaveClear => ([0.5, 0.0, 784.0, 0.02, 0.2, 0.4], 0.7),
            SoundEffect::UpgradeReady => ([0.4, 0.0, 1046.0, 0.01, 0.1, 0.3], 0.3),
            SoundEffect::UpgradeClaim => ([0.5, 0.0, 1318.0, 0.01, 0.15, 0.4], 0.5),
            SoundEffect::SlowMotionEnd => ([0.3, 0.0, 196.0, 0.05, 0.2, 0.2], 0.4),
            SoundEffect::GameOver => ([0.7, 0.0, 110.0, 0.05, 0.6, 0.3], 1.5),
        };
        SynthParams::from_slice(&raw).with_duration(duration)
    }

    /// Which effect a simulation event triggers
    pub fn for_event(event: &GameEvent) -> Self {
        match *event {
            GameEvent::Fired { .. } => SoundEffect::Fire,
            GameEvent::SweetHit { .. } => SoundEffect::Hit,
            GameEvent::SweetDestroyed { kind, .. } => SoundEffect::Pop(kind),
            GameEvent::DynamiteExploded { .. } => SoundEffect::Explosion,
            GameEvent::LifeLost { .. } => SoundEffect::LifeLost,
            GameEvent::UpgradeAvailable(_) => SoundEffect::UpgradeReady,
            GameEvent::UpgradeClaimed(_) => SoundEffect::UpgradeClaim,
            GameEvent::SlowMotionEnded => SoundEffect::SlowMotionEnd,
            GameEvent::WaveStarted(_) => SoundEffect::WaveStart,
            GameEvent::WaveCleared(_) => SoundEffect::WaveClear,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    /// Manager on the platform's default sink
    pub fn new() -> Self {
        Self::with_sink(default_sink())
    }

    pub fn with_sink(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Copy volumes and mute from player settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&mut self) {
        self.sink.resume();
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = clamp_volume(vol);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = clamp_volume(vol);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Failures are logged, never returned.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.try_play(effect, vol) {
            log::warn!("Failed to play {:?}: {}", effect, err);
        }
    }

    fn try_play(&mut self, effect: SoundEffect, vol: f32) -> Result<(), AudioError> {
        let params = effect.params();
        let params = params.with_volume(params.volume * vol);
        let sample_rate = self.sink.sample_rate();
        let samples = synthesize(&params, sample_rate);
        if samples.is_empty() {
            return Err(AudioError::EmptyBuffer);
        }
        self.sink.play(&samples, sample_rate)
    }

    /// Play whatever the tick's events call for
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_finite() { vol.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(target_arch = "wasm32")]
fn default_sink() -> Box<dyn AudioSink> {
    match WebAudioSink::new() {
        Ok(sink) => Box::new(sink),
        Err(err) => {
            log::warn!("Failed to create AudioContext - audio disabled ({})", err);
            Box::new(NullSink)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_sink() -> Box<dyn AudioSink> {
    Box::new(NullSink)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::UpgradeKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Remembers the length and peak of every buffer it is sent
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub played: Rc<RefCell<Vec<(usize, f32)>>>,
    }

    impl AudioSink for RecordingSink {
        fn sample_rate(&self) -> u32 {
            8_000
        }

        fn play(&mut self, samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
            let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            self.played.borrow_mut().push((samples.len(), peak));
            Ok(())
        }
    }

    struct BrokenSink;

    impl AudioSink for BrokenSink {
        fn play(&mut self, _samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
            Err(AudioError::Backend("device unplugged".into()))
        }
    }

    #[test]
    fn test_play_reaches_sink() {
        let sink = RecordingSink::default();
        let mut audio = AudioManager::with_sink(Box::new(sink.clone()));
        audio.play(SoundEffect::Fire);

        let played = sink.played.borrow();
        assert_eq!(played.len(), 1);
        // 0.12s at 8 kHz
        assert_eq!(played[0].0, 960);
    }

    #[test]
    fn test_mute_and_volume() {
        let sink = RecordingSink::default();
        let mut audio = AudioManager::with_sink(Box::new(sink.clone()));

        audio.set_muted(true);
        audio.play(SoundEffect::Explosion);
        assert!(sink.played.borrow().is_empty());

        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Explosion);
        assert!(sink.played.borrow().is_empty());

        audio.set_master_volume(7.0);
        assert_eq!(audio.effective_volume(), 1.0);
        audio.set_sfx_volume(f32::NAN);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_scales_peak() {
        let loud = RecordingSink::default();
        let mut audio = AudioManager::with_sink(Box::new(loud.clone()));
        audio.set_master_volume(1.0);
        audio.play(SoundEffect::GameOver);

        let quiet = RecordingSink::default();
        let mut audio = AudioManager::with_sink(Box::new(quiet.clone()));
        audio.set_master_volume(0.25);
        audio.play(SoundEffect::GameOver);

        let loud_peak = loud.played.borrow()[0].1;
        let quiet_peak = quiet.played.borrow()[0].1;
        assert!(quiet_peak < loud_peak);
        assert!(loud_peak <= 1.0);
    }

    #[test]
    fn test_sink_errors_are_swallowed() {
        let mut audio = AudioManager::with_sink(Box::new(BrokenSink));
        audio.play(SoundEffect::Hit);
        audio.play_events(&[GameEvent::WaveCleared(1)]);
    }

    #[test]
    fn test_every_event_has_a_sound() {
        let events = [
            GameEvent::Fired { count: 1 },
            GameEvent::SweetHit {
                kind: SweetKind::Cake,
            },
            GameEvent::SweetDestroyed {
                kind: SweetKind::Cookie,
                points: 10,
            },
            GameEvent::DynamiteExploded { cleared: 3 },
            GameEvent::LifeLost { lives: 2 },
            GameEvent::UpgradeAvailable(UpgradeKind::WeaponTier),
            GameEvent::UpgradeClaimed(UpgradeKind::SlowMotion),
            GameEvent::SlowMotionEnded,
            GameEvent::WaveStarted(2),
            GameEvent::WaveCleared(1),
            GameEvent::GameOver { score: 0, wave: 1 },
        ];
        let sink = RecordingSink::default();
        let mut audio = AudioManager::with_sink(Box::new(sink.clone()));
        audio.play_events(&events);
        assert_eq!(sink.played.borrow().len(), events.len());
        assert!(sink.played.borrow().iter().all(|(len, _)| *len > 0));
    }

    #[test]
    fn test_apply_settings() {
        let mut audio = AudioManager::with_sink(Box::new(NullSink));
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            muted: false,
            ..Settings::default()
        };
        audio.apply_settings(&settings);
        assert!((audio.effective_volume() - 0.25).abs() < 1e-6);

        audio.apply_settings(&Settings {
            muted: true,
            ..settings
        });
        assert!(audio.is_muted());
    }
}
