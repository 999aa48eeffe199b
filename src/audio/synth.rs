//! Envelope synthesizer
//!
//! Turns a short parameter vector into raw mono samples: a sine carrier
//! shaped by a three-segment linear envelope (attack up to 1, decay down to
//! the sustain level, release down to 0 over whatever time is left).
//!
//! The parameter vector is positional:
//!
//! | index | meaning         | default |
//! |-------|-----------------|---------|
//! | 0     | volume          | 0.5     |
//! | 1     | (unused)        |         |
//! | 2     | frequency (Hz)  | 440     |
//! | 3     | attack (s)      | 0.01    |
//! | 4     | decay (s)       | 0.1     |
//! | 5     | sustain level   | 0.3     |

use std::f64::consts::TAU;

/// Sample rate used when the host doesn't report one
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Length of a sound when the caller doesn't say
pub const DEFAULT_DURATION: f32 = 0.3;

/// Longest sound we will render
pub const MAX_DURATION: f32 = 10.0;

/// Typed view of the positional parameter vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub volume: f32,
    pub frequency: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    /// Total length in seconds
    pub duration: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            volume: 0.5,
            frequency: 440.0,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.3,
            duration: DEFAULT_DURATION,
        }
    }
}

impl SynthParams {
    /// Read `[volume, _, frequency, attack, decay, sustain]`. Missing or
    /// non-finite entries fall back to the defaults.
    pub fn from_slice(raw: &[f32]) -> Self {
        let defaults = Self::default();
        let pick = |index: usize, fallback: f32| {
            raw.get(index)
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };
        Self {
            volume: pick(0, defaults.volume),
            frequency: pick(2, defaults.frequency),
            attack: pick(3, defaults.attack),
            decay: pick(4, defaults.decay),
            sustain: pick(5, defaults.sustain),
            duration: defaults.duration,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Back to the positional form
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.volume,
            0.0,
            self.frequency,
            self.attack,
            self.decay,
            self.sustain,
        ]
    }
}

/// Number of samples for `seconds` at `sample_rate` (0 for junk input)
fn sample_count(seconds: f32, sample_rate: u32) -> usize {
    let n = (seconds as f64 * sample_rate as f64).round();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// Envelope value at sample `i` of `total`
#[inline]
fn envelope(i: usize, attack: usize, decay: usize, sustain: f64, total: usize) -> f64 {
    if i < attack {
        i as f64 / attack as f64
    } else if i < attack + decay {
        let t = (i - attack) as f64 / decay as f64;
        1.0 - (1.0 - sustain) * t
    } else {
        let release = total - attack - decay;
        let t = (i - attack - decay) as f64 / release as f64;
        sustain * (1.0 - t)
    }
}

/// Render `params` to mono samples in [-1, 1]
pub fn synthesize(params: &SynthParams, sample_rate: u32) -> Vec<f32> {
    if sample_rate == 0 || !params.duration.is_finite() {
        return Vec::new();
    }
    let duration = params.duration.min(MAX_DURATION);
    let total = sample_count(duration, sample_rate);
    if total == 0 {
        return Vec::new();
    }

    let attack = sample_count(params.attack, sample_rate).min(total);
    let decay = sample_count(params.decay, sample_rate).min(total - attack);
    let sustain = params.sustain as f64;
    let volume = params.volume as f64;
    let step = TAU * params.frequency as f64 / sample_rate as f64;

    let mut samples = Vec::with_capacity(total);
    let mut phase = 0.0f64;
    for i in 0..total {
        let env = envelope(i, attack, decay, sustain, total);
        let value = (phase.sin() * env * volume).clamp(-1.0, 1.0);
        samples.push(value as f32);
        phase += step;
    }
    samples
}

/// `synthesize` straight from the positional vector
pub fn synthesize_raw(raw: &[f32], duration: f32, sample_rate: u32) -> Vec<f32> {
    synthesize(&SynthParams::from_slice(raw).with_duration(duration), sample_rate)
}
