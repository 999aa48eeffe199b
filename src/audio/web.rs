//! Web Audio backend: one `AudioBufferSourceNode` per effect

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState};

use super::{AudioError, AudioSink};

fn backend(err: JsValue) -> AudioError {
    AudioError::Backend(format!("{:?}", err))
}

pub struct WebAudioSink {
    ctx: AudioContext,
}

impl WebAudioSink {
    /// Fails outside a secure context or when the browser has no audio
    pub fn new() -> Result<Self, AudioError> {
        let ctx = AudioContext::new().map_err(backend)?;
        Ok(Self { ctx })
    }
}

impl AudioSink for WebAudioSink {
    fn sample_rate(&self) -> u32 {
        self.ctx.sample_rate() as u32
    }

    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
        // Resume context if suspended (browsers require user gesture)
        if self.ctx.state() == AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }

        let buffer = self
            .ctx
            .create_buffer(1, samples.len() as u32, sample_rate as f32)
            .map_err(backend)?;
        buffer.copy_to_channel(samples, 0).map_err(backend)?;

        let source = self.ctx.create_buffer_source().map_err(backend)?;
        source.set_buffer(Some(&buffer));
        source
            .connect_with_audio_node(&self.ctx.destination())
            .map_err(backend)?;
        source.start().map_err(backend)?;
        Ok(())
    }

    fn resume(&mut self) {
        let _ = self.ctx.resume();
    }
}
