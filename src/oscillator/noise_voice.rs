//! Single-oscillator drum voice reading a noise wave.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::resources::drums::{DRUM_WAVE_LENGTH, DRUM_WAVE_MASK};
use crate::synth::params::VoiceParams;
use crate::utils::one_pole;

#[derive(Debug, Default, Clone)]
pub struct NoiseVoice {
    /// Position in the wave, in `[0, 1)`.
    phase: f32,
    sample: f32,
}

impl NoiseVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.sample = 0.0;
    }

    pub fn render(&mut self, params: &VoiceParams, lfo: &[f32], out: &mut [f32]) {
        if params.reset_phases {
            self.phase = 0.0;
        }

        let wave = params.wave;
        if wave.len() != DRUM_WAVE_LENGTH {
            out.fill(0.0);
            return;
        }

        const LENGTH: f32 = DRUM_WAVE_LENGTH as f32;
        let mut phase = self.phase;
        let mut phase_delta = params.phase_deltas[0] / LENGTH;
        let mut volume = params.volume_starts[0];

        for (out_sample, y) in out.iter_mut().zip(lfo.iter()) {
            let tremolo = 1.0 + params.tremolo_scale * (y - 1.0);
            let input = wave[(phase * LENGTH) as usize & DRUM_WAVE_MASK] * volume * tremolo;
            one_pole(&mut self.sample, input, params.filter);
            *out_sample = self.sample;

            // Trill glides reach millions of cycles per sample.
            phase += phase_delta;
            phase -= phase.floor();
            phase_delta *= params.phase_delta_scale;
            volume += params.volume_deltas[0];
        }

        self.phase = phase;
    }
}
