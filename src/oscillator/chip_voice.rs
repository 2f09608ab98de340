//! Two-oscillator wavetable voice used by chip and PWM instruments.
//!
//! Both oscillators read the same single-cycle table. The second one is
//! detuned by the chorus setting or plays the harmony pitch, and the sum goes
//! through a one-pole lowpass whose coefficient moves geometrically.

use crate::synth::params::VoiceParams;
use crate::utils::{one_pole, wrap_phase};

#[inline]
fn stepped_lookup(table: &[f32], phase: f32) -> f32 {
    let len = table.len();
    table[(phase * len as f32) as usize % len]
}

#[derive(Debug, Default, Clone)]
pub struct ChipVoice {
    phases: [f32; 2],
    sample: f32,
}

impl ChipVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; 2];
        self.sample = 0.0;
    }

    /// Renders into `out`, phases normalized to one cycle of the table.
    pub fn render(&mut self, params: &VoiceParams, lfo: &[f32], out: &mut [f32]) {
        if params.reset_phases {
            self.phases = [0.0; 2];
        }

        let table = params.wave;
        if table.is_empty() {
            out.fill(0.0);
            return;
        }

        let mut phase_a = self.phases[0];
        let mut phase_b = self.phases[1];
        let mut phase_delta_a = params.phase_deltas[0];
        let mut phase_delta_b = params.phase_deltas[1];
        let mut volume = params.volume_starts[0];
        let mut filter = params.filter;

        for (out_sample, y) in out.iter_mut().zip(lfo.iter()) {
            let vibrato = 1.0 + params.vibrato_scale * y;
            let tremolo = 1.0 + params.tremolo_scale * (y - 1.0);

            let a = stepped_lookup(table, phase_a);
            let b = stepped_lookup(table, phase_b);
            let input = (a + b * params.voice_b_gain) * volume * tremolo;
            one_pole(&mut self.sample, input, filter);
            *out_sample = self.sample;

            phase_a = wrap_phase(phase_a + phase_delta_a * vibrato);
            phase_b = wrap_phase(phase_b + phase_delta_b * vibrato);
            phase_delta_a *= params.phase_delta_scale;
            phase_delta_b *= params.phase_delta_scale;
            volume += params.volume_deltas[0];
            filter = (filter * params.filter_scale).min(1.0);
        }

        self.phases = [phase_a, phase_b];
    }
}
