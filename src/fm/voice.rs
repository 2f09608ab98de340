//! FM voice and the compiled operator routings it renders with.

use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

use super::algorithms::{Algorithm, NUM_ALGORITHMS};
use super::feedback::{Feedback, NUM_FEEDBACKS};
use super::OPERATOR_COUNT;
use crate::resources::sine::{sine_wave, SINE_WAVE_LENGTH, SINE_WAVE_MASK};
use crate::synth::params::VoiceParams;

#[derive(Debug, Clone, Copy, Default)]
struct Sources {
    count: usize,
    ops: [usize; OPERATOR_COUNT],
}

impl Sources {
    fn from_slice(ops: &[usize]) -> Self {
        let mut sources = Self::default();
        for op in ops.iter().take(OPERATOR_COUNT) {
            sources.ops[sources.count] = *op;
            sources.count += 1;
        }
        sources
    }

    #[inline]
    fn as_slice(&self) -> &[usize] {
        &self.ops[..self.count]
    }
}

/// Modulation and feedback sources of each operator, flattened for the render loop.
#[derive(Debug, Clone)]
pub struct FmRouting {
    modulators: [Sources; OPERATOR_COUNT],
    feedback: [Sources; OPERATOR_COUNT],
    carrier_count: usize,
}

impl FmRouting {
    fn compile(algorithm: Algorithm, feedback: Feedback) -> Self {
        let mut routing = Self {
            modulators: [Sources::default(); OPERATOR_COUNT],
            feedback: [Sources::default(); OPERATOR_COUNT],
            carrier_count: algorithm.carrier_count(),
        };
        for op in 0..OPERATOR_COUNT {
            routing.modulators[op] = Sources::from_slice(algorithm.modulated_by(op));
            routing.feedback[op] = Sources::from_slice(feedback.sources(op));
        }
        routing
    }

    #[inline]
    pub fn carrier_count(&self) -> usize {
        self.carrier_count
    }
}

static ROUTINGS: Once<Vec<FmRouting>> = Once::new();

/// Compiled routing of an algorithm and feedback pair.
pub fn fm_routing(algorithm: Algorithm, feedback: Feedback) -> &'static FmRouting {
    let routings = ROUTINGS.call_once(|| {
        let mut routings = Vec::with_capacity(NUM_ALGORITHMS * NUM_FEEDBACKS);
        for algorithm in Algorithm::ALL {
            for feedback in Feedback::ALL {
                routings.push(FmRouting::compile(*algorithm, *feedback));
            }
        }
        routings
    });

    &routings[algorithm.index() * NUM_FEEDBACKS + feedback.index()]
}

/// Reads the sine table at a phase in table samples, with linear interpolation.
#[inline]
fn sine_lookup(table: &[f32], phase: f32) -> f32 {
    let integral = phase.floor();
    let fractional = phase - integral;
    let index = (integral as i32 & SINE_WAVE_MASK as i32) as usize;
    let a = table[index];
    let b = table[index + 1];

    a + (b - a) * fractional
}

#[inline]
fn wrap_table_phase(phase: f32) -> f32 {
    const LENGTH: f32 = SINE_WAVE_LENGTH as f32;
    phase - (phase * (1.0 / LENGTH)).floor() * LENGTH
}

#[derive(Debug, Default, Clone)]
pub struct FmVoice {
    /// Phases in sine table samples.
    phases: [f32; OPERATOR_COUNT],
    /// Unscaled outputs of the last sample, read back as feedback.
    outputs: [f32; OPERATOR_COUNT],
}

impl FmVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; OPERATOR_COUNT];
        self.outputs = [0.0; OPERATOR_COUNT];
    }

    /// Renders the operators, summing the first `CARRIER_COUNT` of them into `out`.
    ///
    /// Modulator volumes in `params` are expressed in sine table samples.
    pub fn render<const CARRIER_COUNT: usize>(
        &mut self,
        routing: &FmRouting,
        params: &VoiceParams,
        lfo: &[f32],
        out: &mut [f32],
    ) {
        debug_assert_eq!(routing.carrier_count(), CARRIER_COUNT);

        if params.reset_phases {
            self.reset();
        }

        let sine = sine_wave();
        let mut phase_deltas = params.phase_deltas;
        let mut volumes = params.volume_starts;
        let mut feedback = params.feedback_start;
        let mut scaled = [0.0f32; OPERATOR_COUNT];

        for (out_sample, y) in out.iter_mut().zip(lfo.iter()) {
            let vibrato = 1.0 + params.vibrato_scale * y;
            let tremolo = 1.0 + params.tremolo_scale * (y - 1.0);

            for op in (0..OPERATOR_COUNT).rev() {
                let mut phase = self.phases[op];
                for modulator in routing.modulators[op].as_slice() {
                    phase += scaled[*modulator];
                }
                for source in routing.feedback[op].as_slice() {
                    phase += self.outputs[*source] * feedback;
                }
                let output = sine_lookup(sine, phase);
                self.outputs[op] = output;
                scaled[op] = output * volumes[op];
            }

            let mut sample = 0.0;
            for carrier in scaled.iter().take(CARRIER_COUNT) {
                sample += carrier;
            }
            *out_sample = sample * tremolo;

            for op in 0..OPERATOR_COUNT {
                self.phases[op] = wrap_table_phase(self.phases[op] + phase_deltas[op] * vibrato);
                phase_deltas[op] *= params.phase_delta_scale;
                volumes[op] += params.volume_deltas[op];
            }
            feedback += params.feedback_delta;
        }
    }
}
