//! Tests for the FM operators and their routing

mod songs;
mod wav_writer;

use chiptrack_dsp::fm::algorithms::{Algorithm, NUM_ALGORITHMS};
use chiptrack_dsp::fm::feedback::{Feedback, NUM_FEEDBACKS};
use chiptrack_dsp::fm::voice::{fm_routing, FmVoice};
use chiptrack_dsp::fm::OPERATOR_COUNT;
use chiptrack_dsp::resources::sine::SINE_WAVE_LENGTH;
use chiptrack_dsp::song::instrument::Instrument;
use chiptrack_dsp::synth::params::VoiceParams;
use chiptrack_dsp::synth::Synth;
use chiptrack_dsp::utils::rms;

use songs::*;

const BLOCK_SIZE: usize = 256;

#[test]
fn algorithms_are_acyclic() {
    assert_eq!(Algorithm::ALL.len(), NUM_ALGORITHMS);
    for algorithm in Algorithm::ALL {
        let carriers = algorithm.carrier_count();
        assert!((1..=OPERATOR_COUNT).contains(&carriers));

        for op in 0..OPERATOR_COUNT {
            assert_eq!(algorithm.is_carrier(op), op < carriers);
            assert!(algorithm.associated_carrier(op) < carriers);
            // Operators render from the last one, so modulators always come later.
            assert!(algorithm.modulated_by(op).iter().all(|m| *m > op));
        }
        for op in carriers..OPERATOR_COUNT {
            let modulates = (0..OPERATOR_COUNT).any(|target| algorithm.modulated_by(target).contains(&op));
            assert!(modulates, "{} leaves operator {op} unused", algorithm.name());
        }
    }
}

#[test]
fn feedback_sources_exist() {
    assert_eq!(Feedback::ALL.len(), NUM_FEEDBACKS);
    for feedback in Feedback::ALL {
        let sources: usize = (0..OPERATOR_COUNT).map(|op| feedback.sources(op).len()).sum();
        assert!(sources > 0, "{}", feedback.name());
        for op in 0..OPERATOR_COUNT {
            assert!(feedback.sources(op).iter().all(|s| *s < OPERATOR_COUNT));
        }
    }
}

#[test]
fn routings_are_shared() {
    let first = fm_routing(Algorithm::Stack, Feedback::Self12);
    let second = fm_routing(Algorithm::Stack, Feedback::Self12);

    assert!(core::ptr::eq(first, second));
    assert_eq!(first.carrier_count(), 1);
    assert_eq!(fm_routing(Algorithm::Additive, Feedback::Self1).carrier_count(), 4);
}

fn sine_params(frequency: f32) -> VoiceParams {
    let mut params = VoiceParams {
        active: true,
        phase_delta_scale: 1.0,
        ..VoiceParams::default()
    };
    params.phase_deltas[0] = frequency / SAMPLE_RATE_HZ * SINE_WAVE_LENGTH as f32;
    params.volume_starts[0] = 0.5;
    params
}

#[test]
fn lone_carrier_is_a_sine() {
    let routing = fm_routing(Algorithm::OneByThree, Feedback::Self1);
    let params = sine_params(441.0);
    let lfo = [0.0; BLOCK_SIZE];
    let mut voice = FmVoice::new();
    let mut out = [0.0; BLOCK_SIZE * 4];

    for block in out.chunks_mut(BLOCK_SIZE) {
        voice.render::<1>(routing, &params, &lfo, block);
    }

    // 441 Hz is exactly one cycle per 100 samples.
    let level = rms(&out[..1000]);
    assert!((level - 0.5 / 2.0f32.sqrt()).abs() < 0.01);
    assert!(out[0].abs() < 1e-3);
    assert!((out[25] - 0.5).abs() < 0.01);
    assert!((out[125] - out[25]).abs() < 1e-3);
}

#[test]
fn modulation_changes_the_carrier() {
    let routing = fm_routing(Algorithm::OneByThree, Feedback::Self1);
    let lfo = [0.0; BLOCK_SIZE];
    let plain = sine_params(441.0);
    let mut modulated = plain;
    modulated.phase_deltas[1] = plain.phase_deltas[0] * 2.0;
    modulated.volume_starts[1] = SINE_WAVE_LENGTH as f32 * 0.5;

    let mut plain_out = [0.0; BLOCK_SIZE];
    let mut modulated_out = [0.0; BLOCK_SIZE];
    FmVoice::new().render::<1>(routing, &plain, &lfo, &mut plain_out);
    FmVoice::new().render::<1>(routing, &modulated, &lfo, &mut modulated_out);

    assert!(plain_out
        .iter()
        .zip(modulated_out.iter())
        .any(|(a, b)| (a - b).abs() > 0.1));
    // Modulators are not heard.
    assert!(modulated_out.iter().all(|s| s.abs() <= 0.5 + 1e-4));
}

#[test]
fn feedback_needs_a_running_operator() {
    let routing = fm_routing(Algorithm::OneByThree, Feedback::Self1);
    let lfo = [0.0; BLOCK_SIZE];
    let mut params = sine_params(441.0);
    params.feedback_start = SINE_WAVE_LENGTH as f32 * 0.3;

    let mut plain_out = [0.0; BLOCK_SIZE];
    let mut feedback_out = [0.0; BLOCK_SIZE];
    FmVoice::new().render::<1>(routing, &sine_params(441.0), &lfo, &mut plain_out);
    FmVoice::new().render::<1>(routing, &params, &lfo, &mut feedback_out);

    assert!(plain_out
        .iter()
        .zip(feedback_out.iter())
        .any(|(a, b)| (a - b).abs() > 0.05));
}

#[test]
fn fm_instrument_renders() {
    let mut synth = Synth::new(sample_rate());
    synth.set_song(single_note(Instrument::fm(bell()), A4));
    synth.snap_to_start();
    synth.play();

    let frames = synth.samples_per_bar();
    let (left, right) = synth.render_offline(frames);
    wav_writer::write("fm/bell.wav", 44100, &left, &right).ok();

    assert!(rms(&left) > 0.01);
    assert!(left.iter().all(|s| s.is_finite()));
}
