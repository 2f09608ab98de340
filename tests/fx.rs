//! Tests for the effects of the stereo bus

mod wav_writer;

use chiptrack_dsp::fx::limiter::Limiter;
use chiptrack_dsp::fx::master::MasterFilter;
use chiptrack_dsp::fx::reverb::{reverb_amount, Reverb, REVERB_MAX};
use chiptrack_dsp::song::settings::SampleRateMode;
use chiptrack_dsp::utils::rms;

const SAMPLE_RATE_HZ: f32 = 44100.0;

#[test]
fn reverb_off_adds_nothing() {
    let mut reverb = Reverb::new();
    let send: Vec<f32> = (0..4096).map(|i| ((i % 64) as f32 / 32.0) - 1.0).collect();
    let mut out_left = vec![0.0; send.len()];
    let mut out_right = vec![0.0; send.len()];

    reverb.process(reverb_amount(0), &send, &send, &mut out_left, &mut out_right);

    assert!(out_left.iter().chain(out_right.iter()).all(|s| *s == 0.0));
}

#[test]
fn reverb_impulse_tail() {
    let window = 16384;
    let windows = 8;
    let mut send = vec![0.0; window * windows];
    send[0] = 1.0;
    let mut out_left = vec![0.0; send.len()];
    let mut out_right = vec![0.0; send.len()];

    let mut reverb = Reverb::new();
    reverb.process(
        reverb_amount(REVERB_MAX),
        &send,
        &send,
        &mut out_left,
        &mut out_right,
    );
    wav_writer::write("fx/reverb_impulse.wav", 44100, &out_left, &out_right).ok();

    let energy: Vec<f32> = out_left.chunks(window).map(rms).collect();
    let loudest = energy.iter().fold(0.0f32, |a, b| a.max(*b));
    assert!(loudest > 0.0);
    assert!(energy[windows - 1] < loudest * 0.5, "{energy:?}");
    assert!(out_left.iter().all(|s| s.is_finite()));
    assert_eq!(out_left, out_right);
}

#[test]
fn reverb_amount_curve() {
    assert_eq!(reverb_amount(0), 0.0);
    assert!((reverb_amount(REVERB_MAX) - 0.425).abs() < 1e-6);
    assert!(reverb_amount(1) < reverb_amount(2));
    assert_eq!(reverb_amount(REVERB_MAX + 3), reverb_amount(REVERB_MAX));
}

#[test]
fn limiter_divides_by_peak() {
    let mut limiter = Limiter::new(SAMPLE_RATE_HZ);
    let mut left = [4.0];
    let mut right = [-4.0];
    limiter.process(1.0, &mut left, &mut right);

    assert!((left[0] - 4.0 / 3.25).abs() < 1e-6);
    assert!((right[0] + 4.0 / 3.25).abs() < 1e-6);
    assert_eq!(limiter.limit(), 4.0);
}

#[test]
fn limiter_boosts_quiet_signal() {
    let mut limiter = Limiter::new(SAMPLE_RATE_HZ);
    let mut left = [0.1; 16];
    let mut right = [0.1; 16];
    limiter.process(1.0, &mut left, &mut right);
    assert!(left.iter().all(|s| (s - 0.1 / 0.325).abs() < 1e-5));

    limiter.reset();
    let mut left = [0.1; 16];
    let mut right = [0.1; 16];
    limiter.process(2.0, &mut left, &mut right);
    assert!(left.iter().all(|s| (s - 0.2 / 0.325).abs() < 1e-5));
}

#[test]
fn limiter_peak_decays() {
    let mut limiter = Limiter::new(SAMPLE_RATE_HZ);
    limiter.process(1.0, &mut [1.0], &mut [0.0]);

    let mut left = vec![0.0; 22050];
    let mut right = vec![0.0; 22050];
    limiter.process(1.0, &mut left, &mut right);

    assert!((limiter.limit() - 0.75).abs() < 5e-3, "{}", limiter.limit());
}

#[test]
fn master_filter_passes_through() {
    let mut master = MasterFilter::new();
    let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.37).sin()).collect();
    let mut left = input.clone();
    let mut right = input.clone();

    master.process(0, SampleRateMode::Full, &mut left, &mut right);

    assert_eq!(left, input);
    assert_eq!(right, input);
}

#[test]
fn muff_rises_slowly() {
    let mut master = MasterFilter::new();
    let mut left = vec![1.0; 16];
    let mut right = vec![1.0; 16];

    master.process(4, SampleRateMode::Full, &mut left, &mut right);

    assert!((left[0] - 0.25).abs() < 1e-6);
    assert!(left.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(left[15] < 1.0 && left[15] > 0.98);
}

#[test]
fn sample_and_hold() {
    let mut master = MasterFilter::new();
    let mut left: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let mut right = left.clone();

    master.process(0, SampleRateMode::Quarter, &mut left, &mut right);

    let expected: Vec<f32> = (0..16).map(|i| (i / 4 * 4) as f32).collect();
    assert_eq!(left, expected);
    assert_eq!(right, expected);
}

#[test]
fn hold_spans_blocks() {
    let mut master = MasterFilter::new();
    let mut left: Vec<f32> = (0..6).map(|i| i as f32).collect();
    let mut right = left.clone();
    master.process(0, SampleRateMode::Eighth, &mut left, &mut right);

    let mut left_next: Vec<f32> = (6..12).map(|i| i as f32).collect();
    let mut right_next = left_next.clone();
    master.process(0, SampleRateMode::Eighth, &mut left_next, &mut right_next);

    assert_eq!(left, vec![0.0; 6]);
    assert_eq!(left_next, vec![0.0, 0.0, 8.0, 8.0, 8.0, 8.0]);
}
