//! Tests for the operator envelopes

use chiptrack_dsp::envelope::{envelope_value, Envelope};

const STEPS: usize = 400;

fn seconds(step: usize) -> f32 {
    step as f32 * 0.005
}

#[test]
fn steady_and_custom() {
    for step in 0..STEPS {
        let t = seconds(step);
        for volume in [0.0, 0.25, 1.0] {
            assert_eq!(envelope_value(Envelope::Steady, t, t * 2.0, volume), 1.0);
            assert_eq!(envelope_value(Envelope::Custom, t, t * 2.0, volume), volume);
        }
    }
}

#[test]
fn flares_rise_then_fall() {
    for envelope in [Envelope::Flare1, Envelope::Flare2, Envelope::Flare3] {
        assert!(envelope_value(envelope, 0.0, 0.0, 1.0).abs() < 1e-6);

        let values: Vec<f32> = (0..STEPS)
            .map(|step| envelope_value(envelope, seconds(step), 0.0, 1.0))
            .collect();
        let top = values
            .iter()
            .enumerate()
            .fold(0, |top, (i, v)| if *v > values[top] { i } else { top });

        assert!(top > 0);
        assert!(values[..=top].windows(2).all(|pair| pair[1] >= pair[0]));
        assert!(values[top..].windows(2).all(|pair| pair[1] <= pair[0]));
    }
}

#[test]
fn custom_flare_attack_follows_volume() {
    let quiet = envelope_value(Envelope::CustomFlare, 0.06, 0.0, 0.0);
    let loud = envelope_value(Envelope::CustomFlare, 0.06, 0.0, 1.0);

    assert!(envelope_value(Envelope::CustomFlare, 0.0, 0.0, 1.0).abs() < 1e-6);
    assert!(loud < quiet);
}

#[test]
fn plucks_decay() {
    for envelope in [Envelope::Pluck1, Envelope::Pluck2, Envelope::Pluck3] {
        assert_eq!(envelope_value(envelope, 0.0, 0.0, 1.0), 1.0);
        let values: Vec<f32> = (0..STEPS)
            .map(|step| envelope_value(envelope, seconds(step), 0.0, 1.0))
            .collect();
        assert!(values.windows(2).all(|pair| pair[1] < pair[0]));
    }
    // Faster plucks lose more in the same time.
    assert!(
        envelope_value(Envelope::Pluck1, 0.5, 0.0, 1.0)
            < envelope_value(Envelope::Pluck3, 0.5, 0.0, 1.0)
    );
}

#[test]
fn swells_grow() {
    for envelope in [Envelope::Swell1, Envelope::Swell2, Envelope::Swell3] {
        assert_eq!(envelope_value(envelope, 0.0, 0.0, 1.0), 0.0);
        let values: Vec<f32> = (0..STEPS)
            .map(|step| envelope_value(envelope, seconds(step), 0.0, 1.0))
            .collect();
        assert!(values.windows(2).all(|pair| pair[1] > pair[0]));
        assert!(values.iter().all(|v| *v < 1.0));
    }
}

#[test]
fn punch_settles_at_one() {
    assert_eq!(envelope_value(Envelope::Punch, 0.0, 0.0, 1.0), 2.0);
    assert_eq!(envelope_value(Envelope::Punch, 0.5, 0.0, 1.0), 1.0);
}

#[test]
fn tremolos_follow_beats() {
    for envelope in [Envelope::Tremolo1, Envelope::Tremolo2, Envelope::Tremolo3] {
        assert!(envelope_value(envelope, 0.0, 0.0, 1.0).abs() < 1e-6);
        for step in 0..STEPS {
            let value = envelope_value(envelope, 0.0, step as f32 * 0.01, 1.0);
            assert!((-1e-6..=1.0 + 1e-6).contains(&value));
        }
    }
    // One full cycle per beat.
    assert!(envelope_value(Envelope::Tremolo3, 0.0, 0.5, 1.0) > 0.999);
    assert!(envelope_value(Envelope::Tremolo3, 0.0, 1.0, 1.0) < 1e-3);
}

#[test]
fn only_custom_envelopes_follow_volume() {
    for envelope in Envelope::ALL {
        let follows = envelope.follows_volume();
        let differs = (0..20).any(|step| {
            let t = seconds(step * 10) + 0.01;
            envelope_value(*envelope, t, t, 0.2) != envelope_value(*envelope, t, t, 0.9)
        });
        assert_eq!(follows, differs, "{envelope:?}");
    }
}
