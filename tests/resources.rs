//! Tests for the wavetables and noise waves

mod wav_writer;

use chiptrack_dsp::resources::drums::{drum_wave, DrumKind, DRUM_WAVE_LENGTH};
use chiptrack_dsp::resources::sine::{sine_wave, SINE_WAVE_LENGTH};
use chiptrack_dsp::resources::waves::{chip_wave, pwm_wave, ChipWave, PulseWidth, WaveBank};
use chiptrack_dsp::utils::fft::inverse_real_fft;
use chiptrack_dsp::utils::rms;

fn mean(table: &[f32]) -> f32 {
    table.iter().sum::<f32>() / table.len() as f32
}

#[test]
fn spectrum_drums_are_normalized() {
    for kind in [DrumKind::Hollow, DrumKind::Shine, DrumKind::Deep] {
        let wave = drum_wave(kind);
        assert_eq!(wave.len(), DRUM_WAVE_LENGTH);

        let level = rms(wave);
        assert!((level - 1.0).abs() < 0.05, "{kind:?} has rms {level}");
        assert!(wave.iter().all(|s| s.is_finite()));

        wav_writer::write(format!("drums/{kind:?}.wav"), 44100, wave, wave).ok();
    }
}

#[test]
fn every_drum_has_energy() {
    for kind in DrumKind::ALL {
        let wave = drum_wave(*kind);
        assert_eq!(wave.len(), DRUM_WAVE_LENGTH);
        let level = rms(wave);
        assert!(level > 0.3 && level < 1.5, "{kind:?} has rms {level}");
    }
}

#[test]
fn lfsr_drums_are_binary() {
    for kind in [DrumKind::Retro, DrumKind::Clang, DrumKind::Buzz, DrumKind::Snare] {
        assert!(drum_wave(kind).iter().all(|s| *s == 1.0 || *s == -1.0));
    }
}

#[test]
fn drum_waves_are_built_once() {
    let first = drum_wave(DrumKind::White);
    let second = drum_wave(DrumKind::White);

    assert!(core::ptr::eq(first, second));
    assert!(first.iter().all(|s| (-1.0..1.0).contains(s)));
}

#[test]
fn chip_waves_are_centered() {
    for bank in [WaveBank::Standard, WaveBank::Smooth] {
        for wave in ChipWave::ALL {
            let table = chip_wave(bank, *wave);
            assert!(mean(&table.samples).abs() < 1e-5, "{wave:?} in {bank:?}");
            assert!(table.volume > 0.0);
        }
    }
    let standard = chip_wave(WaveBank::Standard, ChipWave::Triangle);
    let smooth = chip_wave(WaveBank::Smooth, ChipWave::Triangle);
    assert_eq!(smooth.samples.len(), standard.samples.len() * 2);
}

#[test]
fn pwm_duty_cycles() {
    for width in PulseWidth::ALL {
        let table = pwm_wave(*width);
        assert!(mean(&table.samples).abs() < 1e-5);

        let high = table.samples.iter().filter(|s| **s > 0.0).count();
        let duty = high as f32 / table.samples.len() as f32;
        assert!((duty - width.duty()).abs() < 1e-6, "{width:?}");
    }
}

#[test]
fn sine_table_has_guard_sample() {
    let table = sine_wave();

    assert_eq!(table.len(), SINE_WAVE_LENGTH + 1);
    assert_eq!(table[SINE_WAVE_LENGTH], table[0]);
    assert!((table[SINE_WAVE_LENGTH / 4] - 1.0).abs() < 1e-5);
    assert!((table[SINE_WAVE_LENGTH * 3 / 4] + 1.0).abs() < 1e-5);
}

#[test]
fn inverse_fft_of_dc() {
    let mut array = vec![0.0f32; 64];
    array[0] = 1.0;

    inverse_real_fft(&mut array);

    assert!(array.iter().all(|s| (s - 1.0).abs() < 1e-6));
}

#[test]
fn inverse_fft_of_single_bin() {
    let length = 256;
    let mut array = vec![0.0f32; length];
    array[5] = 1.0;

    inverse_real_fft(&mut array);

    assert!(mean(&array).abs() < 1e-4);
    let crossings = array
        .windows(2)
        .filter(|pair| pair[0].signum() != pair[1].signum())
        .count();
    // Five cycles cross zero ten times, minus the wrap around.
    assert!((9..=10).contains(&crossings), "{crossings} crossings");
}

#[test]
#[should_panic]
fn inverse_fft_rejects_odd_length() {
    let mut array = vec![0.0f32; 100];
    inverse_real_fft(&mut array);
}
