//! Noise waves of the drum instruments.
//!
//! Each wave is 32768 samples long and loops. Retro-style waves come from
//! linear feedback shift registers, the others are drawn as a noise spectrum and
//! converted with an inverse FFT.

// Based on MIT-licensed code (c) 2018 by John Nesky

use alloc::boxed::Box;
use alloc::vec;

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

use crate::song::settings::indexed_enum;
use crate::utils::fft::inverse_real_fft;
use crate::utils::random::Random;
use crate::utils::rms;

pub const DRUM_WAVE_LENGTH: usize = 32768;
pub const DRUM_WAVE_MASK: usize = DRUM_WAVE_LENGTH - 1;

/// Semitones between two consecutive drum pitches.
pub const DRUM_INTERVAL: f32 = 6.0;
/// Number of pitches of a drum channel.
pub const DRUM_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrumKind {
    #[default]
    Retro = 0,
    White = 1,
    Clang = 2,
    Buzz = 3,
    Hollow = 4,
    Shine = 5,
    Deep = 6,
    Cutter = 7,
    Metallic = 8,
    Snare = 9,
}

indexed_enum!(DrumKind {
    Retro, White, Clang, Buzz, Hollow, Shine, Deep, Cutter, Metallic, Snare
});

pub const NUM_DRUM_KINDS: usize = 10;

const DRUM_VOLUMES: [f32; NUM_DRUM_KINDS] = [0.25, 1.0, 0.4, 0.3, 1.5, 1.0, 1.5, 0.3, 0.35, 1.0];
const DRUM_BASE_PITCHES: [f32; NUM_DRUM_KINDS] =
    [69.0, 69.0, 69.0, 69.0, 96.0, 69.0, 120.0, 69.0, 69.0, 69.0];
const DRUM_PITCH_FILTER_MULTS: [f32; NUM_DRUM_KINDS] =
    [100.0, 8.0, 100.0, 100.0, 1.0, 100.0, 1.0, 100.0, 100.0, 8.0];
const DRUM_WAVE_IS_SOFT: [bool; NUM_DRUM_KINDS] =
    [false, true, false, false, true, false, true, false, false, true];

impl DrumKind {
    #[inline]
    pub fn volume(self) -> f32 {
        DRUM_VOLUMES[self.index()]
    }

    /// Pitch of drum pitch `0`.
    #[inline]
    pub fn base_pitch(self) -> f32 {
        DRUM_BASE_PITCHES[self.index()]
    }

    /// Lowpass coefficient per unit of phase increment.
    #[inline]
    pub fn pitch_filter_mult(self) -> f32 {
        DRUM_PITCH_FILTER_MULTS[self.index()]
    }

    /// Soft drums are filtered and fade faster as their pitch rises.
    #[inline]
    pub fn is_soft(self) -> bool {
        DRUM_WAVE_IS_SOFT[self.index()]
    }

    fn source(self) -> DrumSource {
        match self {
            DrumKind::Retro => DrumSource::Lfsr(Lfsr::Add(1 << 14)),
            DrumKind::White => DrumSource::White,
            DrumKind::Clang => DrumSource::Lfsr(Lfsr::Add(2 << 14)),
            DrumKind::Buzz => DrumSource::Lfsr(Lfsr::Add(10 << 2)),
            DrumKind::Hollow => DrumSource::Spectrum(HOLLOW_BANDS),
            DrumKind::Shine => DrumSource::Spectrum(SHINE_BANDS),
            DrumKind::Deep => DrumSource::Spectrum(DEEP_BANDS),
            DrumKind::Cutter => DrumSource::Lfsr(Lfsr::Galois(0xb400)),
            DrumKind::Metallic => DrumSource::Lfsr(Lfsr::Xor { tap: 6 }),
            DrumKind::Snare => DrumSource::Lfsr(Lfsr::Xor { tap: 3 }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Lfsr {
    /// 15-bit register whose feedback `bit0 ^ bit1` adds the given value.
    Add(u32),
    /// 15-bit register fed back with `bit0 ^ bit{tap}` into bit 14.
    Xor { tap: u32 },
    /// 16-bit Galois register with the given tap mask.
    Galois(u16),
}

/// Band of a drawn noise spectrum, in octaves of the bin index.
#[derive(Debug, Clone, Copy)]
struct NoiseBand {
    low_octave: f32,
    high_octave: f32,
    low_power: f32,
    high_power: f32,
    overall_slope: f32,
}

impl NoiseBand {
    const fn new(
        low_octave: f32,
        high_octave: f32,
        low_power: f32,
        high_power: f32,
        overall_slope: f32,
    ) -> Self {
        Self {
            low_octave,
            high_octave,
            low_power,
            high_power,
            overall_slope,
        }
    }
}

const HOLLOW_BANDS: &[NoiseBand] = &[
    NoiseBand::new(10.0, 11.0, 1.0, 1.0, 0.0),
    NoiseBand::new(11.0, 14.0, -2.0, -2.0, 0.0),
];
const SHINE_BANDS: &[NoiseBand] = &[
    NoiseBand::new(11.0, 12.0, 0.0, 0.0, 0.0),
    NoiseBand::new(12.0, 14.0, -1.0, -3.0, 0.0),
];
const DEEP_BANDS: &[NoiseBand] = &[NoiseBand::new(1.0, 10.0, 0.0, 0.0, -0.5)];

#[derive(Debug, Clone, Copy)]
enum DrumSource {
    Lfsr(Lfsr),
    White,
    Spectrum(&'static [NoiseBand]),
}

fn render_lfsr(lfsr: Lfsr, wave: &mut [f32]) {
    let mut register: u32 = 1;
    for sample in wave.iter_mut() {
        *sample = (register & 1) as f32 * 2.0 - 1.0;
        register = match lfsr {
            Lfsr::Add(feedback) => {
                let mut next = register >> 1;
                if ((register + next) & 1) == 1 {
                    next += feedback;
                }
                next
            }
            Lfsr::Xor { tap } => {
                let bit = (register ^ (register >> tap)) & 1;
                (register >> 1) | (bit << 14)
            }
            Lfsr::Galois(taps) => {
                let lsb = register & 1;
                let next = register >> 1;
                if lsb == 1 {
                    next ^ taps as u32
                } else {
                    next
                }
            }
        };
    }
}

/// Writes random-phase spectral coefficients whose log-magnitude is interpolated
/// between `low_power` and `high_power` across the band.
fn draw_noise_spectrum(wave: &mut [f32], band: &NoiseBand, random: &mut Random) {
    const REFERENCE_OCTAVE: i32 = 11;
    let reference_index = (1 << REFERENCE_OCTAVE) as f32;
    let length = wave.len();
    let low_index = band.low_octave.exp2() as usize;
    let high_index = (band.high_octave.exp2() as usize).min(length / 2);

    for i in low_index.max(1)..high_index {
        let octave = (i as f32).log2();
        let mut amplitude = (band.low_power
            + (band.high_power - band.low_power) * (octave - band.low_octave)
                / (band.high_octave - band.low_octave))
            .exp2();
        amplitude *= (i as f32 / reference_index).powf(band.overall_slope);
        let radians = random.get_float() * core::f32::consts::TAU;
        wave[i] = radians.cos() * amplitude;
        wave[length - i] = radians.sin() * amplitude;
    }
}

fn build_drum_wave(kind: DrumKind) -> Box<[f32]> {
    let mut wave = vec![0.0f32; DRUM_WAVE_LENGTH];
    let mut random = Random::new(0x5eed + kind.index() as u32);

    match kind.source() {
        DrumSource::Lfsr(lfsr) => render_lfsr(lfsr, &mut wave),
        DrumSource::White => {
            for sample in wave.iter_mut() {
                *sample = random.get_bipolar();
            }
        }
        DrumSource::Spectrum(bands) => {
            for band in bands {
                draw_noise_spectrum(&mut wave, band, &mut random);
            }
            inverse_real_fft(&mut wave);
            let level = rms(&wave);
            if level > 0.0 {
                let scale = 1.0 / level;
                for sample in wave.iter_mut() {
                    *sample *= scale;
                }
            }
        }
    }

    log::debug!("built drum wave {:?}", kind);
    wave.into_boxed_slice()
}

const EMPTY_WAVE: Once<Box<[f32]>> = Once::new();
static DRUM_WAVES: [Once<Box<[f32]>>; NUM_DRUM_KINDS] = [EMPTY_WAVE; NUM_DRUM_KINDS];

/// Noise wave of a drum kind, built on first use.
pub fn drum_wave(kind: DrumKind) -> &'static [f32] {
    DRUM_WAVES[kind.index()].call_once(|| build_drum_wave(kind))
}
