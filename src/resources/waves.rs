//! Chip and pulse wavetables.
//!
//! Tables are built on first use and DC-centered.

use alloc::boxed::Box;
use alloc::vec::Vec;

use spin::Once;

use crate::song::settings::indexed_enum;
use crate::utils::center;

/// A single-cycle wave with its loudness compensation.
#[derive(Debug)]
pub struct Wavetable {
    pub samples: Box<[f32]>,
    pub volume: f32,
}

impl Wavetable {
    fn centered(mut samples: Vec<f32>, volume: f32) -> Self {
        center(&mut samples);
        Self {
            samples: samples.into_boxed_slice(),
            volume,
        }
    }

    /// Sample under a normalized phase, without interpolation.
    #[inline]
    pub fn at(&self, phase: f32) -> f32 {
        let len = self.samples.len();
        self.samples[(phase * len as f32) as usize % len]
    }
}

/// Which of the two near-identical chip banks a mix preset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveBank {
    /// Raw stepped shapes.
    Standard,
    /// The same shapes at twice the resolution, with interpolated midpoints.
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChipWave {
    #[default]
    Triangle = 0,
    Square = 1,
    PulseWide = 2,
    PulseNarrow = 3,
    Sawtooth = 4,
    DoubleSaw = 5,
    DoublePulse = 6,
    Spiky = 7,
    Plateau = 8,
}

indexed_enum!(ChipWave {
    Triangle, Square, PulseWide, PulseNarrow, Sawtooth, DoubleSaw, DoublePulse, Spiky, Plateau
});

pub const NUM_CHIP_WAVES: usize = 9;

const CHIP_WAVE_VOLUMES: [f32; NUM_CHIP_WAVES] = [1.0, 0.5, 0.5, 0.5, 0.65, 0.5, 0.4, 0.4, 0.5];

fn chip_wave_shape(wave: ChipWave) -> Vec<f32> {
    match wave {
        ChipWave::Triangle => (0..32)
            .map(|i| {
                let step = if i < 8 {
                    2 * i + 1
                } else if i < 24 {
                    31 - 2 * i
                } else {
                    2 * i - 63
                };
                step as f32 / 15.0
            })
            .collect(),
        ChipWave::Square => alloc::vec![1.0, -1.0],
        ChipWave::PulseWide => alloc::vec![1.0, -1.0, -1.0, -1.0],
        ChipWave::PulseNarrow => alloc::vec![1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0],
        ChipWave::Sawtooth => (0..32).map(|i| (2 * i - 31) as f32 / 31.0).collect(),
        ChipWave::DoubleSaw => alloc::vec![
            0.0, -0.2, -0.4, -0.6, -0.8, -1.0, 1.0, -0.8, -0.6, -0.4, -0.2, 1.0, 0.8, 0.6, 0.4, 0.2,
        ],
        ChipWave::DoublePulse => alloc::vec![
            1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0,
        ],
        ChipWave::Spiky => alloc::vec![1.0, -1.0, 1.0, -1.0, 1.0, 0.0],
        ChipWave::Plateau => alloc::vec![
            0.0, 0.2, 0.4, 0.5, 0.6, 0.7, 0.8, 0.85, 0.9, 0.95, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            -0.2, -0.4, -0.5, -0.6, -0.7, -0.8, -0.85, -0.9, -0.95, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0,
        ],
    }
}

fn double_resolution(shape: &[f32]) -> Vec<f32> {
    let len = shape.len();
    let mut doubled = Vec::with_capacity(len * 2);
    for (i, sample) in shape.iter().enumerate() {
        doubled.push(*sample);
        doubled.push((*sample + shape[(i + 1) % len]) * 0.5);
    }
    doubled
}

static STANDARD_BANK: Once<Vec<Wavetable>> = Once::new();
static SMOOTH_BANK: Once<Vec<Wavetable>> = Once::new();

/// Chip wavetable of a bank.
pub fn chip_wave(bank: WaveBank, wave: ChipWave) -> &'static Wavetable {
    let tables = match bank {
        WaveBank::Standard => STANDARD_BANK.call_once(|| {
            ChipWave::ALL
                .iter()
                .map(|w| Wavetable::centered(chip_wave_shape(*w), CHIP_WAVE_VOLUMES[w.index()]))
                .collect()
        }),
        WaveBank::Smooth => SMOOTH_BANK.call_once(|| {
            ChipWave::ALL
                .iter()
                .map(|w| {
                    let shape = double_resolution(&chip_wave_shape(*w));
                    Wavetable::centered(shape, CHIP_WAVE_VOLUMES[w.index()])
                })
                .collect()
        }),
    };

    &tables[wave.index()]
}

/// Duty cycle of a PWM instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulseWidth {
    #[default]
    Half = 0,
    ThreeEighths = 1,
    Quarter = 2,
    ThreeSixteenths = 3,
    Eighth = 4,
    Sixteenth = 5,
    ThirtySecond = 6,
}

indexed_enum!(PulseWidth {
    Half, ThreeEighths, Quarter, ThreeSixteenths, Eighth, Sixteenth, ThirtySecond
});

pub const PWM_WAVE_LENGTH: usize = 64;

const PULSE_HIGH_SAMPLES: [usize; 7] = [32, 24, 16, 12, 8, 4, 2];

impl PulseWidth {
    /// Fraction of the cycle spent high.
    pub fn duty(self) -> f32 {
        PULSE_HIGH_SAMPLES[self.index()] as f32 / PWM_WAVE_LENGTH as f32
    }
}

static PWM_BANK: Once<Vec<Wavetable>> = Once::new();

/// Pulse wavetable of a given width.
pub fn pwm_wave(width: PulseWidth) -> &'static Wavetable {
    let tables = PWM_BANK.call_once(|| {
        PulseWidth::ALL
            .iter()
            .map(|w| {
                let high = PULSE_HIGH_SAMPLES[w.index()];
                let shape = (0..PWM_WAVE_LENGTH)
                    .map(|i| if i < high { 1.0 } else { -1.0 })
                    .collect();
                Wavetable::centered(shape, 0.5)
            })
            .collect()
    });

    &tables[width.index()]
}
