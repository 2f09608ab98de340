//! Sine table read by the FM operators.

use alloc::boxed::Box;

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

pub const SINE_WAVE_LENGTH: usize = 256;
pub const SINE_WAVE_MASK: usize = SINE_WAVE_LENGTH - 1;

static SINE_WAVE: Once<Box<[f32]>> = Once::new();

/// One sine cycle of `SINE_WAVE_LENGTH` samples plus a guard sample for interpolation.
pub fn sine_wave() -> &'static [f32] {
    SINE_WAVE.call_once(|| {
        let mut table = alloc::vec![0.0f32; SINE_WAVE_LENGTH + 1];
        for (i, sample) in table.iter_mut().take(SINE_WAVE_LENGTH).enumerate() {
            *sample = (i as f64 * core::f64::consts::TAU / SINE_WAVE_LENGTH as f64).sin() as f32;
        }
        crate::utils::center(&mut table[..SINE_WAVE_LENGTH]);
        table[SINE_WAVE_LENGTH] = table[0];
        table.into_boxed_slice()
    })
}
