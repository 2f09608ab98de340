//! Utility functions shared by the voices and effects.

pub mod fft;
pub mod random;
pub mod units;

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}

/// Keeps a non-negative phase in `[0, 1)`.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    phase - (phase as u32) as f32
}

/// Reads `table` at a normalized `phase` with linear interpolation, wrapping at the end.
#[inline]
pub fn interpolate_wrap(table: &[f32], phase: f32) -> f32 {
    let size = table.len();
    let p = phase * size as f32;
    let p_integral = p as usize;
    let p_fractional = p - p_integral as f32;
    let a = table[p_integral % size];
    let b = table[(p_integral + 1) % size];

    a + (b - a) * p_fractional
}

/// Subtracts the mean so that a table has no DC offset.
pub fn center(table: &mut [f32]) {
    if table.is_empty() {
        return;
    }
    let average = table.iter().sum::<f32>() / table.len() as f32;
    for sample in table.iter_mut() {
        *sample -= average;
    }
}

/// Root mean square of a buffer.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f64 = buffer.iter().map(|s| (*s as f64) * (*s as f64)).sum();

    (sum / buffer.len() as f64).sqrt() as f32
}
