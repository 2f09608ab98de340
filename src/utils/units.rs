//! Pitch and level conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Frequency in Hz of a (possibly fractional) MIDI-style pitch, A4 = 69 = 440 Hz.
#[inline]
pub fn frequency_from_pitch(pitch: f32) -> f32 {
    440.0 * semitones_to_ratio(pitch - 69.0)
}

#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones / 12.0).exp2()
}

/// Perceptual curve applied to a pin volume in `0.0..=3.0`.
#[inline]
pub fn volume_conversion(note_volume: f32) -> f32 {
    (note_volume / 3.0).max(0.0).powf(1.5)
}

/// Amplitude curve of an FM operator level in `0..=15`.
#[inline]
pub fn operator_amplitude_curve(amplitude: f32) -> f32 {
    (16.0f32.powf(amplitude / 15.0) - 1.0) / 15.0
}
