//! FM operator settings.

use crate::envelope::Envelope;
use crate::song::settings::indexed_enum;

/// Highest operator and feedback amplitude.
pub const OPERATOR_AMPLITUDE_MAX: u8 = 15;

/// Frequency ratio of an operator to the note frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorFrequency {
    #[default]
    X1 = 0,
    /// Slightly detuned unison.
    NearX1 = 1,
    X2 = 2,
    /// Slightly detuned octave.
    NearX2 = 3,
    X3 = 4,
    X4 = 5,
    X5 = 6,
    X6 = 7,
    X7 = 8,
    X8 = 9,
    X9 = 10,
    X11 = 11,
    X13 = 12,
    X16 = 13,
    X20 = 14,
}

indexed_enum!(OperatorFrequency {
    X1, NearX1, X2, NearX2, X3, X4, X5, X6, X7, X8, X9, X11, X13, X16, X20
});

const MULTIPLIERS: [f32; 15] = [
    1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 11.0, 13.0, 16.0, 20.0,
];
const HZ_OFFSETS: [f32; 15] = [
    0.0, 1.5, 0.0, -1.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];
const AMPLITUDE_SIGNS: [f32; 15] = [
    1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
];

impl OperatorFrequency {
    #[inline]
    pub fn multiplier(self) -> f32 {
        MULTIPLIERS[self.index()]
    }

    /// Offset in Hz added after multiplying.
    #[inline]
    pub fn hz_offset(self) -> f32 {
        HZ_OFFSETS[self.index()]
    }

    /// Detuned operators are inverted so that they beat against their neighbour.
    #[inline]
    pub fn amplitude_sign(self) -> f32 {
        AMPLITUDE_SIGNS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operator {
    pub frequency: OperatorFrequency,
    /// Level in `0..=OPERATOR_AMPLITUDE_MAX`.
    pub amplitude: u8,
    pub envelope: Envelope,
}

impl Operator {
    pub fn new(frequency: OperatorFrequency, amplitude: u8, envelope: Envelope) -> Self {
        Self {
            frequency,
            amplitude,
            envelope,
        }
    }
}
