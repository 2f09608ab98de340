//! Instruments and their per-family settings.

use crate::envelope::Envelope;
use crate::fm::algorithms::Algorithm;
use crate::fm::feedback::Feedback;
use crate::fm::operator::{Operator, OperatorFrequency, OPERATOR_AMPLITUDE_MAX};
use crate::fm::OPERATOR_COUNT;
use crate::resources::drums::DrumKind;
use crate::resources::waves::{ChipWave, PulseWidth};

use super::settings::{Chorus, Effect, Filter, Harmony, Transition, Volume};

pub const PAN_MAX: u8 = 8;
pub const PAN_CENTER: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmSettings {
    pub algorithm: Algorithm,
    pub feedback: Feedback,
    /// Level in `0..=OPERATOR_AMPLITUDE_MAX`.
    pub feedback_amplitude: u8,
    pub feedback_envelope: Envelope,
    pub operators: [Operator; OPERATOR_COUNT],
}

impl Default for FmSettings {
    fn default() -> Self {
        let mut operators = [Operator::new(OperatorFrequency::X1, 0, Envelope::Custom); OPERATOR_COUNT];
        operators[0].amplitude = OPERATOR_AMPLITUDE_MAX;
        Self {
            algorithm: Algorithm::OneByThree,
            feedback: Feedback::Self1,
            feedback_amplitude: 0,
            feedback_envelope: Envelope::Steady,
            operators,
        }
    }
}

/// Synthesis family of an instrument with its family-specific settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Chip { wave: ChipWave },
    Pwm { width: PulseWidth },
    Noise { drum: DrumKind },
    Fm(FmSettings),
}

impl InstrumentKind {
    #[inline]
    pub fn is_noise(&self) -> bool {
        matches!(self, InstrumentKind::Noise { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrument {
    pub kind: InstrumentKind,
    pub filter: Filter,
    pub transition: Transition,
    pub effect: Effect,
    pub chorus: Chorus,
    pub harmony: Harmony,
    pub volume: Volume,
    /// `0..=PAN_MAX`, centered at `PAN_CENTER`.
    pub pan: u8,
    pub mute: bool,
    pub octave_offset: i8,
}

impl Default for Instrument {
    fn default() -> Self {
        Self::chip(ChipWave::Triangle)
    }
}

impl Instrument {
    pub fn new(kind: InstrumentKind) -> Self {
        Self {
            kind,
            filter: Filter::None,
            transition: Transition::Seamless,
            effect: Effect::None,
            chorus: Chorus::Union,
            harmony: Harmony::Arpeggio,
            volume: Volume::Loudest,
            pan: PAN_CENTER,
            mute: false,
            octave_offset: 0,
        }
    }

    pub fn chip(wave: ChipWave) -> Self {
        Self::new(InstrumentKind::Chip { wave })
    }

    pub fn pwm(width: PulseWidth) -> Self {
        Self::new(InstrumentKind::Pwm { width })
    }

    pub fn noise(drum: DrumKind) -> Self {
        Self::new(InstrumentKind::Noise { drum })
    }

    pub fn fm(settings: FmSettings) -> Self {
        Self::new(InstrumentKind::Fm(settings))
    }

    /// Left and right gains, each `1.0` at the center.
    pub fn pan_gains(&self) -> (f32, f32) {
        let pan = (self.pan.min(PAN_MAX) as f32 - PAN_CENTER as f32) / PAN_CENTER as f32;
        ((1.0 - pan).min(1.0), (1.0 + pan).min(1.0))
    }

    /// Gain of the volume setting, zero when muted.
    pub fn volume_multiplier(&self) -> f32 {
        if self.mute {
            0.0
        } else {
            self.volume.multiplier()
        }
    }
}
