//! Transient DSP state of one channel.

use crate::fm::voice::FmVoice;
use crate::oscillator::chip_voice::ChipVoice;
use crate::oscillator::noise_voice::NoiseVoice;

/// Oscillator phases, feedback outputs and filter states of a channel.
///
/// Only the voice matching the instrument of the current bar is advanced; the
/// others keep their state until the next reset.
#[derive(Debug, Default, Clone)]
pub struct SynthChannel {
    pub chip: ChipVoice,
    pub fm: FmVoice,
    pub noise: NoiseVoice,
}

impl SynthChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.chip.reset();
        self.fm.reset();
        self.noise.reset();
    }
}
