//! Oscillators of the wavetable families: chip and pulse-width voices share
//! [`chip_voice::ChipVoice`], drums use [`noise_voice::NoiseVoice`].

pub mod chip_voice;
pub mod noise_voice;
