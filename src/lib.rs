//! Synthesis and sequencing engine for a chiptune pattern tracker.
//!
//! A [`song::Song`] describes channels of patterns, notes and instruments. The
//! [`synth::Synth`] turns it into stereo PCM, sample-accurately following the
//! arpeggio/part/beat/bar clock of the song. Four instrument families are
//! available: wavetable chip, pulse-width, 4-operator FM and noise drums, all
//! mixed through a shared feedback-delay-network reverb.
//!
//! With the default `std` feature, [`player`] provides the message queue used
//! to drive a [`synth::Synth`] living on a realtime audio thread.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod envelope;
pub mod error;
pub mod fm;
pub mod fx;
pub mod oscillator;
#[cfg(feature = "std")]
pub mod player;
pub mod resources;
pub mod song;
pub mod synth;
pub mod utils;

/// Number of arpeggio ticks per part.
pub const TICKS_PER_PART: usize = 4;

/// Sample rate context for DSP calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate {
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
    /// Reciprocal of sample rate (1.0 / sample_rate_hz) for fast multiplication
    pub inv_sr: f32,
}

impl SampleRate {
    /// Create a new sample rate context.
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            inv_sr: 1.0 / sample_rate_hz,
        }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::new(44100.0)
    }
}
