//! Read-only tables consulted by the voices: chip and pulse waves, the sine
//! table and the noise waves of the drums.
//!
//! Everything is built lazily on first access and shared afterwards.

pub mod drums;
pub mod sine;
pub mod waves;

/// Builds every table up front, so that the first audio callback does not pay for it.
pub fn warm_up() {
    for wave in waves::ChipWave::ALL {
        waves::chip_wave(waves::WaveBank::Standard, *wave);
        waves::chip_wave(waves::WaveBank::Smooth, *wave);
    }
    for width in waves::PulseWidth::ALL {
        waves::pwm_wave(*width);
    }
    sine::sine_wave();
    for kind in drums::DrumKind::ALL {
        drums::drum_wave(*kind);
    }
    log::debug!("wavetables ready");
}
