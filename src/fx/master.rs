//! Lo-fi post-processing of the master bus: a one-pole "muff" lowpass and a
//! sample-and-hold decimator.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::song::settings::SampleRateMode;
use crate::utils::one_pole;

/// Highest muff setting of a song.
pub const MUFF_MAX: u8 = 8;

#[derive(Debug, Default)]
pub struct MasterFilter {
    state: [f32; 2],
    held: [f32; 2],
    hold_countdown: usize,
}

impl MasterFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.state = [0.0; 2];
        self.held = [0.0; 2];
        self.hold_countdown = 0;
    }

    pub fn process(
        &mut self,
        muff: u8,
        mode: SampleRateMode,
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let muffled = muff > 0;
        let coefficient = (-(muff.min(MUFF_MAX) as f32) * 0.5).exp2();
        let hold = mode.hold_frames();

        if !muffled && hold == 1 {
            return;
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            if muffled {
                one_pole(&mut self.state[0], *l, coefficient);
                one_pole(&mut self.state[1], *r, coefficient);
                *l = self.state[0];
                *r = self.state[1];
            }
            if hold > 1 {
                if self.hold_countdown == 0 {
                    self.held = [*l, *r];
                    self.hold_countdown = hold;
                }
                self.hold_countdown -= 1;
                *l = self.held[0];
                *r = self.held[1];
            }
        }
    }
}
