//! 4-tap Hadamard feedback delay network.

use alloc::boxed::Box;
use alloc::vec;

#[allow(unused_imports)]
use num_traits::float::Float;

pub const REVERB_DELAY_LENGTH: usize = 16384;
const REVERB_DELAY_MASK: usize = REVERB_DELAY_LENGTH - 1;

/// Tap offsets into the delay buffer.
const TAPS: [usize; 4] = [0, 3041, 6426, 10907];

/// Highest reverb setting of a song.
pub const REVERB_MAX: u8 = 4;

/// Feedback amount of a reverb setting.
pub fn reverb_amount(setting: u8) -> f32 {
    (setting.min(REVERB_MAX) as f32 / REVERB_MAX as f32).powf(0.667) * 0.425
}

#[derive(Debug)]
struct DelayNetwork {
    line: Box<[f32]>,
    feedback: [f32; 4],
}

impl DelayNetwork {
    fn new() -> Self {
        Self {
            line: vec![0.0; REVERB_DELAY_LENGTH].into_boxed_slice(),
            feedback: [0.0; 4],
        }
    }

    fn reset(&mut self) {
        self.line.fill(0.0);
        self.feedback = [0.0; 4];
    }

    /// Feeds one sample in and returns the wet output.
    #[inline]
    fn process(&mut self, position: usize, input: f32, amount: f32) -> f32 {
        let p0 = position & REVERB_DELAY_MASK;
        let p1 = (position + TAPS[1]) & REVERB_DELAY_MASK;
        let p2 = (position + TAPS[2]) & REVERB_DELAY_MASK;
        let p3 = (position + TAPS[3]) & REVERB_DELAY_MASK;

        let s0 = self.line[p0] + input;
        let s1 = self.line[p1];
        let s2 = self.line[p2];
        let s3 = self.line[p3];

        let t0 = -s0 + s1;
        let t1 = -s0 - s1;
        let t2 = -s2 + s3;
        let t3 = -s2 - s3;
        // Hadamard mix of the two pairs.
        let fb = &mut self.feedback;
        fb[0] += ((t0 + t2) * amount - fb[0]) * 0.5;
        fb[1] += ((t1 + t3) * amount - fb[1]) * 0.5;
        fb[2] += ((t0 - t2) * amount - fb[2]) * 0.5;
        fb[3] += ((t1 - t3) * amount - fb[3]) * 0.5;

        self.line[p1] = fb[0];
        self.line[p2] = fb[1];
        self.line[p3] = fb[2];
        self.line[p0] = fb[3];

        s1 + s2 + s3
    }
}

#[derive(Debug)]
pub struct Reverb {
    left: DelayNetwork,
    right: DelayNetwork,
    position: usize,
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Reverb {
    pub fn new() -> Self {
        Self {
            left: DelayNetwork::new(),
            right: DelayNetwork::new(),
            position: 0,
        }
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.position = 0;
    }

    /// Adds the wet signal of `send_*` to `out_*`.
    pub fn process(
        &mut self,
        amount: f32,
        send_left: &[f32],
        send_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        for (((in_l, in_r), out_l), out_r) in send_left
            .iter()
            .zip(send_right.iter())
            .zip(out_left.iter_mut())
            .zip(out_right.iter_mut())
        {
            *out_l += self.left.process(self.position, *in_l, amount);
            *out_r += self.right.process(self.position, *in_r, amount);
            self.position = (self.position + 1) & REVERB_DELAY_MASK;
        }
    }
}
