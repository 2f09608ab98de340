//! Peak-following soft limiter of the master output.

#[allow(unused_imports)]
use num_traits::float::Float;

#[derive(Debug, Default)]
pub struct Limiter {
    limit: f32,
    decay: f32,
}

impl Limiter {
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            limit: 0.0,
            decay: 1.0 / (2.0 * sample_rate_hz),
        }
    }

    pub fn reset(&mut self) {
        self.limit = 0.0;
    }

    #[inline]
    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Divides both sides by the decaying peak and applies the master volume.
    #[inline]
    pub fn process(&mut self, volume: f32, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            self.limit -= self.decay;
            self.limit = self.limit.max(l.abs()).max(r.abs());
            let gain = volume / (self.limit * 0.75 + 0.25);
            *l *= gain;
            *r *= gain;
        }
    }
}
