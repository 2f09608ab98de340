//! Fast linear congruential pseudo random number generator.
//!
//! Used when building noise tables, so a given seed always yields the same wave.

#[derive(Debug, Clone)]
pub struct Random {
    state: u32,
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0x21)
    }
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    #[inline]
    pub fn get_word(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1664525)
            .wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn get_float(&mut self) -> f32 {
        (self.get_word() >> 8) as f32 / 16777216.0
    }

    /// Uniform value in `[-1, 1)`.
    #[inline]
    pub fn get_bipolar(&mut self) -> f32 {
        self.get_float() * 2.0 - 1.0
    }
}
