//! Effects of the stereo bus.

pub mod limiter;
pub mod master;
pub mod reverb;
