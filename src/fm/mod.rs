//! 4-operator FM synthesis.

pub mod algorithms;
pub mod feedback;
pub mod operator;
pub mod voice;

/// Number of operators of an FM instrument.
pub const OPERATOR_COUNT: usize = 4;
