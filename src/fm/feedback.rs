//! FM feedback routings.
//!
//! Feedback feeds the previous output of an operator into the phase of itself
//! or of another operator.

use crate::song::settings::indexed_enum;

use super::OPERATOR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    Self1 = 0,
    Self2 = 1,
    Self3 = 2,
    Self4 = 3,
    Self12 = 4,
    Self34 = 5,
    Self123 = 6,
    Self234 = 7,
    Self1234 = 8,
    OneToTwo = 9,
    OneToThree = 10,
    OneToFour = 11,
    TwoToThree = 12,
    TwoToFour = 13,
    ThreeToFour = 14,
    OneToThreeTwoToFour = 15,
    OneToFourTwoToThree = 16,
    Chain = 17,
    OneWithTwo = 18,
    ThreeWithFour = 19,
    OneWithThree = 20,
    TwoWithFour = 21,
    OneWithFour = 22,
    TwoWithThree = 23,
}

indexed_enum!(Feedback {
    Self1,
    Self2,
    Self3,
    Self4,
    Self12,
    Self34,
    Self123,
    Self234,
    Self1234,
    OneToTwo,
    OneToThree,
    OneToFour,
    TwoToThree,
    TwoToFour,
    ThreeToFour,
    OneToThreeTwoToFour,
    OneToFourTwoToThree,
    Chain,
    OneWithTwo,
    ThreeWithFour,
    OneWithThree,
    TwoWithFour,
    OneWithFour,
    TwoWithThree,
});

pub const NUM_FEEDBACKS: usize = 24;

type Sources = [&'static [usize]; OPERATOR_COUNT];

const FEEDBACKS: [(&str, Sources); NUM_FEEDBACKS] = [
    ("1⟲", [&[0], &[], &[], &[]]),
    ("2⟲", [&[], &[1], &[], &[]]),
    ("3⟲", [&[], &[], &[2], &[]]),
    ("4⟲", [&[], &[], &[], &[3]]),
    ("1⟲ 2⟲", [&[0], &[1], &[], &[]]),
    ("3⟲ 4⟲", [&[], &[], &[2], &[3]]),
    ("1⟲ 2⟲ 3⟲", [&[0], &[1], &[2], &[]]),
    ("2⟲ 3⟲ 4⟲", [&[], &[1], &[2], &[3]]),
    ("1⟲ 2⟲ 3⟲ 4⟲", [&[0], &[1], &[2], &[3]]),
    ("1→2", [&[], &[0], &[], &[]]),
    ("1→3", [&[], &[], &[0], &[]]),
    ("1→4", [&[], &[], &[], &[0]]),
    ("2→3", [&[], &[], &[1], &[]]),
    ("2→4", [&[], &[], &[], &[1]]),
    ("3→4", [&[], &[], &[], &[2]]),
    ("1→3 2→4", [&[], &[], &[0], &[1]]),
    ("1→4 2→3", [&[], &[], &[1], &[0]]),
    ("1→2→3→4", [&[], &[0], &[1], &[2]]),
    ("1↔2", [&[1], &[0], &[], &[]]),
    ("3↔4", [&[], &[], &[3], &[2]]),
    ("1↔3", [&[2], &[], &[0], &[]]),
    ("2↔4", [&[], &[3], &[], &[1]]),
    ("1↔4", [&[3], &[], &[], &[0]]),
    ("2↔3", [&[], &[2], &[1], &[]]),
];

impl Feedback {
    #[inline]
    pub fn name(self) -> &'static str {
        FEEDBACKS[self.index()].0
    }

    /// Operators whose previous output is fed back into the phase of `op`.
    #[inline]
    pub fn sources(self, op: usize) -> &'static [usize] {
        FEEDBACKS[self.index()].1[op]
    }
}
