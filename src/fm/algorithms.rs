//! FM algorithms: which operators are carriers and which modulate which.
//!
//! Carriers are always the first operators, so an algorithm is fully described
//! by its carrier count and, for each operator, the list of its modulators.
//! Modulators always have a higher index than the operators they modulate.

// Based on MIT-licensed code (c) 2018 by John Nesky

use crate::song::settings::indexed_enum;

use super::OPERATOR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// `1←(2 3 4)`
    #[default]
    OneByThree = 0,
    /// `1←(2 3←4)`
    OneByTwoAndChain = 1,
    /// `1←2←(3 4)`
    OneChainByTwo = 2,
    /// `1←(2 3)←4`
    Diamond = 3,
    /// `1←2←3←4`
    Stack = 4,
    /// `1←3 2←4`
    TwoPairs = 5,
    /// `1 2←(3 4)`
    OneAndTwoByTwo = 6,
    /// `1 2←3←4`
    OneAndStack = 7,
    /// `(1 2)←3←4`
    TwoByStack = 8,
    /// `(1 2)←(3 4)`
    TwoByTwo = 9,
    /// `1 2 3←4`
    TwoAndPair = 10,
    /// `(1 2 3)←4`
    ThreeByOne = 11,
    /// `1 2 3 4`
    Additive = 12,
}

indexed_enum!(Algorithm {
    OneByThree,
    OneByTwoAndChain,
    OneChainByTwo,
    Diamond,
    Stack,
    TwoPairs,
    OneAndTwoByTwo,
    OneAndStack,
    TwoByStack,
    TwoByTwo,
    TwoAndPair,
    ThreeByOne,
    Additive,
});

pub const NUM_ALGORITHMS: usize = 13;

struct AlgorithmSpecs {
    name: &'static str,
    carrier_count: usize,
    associated_carrier: [usize; OPERATOR_COUNT],
    modulated_by: [&'static [usize]; OPERATOR_COUNT],
}

const ALGORITHMS: [AlgorithmSpecs; NUM_ALGORITHMS] = [
    AlgorithmSpecs {
        name: "1←(2 3 4)",
        carrier_count: 1,
        associated_carrier: [0, 0, 0, 0],
        modulated_by: [&[1, 2, 3], &[], &[], &[]],
    },
    AlgorithmSpecs {
        name: "1←(2 3←4)",
        carrier_count: 1,
        associated_carrier: [0, 0, 0, 0],
        modulated_by: [&[1, 2], &[], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "1←2←(3 4)",
        carrier_count: 1,
        associated_carrier: [0, 0, 0, 0],
        modulated_by: [&[1], &[2, 3], &[], &[]],
    },
    AlgorithmSpecs {
        name: "1←(2 3)←4",
        carrier_count: 1,
        associated_carrier: [0, 0, 0, 0],
        modulated_by: [&[1, 2], &[3], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "1←2←3←4",
        carrier_count: 1,
        associated_carrier: [0, 0, 0, 0],
        modulated_by: [&[1], &[2], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "1←3 2←4",
        carrier_count: 2,
        associated_carrier: [0, 1, 0, 1],
        modulated_by: [&[2], &[3], &[], &[]],
    },
    AlgorithmSpecs {
        name: "1 2←(3 4)",
        carrier_count: 2,
        associated_carrier: [0, 1, 1, 1],
        modulated_by: [&[], &[2, 3], &[], &[]],
    },
    AlgorithmSpecs {
        name: "1 2←3←4",
        carrier_count: 2,
        associated_carrier: [0, 1, 1, 1],
        modulated_by: [&[], &[2], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "(1 2)←3←4",
        carrier_count: 2,
        associated_carrier: [0, 1, 0, 0],
        modulated_by: [&[2], &[2], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "(1 2)←(3 4)",
        carrier_count: 2,
        associated_carrier: [0, 1, 0, 1],
        modulated_by: [&[2, 3], &[2, 3], &[], &[]],
    },
    AlgorithmSpecs {
        name: "1 2 3←4",
        carrier_count: 3,
        associated_carrier: [0, 1, 2, 2],
        modulated_by: [&[], &[], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "(1 2 3)←4",
        carrier_count: 3,
        associated_carrier: [0, 1, 2, 0],
        modulated_by: [&[3], &[3], &[3], &[]],
    },
    AlgorithmSpecs {
        name: "1 2 3 4",
        carrier_count: 4,
        associated_carrier: [0, 1, 2, 3],
        modulated_by: [&[], &[], &[], &[]],
    },
];

impl Algorithm {
    #[inline]
    pub fn name(self) -> &'static str {
        ALGORITHMS[self.index()].name
    }

    /// Number of audible operators, which are always the first ones.
    #[inline]
    pub fn carrier_count(self) -> usize {
        ALGORITHMS[self.index()].carrier_count
    }

    #[inline]
    pub fn is_carrier(self, op: usize) -> bool {
        op < self.carrier_count()
    }

    /// Carrier whose pitch a modulator follows when operators play different pitches.
    #[inline]
    pub fn associated_carrier(self, op: usize) -> usize {
        ALGORITHMS[self.index()].associated_carrier[op]
    }

    /// Operators whose output modulates the phase of `op`.
    #[inline]
    pub fn modulated_by(self, op: usize) -> &'static [usize] {
        ALGORITHMS[self.index()].modulated_by[op]
    }
}
