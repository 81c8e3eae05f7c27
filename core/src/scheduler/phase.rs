//! Phase tags
//!
//! The scheduler never assumes a particular phase enumeration. Hosts supply any
//! type with set-membership semantics via [`PhaseSet`]; [`PhaseMask`] is the
//! bitmask implementation every bundled script uses.

use std::fmt;
use std::ops::BitOr;

/// A set of phase tags.
///
/// As an entry mask, the empty set means "phase-agnostic": the entry may fire
/// in any phase.
pub trait PhaseSet: Copy + Eq + fmt::Debug {
    fn empty() -> Self;

    fn is_empty(&self) -> bool;

    fn intersects(&self, other: &Self) -> bool;
}

/// Bitmask phase set supporting up to 32 phases.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhaseMask(u32);

impl PhaseMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Phase with a single tag. `n` must be below 32.
    pub const fn bit(n: u8) -> Self {
        Self(1 << n)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl PhaseSet for PhaseMask {
    fn empty() -> Self {
        Self::NONE
    }

    fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn intersects(&self, other: &Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl BitOr for PhaseMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for PhaseMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhaseMask({:#b})", self.0)
    }
}
