// src/common/slot.rs

use core::convert::TryFrom;
use core::fmt;

/// Number of sensor slots on the board.
pub const SLOT_COUNT: usize = 4;

/// Index of one of the four fixed sensor slots. Only `0..=3` is constructible.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotIndex(u8);

/// How a wire index outside `0..=3` is treated by the dispatcher.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexPolicy {
    /// Out-of-range indices silently become slot 0. This is what deployed
    /// clients of the text protocol rely on.
    #[default]
    Clamp,
    /// Out-of-range indices are answered with an `invalid index` error line.
    Reject,
}

/// Raw index was outside `0..=3`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SlotOutOfRange(pub i32);

impl SlotIndex {
    pub const FIRST: SlotIndex = SlotIndex(0);

    /// Creates a new `SlotIndex` if `index` addresses an existing slot.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SLOT_COUNT {
            Some(SlotIndex(index))
        } else {
            None
        }
    }

    /// Resolves an index scanned from the wire. Anything out of range is slot 0.
    pub fn clamped(raw: i32) -> Self {
        Self::try_from(raw).unwrap_or(Self::FIRST)
    }

    /// Resolves a wire index under the given policy.
    pub fn resolve(raw: i32, policy: IndexPolicy) -> Result<Self, SlotOutOfRange> {
        match policy {
            IndexPolicy::Clamp => Ok(Self::clamped(raw)),
            IndexPolicy::Reject => Self::try_from(raw),
        }
    }

    /// Iterates all slots in ascending order.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT as u8).map(SlotIndex)
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Bit of this slot in a presence bitmask.
    #[inline]
    pub const fn mask(&self) -> u8 {
        1 << self.0
    }
}

impl TryFrom<i32> for SlotIndex {
    type Error = SlotOutOfRange;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (0..SLOT_COUNT as i32).contains(&value) {
            Ok(SlotIndex(value as u8))
        } else {
            Err(SlotOutOfRange(value))
        }
    }
}

impl From<SlotIndex> for u8 {
    fn from(value: SlotIndex) -> Self {
        value.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
