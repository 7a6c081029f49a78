// src/common/response/error.rs

use core::fmt;

/// Why a received line could not be turned into a [`Response`](super::Response).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseParseError {
    /// Nothing but the terminator, or nothing at all.
    EmptyInput,
    /// Input doesn't end with the dialect's response terminator.
    MissingTerminator,
    /// Could not decode the line as UTF-8.
    InvalidUtf8,
    /// First byte is not a known response letter.
    UnknownLetter(u8),
    /// Letter is not followed by the dialect's separator.
    MissingSeparator,
    /// Wrong number of fields for the response letter.
    FieldCount,
    /// Failed to parse a numeric field.
    NumericError,
    /// Slot index outside `0..=3`, or presence flag other than `0`/`1`.
    InvalidField,
    /// Data report pair count doesn't match the set bits of its mask.
    InconsistentDataReport,
}

// --- Error Conversions ---

impl From<core::str::Utf8Error> for ResponseParseError {
    fn from(_: core::str::Utf8Error) -> Self {
        ResponseParseError::InvalidUtf8
    }
}

impl From<core::num::ParseIntError> for ResponseParseError {
    fn from(_: core::num::ParseIntError) -> Self {
        ResponseParseError::NumericError
    }
}

impl From<core::num::ParseFloatError> for ResponseParseError {
    fn from(_: core::num::ParseFloatError) -> Self {
        ResponseParseError::NumericError
    }
}

impl fmt::Display for ResponseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// std::error::Error when the std feature is on
#[cfg(feature = "std")]
impl std::error::Error for ResponseParseError {}
