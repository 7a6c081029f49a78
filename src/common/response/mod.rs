// src/common/response/mod.rs

mod encode;
mod error;
pub mod parse;

// Re-export items for external use
pub use encode::{ResponseEncoder, ResponseLine, LINE_CAPACITY, MAX_LINE_LEN};
pub use error::ResponseParseError;
pub use parse::parse_response;

// --- Response Enum Definition ---
use crate::common::slot::{SlotIndex, SLOT_COUNT};
use crate::common::types::Reading;
use heapless::Vec;

/// One answer line of the text protocol, before dialect-specific encoding.
///
/// Borrowed text (`Error`) is `'static` on the firmware side and points into
/// the received line on the client side.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<'a> {
    /// `v` - firmware version.
    Version(u8),
    /// `n` - number of present sensors.
    SensorCount(u8),
    /// `c` - configured sensors, reported as the present count in decimal.
    Config(u8),
    /// `s` - presence of one slot.
    Presence(SlotIndex, bool),
    /// `t` - temperature of one slot, degrees Celsius.
    Temperature(SlotIndex, f32),
    /// `h` - relative humidity of one slot, percent.
    Humidity(SlotIndex, f32),
    /// `d` - readings of all present slots.
    DataReport(DataReport),
    /// `e` - error message.
    Error(&'a str),
}

/// Readings of every present slot, ascending by slot index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataReport {
    /// Presence bitmask the readings were taken under.
    pub bitmask: u8,
    /// One reading per set bit, lowest bit first.
    pub readings: Vec<Reading, SLOT_COUNT>,
}

impl DataReport {
    /// Iterates `(slot, reading)` pairs by walking the set bits of the mask.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Reading)> {
        let bitmask = self.bitmask;
        SlotIndex::all()
            .filter(move |slot| bitmask & slot.mask() != 0)
            .zip(self.readings.iter())
    }
}

impl Response<'_> {
    /// The letter that starts this response's line.
    pub fn letter(&self) -> u8 {
        match self {
            Response::Version(_) => b'v',
            Response::SensorCount(_) => b'n',
            Response::Config(_) => b'c',
            Response::Presence(..) => b's',
            Response::Temperature(..) => b't',
            Response::Humidity(..) => b'h',
            Response::DataReport(_) => b'd',
            Response::Error(_) => b'e',
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}
