//! Command definitions for the text protocol.

use core::fmt;

/// A parsed command line.
///
/// Index arguments are kept as scanned from the wire; the dispatcher resolves
/// them to a [`SlotIndex`](super::SlotIndex) under its index policy.
///
/// The `Display` implementation renders the command as a client sends it,
/// without the line terminator (e.g. `v`, `t 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `v` - firmware version.
    GetVersion,
    /// `n` - number of detected sensors.
    GetSensorCount,
    /// `c` - presence bitmask.
    GetConfig,
    /// `d` - read all present sensors at once.
    GetData,
    /// `s <i>` - whether slot `i` was detected.
    GetPresence(i32),
    /// `t <i>` - last temperature of slot `i`.
    GetTemperature(i32),
    /// `h <i>` - last humidity of slot `i`.
    GetHumidity(i32),
    /// Anything else, with the trimmed line it came from.
    Unrecognized(&'a [u8]),
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetVersion => f.write_str("v"),
            Command::GetSensorCount => f.write_str("n"),
            Command::GetConfig => f.write_str("c"),
            Command::GetData => f.write_str("d"),
            Command::GetPresence(i) => write!(f, "s {}", i),
            Command::GetTemperature(i) => write!(f, "t {}", i),
            Command::GetHumidity(i) => write!(f, "h {}", i),
            Command::Unrecognized(raw) => {
                // Raw lines are 8-bit clean; only UTF-8 ones can be echoed back.
                match core::str::from_utf8(raw) {
                    Ok(text) => f.write_str(text),
                    Err(_) => Err(fmt::Error),
                }
            }
        }
    }
}

impl Command<'_> {
    /// Letter that starts the answer line to this command. Unrecognized
    /// commands are answered with an error line.
    pub fn reply_letter(&self) -> u8 {
        match self {
            Command::GetVersion => b'v',
            Command::GetSensorCount => b'n',
            Command::GetConfig => b'c',
            Command::GetData => b'd',
            Command::GetPresence(_) => b's',
            Command::GetTemperature(_) => b't',
            Command::GetHumidity(_) => b'h',
            Command::Unrecognized(_) => b'e',
        }
    }
}
