// src/common/response/encode.rs

use super::Response;
use crate::common::config::FirmwareConfig;
use crate::common::dialect::Dialect;
use crate::common::error::FirmwareError;
use crate::common::types::Tenths;
use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Maximum length of a response line, excluding the terminator.
pub const LINE_CAPACITY: usize = 127;

/// Maximum length of an encoded line including the longest terminator.
pub const MAX_LINE_LEN: usize = LINE_CAPACITY + 2;

/// One fully encoded response line, terminator included.
pub type ResponseLine = ArrayString<MAX_LINE_LEN>;

/// Turns [`Response`] values into wire lines for one dialect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseEncoder {
    dialect: Dialect,
    device_id: &'static str,
}

/// `fmt::Write` sink that only counts, used to report how long an oversized line would be.
struct LengthCounter(usize);

impl Write for LengthCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

impl ResponseEncoder {
    pub const fn new(dialect: Dialect, device_id: &'static str) -> Self {
        ResponseEncoder { dialect, device_id }
    }

    pub const fn from_config(config: &FirmwareConfig) -> Self {
        Self::new(config.dialect, config.device_id)
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Encodes one response. A response whose body does not fit
    /// [`LINE_CAPACITY`] is rejected as a whole; no partial line is produced.
    pub fn encode<E: fmt::Debug>(&self, response: &Response<'_>) -> Result<ResponseLine, FirmwareError<E>> {
        let mut body = ArrayString::<LINE_CAPACITY>::new();
        if self.write_body(&mut body, response).is_err() {
            let mut counter = LengthCounter(0);
            // Counting never fails, so the full length is always known here.
            let _ = self.write_body(&mut counter, response);
            return Err(FirmwareError::LineTooLong {
                needed: counter.0,
                capacity: LINE_CAPACITY,
            });
        }

        let mut line = ResponseLine::new();
        line.push_str(&body);
        line.push_str(self.dialect.output_terminator());
        Ok(line)
    }

    fn write_body<W: Write>(&self, out: &mut W, response: &Response<'_>) -> fmt::Result {
        let sep = self.dialect.separator();
        out.write_char(response.letter() as char)?;

        match response {
            Response::Version(version) => {
                if self.dialect == Dialect::Pipe {
                    write!(out, "{}{}", sep, self.device_id)?;
                }
                write!(out, "{}{}", sep, version)
            }
            Response::SensorCount(count) | Response::Config(count) => write!(out, "{}{}", sep, count),
            Response::Presence(slot, present) => {
                write!(out, "{}{}{}{}", sep, slot, sep, *present as u8)
            }
            Response::Temperature(slot, value) | Response::Humidity(slot, value) => {
                write!(out, "{}{}{}{}", sep, slot, sep, Tenths(*value))
            }
            Response::DataReport(report) => {
                write!(out, "{}{:x}", sep, report.bitmask)?;
                for reading in report.readings.iter() {
                    write!(
                        out,
                        "{}{}{}{}",
                        sep,
                        Tenths(reading.temperature),
                        sep,
                        Tenths(reading.humidity)
                    )?;
                }
                Ok(())
            }
            Response::Error(message) => write!(out, "{}{}", sep, message),
        }
    }
}
