// src/common/response/parse.rs

use super::error::ResponseParseError;
use super::{DataReport, Response};

use crate::common::dialect::Dialect;
use crate::common::slot::SlotIndex;
use crate::common::types::Reading;

use core::str::{self, FromStr};

// --- Internal Helpers ---

/// Splits off the letter and returns the text after the first separator.
fn split_letter(text: &str, sep: char) -> Result<(u8, &str), ResponseParseError> {
    let letter = *text.as_bytes().first().ok_or(ResponseParseError::EmptyInput)?;
    let rest = text.get(1..).ok_or(ResponseParseError::UnknownLetter(letter))?;
    if rest.is_empty() {
        return Ok((letter, rest));
    }
    rest.strip_prefix(sep)
        .map(|fields| (letter, fields))
        .ok_or(ResponseParseError::MissingSeparator)
}

/// Pulls exactly `N` fields out of the iterator; more or fewer is an error.
fn take_fields<'a, const N: usize>(
    fields: &mut impl Iterator<Item = &'a str>,
) -> Result<[&'a str; N], ResponseParseError> {
    let mut out = [""; N];
    for slot in out.iter_mut() {
        *slot = fields.next().ok_or(ResponseParseError::FieldCount)?;
    }
    if fields.next().is_some() {
        return Err(ResponseParseError::FieldCount);
    }
    Ok(out)
}

fn parse_slot(field: &str) -> Result<SlotIndex, ResponseParseError> {
    let raw = u8::from_str(field)?;
    SlotIndex::new(raw).ok_or(ResponseParseError::InvalidField)
}

fn parse_mask(field: &str) -> Result<u8, ResponseParseError> {
    Ok(u8::from_str_radix(field, 16)?)
}

// --- Public Parsing Functions ---

/// Parses one complete response line (terminator included) of `dialect`.
pub fn parse_response(dialect: Dialect, line: &[u8]) -> Result<Response<'_>, ResponseParseError> {
    if line.is_empty() {
        return Err(ResponseParseError::EmptyInput);
    }
    let body = line
        .strip_suffix(dialect.output_terminator().as_bytes())
        .ok_or(ResponseParseError::MissingTerminator)?;
    let text = str::from_utf8(body)?;

    let sep = dialect.separator();
    let (letter, rest) = split_letter(text, sep)?;

    // Error messages may contain the separator; take them whole.
    if letter == b'e' {
        return Ok(Response::Error(rest));
    }

    let mut fields = rest.split(sep).filter(|f| !f.is_empty() || dialect == Dialect::Pipe);

    match letter {
        b'v' => {
            if dialect == Dialect::Pipe {
                let [_id, version] = take_fields::<2>(&mut fields)?;
                Ok(Response::Version(u8::from_str(version)?))
            } else {
                let [version] = take_fields::<1>(&mut fields)?;
                Ok(Response::Version(u8::from_str(version)?))
            }
        }
        b'n' => {
            let [count] = take_fields::<1>(&mut fields)?;
            Ok(Response::SensorCount(u8::from_str(count)?))
        }
        b'c' => {
            let [count] = take_fields::<1>(&mut fields)?;
            Ok(Response::Config(u8::from_str(count)?))
        }
        b's' => {
            let [slot, flag] = take_fields::<2>(&mut fields)?;
            let present = match flag {
                "0" => false,
                "1" => true,
                _ => return Err(ResponseParseError::InvalidField),
            };
            Ok(Response::Presence(parse_slot(slot)?, present))
        }
        b't' | b'h' => {
            let [slot, value] = take_fields::<2>(&mut fields)?;
            let slot = parse_slot(slot)?;
            let value = f32::from_str(value)?;
            if letter == b't' {
                Ok(Response::Temperature(slot, value))
            } else {
                Ok(Response::Humidity(slot, value))
            }
        }
        b'd' => {
            let mask_field = fields.next().ok_or(ResponseParseError::FieldCount)?;
            let bitmask = parse_mask(mask_field)?;
            let mut report = DataReport { bitmask, ..DataReport::default() };
            while let Some(temperature) = fields.next() {
                let humidity = fields.next().ok_or(ResponseParseError::FieldCount)?;
                let reading = Reading::new(f32::from_str(temperature)?, f32::from_str(humidity)?);
                report
                    .readings
                    .push(reading)
                    .map_err(|_| ResponseParseError::InconsistentDataReport)?;
            }
            if report.readings.len() != bitmask.count_ones() as usize {
                return Err(ResponseParseError::InconsistentDataReport);
            }
            Ok(Response::DataReport(report))
        }
        other => Err(ResponseParseError::UnknownLetter(other)),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::ResponseEncoder;

    fn slot(i: u8) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    #[test]
    fn test_parse_basic_lines() {
        assert_eq!(parse_response(Dialect::Basic, b"v 1\r\n"), Ok(Response::Version(1)));
        assert_eq!(parse_response(Dialect::Basic, b"n 3\r\n"), Ok(Response::SensorCount(3)));
        assert_eq!(parse_response(Dialect::Basic, b"c 4\r\n"), Ok(Response::Config(4)));
        assert_eq!(parse_response(Dialect::Basic, b"c f\r\n"), Err(ResponseParseError::NumericError));
        assert_eq!(
            parse_response(Dialect::Basic, b"e unknown command\r\n"),
            Ok(Response::Error("unknown command"))
        );
    }

    #[test]
    fn test_parse_pipe_lines() {
        assert_eq!(parse_response(Dialect::Pipe, b"v|dht|1\r"), Ok(Response::Version(1)));
        let parsed = parse_response(Dialect::Pipe, b"d|5|21.5|40.0|-3.3|88.0\r").unwrap();
        match parsed {
            Response::DataReport(report) => {
                assert_eq!(report.bitmask, 5);
                let slots: heapless::Vec<u8, 4> = report.iter().map(|(s, _)| s.as_u8()).collect();
                assert_eq!(slots.as_slice(), &[0, 2]);
                assert_eq!(report.readings[1], Reading::new(-3.3, 88.0));
            }
            other => panic!("expected data report, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_periodic_lines() {
        assert_eq!(
            parse_response(Dialect::Periodic, b"s 2 1\r\n"),
            Ok(Response::Presence(slot(2), true))
        );
        assert_eq!(
            parse_response(Dialect::Periodic, b"h 0 45.5\r\n"),
            Ok(Response::Humidity(slot(0), 45.5))
        );
    }

    #[test]
    fn test_temperature_round_trip() {
        let encoder = ResponseEncoder::new(Dialect::Periodic, "dht");
        let line = encoder.encode::<()>(&Response::Temperature(slot(2), 23.4)).unwrap();
        match parse_response(Dialect::Periodic, line.as_bytes()) {
            Ok(Response::Temperature(index, value)) => {
                assert_eq!(index, slot(2));
                assert!((value - 23.4).abs() <= 0.05);
            }
            other => panic!("expected temperature, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_response(Dialect::Basic, b""), Err(ResponseParseError::EmptyInput));
        assert_eq!(parse_response(Dialect::Basic, b"v 1\r"), Err(ResponseParseError::MissingTerminator));
        assert_eq!(parse_response(Dialect::Pipe, b"v 1\r"), Err(ResponseParseError::MissingSeparator));
        assert_eq!(parse_response(Dialect::Periodic, b"t 9 1.0\r\n"), Err(ResponseParseError::InvalidField));
        assert_eq!(parse_response(Dialect::Periodic, b"s 1 2\r\n"), Err(ResponseParseError::InvalidField));
        assert_eq!(parse_response(Dialect::Periodic, b"t 1\r\n"), Err(ResponseParseError::FieldCount));
        assert_eq!(parse_response(Dialect::Periodic, b"t 1 x\r\n"), Err(ResponseParseError::NumericError));
        assert_eq!(parse_response(Dialect::Periodic, b"q 1\r\n"), Err(ResponseParseError::UnknownLetter(b'q')));
        assert_eq!(
            parse_response(Dialect::Basic, "\u{e9} 1\r\n".as_bytes()),
            Err(ResponseParseError::UnknownLetter(0xC3))
        );
        assert_eq!(
            parse_response(Dialect::Pipe, b"d|3|1.0|2.0\r"),
            Err(ResponseParseError::InconsistentDataReport)
        );
        assert_eq!(parse_response(Dialect::Pipe, b"d|1|1.0\r"), Err(ResponseParseError::FieldCount));
        assert_eq!(
            parse_response(Dialect::Basic, &[b'e', b' ', 0xFF, b'\r', b'\n']),
            Err(ResponseParseError::InvalidUtf8)
        );
    }
}
