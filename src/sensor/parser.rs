// src/sensor/parser.rs

use crate::common::{command::Command, dialect::Dialect};

/// Parses one command line (terminator already stripped) for `dialect`.
///
/// Returns `None` for a line that is empty after trimming; such lines get no
/// answer at all. Every other line yields a command. The verb is the first
/// byte; verbs outside the dialect become [`Command::Unrecognized`].
///
/// Index arguments use a deliberately tolerant scan: an optional sign and the
/// leading digits after optional whitespace. A missing or malformed argument
/// reads as `0`, and out-of-range values are left for the dispatcher to resolve.
pub fn parse_command(dialect: Dialect, line: &[u8]) -> Option<Command<'_>> {
    let line = trim(line);
    let (&verb, rest) = line.split_first()?;

    if !dialect.accepts_verb(verb) {
        return Some(Command::Unrecognized(line));
    }

    let command = match verb {
        b'v' => Command::GetVersion,
        b'n' => Command::GetSensorCount,
        b'c' => Command::GetConfig,
        b'd' => Command::GetData,
        b's' => Command::GetPresence(scan_int(rest)),
        b't' => Command::GetTemperature(scan_int(rest)),
        b'h' => Command::GetHumidity(scan_int(rest)),
        _ => Command::Unrecognized(line),
    };
    Some(command)
}

/// Strips leading and trailing ASCII whitespace.
fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Scans a decimal integer the way `%d` does: whitespace, sign, digits.
/// No digits gives 0; values beyond `i32` saturate.
fn scan_int(bytes: &[u8]) -> i32 {
    let mut rest = trim(bytes);
    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let magnitude = rest
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i32, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i32));

    if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    }
}
