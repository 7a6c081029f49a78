// src/common/types.rs

use core::fmt;

// --- Measurement values ---

/// One successful temperature/humidity measurement.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

impl Reading {
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self { temperature, humidity }
    }
}

/// Why a sensor read did not produce a [`Reading`].
///
/// The `Display` strings are part of the wire protocol: they are sent
/// verbatim in error lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    #[error("checksum error")]
    Checksum,
    #[error("timeout error")]
    Timeout,
    #[error("connect error")]
    Connect,
    #[error("ack low error")]
    AckLow,
    #[error("ack high error")]
    AckHigh,
    #[error("unknown error")]
    Unknown,
}

/// Result of one read attempt on a slot.
pub type ReadOutcome = Result<Reading, SensorFault>;

impl SensorFault {
    /// Maps a classic DHT driver status code. `0` is success and yields `None`;
    /// every code outside the known table is `Unknown`.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => None,
            -1 => Some(SensorFault::Checksum),
            -2 => Some(SensorFault::Timeout),
            -3 => Some(SensorFault::Connect),
            -4 => Some(SensorFault::AckLow),
            -5 => Some(SensorFault::AckHigh),
            _ => Some(SensorFault::Unknown),
        }
    }

    /// The fixed human-readable message for this fault.
    pub const fn message(&self) -> &'static str {
        match self {
            SensorFault::Checksum => "checksum error",
            SensorFault::Timeout => "timeout error",
            SensorFault::Connect => "connect error",
            SensorFault::AckLow => "ack low error",
            SensorFault::AckHigh => "ack high error",
            SensorFault::Unknown => "unknown error",
        }
    }
}

/// Message for an outcome, as it appears on the wire.
pub fn error_message(outcome: &ReadOutcome) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(fault) => fault.message(),
    }
}

// --- Fixed-point rendering ---

/// A value rendered with exactly one fractional digit, rounded half away from zero.
///
/// Formatting goes through integer tenths so no float formatting code is
/// pulled into the firmware image. Clients parse the value back with a
/// tolerance of 0.05.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tenths(pub f32);

impl Tenths {
    /// The value in whole tenths. Saturates on overflow, NaN becomes 0.
    pub fn as_tenths(&self) -> i32 {
        let scaled = self.0 * 10.0;
        if scaled >= 0.0 {
            (scaled + 0.5) as i32
        } else {
            (scaled - 0.5) as i32
        }
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.as_tenths();
        let magnitude = tenths.unsigned_abs();
        if tenths < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{}", magnitude / 10, magnitude % 10)
    }
}

// --- DHT frame decoding ---

/// Sensor families sharing the 40-bit DHT frame layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DhtModel {
    /// Integer + tenths bytes, non-negative temperatures only.
    Dht11,
    /// 16-bit tenths, MSB of the temperature word is the sign. Also AM2302.
    #[default]
    Dht22,
}

/// Decodes a raw 5-byte frame: humidity word, temperature word, checksum.
pub fn decode_frame(model: DhtModel, frame: [u8; 5]) -> ReadOutcome {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorFault::Checksum);
    }

    let reading = match model {
        DhtModel::Dht11 => Reading::new(
            frame[2] as f32 + (frame[3] & 0x0F) as f32 / 10.0,
            frame[0] as f32 + frame[1] as f32 / 10.0,
        ),
        DhtModel::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
            let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
            let temperature = if frame[2] & 0x80 != 0 { -magnitude } else { magnitude };
            Reading::new(temperature, humidity)
        }
    };
    Ok(reading)
}
