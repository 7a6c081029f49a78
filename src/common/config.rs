// src/common/config.rs

use super::dialect::Dialect;
use super::slot::IndexPolicy;
use super::timing;

/// Firmware version reported by `v`.
pub const FIRMWARE_VERSION: u8 = 1;

/// Device identifier reported in the pipe dialect's version line.
pub const DEFAULT_DEVICE_ID: &str = "dht";

/// Per-instance firmware configuration. Fixed at construction; the firmware
/// never renegotiates any of it at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    /// Wire dialect spoken on the serial link.
    pub dialect: Dialect,
    /// Version number answered to `v`.
    pub version: u8,
    /// Identifier in `v|<id>|<version>` (pipe dialect only).
    pub device_id: &'static str,
    /// Nominal serial rate, for board init.
    pub baud_rate: u32,
    /// Wait between configuring the sensor lines and the detection reads.
    pub settle_delay_ms: u32,
    /// Interval between unsolicited samples (periodic dialect only).
    pub sample_interval_ms: u32,
    /// Give-up time for a single response byte.
    pub write_timeout_ms: u32,
    /// Treatment of out-of-range wire indices.
    pub index_policy: IndexPolicy,
}

impl FirmwareConfig {
    /// Defaults for the given dialect.
    pub const fn for_dialect(dialect: Dialect) -> Self {
        FirmwareConfig {
            dialect,
            version: FIRMWARE_VERSION,
            device_id: DEFAULT_DEVICE_ID,
            baud_rate: timing::BAUD_RATE,
            settle_delay_ms: timing::SENSOR_SETTLE_DELAY_MS,
            sample_interval_ms: timing::DEFAULT_SAMPLE_INTERVAL_MS,
            write_timeout_ms: timing::WRITE_TIMEOUT_MS,
            index_policy: IndexPolicy::Clamp,
        }
    }

    pub const fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub const fn with_device_id(mut self, device_id: &'static str) -> Self {
        self.device_id = device_id;
        self
    }

    /// Sets the settle delay. Sensors need at least the datasheet minimum, so
    /// shorter values are raised to it.
    pub const fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = if ms < timing::SENSOR_SETTLE_DELAY_MS {
            timing::SENSOR_SETTLE_DELAY_MS
        } else {
            ms
        };
        self
    }

    /// Sets the sampling interval, raised to the sensor's minimum read interval.
    pub const fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = if ms < timing::SENSOR_MIN_READ_INTERVAL_MS {
            timing::SENSOR_MIN_READ_INTERVAL_MS
        } else {
            ms
        };
        self
    }

    pub const fn with_write_timeout_ms(mut self, ms: u32) -> Self {
        self.write_timeout_ms = ms;
        self
    }

    pub const fn with_index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}
