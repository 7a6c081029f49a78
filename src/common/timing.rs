// src/common/timing.rs

// Nominal protocol timing values. `FirmwareConfig` takes its defaults from
// here; boards may override them per instance.

// === Serial link ===

/// Nominal serial line rate. Informational for board init; the core never
/// configures the UART itself.
pub const BAUD_RATE: u32 = 115_200;

/// Maximum time a single response byte may wait for the transmitter before the
/// write is abandoned with a timeout.
pub const WRITE_TIMEOUT_MS: u32 = 50;

/// Idle spin between polls of a non-blocking I/O operation.
pub const IO_POLL_INTERVAL_MS: u32 = 1;

// === Sensor power-on (DHT datasheet) ===

/// Settle delay between powering/configuring the sensor lines and the first read.
/// DHT22 needs at least 2 s after power-on before it answers reliably.
pub const SENSOR_SETTLE_DELAY_MS: u32 = 2_000;

/// Minimum interval between two reads of the same DHT22 sensor.
pub const SENSOR_MIN_READ_INTERVAL_MS: u32 = 2_000;

// === Periodic reporting ===

/// Default interval between unsolicited samples in the periodic dialect.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 10_000;

// === Host side ===

/// Maximum time the host waits for the first byte of a response. Covers one
/// full pass of blocking sensor reads on the device side.
pub const RESPONSE_START_TIMEOUT_MS: u32 = 1_000;

/// Maximum gap between two bytes of the same response line.
pub const INTER_CHARACTER_TIMEOUT_MS: u32 = 20;
