// src/common/hal_traits.rs

use super::error::FirmwareError;
use super::slot::SlotIndex;
use super::timing;
use super::types::ReadOutcome;
use core::fmt::Debug;

/// Abstraction for the delay and clock operations the firmware needs.
pub trait FirmwareTimer {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds since an arbitrary origin.
    ///
    /// The counter is 32 bits wide and wraps; callers must never assume it is
    /// monotonic across a wrap.
    fn now_ms(&self) -> u32;
}

/// The serial link, polled one byte at a time.
///
/// All three operations are non-blocking: `WouldBlock` means "try again",
/// `Other` is a hard transport error.
pub trait FirmwareSerial {
    type Error: Debug;

    /// Next received byte, or `WouldBlock` when none is buffered.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Queues one byte for transmission; `WouldBlock` while the transmitter is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Completes once everything queued has left the transmitter.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// The sensor bus: one digital line per slot, driven by a DHT-style bit-banging driver.
///
/// `read` blocks for the protocol-defined transaction time (tens of
/// milliseconds) and always returns a definite outcome.
pub trait SensorBus {
    /// Configures the line of `slot` for sensor communication.
    fn configure(&mut self, slot: SlotIndex);

    /// Performs one read transaction on `slot`.
    fn read(&mut self, slot: SlotIndex) -> ReadOutcome;
}

/// Executes a non-blocking I/O operation (`f`) repeatedly until it stops
/// returning `WouldBlock`, returning the final result or a timeout error.
///
/// Elapsed time is taken with wrapping arithmetic, so a clock wrap during the
/// wait does not cut it short or stretch it.
pub(crate) fn execute_blocking_io_with_timeout<IF, T, E, FN>(
    interface: &mut IF,
    timeout_ms: u32,
    mut f: FN,
) -> Result<T, FirmwareError<E>>
where
    IF: FirmwareTimer,
    E: Debug,
    FN: FnMut(&mut IF) -> nb::Result<T, E>,
{
    let start_ms = interface.now_ms();
    loop {
        match f(interface) {
            Ok(result) => return Ok(result),
            Err(nb::Error::WouldBlock) => {
                if interface.now_ms().wrapping_sub(start_ms) >= timeout_ms {
                    return Err(FirmwareError::Timeout);
                }
                interface.delay_ms(timing::IO_POLL_INTERVAL_MS);
            }
            Err(nb::Error::Other(e)) => return Err(FirmwareError::Io(e)),
        }
    }
}

/// Builds a [`FirmwareTimer`] from an `embedded-hal` delay and a millisecond clock source.
#[cfg(feature = "embedded-hal")]
pub struct HalTimer<D, C> {
    delay: D,
    clock: C,
}

#[cfg(feature = "embedded-hal")]
impl<D, C> HalTimer<D, C>
where
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u32,
{
    pub fn new(delay: D, clock: C) -> Self {
        HalTimer { delay, clock }
    }

    /// Gives the delay provider back.
    pub fn release(self) -> D {
        self.delay
    }
}

#[cfg(feature = "embedded-hal")]
impl<D, C> FirmwareTimer for HalTimer<D, C>
where
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u32,
{
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn now_ms(&self) -> u32 {
        (self.clock)()
    }
}
