// src/sensor/sync_sensor/io_helpers.rs

use super::Firmware;
use crate::sensor::line::CommandLine;
use crate::common::{
    error::FirmwareError,
    hal_traits::{execute_blocking_io_with_timeout, FirmwareSerial, FirmwareTimer, SensorBus},
    response::Response,
};

impl<IF, BUS> Firmware<IF, BUS>
where
    IF: FirmwareSerial + FirmwareTimer,
    BUS: SensorBus,
{
    /// Encodes and sends one response line. Nothing is written when the line
    /// does not encode.
    pub(super) fn emit(&mut self, response: &Response<'_>) -> Result<(), FirmwareError<IF::Error>> {
        let line = self.encoder.encode::<IF::Error>(response)?;
        trace!("-> {}", line.as_str());
        self.write_line(line.as_bytes())
    }

    /// Writes the bytes and flushes. Every byte gets the full write timeout.
    pub(super) fn write_line(&mut self, bytes: &[u8]) -> Result<(), FirmwareError<IF::Error>> {
        let timeout_ms = self.config.write_timeout_ms;
        for byte in bytes {
            execute_blocking_io_with_timeout(&mut self.interface, timeout_ms, |iface| iface.write_byte(*byte))?;
        }
        execute_blocking_io_with_timeout(&mut self.interface, timeout_ms, |iface| iface.flush())
    }

    /// Pulls buffered bytes until one command line completes or the input runs
    /// dry. Never waits for more input.
    pub(super) fn poll_line(&mut self) -> Result<Option<CommandLine>, FirmwareError<IF::Error>> {
        loop {
            match self.interface.read_byte() {
                Ok(byte) => {
                    if let Some(line) = self.assembler.push(byte) {
                        return Ok(Some(line));
                    }
                }
                Err(nb::Error::WouldBlock) => return Ok(None),
                Err(nb::Error::Other(e)) => return Err(FirmwareError::Io(e)),
            }
        }
    }
}
