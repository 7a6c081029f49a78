// src/recorder/sync_recorder/io_helpers.rs

use super::SyncRecorder; // Access SyncRecorder definition
use crate::common::{
    error::FirmwareError,
    hal_traits::{execute_blocking_io_with_timeout, FirmwareSerial, FirmwareTimer},
    timing,
};

// Implementation block for I/O related helpers
impl<IF> SyncRecorder<IF>
where
    IF: FirmwareSerial + FirmwareTimer,
{
    /// Sends the already formatted command bytes over the serial interface.
    pub(super) fn send_command_bytes(&mut self, cmd_bytes: &[u8]) -> Result<(), FirmwareError<IF::Error>> {
        for byte in cmd_bytes {
            execute_blocking_io_with_timeout(&mut self.interface, timing::WRITE_TIMEOUT_MS, |iface| {
                iface.write_byte(*byte)
            })?;
        }
        execute_blocking_io_with_timeout(&mut self.interface, timing::WRITE_TIMEOUT_MS, |iface| iface.flush())
    }

    /// Reads one complete response line, terminator included, into the buffer.
    ///
    /// The first byte may take up to [`timing::RESPONSE_START_TIMEOUT_MS`]
    /// (the device may be busy reading sensors); later bytes must follow
    /// within [`timing::INTER_CHARACTER_TIMEOUT_MS`].
    pub(super) fn read_response_line<'buf>(
        &mut self,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], FirmwareError<IF::Error>> {
        let terminator = self.dialect.output_terminator().as_bytes();
        let mut bytes_read = 0;
        loop {
            if bytes_read >= buffer.len() {
                return Err(FirmwareError::BufferOverflow {
                    needed: bytes_read + 1,
                    got: buffer.len(),
                });
            }

            let current_timeout = if bytes_read == 0 {
                timing::RESPONSE_START_TIMEOUT_MS
            } else {
                timing::INTER_CHARACTER_TIMEOUT_MS
            };

            match execute_blocking_io_with_timeout(&mut self.interface, current_timeout, |iface| iface.read_byte()) {
                Ok(byte) => {
                    buffer[bytes_read] = byte;
                    bytes_read += 1;
                    if buffer[..bytes_read].ends_with(terminator) {
                        return Ok(&buffer[..bytes_read]);
                    }
                }
                Err(FirmwareError::Timeout) if bytes_read > 0 => {
                    // Line started but never finished
                    return Err(FirmwareError::InvalidFormat);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// --- Unit Tests for IO Helpers ---
#[cfg(test)]
mod tests {
    use super::super::tests::{MockCommError, MockInterface};
    use super::*;
    use crate::common::{dialect::Dialect, hal_traits::execute_blocking_io_with_timeout};

    #[test]
    fn test_execute_blocking_io_with_timeout() {
        let mut iface = MockInterface::default();

        // Ok after a few polls
        let mut calls = 0;
        let result_ok: Result<i32, FirmwareError<MockCommError>> =
            execute_blocking_io_with_timeout(&mut iface, 10, |_| {
                calls += 1;
                if calls < 4 {
                    Err(nb::Error::WouldBlock)
                } else {
                    Ok(123)
                }
            });
        assert!(matches!(result_ok, Ok(123)));
        assert_eq!(calls, 4);
        assert_eq!(iface.now_ms, 3);

        // Timeout
        iface.now_ms = 0;
        let result_timeout: Result<(), FirmwareError<MockCommError>> =
            execute_blocking_io_with_timeout(&mut iface, 5, |_| Err(nb::Error::WouldBlock));
        assert!(matches!(result_timeout, Err(FirmwareError::Timeout)));
        assert_eq!(iface.now_ms, 5);

        // IO error
        let result_io_err: Result<(), FirmwareError<MockCommError>> =
            execute_blocking_io_with_timeout(&mut iface, 10, |_| Err(nb::Error::Other(MockCommError)));
        assert!(matches!(result_io_err, Err(FirmwareError::Io(MockCommError))));
    }

    #[test]
    fn test_timeout_across_clock_wrap() {
        let mut iface = MockInterface::default();
        iface.now_ms = u32::MAX - 2;
        let result: Result<(), FirmwareError<MockCommError>> =
            execute_blocking_io_with_timeout(&mut iface, 5, |_| Err(nb::Error::WouldBlock));
        assert!(matches!(result, Err(FirmwareError::Timeout)));
        assert_eq!(iface.now_ms, 2);
    }

    #[test]
    fn test_read_response_line_success() {
        let mut mock_if = MockInterface::default();
        let data_to_read = b"t 2 23.4\r\n";
        mock_if.stage_read_data(data_to_read);
        let mut recorder = SyncRecorder::new(mock_if, Dialect::Periodic);
        let mut buffer = [0u8; 32];

        let line = recorder.read_response_line(&mut buffer).unwrap();
        assert_eq!(line, data_to_read);
    }

    #[test]
    fn test_read_response_line_pipe_terminator() {
        let mut mock_if = MockInterface::default();
        mock_if.stage_read_data(b"v|dht|1\rd|0\r");
        let mut recorder = SyncRecorder::new(mock_if, Dialect::Pipe);
        let mut buffer = [0u8; 32];

        assert_eq!(recorder.read_response_line(&mut buffer).unwrap(), b"v|dht|1\r");
        assert_eq!(recorder.read_response_line(&mut buffer).unwrap(), b"d|0\r");
    }

    #[test]
    fn test_read_response_line_timeout_no_data() {
        let mut recorder = SyncRecorder::new(MockInterface::default(), Dialect::Basic);
        let mut buffer = [0u8; 32];
        let result = recorder.read_response_line(&mut buffer);
        assert!(matches!(result, Err(FirmwareError::Timeout)));
        assert!(recorder.interface.now_ms >= timing::RESPONSE_START_TIMEOUT_MS);
    }

    #[test]
    fn test_read_response_line_timeout_partial_data() {
        let mut mock_if = MockInterface::default();
        mock_if.stage_read_data(b"v 1\r");
        let mut recorder = SyncRecorder::new(mock_if, Dialect::Basic);
        let mut buffer = [0u8; 32];
        let result = recorder.read_response_line(&mut buffer);
        assert!(matches!(result, Err(FirmwareError::InvalidFormat)));
    }

    #[test]
    fn test_read_response_line_buffer_overflow() {
        let mut mock_if = MockInterface::default();
        mock_if.stage_read_data(b"t 1 12.345\r\n"); // 12 bytes
        let mut recorder = SyncRecorder::new(mock_if, Dialect::Periodic);
        let mut buffer = [0u8; 8]; // Buffer too small
        let result = recorder.read_response_line(&mut buffer);
        assert!(matches!(result, Err(FirmwareError::BufferOverflow { needed: 9, got: 8 })));
    }

    #[test]
    fn test_send_command_bytes_success() {
        let mut recorder = SyncRecorder::new(MockInterface::default(), Dialect::Periodic);
        recorder.send_command_bytes(b"t 1\n").unwrap();
        assert_eq!(recorder.interface.write_log.as_slice(), b"t 1\n");
        assert_eq!(recorder.interface.flushes, 1);
    }

    #[test]
    fn test_send_command_bytes_timeout() {
        let mut mock_if = MockInterface::default();
        mock_if.write_blocked = true;
        let mut recorder = SyncRecorder::new(mock_if, Dialect::Periodic);
        let result = recorder.send_command_bytes(b"v\n");
        assert!(matches!(result, Err(FirmwareError::Timeout)));
        assert!(recorder.interface.write_log.is_empty());
    }
}
