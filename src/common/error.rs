// src/common/error.rs

use heapless::String;

/// Capacity of the message text carried by [`FirmwareError::DeviceReported`].
pub const DEVICE_MESSAGE_CAPACITY: usize = 48;

/// Error text reported by a device in an `e` line, as seen by the host client.
pub type DeviceMessage = String<DEVICE_MESSAGE_CAPACITY>;

#[derive(Debug, thiserror::Error)]
pub enum FirmwareError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the serial HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Operation timed out (write not accepted, or no response line in time).
    #[error("Operation timed out")]
    Timeout,

    /// A response line does not fit the wire line capacity. Nothing was sent.
    #[error("Response line too long: needed {needed}, capacity {capacity}")]
    LineTooLong { needed: usize, capacity: usize },

    /// Received line is not a well-formed response for the active dialect.
    #[error("Invalid response format")]
    InvalidFormat,

    /// Got a well-formed line, but not the one expected for the command sent.
    #[error("Unexpected response received")]
    UnexpectedResponse,

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// The device answered with an error line.
    #[error("Device reported error: {0}")]
    DeviceReported(DeviceMessage),
}

// Allow mapping from underlying HAL error
impl<E: core::fmt::Debug> From<E> for FirmwareError<E> {
    fn from(e: E) -> Self {
        FirmwareError::Io(e)
    }
}

impl<E: core::fmt::Debug> FirmwareError<E> {
    /// Builds a `DeviceReported` error, truncating the text to the message capacity.
    pub fn device_reported(message: &str) -> Self {
        let mut text = DeviceMessage::new();
        for c in message.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        FirmwareError::DeviceReported(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[derive(Debug, PartialEq)]
    struct MockIoError;

    #[test]
    fn test_from_hal_error() {
        let err: FirmwareError<MockIoError> = MockIoError.into();
        assert!(matches!(err, FirmwareError::Io(MockIoError)));
    }

    #[test]
    fn test_display_messages() {
        let mut out = String::<64>::new();
        write!(out, "{}", FirmwareError::<()>::LineTooLong { needed: 140, capacity: 127 }).unwrap();
        assert_eq!(out.as_str(), "Response line too long: needed 140, capacity 127");

        out.clear();
        write!(out, "{}", FirmwareError::<()>::device_reported("checksum error")).unwrap();
        assert_eq!(out.as_str(), "Device reported error: checksum error");
    }

    #[test]
    fn test_device_reported_truncates() {
        let long = "sensor bus reported a very long and rather unhelpful error text";
        match FirmwareError::<()>::device_reported(long) {
            FirmwareError::DeviceReported(text) => {
                assert_eq!(text.len(), DEVICE_MESSAGE_CAPACITY);
                assert!(long.starts_with(text.as_str()));
            }
            other => panic!("expected DeviceReported, got {:?}", other),
        }
    }
}
