// src/recorder/sync_recorder/transaction.rs

use super::SyncRecorder;
use crate::common::{
    command::Command,
    error::FirmwareError,
    hal_traits::{FirmwareSerial, FirmwareTimer},
    response::{parse_response, Response, MAX_LINE_LEN},
};
use arrayvec::ArrayString;
use core::fmt::{Debug, Write};

/// Lines with a non-matching letter skipped while waiting for an answer.
/// Covers one full periodic sample burst plus the startup broadcast.
pub const MAX_UNSOLICITED_LINES: usize = 12;

/// Longest command line the recorder sends, terminator included.
const COMMAND_BUFFER_LEN: usize = 128;

impl<IF> SyncRecorder<IF>
where
    IF: FirmwareSerial + FirmwareTimer,
{
    /// Sends one command and waits for its answer.
    ///
    /// Lines whose letter does not match the command's reply letter are
    /// unsolicited output (periodic samples, startup broadcast) and are
    /// skipped. An `e` line always counts as the answer and is returned as
    /// [`FirmwareError::DeviceReported`].
    pub(super) fn execute_transaction(
        &mut self,
        command: &Command<'_>,
    ) -> Result<Response<'static>, FirmwareError<IF::Error>> {
        let mut command_buffer = ArrayString::<COMMAND_BUFFER_LEN>::new();
        write!(
            command_buffer,
            "{}{}",
            command,
            self.dialect.input_terminator().byte() as char
        )
        .map_err(|_| FirmwareError::InvalidFormat)?;

        trace!("<- {}", command_buffer.as_str());
        self.send_command_bytes(command_buffer.as_bytes())?;

        let expected = command.reply_letter();
        let mut read_buffer = [0u8; MAX_LINE_LEN];
        for _ in 0..=MAX_UNSOLICITED_LINES {
            let line = self.read_response_line(&mut read_buffer)?;
            let response = parse_response(self.dialect, line).map_err(|e| {
                debug!("unparseable response line: {:?}", e);
                FirmwareError::InvalidFormat
            })?;

            if response.is_error() || response.letter() == expected {
                return detach(response);
            }
            trace!("skipping unsolicited '{}' line", response.letter() as char);
        }

        Err(FirmwareError::UnexpectedResponse)
    }
}

/// Releases the answer from the read buffer. Only `Error` borrows the line;
/// its text is copied into the error.
fn detach<E: Debug>(response: Response<'_>) -> Result<Response<'static>, FirmwareError<E>> {
    Ok(match response {
        Response::Version(v) => Response::Version(v),
        Response::SensorCount(n) => Response::SensorCount(n),
        Response::Config(mask) => Response::Config(mask),
        Response::Presence(slot, present) => Response::Presence(slot, present),
        Response::Temperature(slot, value) => Response::Temperature(slot, value),
        Response::Humidity(slot, value) => Response::Humidity(slot, value),
        Response::DataReport(report) => Response::DataReport(report),
        Response::Error(message) => return Err(FirmwareError::device_reported(message)),
    })
}
