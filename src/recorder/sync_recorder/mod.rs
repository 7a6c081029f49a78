// src/recorder/sync_recorder/mod.rs

mod io_helpers;
mod transaction;

pub use transaction::MAX_UNSOLICITED_LINES;

use crate::common::{
    command::Command,
    dialect::Dialect,
    error::FirmwareError,
    hal_traits::{FirmwareSerial, FirmwareTimer},
    response::{DataReport, Response},
    slot::SlotIndex,
};

/// Host-side client for a firmware instance, for SYNCHRONOUS operations.
///
/// Speaks one dialect; the typed helpers only succeed for commands that
/// dialect knows, others come back as `DeviceReported("unknown command")`.
#[derive(Debug)]
pub struct SyncRecorder<IF> {
    interface: IF,
    dialect: Dialect,
}

impl<IF> SyncRecorder<IF>
where
    IF: FirmwareSerial + FirmwareTimer,
{
    pub fn new(interface: IF, dialect: Dialect) -> Self {
        SyncRecorder { interface, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn release(self) -> IF {
        self.interface
    }

    // --- Public Blocking Methods ---

    /// Sends any command and returns its answer.
    pub fn transact(&mut self, command: &Command<'_>) -> Result<Response<'static>, FirmwareError<IF::Error>> {
        self.execute_transaction(command)
    }

    pub fn version(&mut self) -> Result<u8, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetVersion)? {
            Response::Version(version) => Ok(version),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    pub fn sensor_count(&mut self) -> Result<u8, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetSensorCount)? {
            Response::SensorCount(count) => Ok(count),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    /// The `c` answer: number of configured (present) sensors.
    pub fn config(&mut self) -> Result<u8, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetConfig)? {
            Response::Config(count) => Ok(count),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    pub fn presence(&mut self, slot: SlotIndex) -> Result<bool, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetPresence(slot.as_u8() as i32))? {
            Response::Presence(answered, present) if answered == slot => Ok(present),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    /// Last temperature of `slot`, degrees Celsius, to one decimal.
    pub fn temperature(&mut self, slot: SlotIndex) -> Result<f32, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetTemperature(slot.as_u8() as i32))? {
            Response::Temperature(answered, value) if answered == slot => Ok(value),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    /// Last relative humidity of `slot`, percent, to one decimal.
    pub fn humidity(&mut self, slot: SlotIndex) -> Result<f32, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetHumidity(slot.as_u8() as i32))? {
            Response::Humidity(answered, value) if answered == slot => Ok(value),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }

    /// Fresh readings of every present slot.
    pub fn data(&mut self) -> Result<DataReport, FirmwareError<IF::Error>> {
        match self.execute_transaction(&Command::GetData)? {
            Response::DataReport(report) => Ok(report),
            _ => Err(FirmwareError::UnexpectedResponse),
        }
    }
}
