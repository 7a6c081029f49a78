// src/sensor/dispatcher.rs

use super::bank::SensorBank;
use crate::common::{
    command::Command,
    config::FirmwareConfig,
    hal_traits::SensorBus,
    response::{DataReport, Response},
    slot::{IndexPolicy, SlotIndex},
    types::{Reading, SensorFault},
};

/// Error text for an index rejected under [`IndexPolicy::Reject`].
pub const INVALID_INDEX_MESSAGE: &str = "invalid index";

/// Error text for a verb outside the active dialect.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "unknown command";

/// Maps parsed commands to responses against a [`SensorBank`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommandDispatcher {
    version: u8,
    index_policy: IndexPolicy,
}

impl CommandDispatcher {
    pub const fn new(version: u8, index_policy: IndexPolicy) -> Self {
        CommandDispatcher { version, index_policy }
    }

    pub const fn from_config(config: &FirmwareConfig) -> Self {
        Self::new(config.version, config.index_policy)
    }

    /// Answers one command. Always produces exactly one response.
    pub fn dispatch<BUS: SensorBus>(
        &self,
        bank: &mut SensorBank<BUS>,
        command: &Command<'_>,
    ) -> Response<'static> {
        match *command {
            Command::GetVersion => Response::Version(self.version),
            Command::GetSensorCount => Response::SensorCount(bank.present_count()),
            Command::GetConfig => Response::Config(bank.present_count()),
            Command::GetData => Self::read_all(bank),
            Command::GetPresence(raw) => match self.resolve(raw) {
                Ok(slot) => Response::Presence(slot, bank.is_present(slot)),
                Err(response) => response,
            },
            Command::GetTemperature(raw) => match self.resolve(raw) {
                Ok(slot) => Self::last_reading(bank, slot)
                    .map_or_else(fault_response, |r| Response::Temperature(slot, r.temperature)),
                Err(response) => response,
            },
            Command::GetHumidity(raw) => match self.resolve(raw) {
                Ok(slot) => Self::last_reading(bank, slot)
                    .map_or_else(fault_response, |r| Response::Humidity(slot, r.humidity)),
                Err(response) => response,
            },
            Command::Unrecognized(_) => {
                debug!("unrecognized command");
                Response::Error(UNKNOWN_COMMAND_MESSAGE)
            }
        }
    }

    fn resolve(&self, raw: i32) -> Result<SlotIndex, Response<'static>> {
        SlotIndex::resolve(raw, self.index_policy).map_err(|_| {
            debug!("rejected slot index {}", raw);
            Response::Error(INVALID_INDEX_MESSAGE)
        })
    }

    /// Most recent measurement of a present slot.
    fn last_reading<BUS: SensorBus>(bank: &SensorBank<BUS>, slot: SlotIndex) -> Result<Reading, SensorFault> {
        if !bank.is_present(slot) {
            return Err(SensorFault::Connect);
        }
        bank.last_outcome(slot)
    }

    /// Reads every present slot in order. The first failure aborts the batch.
    fn read_all<BUS: SensorBus>(bank: &mut SensorBank<BUS>) -> Response<'static> {
        let bitmask = bank.presence_bitmask();
        let mut report = DataReport { bitmask, ..DataReport::default() };
        for slot in SlotIndex::all().filter(|slot| bitmask & slot.mask() != 0) {
            match bank.read(slot) {
                // At most SLOT_COUNT present slots, so the push cannot fail.
                Ok(reading) => {
                    let _ = report.readings.push(reading);
                }
                Err(fault) => return fault_response(fault),
            }
        }
        Response::DataReport(report)
    }
}

fn fault_response(fault: SensorFault) -> Response<'static> {
    Response::Error(fault.message())
}
