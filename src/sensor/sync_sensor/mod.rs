// src/sensor/sync_sensor/mod.rs

mod io_helpers;

use super::{
    bank::SensorBank, dispatcher::CommandDispatcher, line::LineAssembler, parser::parse_command,
    scheduler::Scheduler,
};
use crate::common::{
    config::FirmwareConfig,
    dialect::Dialect,
    error::FirmwareError,
    hal_traits::{FirmwareSerial, FirmwareTimer, SensorBus},
    response::{Response, ResponseEncoder},
    slot::SlotIndex,
};

/// The firmware main loop for one dialect.
///
/// `IF` provides the serial link and the clock, `BUS` the sensor lines.
/// Everything runs on the caller's thread; [`step`](Self::step) does one
/// bounded pass and is what tests drive, [`run`](Self::run) loops forever.
#[derive(Debug)]
pub struct Firmware<IF, BUS> {
    interface: IF,
    bank: SensorBank<BUS>,
    config: FirmwareConfig,
    assembler: LineAssembler,
    dispatcher: CommandDispatcher,
    encoder: ResponseEncoder,
    scheduler: Scheduler,
    started: bool,
}

impl<IF, BUS> Firmware<IF, BUS>
where
    IF: FirmwareSerial + FirmwareTimer,
    BUS: SensorBus,
{
    pub fn new(config: FirmwareConfig, interface: IF, bus: BUS) -> Self {
        let now_ms = interface.now_ms();
        Firmware {
            assembler: LineAssembler::new(config.dialect.input_terminator()),
            dispatcher: CommandDispatcher::from_config(&config),
            encoder: ResponseEncoder::from_config(&config),
            scheduler: Scheduler::new(config.sample_interval_ms, now_ms),
            bank: SensorBank::new(bus),
            interface,
            config,
            started: false,
        }
    }

    /// Startup sequence: version banner (basic and periodic dialects), sensor
    /// detection, then the presence of every slot (periodic dialect).
    ///
    /// Detection runs exactly once and the presence lines go out even if
    /// writing the banner fails; the first write error is returned.
    pub fn start(&mut self) -> Result<(), FirmwareError<IF::Error>> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        info!("starting, dialect {:?}", self.config.dialect);

        let banner = match self.config.dialect {
            Dialect::Basic | Dialect::Periodic => self.emit(&Response::Version(self.config.version)),
            Dialect::Pipe => Ok(()),
        };

        self.bank.detect(&mut self.interface, self.config.settle_delay_ms);
        self.scheduler.reset(self.interface.now_ms());

        let mut outcome = banner;
        if self.config.dialect == Dialect::Periodic {
            for slot in SlotIndex::all() {
                let present = self.bank.is_present(slot);
                let sent = self.emit(&Response::Presence(slot, present));
                outcome = outcome.and(sent);
            }
        }
        outcome
    }

    /// One pass of the main loop: the sampling tick first (periodic dialect),
    /// then at most one buffered command. Starts the firmware if needed.
    ///
    /// A failed sample write does not keep the command from being served;
    /// the first error of the pass is returned.
    pub fn step(&mut self) -> Result<(), FirmwareError<IF::Error>> {
        if !self.started {
            return self.start();
        }

        let sampled = if self.config.dialect.reports_periodically()
            && self.scheduler.poll(self.interface.now_ms())
        {
            self.sample()
        } else {
            Ok(())
        };
        let served = self.serve_command();
        sampled.and(served)
    }

    /// Answers the next complete command line, if one is buffered.
    fn serve_command(&mut self) -> Result<(), FirmwareError<IF::Error>> {
        if let Some(line) = self.poll_line()? {
            if line.is_truncated() {
                debug!("serving truncated command line");
            }
            if let Some(command) = parse_command(self.config.dialect, line.as_bytes()) {
                let response = self.dispatcher.dispatch(&mut self.bank, &command);
                self.emit(&response)?;
            }
        }
        Ok(())
    }

    /// Runs forever. Errors are logged and the loop keeps going.
    pub fn run(&mut self) -> ! {
        loop {
            match self.step() {
                Ok(()) => {}
                Err(FirmwareError::Io(_)) => error!("serial I/O error"),
                Err(FirmwareError::Timeout) => warn!("serial write timed out"),
                Err(FirmwareError::LineTooLong { needed, capacity }) => {
                    error!("response of {} bytes exceeds line capacity {}", needed, capacity)
                }
                Err(_) => error!("firmware step failed"),
            }
        }
    }

    /// Reads every present slot and reports it: temperature and humidity
    /// lines on success, one error line on failure.
    fn sample(&mut self) -> Result<(), FirmwareError<IF::Error>> {
        let bitmask = self.bank.presence_bitmask();
        for slot in SlotIndex::all().filter(|slot| bitmask & slot.mask() != 0) {
            match self.bank.read(slot) {
                Ok(reading) => {
                    self.emit(&Response::Temperature(slot, reading.temperature))?;
                    self.emit(&Response::Humidity(slot, reading.humidity))?;
                }
                Err(fault) => self.emit(&Response::Error(fault.message()))?,
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }

    pub fn bank(&self) -> &SensorBank<BUS> {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut SensorBank<BUS> {
        &mut self.bank
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the serial interface and the sensor bus back.
    pub fn release(self) -> (IF, BUS) {
        (self.interface, self.bank.release())
    }
}
