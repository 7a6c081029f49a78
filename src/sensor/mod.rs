// src/sensor/mod.rs

// Device side: the pieces of the firmware, leaf first, and the loop tying them together.

pub mod bank; // Sensor slots, detection and reads
pub mod dispatcher; // Command -> Response against the bank
pub mod line; // Byte stream -> command lines
pub mod parser; // Command line -> Command
pub mod scheduler; // Wraparound-safe sampling interval

// Synchronous main loop
pub mod sync_sensor;

// --- Public Re-exports ---
pub use bank::SensorBank;
pub use dispatcher::CommandDispatcher;
pub use line::{CommandLine, LineAssembler, Lines, COMMAND_CAPACITY};
pub use parser::parse_command;
pub use scheduler::Scheduler;
pub use sync_sensor::Firmware;
