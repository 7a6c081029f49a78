// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[cfg(feature = "std")]
extern crate std;

// Declared first so the logging macros are in scope for every module below.
#[macro_use]
mod fmt;

pub mod common;
pub mod recorder;
pub mod sensor;

// Re-export key types for convenience
pub use common::{Dialect, FirmwareConfig, FirmwareError, SlotIndex};
pub use recorder::SyncRecorder;
pub use sensor::Firmware;
