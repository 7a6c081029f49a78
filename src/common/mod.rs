// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod dialect;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod slot;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::Command;

// From config.rs
pub use config::FirmwareConfig;

// From dialect.rs
pub use dialect::{Dialect, LineTerminator};

// From error.rs
pub use error::FirmwareError;

// From hal_traits.rs
pub use hal_traits::{FirmwareSerial, FirmwareTimer, SensorBus};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{
    parse_response, DataReport, Response, ResponseEncoder, ResponseLine, ResponseParseError,
};

// From slot.rs
pub use slot::{IndexPolicy, SlotIndex, SLOT_COUNT};

// From types.rs
pub use types::{decode_frame, error_message, DhtModel, ReadOutcome, Reading, SensorFault, Tenths};

// embedded-hal adapters (from hal_traits.rs)
#[cfg(feature = "embedded-hal")]
pub use hal_traits::HalTimer;
