// src/recorder/mod.rs

// Host side: drives a firmware instance over the serial link.
pub mod sync_recorder;

// Re-export the public SyncRecorder struct
pub use sync_recorder::SyncRecorder;
