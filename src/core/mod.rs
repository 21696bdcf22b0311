//! Core infrastructure: errors, progress reporting, device selection

pub mod device;
pub mod error;
pub mod progress;

pub use device::Device;
pub use error::{Result, TtsError};
pub use progress::{ProgressFn, ProgressReporter};
