//! Compute device selection
//!
//! Engines run behind an inference sidecar, so device selection here is a
//! hint forwarded at load time: prefer the accelerator when one is visible,
//! otherwise fall back to the CPU.

use serde::{Deserialize, Serialize};

/// Compute device hint for engine loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    /// Detect the preferred device from the environment
    pub fn detect() -> Self {
        if Self::cuda_visible() {
            Device::Cuda
        } else {
            Device::Cpu
        }
    }

    fn cuda_visible() -> bool {
        match std::env::var("CUDA_VISIBLE_DEVICES") {
            Ok(v) => !v.trim().is_empty() && v.trim() != "-1",
            Err(_) => false,
        }
    }

    /// String form used in sidecar requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
