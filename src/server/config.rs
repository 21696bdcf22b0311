//! Server configuration
//!
//! One YAML file covers the network surface plus the pipeline, sidecar,
//! and task-retention settings it composes. Every field has a default so
//! a partial file, or none at all, still yields a runnable server.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TtsError};
use crate::engine::cache::DEFAULT_CAPACITY;
use crate::engine::loader::SidecarConfig;
use crate::pipeline::GenerationConfig;
use crate::task::CoordinatorConfig;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum engines kept loaded at once
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pipeline settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Inference sidecar settings
    #[serde(default)]
    pub sidecar: SidecarConfig,

    /// Task polling and retention settings
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_capacity: default_cache_capacity(),
            log_level: default_log_level(),
            generation: GenerationConfig::default(),
            sidecar: SidecarConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| TtsError::Config {
            message: format!("cannot read config: {e}"),
            path: Some(path.to_path_buf()),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| TtsError::Config {
            message: format!("malformed config: {e}"),
            path: Some(path.to_path_buf()),
        })
    }

    /// Write configuration to a YAML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).map_err(|e| TtsError::Config {
            message: format!("cannot serialize config: {e}"),
            path: Some(path.to_path_buf()),
        })?;
        std::fs::write(path, yaml).map_err(|e| TtsError::Io {
            message: format!("cannot write config: {e}"),
            path: Some(path.to_path_buf()),
        })
    }

    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
