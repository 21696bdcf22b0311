//! Structured error handling for bookvoice
//!
//! One hierarchical error type covers the whole generation pipeline, with
//! a clear split between failures that end a task and failures that are
//! recovered per chunk.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Main error type for the generation pipeline
#[derive(Error, Debug, Clone)]
pub enum TtsError {
    /// Input rejected before a job starts (wrong file type, empty text)
    #[error("Unsupported input: {message}")]
    UnsupportedInput { message: String },

    /// Required backend missing or engine construction failed irrecoverably.
    /// Fatal to the task.
    #[error("Engine unavailable for '{model_id}': {reason}")]
    EngineUnavailable { model_id: String, reason: String },

    /// Per-chunk synthesis failure. Recovered locally: the chunk is skipped
    /// and processing continues.
    #[error("Synthesis error: {message}")]
    Synthesis { message: String },

    /// Every chunk failed or the input was blank after trimming.
    /// Fatal to the task.
    #[error("No audio generated")]
    NoAudioProduced,

    /// Audio encoding/decoding errors
    #[error("Audio error ({operation}): {message}")]
    Audio { message: String, operation: AudioOperation },

    /// Model hub errors (weight listing or retrieval)
    #[error("Hub error for '{model_id}': {message}")]
    Hub { model_id: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String, path: Option<PathBuf> },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io { message: String, path: Option<PathBuf> },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TtsError {
    /// Whether the error is recovered per chunk rather than failing the task
    pub fn is_chunk_recoverable(&self) -> bool {
        matches!(self, TtsError::Synthesis { .. })
    }

    /// Shorthand for a per-chunk synthesis failure
    pub fn synthesis(message: impl Into<String>) -> Self {
        TtsError::Synthesis {
            message: message.into(),
        }
    }
}

/// Audio operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOperation {
    Decoding,
    Concatenation,
    Saving,
}

impl std::fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioOperation::Decoding => write!(f, "decoding"),
            AudioOperation::Concatenation => write!(f, "concatenation"),
            AudioOperation::Saving => write!(f, "saving"),
        }
    }
}

impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<hound::Error> for TtsError {
    fn from(err: hound::Error) -> Self {
        TtsError::Audio {
            message: err.to_string(),
            operation: AudioOperation::Decoding,
        }
    }
}
