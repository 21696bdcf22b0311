//! Engine abstraction: trait, dispatch tags, cache, and backend adapters
//!
//! All synthesis backends sit behind [`SpeechEngine`]. A loaded engine is
//! wrapped in an [`EngineHandle`] carrying the dispatch tag resolved once
//! at acquisition time, so the per-chunk hot path is a single match.

pub mod cache;
pub mod catalog;
pub mod dispatch;
pub mod kind;
pub mod loader;
pub mod sidecar;
#[cfg(feature = "xtts")]
pub mod xtts;

pub use cache::{CacheStats, EngineCache};
pub use catalog::{CatalogEntry, ModelCatalog};
pub use dispatch::{synthesize_chunk, DEFAULT_LANGUAGE};
pub use kind::{EngineKind, ModelFamily};
pub use loader::{EngineLoader, SidecarConfig, SidecarLoader};

use crate::core::error::Result;

/// Waveform plus sample rate as reported by an engine
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudio {
    /// PCM samples normalized to [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

/// Core trait for synthesis backends
///
/// The three methods mirror the three dispatch paths. Backends implement
/// the path(s) they support; the defaults reject the rest so a handle
/// built with the wrong tag fails loudly instead of silently degrading.
pub trait SpeechEngine: Send + Sync {
    /// Backend name, for logs and diagnostics
    fn name(&self) -> &str;

    /// Plain text-to-speech
    fn synthesize(&self, text: &str, language: &str) -> Result<RawAudio>;

    /// Synthesis conditioned on a fixed speaker voice embedding
    fn synthesize_with_embedding(
        &self,
        text: &str,
        language: &str,
        embedding: &[f32],
    ) -> Result<RawAudio> {
        let _ = (text, language, embedding);
        Err(crate::core::error::TtsError::Internal {
            message: format!("engine '{}' does not accept speaker embeddings", self.name()),
        })
    }

    /// Cloned-voice synthesis writing the engine's output directly to `path`
    fn synthesize_to_file(
        &self,
        text: &str,
        speaker: &str,
        language: &str,
        path: &std::path::Path,
    ) -> Result<()> {
        let _ = (text, speaker, language, path);
        Err(crate::core::error::TtsError::Internal {
            message: format!("engine '{}' does not support file output", self.name()),
        })
    }
}

/// A loaded, ready-to-invoke engine plus its dispatch tag
///
/// Created on the first request for a model id and cached for the process
/// lifetime (subject to cache capacity).
pub struct EngineHandle {
    /// Model identifier this handle was loaded for
    pub model_id: String,
    /// Dispatch tag resolved at acquisition time
    pub kind: EngineKind,
    /// The loaded backend
    pub engine: Box<dyn SpeechEngine>,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("model_id", &self.model_id)
            .field("kind", &self.kind.tag())
            .field("engine", &self.engine.name())
            .finish()
    }
}
