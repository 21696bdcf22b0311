//! Dispatch tag and model family resolution
//!
//! Backend polymorphism is decided exactly once, when an engine is
//! acquired: the model identifier maps to a family, the family to a
//! tagged variant carrying whatever the dispatch path needs. After that
//! the identifier is never inspected again.

use std::sync::Arc;

/// Model families with distinct synthesis paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Generic text-to-speech pipeline models
    Generic,
    /// SpeechT5 models, conditioned on a speaker x-vector
    SpeechT5,
    /// XTTS fine-tunes, cloned-voice synthesis via file output
    XttsFineTune,
}

impl ModelFamily {
    /// Classify a model identifier
    pub fn of(model_id: &str) -> Self {
        let id = model_id.to_ascii_lowercase();
        if id.contains("xtts") || id.contains("finetunedttsmodels") || id.contains("davidattenborough")
        {
            ModelFamily::XttsFineTune
        } else if id.contains("speecht5") {
            ModelFamily::SpeechT5
        } else {
            ModelFamily::Generic
        }
    }
}

/// Dispatch tag attached to a loaded engine
///
/// Variants carry the per-path conditioning data so the dispatcher never
/// re-derives it per chunk.
#[derive(Clone)]
pub enum EngineKind {
    /// Pass chunk text straight to the engine
    Standard,
    /// Supply a constant speaker voice embedding with each chunk
    EmbeddingConditioned {
        /// Reference x-vector, loaded once at engine construction
        embedding: Arc<Vec<f32>>,
    },
    /// Cloned-voice path: engine writes to a temp file which is read back
    SpeakerNameConditioned {
        /// Default named speaker profile
        speaker: String,
    },
}

impl EngineKind {
    /// Short tag for logs
    pub fn tag(&self) -> &'static str {
        match self {
            EngineKind::Standard => "standard",
            EngineKind::EmbeddingConditioned { .. } => "embedding-conditioned",
            EngineKind::SpeakerNameConditioned { .. } => "speaker-name-conditioned",
        }
    }
}

impl std::fmt::Debug for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
