//! Per-chunk synthesis dispatch
//!
//! One match on the handle's dispatch tag. The cloned-voice path routes
//! the engine's file output through a scoped temp file that is deleted on
//! every exit path, including errors.

use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::audio::{output, AudioSegment};
use crate::core::error::Result;
use crate::engine::kind::EngineKind;
use crate::engine::EngineHandle;
use crate::text::TextChunk;

/// Language used when a request does not specify one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Synthesize one chunk through the handle's dispatch path.
///
/// Sample rate is whatever the engine reports; no resampling happens here.
pub fn synthesize_chunk(
    handle: &EngineHandle,
    chunk: &TextChunk,
    language: &str,
) -> Result<AudioSegment> {
    let raw = match &handle.kind {
        EngineKind::Standard => handle.engine.synthesize(&chunk.text, language)?,
        EngineKind::EmbeddingConditioned { embedding } => {
            handle
                .engine
                .synthesize_with_embedding(&chunk.text, language, embedding)?
        }
        EngineKind::SpeakerNameConditioned { speaker } => {
            let temp = TempWav::new();
            handle
                .engine
                .synthesize_to_file(&chunk.text, speaker, language, temp.path())?;
            let (samples, sample_rate) = output::read_wav(temp.path())?;
            crate::engine::RawAudio { samples, sample_rate }
        }
    };

    debug!(
        chunk = chunk.index,
        samples = raw.samples.len(),
        sample_rate = raw.sample_rate,
        kind = handle.kind.tag(),
        "chunk synthesized"
    );

    Ok(AudioSegment {
        chunk_index: chunk.index,
        samples: raw.samples,
        sample_rate: raw.sample_rate,
    })
}

/// Scoped temp WAV file, removed on drop
struct TempWav {
    path: PathBuf,
}

impl TempWav {
    fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("bookvoice_{}.wav", Uuid::new_v4())),
        }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = ?self.path, error = %e, "failed to remove temp wav");
            }
        }
    }
}
