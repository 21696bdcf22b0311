//! Segment assembly and artifact persistence
//!
//! Per-chunk synthesis results are modeled as values rather than control
//! flow: a chunk either produced a segment or was skipped with a reason.
//! The assembler aggregates the outcomes, concatenates surviving segments
//! in chunk order, and persists the result under a fresh unique name.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::audio::{output, AudioSegment};
use crate::core::error::{Result, TtsError};

/// Outcome of synthesizing one text chunk
#[derive(Debug, Clone)]
pub enum ChunkOutcome {
    /// Chunk synthesized successfully
    Synthesized(AudioSegment),
    /// Chunk skipped; the job continues with the remaining chunks
    Skipped { index: usize, reason: String },
}

/// A persisted audio file, the durable output of one generation task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Freshly generated file name, e.g. `3f2a...c1.wav`
    pub file_name: String,
    /// Full path inside the output directory
    pub path: PathBuf,
}

/// Concatenate surviving segments into one waveform.
///
/// Fails with `NoAudioProduced` when every chunk was skipped (or there
/// were no chunks at all). Segments are concatenated strictly in chunk
/// order; a sample-rate mismatch between segments is logged and the first
/// segment's rate is kept, since no resampling happens at this layer.
pub fn assemble(outcomes: Vec<ChunkOutcome>) -> Result<(Vec<f32>, u32)> {
    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for outcome in outcomes {
        match outcome {
            ChunkOutcome::Synthesized(segment) => segments.push(segment),
            ChunkOutcome::Skipped { index, reason } => {
                warn!(chunk = index, %reason, "chunk skipped");
                skipped += 1;
            }
        }
    }

    if segments.is_empty() {
        return Err(TtsError::NoAudioProduced);
    }

    debug_assert!(segments.windows(2).all(|w| w[0].chunk_index < w[1].chunk_index));

    let sample_rate = segments[0].sample_rate;
    if let Some(odd) = segments.iter().find(|s| s.sample_rate != sample_rate) {
        warn!(
            expected = sample_rate,
            got = odd.sample_rate,
            chunk = odd.chunk_index,
            "segments disagree on sample rate; keeping the first"
        );
    }

    let total: usize = segments.iter().map(|s| s.samples.len()).sum();
    let mut waveform = Vec::with_capacity(total);
    for segment in segments {
        waveform.extend_from_slice(&segment.samples);
    }

    if skipped > 0 {
        info!(skipped, "assembled waveform with skipped chunks");
    }

    Ok((waveform, sample_rate))
}

/// Write the waveform into `out_dir` under a fresh UUID name.
///
/// A new name is generated on every call, so artifacts are never
/// overwritten. The directory is created if missing.
pub fn persist(samples: &[f32], sample_rate: u32, out_dir: &Path) -> Result<AudioArtifact> {
    std::fs::create_dir_all(out_dir).map_err(|e| TtsError::Io {
        message: format!("failed to create output directory: {e}"),
        path: Some(out_dir.to_path_buf()),
    })?;

    let file_name = format!("{}.wav", Uuid::new_v4());
    let path = out_dir.join(&file_name);
    output::write_wav(samples, sample_rate, &path)?;

    info!(file = %file_name, samples = samples.len(), sample_rate, "persisted audio artifact");
    Ok(AudioArtifact { file_name, path })
}
