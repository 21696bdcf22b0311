//! Generation pipeline
//!
//! Wires the whole flow for one job: acquire engine, chunk text,
//! synthesize chunks strictly in order, assemble, persist. Progress taps
//! every stage boundary through the injected reporter.
//!
//! Chunks are processed sequentially on purpose: ordered concatenation
//! and the per-chunk progress scale both depend on in-order processing.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audio::{assemble, persist, AudioArtifact, ChunkOutcome};
use crate::core::error::Result;
use crate::core::progress::ProgressReporter;
use crate::engine::dispatch::{synthesize_chunk, DEFAULT_LANGUAGE};
use crate::engine::EngineCache;
use crate::text::{chunk_text, DEFAULT_MAX_CHARS};

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum characters per synthesis chunk
    #[serde(default = "default_max_chars")]
    pub max_chunk_chars: usize,

    /// Directory audio artifacts are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Language passed to engines when a request has none
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated_audio")
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chars(),
            output_dir: default_output_dir(),
            language: default_language(),
        }
    }
}

/// Runs generation jobs end to end
pub struct GenerationPipeline {
    cache: Arc<EngineCache>,
    config: GenerationConfig,
}

impl GenerationPipeline {
    /// Create a pipeline over an engine cache
    pub fn new(cache: Arc<EngineCache>, config: GenerationConfig) -> Self {
        Self { cache, config }
    }

    /// The engine cache backing this pipeline
    pub fn cache(&self) -> &Arc<EngineCache> {
        &self.cache
    }

    /// Pipeline configuration
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate one audio artifact from `text` using `model_id`.
    ///
    /// Per-chunk synthesis failures skip the chunk and continue; every
    /// other failure ends the job. Per-chunk percent is
    /// `floor(i / total * 100)` and restarts after the 0-90 acquisition
    /// scale; the two scales are not normalized.
    pub fn generate(
        &self,
        text: &str,
        model_id: &str,
        language: Option<&str>,
        reporter: &ProgressReporter,
    ) -> Result<AudioArtifact> {
        reporter.report("Initializing...", 0);

        let handle = self.cache.acquire(model_id, reporter)?;
        let language = language.unwrap_or(&self.config.language);

        let chunks = chunk_text(text, self.config.max_chunk_chars);
        let total = chunks.len().max(1);
        info!(model = model_id, chunks = chunks.len(), "starting synthesis");

        let mut outcomes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            if chunk.is_blank() {
                continue;
            }

            let percent = ((chunk.index * 100) / total) as u8;
            reporter.report(
                &format!("Generating chunk {}/{}...", chunk.index + 1, total),
                percent,
            );

            match synthesize_chunk(&handle, chunk, language) {
                Ok(segment) => outcomes.push(ChunkOutcome::Synthesized(segment)),
                Err(e) => {
                    warn!(chunk = chunk.index, error = %e, "chunk synthesis failed, skipping");
                    outcomes.push(ChunkOutcome::Skipped {
                        index: chunk.index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        reporter.report("Finalizing audio...", 95);
        let (waveform, sample_rate) = assemble(outcomes)?;
        let artifact = persist(&waveform, sample_rate, &self.config.output_dir)?;

        reporter.report("Done!", 100);
        Ok(artifact)
    }
}
