//! Engine construction
//!
//! The [`EngineLoader`] trait isolates download and construction side
//! effects behind an interface, so the cache can be exercised with fakes
//! and the production loader stays swappable.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::device::Device;
use crate::core::error::{Result, TtsError};
use crate::core::progress::ProgressReporter;
use crate::engine::kind::{EngineKind, ModelFamily};
use crate::engine::sidecar::JsonSidecarEngine;
use crate::engine::EngineHandle;
use crate::hub;

/// Percent reported for the fixed "loading into memory" milestone
pub const LOAD_MILESTONE: u8 = hub::DOWNLOAD_SCALE_MAX;

/// Constructs engines for model identifiers
pub trait EngineLoader: Send + Sync {
    /// Load (or construct) an engine for `model_id` on `device`.
    ///
    /// Called on a cache miss only; implementations report acquisition
    /// progress through `reporter` on the 0-90 scale.
    fn load(&self, model_id: &str, device: Device, reporter: &ProgressReporter)
        -> Result<EngineHandle>;
}

/// Configuration for the inference sidecar and conditioning data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarConfig {
    /// Base URL of the generic synthesis sidecar
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL of the XTTS (cloned-voice) sidecar
    #[serde(default = "default_xtts_endpoint")]
    pub xtts_endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Local reference x-vector for embedding-conditioned models
    /// (JSON f32 array). When the file is absent the vector is fetched
    /// from the hub instead.
    #[serde(default = "default_embedding_path")]
    pub speaker_embedding_path: PathBuf,

    /// Hub dataset repo holding the reference x-vector export
    #[serde(default = "default_embedding_repo")]
    pub speaker_embedding_repo: String,

    /// File name of the x-vector export inside the dataset repo
    #[serde(default = "default_embedding_file")]
    pub speaker_embedding_file: String,

    /// Default named speaker profile for the cloned-voice path
    #[serde(default = "default_speaker")]
    pub default_speaker: String,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5002".to_string()
}

fn default_xtts_endpoint() -> String {
    "http://127.0.0.1:5003".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_embedding_path() -> PathBuf {
    PathBuf::from("assets/cmu_arctic_xvector.json")
}

fn default_embedding_repo() -> String {
    "Matthijs/cmu-arctic-xvectors".to_string()
}

fn default_embedding_file() -> String {
    "cmu_arctic_xvector.json".to_string()
}

fn default_speaker() -> String {
    "Ana Florence".to_string()
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            xtts_endpoint: default_xtts_endpoint(),
            request_timeout_secs: default_timeout(),
            speaker_embedding_path: default_embedding_path(),
            speaker_embedding_repo: default_embedding_repo(),
            speaker_embedding_file: default_embedding_file(),
            default_speaker: default_speaker(),
        }
    }
}

/// Production loader: fetches weights from the hub, then constructs the
/// sidecar client for the model's family.
pub struct SidecarLoader {
    config: SidecarConfig,
    embedding: OnceCell<Arc<Vec<f32>>>,
}

impl SidecarLoader {
    /// Create a loader with the given sidecar configuration
    pub fn new(config: SidecarConfig) -> Self {
        Self {
            config,
            embedding: OnceCell::new(),
        }
    }
}

impl EngineLoader for SidecarLoader {
    fn load(
        &self,
        model_id: &str,
        device: Device,
        reporter: &ProgressReporter,
    ) -> Result<EngineHandle> {
        reporter.report(&format!("Checking model {model_id}..."), 0);

        // Non-fatal: weights may already be cached from a prior run, in
        // which case the sidecar can load them without a fresh download.
        if let Err(e) = hub::fetch_weights(model_id, reporter) {
            warn!(model = model_id, error = %e, "weight download failed, proceeding with local cache");
        }

        reporter.report("Loading model into memory...", LOAD_MILESTONE);

        let family = ModelFamily::of(model_id);
        let handle = match family {
            ModelFamily::XttsFineTune => self.load_cloned_voice(model_id, device)?,
            ModelFamily::SpeechT5 => {
                let embedding =
                    self.reference_embedding()
                        .map_err(|e| TtsError::EngineUnavailable {
                            model_id: model_id.to_string(),
                            reason: format!("speaker embedding unavailable: {e}"),
                        })?;
                EngineHandle {
                    model_id: model_id.to_string(),
                    kind: EngineKind::EmbeddingConditioned { embedding },
                    engine: Box::new(JsonSidecarEngine::new(
                        &self.config.endpoint,
                        model_id,
                        device,
                        self.config.request_timeout_secs,
                    )?),
                }
            }
            ModelFamily::Generic => EngineHandle {
                model_id: model_id.to_string(),
                kind: EngineKind::Standard,
                engine: Box::new(JsonSidecarEngine::new(
                    &self.config.endpoint,
                    model_id,
                    device,
                    self.config.request_timeout_secs,
                )?),
            },
        };

        info!(model = model_id, kind = handle.kind.tag(), "engine ready");
        Ok(handle)
    }
}

impl SidecarLoader {
    #[cfg(feature = "xtts")]
    fn load_cloned_voice(&self, model_id: &str, device: Device) -> Result<EngineHandle> {
        use crate::engine::xtts::XttsSidecarEngine;

        Ok(EngineHandle {
            model_id: model_id.to_string(),
            kind: EngineKind::SpeakerNameConditioned {
                speaker: self.config.default_speaker.clone(),
            },
            engine: Box::new(XttsSidecarEngine::new(
                &self.config.xtts_endpoint,
                device,
                self.config.request_timeout_secs,
            )?),
        })
    }

    #[cfg(not(feature = "xtts"))]
    fn load_cloned_voice(&self, model_id: &str, _device: Device) -> Result<EngineHandle> {
        // Hard failure, never a silent fallback to another engine.
        Err(TtsError::EngineUnavailable {
            model_id: model_id.to_string(),
            reason: "cloned-voice synthesis requires the 'xtts' feature; \
                     rebuild with --features xtts"
                .to_string(),
        })
    }
}

impl SidecarLoader {
    /// Resolve the constant reference x-vector, once per loader.
    ///
    /// The configured local file wins when present; otherwise the vector
    /// is fetched from the configured hub dataset into the hub cache.
    /// Either way the file is a JSON array of f32 values.
    fn reference_embedding(&self) -> Result<Arc<Vec<f32>>> {
        self.embedding
            .get_or_try_init(|| {
                let path = if self.config.speaker_embedding_path.is_file() {
                    self.config.speaker_embedding_path.clone()
                } else {
                    info!(
                        repo = %self.config.speaker_embedding_repo,
                        "local speaker embedding missing, fetching from hub"
                    );
                    hub::fetch_dataset_file(
                        &self.config.speaker_embedding_repo,
                        &self.config.speaker_embedding_file,
                    )?
                };
                parse_embedding(&path)
            })
            .cloned()
    }
}

fn parse_embedding(path: &std::path::Path) -> Result<Arc<Vec<f32>>> {
    let raw = std::fs::read_to_string(path).map_err(|e| TtsError::Io {
        message: format!("cannot read speaker embedding: {e}"),
        path: Some(path.to_path_buf()),
    })?;
    let values: Vec<f32> = serde_json::from_str(&raw).map_err(|e| TtsError::Config {
        message: format!("malformed speaker embedding: {e}"),
        path: Some(path.to_path_buf()),
    })?;
    if values.is_empty() {
        return Err(TtsError::Config {
            message: "speaker embedding is empty".to_string(),
            path: Some(path.to_path_buf()),
        });
    }
    Ok(Arc::new(values))
}
