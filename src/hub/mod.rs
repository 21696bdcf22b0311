//! Model weight retrieval from the HuggingFace hub
//!
//! Weights are fetched into the standard hub cache on the first request
//! for a model. Download progress is reported per file, scaled onto the
//! 0-90 acquisition range; the remaining headroom is the fixed
//! "loading into memory" milestone reported by the loader.
//!
//! A download failure is deliberately non-fatal: the weights may already
//! be present from a prior run, so the subsequent load attempt decides
//! whether the model is actually unavailable.

use std::path::PathBuf;

use tracing::debug;

use crate::core::error::{Result, TtsError};
use crate::core::progress::ProgressReporter;

/// Upper bound of the acquisition progress scale
pub const DOWNLOAD_SCALE_MAX: u8 = 90;

/// Fetch a model's weight files, reporting per-file progress.
///
/// Returns the local snapshot directory. Files that cannot matter to
/// synthesis (git metadata, documentation) are skipped.
pub fn fetch_weights(model_id: &str, reporter: &ProgressReporter) -> Result<PathBuf> {
    let api = hf_hub::api::sync::Api::new().map_err(|e| TtsError::Hub {
        model_id: model_id.to_string(),
        message: format!("failed to create hub API: {e}"),
    })?;

    let repo = api.model(model_id.to_string());
    let info = repo.info().map_err(|e| TtsError::Hub {
        model_id: model_id.to_string(),
        message: format!("failed to fetch repo info: {e}"),
    })?;

    let files: Vec<String> = info
        .siblings
        .into_iter()
        .map(|s| s.rfilename)
        .filter(|name| is_weight_file(name))
        .collect();

    let total = files.len().max(1);
    for (i, file) in files.iter().enumerate() {
        repo.download(file).map_err(|e| TtsError::Hub {
            model_id: model_id.to_string(),
            message: format!("failed to download {file}: {e}"),
        })?;

        let percent = (((i + 1) * DOWNLOAD_SCALE_MAX as usize) / total) as u8;
        reporter.report(&format!("Downloading {model_id}: {percent}%"), percent);
        debug!(model = model_id, file = %file, "downloaded weight file");
    }

    cached_weights_path(model_id)
}

/// Fetch a single file from a hub dataset repo, using the local hub
/// cache when the file is already present.
pub fn fetch_dataset_file(repo_id: &str, file: &str) -> Result<PathBuf> {
    let api = hf_hub::api::sync::Api::new().map_err(|e| TtsError::Hub {
        model_id: repo_id.to_string(),
        message: format!("failed to create hub API: {e}"),
    })?;

    let path = api
        .dataset(repo_id.to_string())
        .get(file)
        .map_err(|e| TtsError::Hub {
            model_id: repo_id.to_string(),
            message: format!("failed to fetch {file}: {e}"),
        })?;
    debug!(repo = repo_id, file, "fetched dataset file");
    Ok(path)
}

fn is_weight_file(name: &str) -> bool {
    !(name.ends_with(".gitattributes")
        || name.starts_with(".git/")
        || name.ends_with(".md")
        || name.contains("README"))
}

/// Local snapshot directory for a model id, following hub cache conventions
///
/// Example: `IndexTeam/IndexTTS-2` lives under
/// `~/.cache/huggingface/hub/models--IndexTeam--IndexTTS-2/snapshots/...`.
pub fn cached_weights_path(model_id: &str) -> Result<PathBuf> {
    let cache_dir = hub_cache_dir()?;
    let model_dir = cache_dir.join(model_cache_name(model_id));

    let snapshots = model_dir.join("snapshots");
    if snapshots.is_dir() {
        for revision in ["main", "master"] {
            let dir = snapshots.join(revision);
            if dir.is_dir() {
                return Ok(dir);
            }
        }
    }

    Ok(model_dir)
}

/// Whether any weights for this model are present locally
pub fn is_cached(model_id: &str) -> bool {
    cached_weights_path(model_id)
        .map(|p| p.is_dir() && std::fs::read_dir(&p).map(|mut d| d.next().is_some()).unwrap_or(false))
        .unwrap_or(false)
}

/// Hub cache directory
///
/// Priority: `HF_HOME`, then `HUGGINGFACE_HUB_CACHE`, then
/// `~/.cache/huggingface/hub`.
pub fn hub_cache_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HF_HOME") {
        return Ok(PathBuf::from(home).join("hub"));
    }
    if let Ok(cache) = std::env::var("HUGGINGFACE_HUB_CACHE") {
        return Ok(PathBuf::from(cache));
    }
    dirs::cache_dir()
        .map(|p| p.join("huggingface").join("hub"))
        .ok_or_else(|| TtsError::Internal {
            message: "cannot determine hub cache directory".to_string(),
        })
}

/// Convert a model id to its hub cache directory name
///
/// Example: `microsoft/speecht5_tts` -> `models--microsoft--speecht5_tts`
pub fn model_cache_name(model_id: &str) -> String {
    format!("models--{}", model_id.replace('/', "--"))
}
