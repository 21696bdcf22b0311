//! Generic inference sidecar client
//!
//! Synthesis runs in a local inference sidecar that has the downloaded
//! weights mounted; this client speaks its JSON-in, WAV-out protocol.
//! Errors surface as per-chunk synthesis failures so a flaky backend
//! skips chunks instead of killing the job.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::audio::output::read_wav_bytes;
use crate::core::device::Device;
use crate::core::error::{Result, TtsError};
use crate::engine::{RawAudio, SpeechEngine};

/// Client for the generic synthesis sidecar
pub struct JsonSidecarEngine {
    client: Client,
    url: String,
    model_id: String,
    device: Device,
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    model: &'a str,
    text: &'a str,
    language: &'a str,
    device: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker_embedding: Option<&'a [f32]>,
}

impl JsonSidecarEngine {
    /// Create a client for `model_id` against the sidecar at `endpoint`
    pub fn new(endpoint: &str, model_id: &str, device: Device, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TtsError::EngineUnavailable {
                model_id: model_id.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: format!("{}/synthesize", endpoint.trim_end_matches('/')),
            model_id: model_id.to_string(),
            device,
        })
    }

    fn request(&self, body: &SynthesisBody<'_>) -> Result<RawAudio> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .map_err(|e| TtsError::synthesis(format!("sidecar request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(TtsError::synthesis(format!(
                "sidecar returned {status}: {detail}"
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| TtsError::synthesis(format!("failed to read sidecar body: {e}")))?;
        let (samples, sample_rate) = read_wav_bytes(&bytes)?;
        Ok(RawAudio { samples, sample_rate })
    }
}

impl SpeechEngine for JsonSidecarEngine {
    fn name(&self) -> &str {
        "json-sidecar"
    }

    fn synthesize(&self, text: &str, language: &str) -> Result<RawAudio> {
        self.request(&SynthesisBody {
            model: &self.model_id,
            text,
            language,
            device: self.device.as_str(),
            speaker_embedding: None,
        })
    }

    fn synthesize_with_embedding(
        &self,
        text: &str,
        language: &str,
        embedding: &[f32],
    ) -> Result<RawAudio> {
        self.request(&SynthesisBody {
            model: &self.model_id,
            text,
            language,
            device: self.device.as_str(),
            speaker_embedding: Some(embedding),
        })
    }
}
