//! XTTS cloned-voice sidecar client (feature `xtts`)
//!
//! Speaks the Coqui-style server protocol: synthesis parameters go in the
//! query string and the response body is a finished WAV, which this client
//! writes straight to the caller-provided path. The dispatcher owns the
//! temp-file lifecycle around that write.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::core::device::Device;
use crate::core::error::{Result, TtsError};
use crate::engine::SpeechEngine;

/// Client for the XTTS (cloned-voice) sidecar
pub struct XttsSidecarEngine {
    client: Client,
    url: String,
    device: Device,
}

impl XttsSidecarEngine {
    /// Create a client against the XTTS sidecar at `endpoint`
    pub fn new(endpoint: &str, device: Device, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TtsError::EngineUnavailable {
                model_id: "xtts".to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: format!("{}/api/tts", endpoint.trim_end_matches('/')),
            device,
        })
    }
}

impl SpeechEngine for XttsSidecarEngine {
    fn name(&self) -> &str {
        "xtts-sidecar"
    }

    fn synthesize(&self, _text: &str, _language: &str) -> Result<crate::engine::RawAudio> {
        Err(TtsError::Internal {
            message: "xtts engine only supports file output".to_string(),
        })
    }

    fn synthesize_to_file(
        &self,
        text: &str,
        speaker: &str,
        language: &str,
        path: &std::path::Path,
    ) -> Result<()> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("text", text),
                ("speaker_id", speaker),
                ("language_id", language),
                ("device", self.device.as_str()),
            ])
            .send()
            .map_err(|e| TtsError::synthesis(format!("xtts request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(TtsError::synthesis(format!(
                "xtts sidecar returned {status}: {detail}"
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| TtsError::synthesis(format!("failed to read xtts body: {e}")))?;
        std::fs::write(path, &bytes).map_err(|e| TtsError::Io {
            message: format!("failed to write engine output: {e}"),
            path: Some(path.to_path_buf()),
        })?;

        Ok(())
    }
}
