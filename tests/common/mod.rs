//! Test doubles shared across integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bookvoice::core::device::Device;
use bookvoice::core::progress::ProgressReporter;
use bookvoice::engine::loader::EngineLoader;
use bookvoice::engine::{EngineHandle, EngineKind, RawAudio, SpeechEngine};
use bookvoice::Result;

/// Emits a fixed number of samples per chunk, each carrying the value of
/// the chunk's first byte scaled into [0, 1]. Lets tests verify chunk
/// ordering in the assembled waveform.
pub struct MarkerEngine {
    pub samples_per_chunk: usize,
    pub sample_rate: u32,
}

impl SpeechEngine for MarkerEngine {
    fn name(&self) -> &str {
        "marker"
    }

    fn synthesize(&self, text: &str, _language: &str) -> Result<RawAudio> {
        let marker = f32::from(text.as_bytes()[0]) / 255.0;
        Ok(RawAudio {
            samples: vec![marker; self.samples_per_chunk],
            sample_rate: self.sample_rate,
        })
    }
}

/// Fails every synthesis call
pub struct BrokenEngine;

impl SpeechEngine for BrokenEngine {
    fn name(&self) -> &str {
        "broken"
    }

    fn synthesize(&self, _text: &str, _language: &str) -> Result<RawAudio> {
        Err(bookvoice::TtsError::synthesis("backend down"))
    }
}

/// Loader that counts its invocations and wraps engines from a factory
pub struct CountingLoader {
    pub calls: Arc<AtomicU64>,
    pub factory: Box<dyn Fn() -> Box<dyn SpeechEngine> + Send + Sync>,
}

impl CountingLoader {
    pub fn markers() -> (Self, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        let loader = Self {
            calls: calls.clone(),
            factory: Box::new(|| {
                Box::new(MarkerEngine {
                    samples_per_chunk: 10,
                    sample_rate: 16000,
                })
            }),
        };
        (loader, calls)
    }

    pub fn broken() -> Self {
        let (mut loader, _) = Self::markers();
        loader.factory = Box::new(|| Box::new(BrokenEngine));
        loader
    }
}

impl EngineLoader for CountingLoader {
    fn load(
        &self,
        model_id: &str,
        _device: Device,
        reporter: &ProgressReporter,
    ) -> Result<EngineHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        reporter.report(&format!("Checking model {model_id}..."), 0);
        reporter.report("Loading model into memory...", 90);
        Ok(EngineHandle {
            model_id: model_id.to_string(),
            kind: EngineKind::Standard,
            engine: (self.factory)(),
        })
    }
}

/// Fresh temp directory for artifact output
pub fn scratch_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("bookvoice_{label}_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
