//! End-to-end pipeline tests against fake engines

mod common;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use bookvoice::audio::output::read_wav;
use bookvoice::core::progress::ProgressReporter;
use bookvoice::engine::EngineCache;
use bookvoice::pipeline::{GenerationConfig, GenerationPipeline};
use bookvoice::TtsError;

use common::{scratch_dir, CountingLoader};

fn marker_pipeline(output_dir: std::path::PathBuf) -> (GenerationPipeline, Arc<std::sync::atomic::AtomicU64>) {
    let (loader, calls) = CountingLoader::markers();
    let cache = Arc::new(EngineCache::new(Box::new(loader), 4));
    let config = GenerationConfig {
        output_dir,
        ..GenerationConfig::default()
    };
    (GenerationPipeline::new(cache, config), calls)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected ~{expected}, got {actual}"
    );
}

#[test]
fn three_chunk_document_concatenates_in_order() {
    let dir = scratch_dir("pipeline_order");
    let (pipeline, _) = marker_pipeline(dir.clone());

    // 1200 chars split into chunks starting with 'a', 'b', 'c'
    let text = format!("{}{}{}", "a".repeat(500), "b".repeat(500), "c".repeat(200));
    let artifact = pipeline
        .generate(&text, "vendor/model", None, &ProgressReporter::noop())
        .unwrap();

    let (samples, rate) = read_wav(&artifact.path).unwrap();
    assert_eq!(rate, 16000);
    assert_eq!(samples.len(), 30);
    assert_close(samples[0], 97.0 / 255.0);
    assert_close(samples[10], 98.0 / 255.0);
    assert_close(samples[20], 99.0 / 255.0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn short_text_produces_nonempty_artifact() {
    let dir = scratch_dir("pipeline_short");
    let (pipeline, _) = marker_pipeline(dir.clone());

    let artifact = pipeline
        .generate("Hello world.", "vendor/model", None, &ProgressReporter::noop())
        .unwrap();

    assert!(artifact.file_name.ends_with(".wav"));
    let (samples, _) = read_wav(&artifact.path).unwrap();
    assert!(!samples.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn whitespace_input_produces_no_audio() {
    let dir = scratch_dir("pipeline_blank");
    let (pipeline, _) = marker_pipeline(dir.clone());

    let err = pipeline
        .generate("   \n\t  ", "vendor/model", None, &ProgressReporter::noop())
        .unwrap_err();
    assert!(matches!(err, TtsError::NoAudioProduced));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn all_chunks_failing_produces_no_audio() {
    let dir = scratch_dir("pipeline_broken");
    let cache = Arc::new(EngineCache::new(Box::new(CountingLoader::broken()), 4));
    let pipeline = GenerationPipeline::new(
        cache,
        GenerationConfig {
            output_dir: dir.clone(),
            ..GenerationConfig::default()
        },
    );

    let err = pipeline
        .generate("Some text.", "vendor/model", None, &ProgressReporter::noop())
        .unwrap_err();
    assert!(matches!(err, TtsError::NoAudioProduced));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn engine_is_loaded_once_across_jobs() {
    let dir = scratch_dir("pipeline_cache");
    let (pipeline, calls) = marker_pipeline(dir.clone());
    let reporter = ProgressReporter::noop();

    pipeline.generate("First job.", "vendor/model", None, &reporter).unwrap();
    pipeline.generate("Second job.", "vendor/model", None, &reporter).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn progress_brackets_the_job() {
    let dir = scratch_dir("pipeline_progress");
    let (pipeline, _) = marker_pipeline(dir.clone());

    let events: Arc<Mutex<Vec<(String, u8)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let reporter = ProgressReporter::new(move |label, pct| {
        sink.lock().unwrap().push((label.to_string(), pct));
    });

    pipeline.generate("Hello world.", "vendor/model", None, &reporter).unwrap();

    let seen = events.lock().unwrap();
    assert_eq!(seen.first().unwrap(), &("Initializing...".to_string(), 0));
    assert_eq!(seen.last().unwrap(), &("Done!".to_string(), 100));
    assert!(seen.iter().any(|(label, _)| label.starts_with("Generating chunk 1/1")));

    std::fs::remove_dir_all(&dir).ok();
}
