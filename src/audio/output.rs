//! WAV reading and writing
//!
//! Artifacts are written as mono 16-bit PCM at the engine's reported
//! sample rate. Reading accepts both integer and float PCM since engines
//! differ in what they emit.

use std::io::Cursor;
use std::path::Path;

use crate::core::error::{AudioOperation, Result, TtsError};

/// Save samples to a WAV file (mono, 16-bit PCM)
///
/// # Arguments
/// * `samples` - Audio samples (f32, normalized to [-1, 1])
/// * `sample_rate` - Sample rate in Hz
/// * `path` - Output file path
pub fn write_wav<P: AsRef<Path>>(samples: &[f32], sample_rate: u32, path: P) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec).map_err(|e| TtsError::Audio {
        message: format!("failed to create {:?}: {}", path.as_ref(), e),
        operation: AudioOperation::Saving,
    })?;

    for &sample in samples {
        let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(scaled).map_err(|e| TtsError::Audio {
            message: e.to_string(),
            operation: AudioOperation::Saving,
        })?;
    }

    writer.finalize().map_err(|e| TtsError::Audio {
        message: e.to_string(),
        operation: AudioOperation::Saving,
    })?;
    Ok(())
}

/// Read a WAV file into normalized f32 samples plus its sample rate
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let reader = hound::WavReader::open(path.as_ref()).map_err(|e| TtsError::Audio {
        message: format!("failed to open {:?}: {}", path.as_ref(), e),
        operation: AudioOperation::Decoding,
    })?;
    decode(reader)
}

/// Read WAV data from an in-memory buffer (e.g. an HTTP response body)
pub fn read_wav_bytes(bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    decode(reader)
}

fn decode<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<(Vec<f32>, u32)> {
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    Ok((samples, spec.sample_rate))
}
