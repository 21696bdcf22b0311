//! Audio types, WAV I/O, and segment assembly

pub mod assembler;
pub mod output;

pub use assembler::{assemble, persist, AudioArtifact, ChunkOutcome};
pub use output::{read_wav, read_wav_bytes, write_wav};

/// Waveform produced from exactly one text chunk
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    /// Index of the source chunk, used to verify concatenation order
    pub chunk_index: usize,
    /// PCM samples normalized to [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate reported by the engine (no resampling is performed)
    pub sample_rate: u32,
}

impl AudioSegment {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let segment = AudioSegment {
            chunk_index: 0,
            samples: vec![0.0; 22050],
            sample_rate: 22050,
        };
        assert!((segment.duration_secs() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_rate_duration() {
        let segment = AudioSegment {
            chunk_index: 0,
            samples: vec![0.0; 100],
            sample_rate: 0,
        };
        assert_eq!(segment.duration_secs(), 0.0);
    }
}
