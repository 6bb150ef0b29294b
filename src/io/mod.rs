//! Source and sink seams the engine streams between.
//!
//! The engine is agnostic about where chunks come from or go: a decoded file,
//! a capture device, a playback queue. These traits are that boundary, plus
//! in-memory adapters for tests and offline use.

use crate::chunk::AudioChunk;

#[cfg(feature = "wav")]
pub mod wav;

#[cfg(feature = "wav")]
pub use wav::{WavFileSink, WavFileSource};

/// Supplies interleaved stereo chunks to the engine.
pub trait ChunkSource: Send {
    /// Pull up to `samples` interleaved samples.
    ///
    /// `Ok(None)` signals end of stream — normal termination, not an error.
    /// A chunk shorter than requested is an underrun: the engine processes
    /// it as the final chunk and then stops.
    fn pull(&mut self, samples: usize) -> anyhow::Result<Option<AudioChunk>>;
}

/// Accepts processed chunks, narrowed to the sink's 16-bit format.
pub trait PlaybackSink: Send {
    /// Push one processed chunk. An error here is fatal to the engine run.
    fn push(&mut self, samples: &[i16]) -> anyhow::Result<()>;
}

/// Source over a preloaded sample buffer.
pub struct MemorySource {
    samples: Vec<f32>,
    position: usize,
}

impl MemorySource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    pub fn from_i16(samples: &[i16]) -> Self {
        Self::new(samples.iter().map(|&s| s as f32).collect())
    }
}

impl ChunkSource for MemorySource {
    fn pull(&mut self, samples: usize) -> anyhow::Result<Option<AudioChunk>> {
        if self.position >= self.samples.len() {
            return Ok(None);
        }
        let end = (self.position + samples).min(self.samples.len());
        let chunk = AudioChunk::from_samples(self.samples[self.position..end].to_vec());
        self.position = end;
        Ok(Some(chunk))
    }
}

/// Sink that collects everything pushed to it.
#[derive(Default)]
pub struct MemorySink {
    samples: Vec<i16>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl PlaybackSink for MemorySink {
    fn push(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        self.samples.extend_from_slice(samples);
        Ok(())
    }
}
