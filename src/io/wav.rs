//! WAV file source and sink.
//!
//! Offline counterpart to the live device path: pull chunks from a 16-bit
//! WAV file and write processed output back out. Mono files are widened to
//! interleaved stereo by duplicating each sample.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;

use crate::chunk::AudioChunk;
use crate::io::{ChunkSource, PlaybackSink};

/// Streams chunks out of a 16-bit integer WAV file.
pub struct WavFileSource {
    reader: hound::WavReader<BufReader<File>>,
    channels: u16,
}

impl WavFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let reader = hound::WavReader::open(&path)
            .with_context(|| format!("opening {}", path.as_ref().display()))?;
        let spec = reader.spec();
        anyhow::ensure!(
            spec.sample_format == hound::SampleFormat::Int && spec.bits_per_sample == 16,
            "only 16-bit integer WAV is supported, got {:?}/{} bits",
            spec.sample_format,
            spec.bits_per_sample
        );
        anyhow::ensure!(
            spec.channels == 1 || spec.channels == 2,
            "expected mono or stereo, got {} channels",
            spec.channels
        );
        Ok(Self {
            reader,
            channels: spec.channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.reader.spec().sample_rate
    }
}

impl ChunkSource for WavFileSource {
    fn pull(&mut self, samples: usize) -> anyhow::Result<Option<AudioChunk>> {
        // A mono file contributes half as many file samples per chunk; each
        // one lands on both output channels.
        let take = if self.channels == 1 { samples / 2 } else { samples };
        let mut out = Vec::with_capacity(samples);
        for result in self.reader.samples::<i16>().take(take) {
            let sample = result.context("decoding WAV sample")? as f32;
            out.push(sample);
            if self.channels == 1 {
                out.push(sample);
            }
        }
        if out.is_empty() {
            Ok(None)
        } else {
            Ok(Some(AudioChunk::from_samples(out)))
        }
    }
}

/// Writes processed chunks to a 16-bit stereo WAV file.
pub struct WavFileSink {
    writer: hound::WavWriter<BufWriter<File>>,
}

impl WavFileSink {
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> anyhow::Result<Self> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("creating {}", path.as_ref().display()))?;
        Ok(Self { writer })
    }

    /// Flush and finish the file header. Dropping without finalizing leaves
    /// a valid but unflushed file; prefer calling this.
    pub fn finalize(self) -> anyhow::Result<()> {
        self.writer.finalize().context("finalizing WAV file")
    }
}

impl PlaybackSink for WavFileSink {
    fn push(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .context("writing WAV sample")?;
        }
        Ok(())
    }
}
