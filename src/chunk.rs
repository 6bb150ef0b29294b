//! Interleaved stereo sample blocks.
//!
//! An [`AudioChunk`] is the unit the engine processes: a block of interleaved
//! stereo samples held as `f32` for intermediate math, narrowed to `i16` only
//! at the sink boundary.

/// A block of interleaved stereo samples.
///
/// Samples carry the source's raw magnitude (an i16-scaled range when the
/// source decodes 16-bit audio); the gain tracker normalizes them to roughly
/// [-1, 1] before the effects run. Length is always even — even-indexed
/// samples are the left channel, odd-indexed the right.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioChunk {
    samples: Vec<f32>,
}

impl AudioChunk {
    /// Wrap an interleaved stereo sample block.
    pub fn from_samples(samples: Vec<f32>) -> Self {
        debug_assert!(samples.len() % 2 == 0, "interleaved stereo chunks have even length");
        Self { samples }
    }

    /// Build a chunk from 16-bit interleaved stereo samples.
    pub fn from_i16(samples: &[i16]) -> Self {
        Self::from_samples(samples.iter().map(|&s| s as f32).collect())
    }

    /// Number of samples (both channels, interleaved).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Narrow to the sink's 16-bit format, saturating on overflow.
    pub fn to_i16_saturating(&self) -> Vec<i16> {
        // `as` performs a saturating float-to-int cast (NaN maps to 0)
        self.samples.iter().map(|&s| s.round() as i16).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_round_trip() {
        let chunk = AudioChunk::from_i16(&[0, 100, -100, 32767]);
        assert_eq!(chunk.to_i16_saturating(), vec![0, 100, -100, 32767]);
    }

    #[test]
    fn test_narrowing_saturates() {
        let chunk = AudioChunk::from_samples(vec![1e9, -1e9, 40000.0, -40000.0]);
        assert_eq!(
            chunk.to_i16_saturating(),
            vec![i16::MAX, i16::MIN, i16::MAX, i16::MIN]
        );
    }

    #[test]
    fn test_narrowing_rounds() {
        let chunk = AudioChunk::from_samples(vec![0.4, 0.6, -0.4, -0.6]);
        assert_eq!(chunk.to_i16_saturating(), vec![0, 1, 0, -1]);
    }
}
