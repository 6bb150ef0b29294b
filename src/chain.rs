//! The per-chunk effect chain.

use crate::chunk::AudioChunk;
use crate::effects::{fader, DelayLine, Distortion, DistortionKind, ReverbLine};
use crate::envelope::PeakTracker;
use crate::params::EffectParams;

/// Fixed configuration for one engine run, negotiated with the external
/// source/sink before the stream starts.
#[derive(Clone, Copy, Debug)]
pub struct ChainConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Seed for the peak tracker so the first chunk is not divided by
    /// something near zero.
    pub initial_peak: f32,
    pub distortion: DistortionKind,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            initial_peak: 10000.0,
            distortion: DistortionKind::default(),
        }
    }
}

/// Composes the per-chunk transform:
/// normalize → distort → delay → reverb → fade → output gain.
///
/// The ordering is a contract: distortion runs before the delay and reverb so
/// their tails carry the distorted signal, not the clean one. All state here
/// (tracker, ring buffers) is owned exclusively by the audio thread; the only
/// shared input is the parameter snapshot taken once per chunk.
pub struct EffectChain {
    sample_rate: f32,
    channels: usize,
    tracker: PeakTracker,
    distortion: Distortion,
    delay: DelayLine,
    reverb: ReverbLine,
}

impl EffectChain {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            sample_rate: config.sample_rate as f32,
            channels: config.channels.max(1) as usize,
            tracker: PeakTracker::new(config.initial_peak),
            distortion: Distortion::new(config.distortion),
            delay: DelayLine::new(1),
            reverb: ReverbLine::new(1, 0.0),
        }
    }

    /// Current peak estimate, exposed for inspection and tests.
    pub fn last_peak(&self) -> f32 {
        self.tracker.last_peak()
    }

    /// Ring length in interleaved samples for a delay of `seconds`.
    ///
    /// Whole frames times the channel count, so a stereo stream keeps its
    /// left/right alignment through the line.
    fn ring_len(&self, seconds: f32) -> usize {
        (seconds * self.sample_rate).round() as usize * self.channels
    }

    /// Run one chunk through the chain in place.
    ///
    /// `params` is the snapshot for this chunk; every stage reads from it so
    /// a concurrent `set` can never change a value mid-chunk. Ring lengths
    /// are re-evaluated here, once per chunk, before any sample is touched.
    pub fn process(&mut self, chunk: &mut AudioChunk, params: &EffectParams) {
        let samples = chunk.samples_mut();

        self.tracker.normalize(samples, params.volume_roll_rate);

        if params.distortion_amount > 0.0 {
            self.distortion.apply(samples, params.distortion_amount);
        }

        let delay_len = self.ring_len(params.delay_seconds);
        if delay_len > 0 {
            self.delay.configure(delay_len);
            for s in samples.iter_mut() {
                let tap = self.delay.process(*s);
                *s += params.delay_feedback * tap;
            }
        }

        let reverb_len = self.ring_len(params.reverb_seconds);
        if reverb_len > 0 {
            self.reverb.configure(reverb_len);
            self.reverb.set_feedback(params.reverb_feedback);
            for s in samples.iter_mut() {
                let tap = self.reverb.process(*s);
                *s += params.reverb_amplitude * tap;
            }
        }

        fader::apply(samples, params.fade);

        for s in samples.iter_mut() {
            *s *= params.volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamStore;

    fn bypass_params(store: &ParamStore) -> EffectParams {
        use crate::params::Param;
        store.set(Param::Volume, 1.0);
        store.set(Param::DistortionAmount, 0.0);
        store.set(Param::DelaySeconds, 0.0);
        store.set(Param::ReverbSeconds, 0.0);
        store.set(Param::Fade, 0.5);
        store.snapshot()
    }

    #[test]
    fn test_bypassed_chain_only_normalizes_and_scales() {
        let store = ParamStore::default();
        let params = bypass_params(&store);
        let mut chain = EffectChain::new(ChainConfig {
            initial_peak: 2.0,
            ..ChainConfig::default()
        });

        let mut chunk = AudioChunk::from_samples(vec![1.0, -1.0, 1.0, -1.0]);
        chain.process(&mut chunk, &params);

        // Peak (1.0) is below the seed, so the estimate decays toward it
        let expected_peak = 2.0 * (1.0 - params.volume_roll_rate) + 1.0 * params.volume_roll_rate;
        assert!((chain.last_peak() - expected_peak).abs() < 1e-5);
        for (i, s) in chunk.samples().iter().enumerate() {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            assert!((s - sign / expected_peak).abs() < 1e-5);
        }
    }

    #[test]
    fn test_delay_echoes_one_chunk_later() {
        let store = ParamStore::default();
        use crate::params::Param;
        store.set(Param::Volume, 1.0);
        store.set(Param::Fade, 0.5);
        store.set(Param::DelayFeedback, 1.0);
        // 2 frames of delay at 4 Hz stereo = 4 interleaved samples
        store.set(Param::DelaySeconds, 0.5);
        let params = store.snapshot();

        let mut chain = EffectChain::new(ChainConfig {
            sample_rate: 4,
            channels: 2,
            initial_peak: 1.0,
            distortion: DistortionKind::Clip,
        });

        let mut first = AudioChunk::from_samples(vec![1.0, -1.0, 0.0, 0.0]);
        chain.process(&mut first, &params);
        assert_eq!(first.samples(), &[1.0, -1.0, 0.0, 0.0]);

        // The echo of the first chunk's leading frame lands at the start of
        // the second chunk, on the same channels
        let mut second = AudioChunk::from_samples(vec![0.0, 0.0, 0.0, 0.0]);
        chain.process(&mut second, &params);
        assert_eq!(second.samples(), &[1.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_distortion_runs_before_delay() {
        let store = ParamStore::default();
        use crate::params::Param;
        store.set(Param::Volume, 1.0);
        store.set(Param::Fade, 0.5);
        store.set(Param::DistortionAmount, 10.0);
        store.set(Param::DelayFeedback, 1.0);
        store.set(Param::DelaySeconds, 0.25); // 1 frame at 4 Hz = 2 samples
        let params = store.snapshot();

        let mut chain = EffectChain::new(ChainConfig {
            sample_rate: 4,
            channels: 2,
            initial_peak: 1.0,
            distortion: DistortionKind::Clip,
        });

        let mut chunk = AudioChunk::from_samples(vec![0.5, 0.5, 0.0, 0.0]);
        chain.process(&mut chunk, &params);
        // 0.5 clips to 1.0, and it is the clipped value that echoes
        assert_eq!(chunk.samples(), &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_volume_scales_output() {
        let store = ParamStore::default();
        let mut params = bypass_params(&store);
        params.volume = 2.0;
        let mut chain = EffectChain::new(ChainConfig {
            initial_peak: 1.0,
            ..ChainConfig::default()
        });
        let mut chunk = AudioChunk::from_samples(vec![1.0, -1.0]);
        chain.process(&mut chunk, &params);
        assert_eq!(chunk.samples(), &[2.0, -2.0]);
    }
}
