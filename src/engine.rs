//! The streaming run loop.
//!
//! One dedicated thread drives [`StreamEngine::run`]: pull a chunk, run the
//! effect chain, push to the sink, append to the visualization buffer, check
//! the cancellation token. Parameters and the visualization buffer are the
//! only shared state; everything else is owned by the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::chain::{ChainConfig, EffectChain};
use crate::io::{ChunkSource, PlaybackSink};
use crate::params::ParamStore;
use crate::viz::VisualizationBuffer;

/// Fatal engine failures. End-of-stream and cancellation are not errors —
/// they come back as a [`StopReason`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("source read failed: {0}")]
    Source(#[source] anyhow::Error),
    #[error("sink write failed: {0}")]
    SinkWrite(#[source] anyhow::Error),
}

/// Why a run ended cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The source was exhausted (or underran into its final short chunk).
    EndOfStream,
    /// The cancellation token was observed at a chunk boundary.
    Cancelled,
}

/// Engine lifecycle. Transitions: `Idle → Running → Stopping → Stopped`;
/// end-of-stream drives `Running → Stopped` directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// Cooperative stop signal, checked once per chunk.
///
/// Clone it to hand to a UI close handler or signal handler; setting it adds
/// at most one chunk of latency before the engine stops. A chunk in flight is
/// always completed — cancellation is never observed mid-chunk.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fixed configuration for one engine run.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames pulled per iteration; samples per chunk is
    /// `chunk_frames × channels`.
    pub chunk_frames: usize,
    pub initial_peak: f32,
    pub distortion: crate::effects::DistortionKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            chunk_frames: 1024,
            initial_peak: 10000.0,
            distortion: crate::effects::DistortionKind::default(),
        }
    }
}

/// Owns the effect chain and drives the per-chunk loop.
pub struct StreamEngine {
    config: EngineConfig,
    params: Arc<ParamStore>,
    viz: Arc<VisualizationBuffer>,
    chain: EffectChain,
    cancel: CancelToken,
    state: EngineState,
}

impl StreamEngine {
    pub fn new(
        config: EngineConfig,
        params: Arc<ParamStore>,
        viz: Arc<VisualizationBuffer>,
    ) -> Self {
        let chain = EffectChain::new(ChainConfig {
            sample_rate: config.sample_rate,
            channels: config.channels,
            initial_peak: config.initial_peak,
            distortion: config.distortion,
        });
        Self {
            config,
            params,
            viz,
            chain,
            cancel: CancelToken::new(),
            state: EngineState::Idle,
        }
    }

    /// Token to stop this engine from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    /// Drive the stream until the source ends, the token is set, or a fatal
    /// error occurs. Blocks the calling thread for the duration of the run.
    pub fn run(
        &mut self,
        source: &mut dyn ChunkSource,
        sink: &mut dyn PlaybackSink,
    ) -> Result<StopReason, EngineError> {
        let chunk_samples = self.config.chunk_frames * self.config.channels as usize;
        self.state = EngineState::Running;
        log::info!(
            "engine running: {} Hz, {} ch, {} frames/chunk",
            self.config.sample_rate,
            self.config.channels,
            self.config.chunk_frames
        );

        let reason = loop {
            let pulled = match source.pull(chunk_samples) {
                Ok(pulled) => pulled,
                Err(err) => {
                    self.state = EngineState::Stopped;
                    return Err(EngineError::Source(err));
                }
            };
            let Some(mut chunk) = pulled else {
                break StopReason::EndOfStream;
            };
            let underrun = chunk.len() < chunk_samples;
            if underrun {
                log::debug!(
                    "source underrun: {} of {} samples, treating as final chunk",
                    chunk.len(),
                    chunk_samples
                );
            }

            let params = self.params.snapshot();
            self.chain.process(&mut chunk, &params);

            if let Err(err) = sink.push(&chunk.to_i16_saturating()) {
                self.state = EngineState::Stopped;
                return Err(EngineError::SinkWrite(err));
            }
            self.viz.append(chunk.samples());

            if underrun {
                break StopReason::EndOfStream;
            }
            if self.cancel.is_cancelled() {
                self.state = EngineState::Stopping;
                break StopReason::Cancelled;
            }
        };

        self.state = EngineState::Stopped;
        log::info!("engine stopped: {:?}", reason);
        Ok(reason)
    }
}
