//! Chunk-at-a-time streaming audio effects engine.
//!
//! A [`StreamEngine`] pulls interleaved stereo chunks from a
//! [`io::ChunkSource`], runs them through an [`EffectChain`]
//! (peak-normalization, distortion, delay, feedback reverb, stereo fade,
//! output gain), pushes the result to a [`io::PlaybackSink`] and mirrors it
//! into a [`VisualizationBuffer`] for a monitor thread. Effect parameters
//! live in a shared [`ParamStore`] that a control surface mutates while the
//! stream runs; changes land at chunk boundaries, never mid-chunk.

pub mod chain;
pub mod chunk;
pub mod effects;
pub mod engine;
pub mod envelope;
pub mod io;
pub mod params;
pub mod utils;
pub mod viz;

// Platform-backed sinks (cpal)
pub mod platform;

pub use chain::{ChainConfig, EffectChain};
pub use chunk::AudioChunk;
pub use effects::DistortionKind;
pub use engine::{CancelToken, EngineConfig, EngineError, EngineState, StopReason, StreamEngine};
pub use params::{EffectParams, Param, ParamLimits, ParamStore};
pub use viz::VisualizationBuffer;
