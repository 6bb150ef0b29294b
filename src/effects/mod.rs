//! Time-domain effects for the chunk processing chain.
//!
//! [`DelayLine`] and [`ReverbLine`] own their ring buffers and write cursors
//! and are touched only by the audio thread; [`Distortion`] and the fader are
//! stateless per-chunk transforms.

pub mod delay;
pub mod distortion;
pub mod fader;
pub mod reverb;

pub use self::delay::DelayLine;
pub use self::distortion::{Distortion, DistortionKind};
pub use self::reverb::ReverbLine;
