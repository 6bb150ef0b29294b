//! Platform-backed sinks.

#[cfg(feature = "native")]
pub mod cpal_sink;

#[cfg(feature = "native")]
pub use cpal_sink::CpalSink;
