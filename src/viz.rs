//! Shared buffer feeding the visualization/monitor thread.

use std::collections::VecDeque;
use std::sync::Mutex;

#[cfg(feature = "spectrum")]
pub mod spectrum;

#[cfg(feature = "spectrum")]
pub use spectrum::SpectrumAnalyzer;

/// Append-only, periodically-trimmed store of processed samples.
///
/// The audio thread appends every processed chunk; a monitor thread copies
/// the trailing window at its own cadence. One mutex guards the deque and is
/// held only for the append or the window copy, so neither side blocks the
/// other for longer than that.
///
/// Retention is bounded at twice the monitor's window: when an append pushes
/// the total past `2 × window`, the oldest samples are dropped down to one
/// window — memory stays bounded while a `window(n)` request for the
/// configured size is always satisfiable.
pub struct VisualizationBuffer {
    samples: Mutex<VecDeque<f32>>,
    window: usize,
}

impl VisualizationBuffer {
    /// `window` is the monitor's sliding-window length in samples.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: Mutex::new(VecDeque::with_capacity(window * 2)),
            window,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    /// Total samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().unwrap().is_empty()
    }

    /// Append a processed chunk, trimming from the front when retention
    /// exceeds twice the window.
    pub fn append(&self, chunk: &[f32]) {
        let mut samples = self.samples.lock().unwrap();
        samples.extend(chunk.iter().copied());
        let len = samples.len();
        if len > self.window * 2 {
            samples.drain(..len - self.window);
        }
    }

    /// Copy of the most recent `n` samples (fewer if fewer have been kept).
    pub fn window(&self, n: usize) -> Vec<f32> {
        let samples = self.samples.lock().unwrap();
        let start = samples.len().saturating_sub(n);
        samples.range(start..).copied().collect()
    }

    /// Drop the `k` oldest samples.
    pub fn trim_front(&self, k: usize) {
        let mut samples = self.samples.lock().unwrap();
        let k = k.min(samples.len());
        samples.drain(..k);
    }
}
