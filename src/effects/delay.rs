//! Fixed-length delay line.

/// Ring-buffer delay: `process` returns the sample written `len` calls ago.
///
/// The engine mixes the returned tap back into the signal; the line itself is
/// a pure circular buffer with a write cursor.
pub struct DelayLine {
    buffer: Vec<f32>,
    cursor: usize,
}

impl DelayLine {
    /// Create a line delaying by `length_samples` (at least 1).
    pub fn new(length_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; length_samples.max(1)],
            cursor: 0,
        }
    }

    /// Current delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the buffer is never shorter than one sample
    }

    /// Resize the line to `length_samples`.
    ///
    /// A no-op when the length is unchanged. Otherwise the buffer is
    /// reallocated and the cursor reset, discarding buffered history — the
    /// tail restarts from silence after a resize. Called once per chunk from
    /// the current parameter value, never mid-chunk.
    pub fn configure(&mut self, length_samples: usize) {
        let len = length_samples.max(1);
        if len != self.buffer.len() {
            self.buffer = vec![0.0; len];
            self.cursor = 0;
        }
    }

    /// Read the delayed sample, store the input in its place, advance.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.cursor];
        self.buffer[self.cursor] = input;
        self.cursor = (self.cursor + 1) % self.buffer.len();
        delayed
    }
}
