//! Feedback reverb line.

/// Ring buffer like [`DelayLine`](crate::effects::DelayLine), but each write
/// folds a fraction of the stored sample back in, producing a decaying tail:
/// `buffer[cursor] = input + feedback * buffer[cursor]`.
///
/// Read-before-write order is load-bearing: the tap returned is the value
/// before the combined write. The feedback coefficient is not clamped here —
/// bounds live at the parameter-store boundary — and a magnitude below 1
/// keeps bounded input bounded.
pub struct ReverbLine {
    buffer: Vec<f32>,
    cursor: usize,
    feedback: f32,
}

impl ReverbLine {
    pub fn new(length_samples: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; length_samples.max(1)],
            cursor: 0,
            feedback,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the fraction of the stored sample folded back in on each write.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Resize the line; same destructive semantics as the delay line
    /// (reallocate, reset cursor, tail restarts from silence).
    pub fn configure(&mut self, length_samples: usize) {
        let len = length_samples.max(1);
        if len != self.buffer.len() {
            self.buffer = vec![0.0; len];
            self.cursor = 0;
        }
    }

    /// Read the tap, write `input + feedback * tap`, advance.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let tap = self.buffer[self.cursor];
        self.buffer[self.cursor] = input + self.feedback * tap;
        self.cursor = (self.cursor + 1) % self.buffer.len();
        tap
    }
}
