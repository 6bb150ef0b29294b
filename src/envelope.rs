//! Attack/release peak tracking for chunk normalization.

/// Decaying peak-amplitude estimate used to normalize each chunk.
///
/// Attack is instant: a chunk louder than the running estimate snaps the
/// estimate to its peak. Release is exponential, controlled by the
/// `volume_roll_rate` parameter read per chunk.
pub struct PeakTracker {
    last_peak: f32,
}

impl PeakTracker {
    /// `initial_peak` seeds the estimate so the first quiet chunk is not
    /// divided by something near zero. The engine's default is the original
    /// control surface's resting volume.
    pub fn new(initial_peak: f32) -> Self {
        Self {
            last_peak: initial_peak.max(0.0),
        }
    }

    pub fn last_peak(&self) -> f32 {
        self.last_peak
    }

    /// Update the estimate from this chunk's peak and normalize in place.
    pub fn normalize(&mut self, samples: &mut [f32], roll_rate: f32) {
        let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));

        if peak > self.last_peak {
            self.last_peak = peak;
        } else {
            self.last_peak = self.last_peak * (1.0 - roll_rate) + peak * roll_rate;
        }

        // A silent stream decays the estimate toward zero; treat that as
        // unity gain instead of dividing by zero.
        let divisor = if self.last_peak == 0.0 { 1.0 } else { self.last_peak };
        for sample in samples.iter_mut() {
            *sample /= divisor;
        }
    }
}
