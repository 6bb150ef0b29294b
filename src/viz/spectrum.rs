//! FFT magnitude spectra for monitor-side rendering.
//!
//! A visualization aid only — nothing in the processing chain depends on it.

use rustfft::{num_complex::Complex, FftPlanner};

/// Computes Hann-windowed magnitude spectra from monitor window snapshots.
pub struct SpectrumAnalyzer {
    fft_size: usize,
    sample_rate: f32,
    planner: FftPlanner<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        Self {
            fft_size,
            sample_rate,
            planner: FftPlanner::new(),
        }
    }

    /// Number of frequency bins per spectrum.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Center frequency of a bin in Hz.
    pub fn bin_to_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate / self.fft_size as f32
    }

    /// Magnitude spectrum (in dB) of the trailing `fft_size` samples.
    ///
    /// Returns `None` when the snapshot is shorter than the FFT size.
    pub fn magnitudes(&mut self, samples: &[f32]) -> Option<Vec<f32>> {
        if samples.len() < self.fft_size {
            return None;
        }
        let input = &samples[samples.len() - self.fft_size..];

        // Hann window to reduce spectral leakage
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let window = 0.5
                    * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / self.fft_size as f32).cos());
                Complex::new(sample * window, 0.0)
            })
            .collect();

        let fft = self.planner.plan_fft_forward(self.fft_size);
        fft.process(&mut buffer);

        // Only the first half carries information; the rest mirrors it
        let magnitudes = buffer[..self.num_bins()]
            .iter()
            .map(|c| {
                let mag = (c.re * c.re + c.im * c.im).sqrt();
                20.0 * (mag + 1e-10).log10()
            })
            .collect();
        Some(magnitudes)
    }
}
