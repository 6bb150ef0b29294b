//! Nonlinear shaping: hard clip and tanh saturation.

/// Which shaping curve the chain applies. Selected when the engine is built;
/// the live `distortion_amount` parameter only scales it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistortionKind {
    /// Sign-preserving hard clip: `clamp(amount * x, -1, 1)`.
    #[default]
    Clip,
    /// Saturation that compresses loud peaks more than quiet ones:
    /// `tanh(x) * amount`.
    Tanh,
}

/// Stateless per-chunk distortion stage.
pub struct Distortion {
    kind: DistortionKind,
}

impl Distortion {
    pub fn new(kind: DistortionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> DistortionKind {
        self.kind
    }

    /// Shape the chunk in place. `amount <= 0` is a bypass.
    pub fn apply(&self, samples: &mut [f32], amount: f32) {
        if amount <= 0.0 {
            return;
        }
        match self.kind {
            DistortionKind::Clip => {
                for s in samples.iter_mut() {
                    *s = (*s * amount).clamp(-1.0, 1.0);
                }
            }
            DistortionKind::Tanh => {
                for s in samples.iter_mut() {
                    *s = s.tanh() * amount;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_is_identity() {
        let dist = Distortion::new(DistortionKind::Clip);
        let mut samples = vec![0.3, -0.8, 1.5];
        dist.apply(&mut samples, 0.0);
        assert_eq!(samples, vec![0.3, -0.8, 1.5]);

        let dist = Distortion::new(DistortionKind::Tanh);
        dist.apply(&mut samples, 0.0);
        assert_eq!(samples, vec![0.3, -0.8, 1.5]);
    }

    #[test]
    fn test_clip_preserves_sign_and_ceiling() {
        let dist = Distortion::new(DistortionKind::Clip);
        let mut samples = vec![0.05, -0.05, 0.5, -0.5];
        dist.apply(&mut samples, 4.0);
        assert_eq!(samples, vec![0.2, -0.2, 1.0, -1.0]);
    }

    #[test]
    fn test_tanh_compresses_peaks() {
        let dist = Distortion::new(DistortionKind::Tanh);
        let mut samples = vec![0.1, 3.0];
        dist.apply(&mut samples, 1.0);
        // Quiet samples pass nearly unchanged, loud ones compress toward 1
        assert!((samples[0] - 0.1).abs() < 0.01);
        assert!(samples[1] < 1.0);
        assert!(samples[1] > 0.9);
    }

    #[test]
    fn test_tanh_output_bounded_by_amount() {
        let dist = Distortion::new(DistortionKind::Tanh);
        let mut samples = vec![100.0, -100.0];
        dist.apply(&mut samples, 2.0);
        assert!(samples[0] <= 2.0 && samples[0] > 1.9);
        assert!(samples[1] >= -2.0 && samples[1] < -1.9);
    }
}
