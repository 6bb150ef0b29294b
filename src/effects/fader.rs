//! Left/right channel balance.

/// Scale the left channel by `1 - fade` and the right by `fade`.
///
/// `fade == 0.5` means centered and is a true identity — the chunk is left
/// untouched rather than multiplied by 0.5, both to skip the work and to
/// avoid accumulating rounding drift on the common path.
pub fn apply(samples: &mut [f32], fade: f32) {
    if fade == 0.5 {
        return;
    }
    for pair in samples.chunks_exact_mut(2) {
        pair[0] *= 1.0 - fade;
        pair[1] *= fade;
    }
}
