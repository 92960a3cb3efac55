/// Deterministic SplitMix64 generator used for blob layout and jitter.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform sample in `[lo, hi)`.
    pub(crate) fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniform index in `[0, n)`. `n == 0` yields `0`.
    pub(crate) fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Wrap any finite angle into `[0, 360)`.
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let d = deg % 360.0;
    let d = if d < 0.0 { d + 360.0 } else { d };
    // `-1e-18 % 360 + 360` rounds to exactly 360.0.
    if d >= 360.0 { 0.0 } else { d }
}

/// Interpolate hue along the arc of magnitude <= 180 degrees.
pub(crate) fn lerp_hue(h1: f64, h2: f64, t: f64) -> f64 {
    let mut delta = h2 - h1;
    if delta.abs() > 180.0 {
        delta -= 360.0 * delta.signum();
    }
    normalize_degrees(h1 + delta * t)
}

/// Smallest absolute angular distance between two headings, in `[0, 180]`.
pub(crate) fn angle_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Per-step blend factor for an exponential approach expressed per second.
///
/// `decay_constant` is the per-second constant `c > 1`; one second retains `1 - 1/c` of the
/// remaining gap. Composing steps of `dt1` and `dt2` equals one step of `dt1 + dt2`.
pub(crate) fn decay_factor(decay_constant: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 || !elapsed_secs.is_finite() {
        return 0.0;
    }
    let retain = (1.0 - 1.0 / decay_constant).clamp(0.0, 1.0);
    (1.0 - retain.powf(elapsed_secs)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
