use crate::config::model::ScrollConfig;
use crate::scene::blob::Blob;

/// Scroll-derived targets, read once per frame by the momentum step.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScrollCouplingState {
    /// Last scroll value received, in `[0, 1]`.
    pub last_value: f64,
    /// `-1` after scrolling down, `1` after scrolling up.
    pub direction: i8,
    /// Vertical offset the blobs drift toward, in buffer pixels.
    pub target_vertical_offset: f64,
    /// Vertical offset applied this frame.
    pub current_vertical_offset: f64,
    /// Ramp index every blob is colored with.
    pub selected_color_index: usize,
}

/// Maps a normalized scroll signal onto blob momentum targets, vertical drift and color.
#[derive(Debug, Clone)]
pub struct ScrollCoupling {
    cfg: ScrollConfig,
    transfer: f64,
    state: ScrollCouplingState,
}

impl ScrollCoupling {
    /// Coupling at scroll position 0, moving forward.
    pub fn new(cfg: ScrollConfig, transfer: f64) -> Self {
        let base = cfg.offset_base;
        Self {
            cfg,
            transfer,
            state: ScrollCouplingState {
                last_value: 0.0,
                direction: 1,
                target_vertical_offset: base,
                current_vertical_offset: base,
                selected_color_index: 0,
            },
        }
    }

    /// Current state.
    pub fn state(&self) -> &ScrollCouplingState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ScrollCouplingState {
        &mut self.state
    }

    /// Consume one scroll value. Non-finite values are ignored; others are clamped to `[0, 1]`.
    ///
    /// Scrolling down (`value` increasing) sets direction `-1`; anything else, including an
    /// unchanged value, sets `1`.
    pub fn update(&mut self, value: f64, blobs: &mut [Blob], ramp_len: usize) {
        if !value.is_finite() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        self.state.direction = if value > self.state.last_value { -1 } else { 1 };
        self.state.last_value = value;
        self.state.target_vertical_offset =
            self.cfg.offset_base - value * self.cfg.offset_multiplier;
        self.reselect(ramp_len);
        self.retarget(blobs);
    }

    /// Point every blob's momentum target along the current direction.
    pub fn retarget(&self, blobs: &mut [Blob]) {
        let n = blobs.len() as f64;
        let direction = f64::from(self.state.direction);
        for (i, blob) in blobs.iter_mut().enumerate() {
            let weight = positional_weight(i, n, self.cfg.weight_exponent);
            blob.target_speed = blob.base_speed * direction * weight * self.transfer;
        }
    }

    /// Recompute the selected ramp index for a ramp of `ramp_len` entries.
    pub fn reselect(&mut self, ramp_len: usize) {
        let last = ramp_len.saturating_sub(1);
        let idx = (self.state.last_value * last as f64).floor();
        self.state.selected_color_index = (idx.max(0.0) as usize).min(last);
    }
}

/// Power-law falloff favoring low indices (nearer blobs): `((n - i) / n)^exponent`.
pub fn positional_weight(index: usize, count: f64, exponent: f64) -> f64 {
    if count <= 0.0 {
        return 0.0;
    }
    ((count - index as f64) / count).max(0.0).powf(exponent)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scroll.rs"]
mod tests;
