use crate::config::model::MomentumConfig;
use crate::foundation::math::decay_factor;

/// Exponential approach of a value toward its target, independent of frame rate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Momentum {
    decay_constant: f64,
    epsilon: f64,
}

impl Momentum {
    pub(crate) fn new(cfg: &MomentumConfig) -> Self {
        Self {
            decay_constant: cfg.decay_constant,
            epsilon: cfg.velocity_epsilon,
        }
    }

    /// Blend factor for a step of `elapsed_secs`.
    pub(crate) fn factor(&self, elapsed_secs: f64) -> f64 {
        decay_factor(self.decay_constant, elapsed_secs)
    }

    /// Move `current` toward `target` by `factor`; never overshoots, snaps inside `epsilon`.
    pub(crate) fn approach(&self, current: f64, target: f64, factor: f64) -> f64 {
        let next = current + (target - current) * factor;
        if (target - next).abs() <= self.epsilon {
            target
        } else {
            next
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/momentum.rs"]
mod tests;
