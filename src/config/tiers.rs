use serde::{Deserialize, Serialize};

use crate::capability::classifier::PerformanceTier;
use crate::foundation::error::{BlobscapeError, BlobscapeResult};

/// Workload knobs for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierProfile {
    /// Share of `max_blobs` rendered at this tier, in `(0, 1]`.
    pub blob_fraction: f64,
    /// Frame-rate ceiling in Hz.
    pub target_fps: f64,
    /// Blur radius applied at blit time, in display pixels.
    pub blur_px: u32,
}

impl TierProfile {
    /// Blob count for a requested maximum, at least one.
    pub fn blob_count(&self, max_blobs: u32) -> usize {
        let n = (f64::from(max_blobs) * self.blob_fraction).ceil() as u32;
        n.clamp(1, max_blobs.max(1)) as usize
    }

    /// Minimum time between executed frames, in milliseconds.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    fn validate(&self, name: &str) -> BlobscapeResult<()> {
        if !(self.blob_fraction > 0.0 && self.blob_fraction <= 1.0) {
            return Err(BlobscapeError::config(format!(
                "tiers.{name}.blob_fraction must be in (0, 1]"
            )));
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0 && self.target_fps <= 240.0) {
            return Err(BlobscapeError::config(format!(
                "tiers.{name}.target_fps must be in (0, 240]"
            )));
        }
        if self.blur_px > 128 {
            return Err(BlobscapeError::config(format!(
                "tiers.{name}.blur_px must be <= 128"
            )));
        }
        Ok(())
    }
}

/// Table mapping each tier to its fixed workload profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierTable {
    /// Profile for [`PerformanceTier::Low`].
    pub low: TierProfile,
    /// Profile for [`PerformanceTier::Medium`].
    pub medium: TierProfile,
    /// Profile for [`PerformanceTier::High`].
    pub high: TierProfile,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            low: TierProfile {
                blob_fraction: 0.5,
                target_fps: 30.0,
                blur_px: 8,
            },
            medium: TierProfile {
                blob_fraction: 0.75,
                target_fps: 45.0,
                blur_px: 12,
            },
            high: TierProfile {
                blob_fraction: 1.0,
                target_fps: 60.0,
                blur_px: 16,
            },
        }
    }
}

impl TierTable {
    /// Profile for `tier`.
    pub fn profile(&self, tier: PerformanceTier) -> TierProfile {
        match tier {
            PerformanceTier::Low => self.low,
            PerformanceTier::Medium => self.medium,
            PerformanceTier::High => self.high,
        }
    }

    pub(crate) fn validate(&self) -> BlobscapeResult<()> {
        self.low.validate("low")?;
        self.medium.validate("medium")?;
        self.high.validate("high")
    }
}
