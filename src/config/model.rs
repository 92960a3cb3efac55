use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::tiers::TierTable;
use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::palette::color::{ColorPair, ColorStop};
use crate::scene::per_item::PerItem;

/// Largest blob count any tier may request.
pub const MAX_BLOBS_LIMIT: u32 = 50;

/// Largest blob render size in off-screen pixels: four times the largest buffer side.
pub const MAX_BLOB_SIZE_PX: f64 = 1024.0;

/// Complete engine configuration.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Ordered color-stop pairs interpolated into the palette ramp.
    pub palette: Vec<ColorPair>,
    /// Blob count at the `high` tier; lower tiers render a fraction of it.
    pub max_blobs: u32,
    /// Ramp length for palettes with two or more pairs.
    pub ramp_len: usize,
    /// Short side of the off-screen buffer in pixels.
    pub buffer_px: u32,
    /// Per-tier workload table.
    pub tiers: TierTable,
    /// Blob generator ranges.
    pub blob: BlobConfig,
    /// Momentum decay tuning.
    pub momentum: MomentumConfig,
    /// Scroll-coupling tuning.
    pub scroll: ScrollConfig,
    /// Dirty-region thresholds.
    pub dirty: DirtyConfig,
    /// Quiet period after the last resize event before the buffer is replaced.
    pub resize_debounce_ms: f64,
    /// Optional blob centers in normalized buffer coordinates (`[x, y]` in `0..1`).
    pub positions: Option<PerItem<[f64; 2]>>,
    /// Optional rotation offsets in degrees added to each blob's animated angle.
    pub rotations: Option<PerItem<f64>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                ColorPair::new(
                    ColorStop::hsl(262.0, 83.0, 58.0),
                    ColorStop::hsl(199.0, 89.0, 48.0),
                ),
                ColorPair::new(
                    ColorStop::hsl(330.0, 81.0, 60.0),
                    ColorStop::hsl(24.0, 95.0, 53.0),
                ),
            ],
            max_blobs: 12,
            ramp_len: 64,
            buffer_px: 32,
            tiers: TierTable::default(),
            blob: BlobConfig::default(),
            momentum: MomentumConfig::default(),
            scroll: ScrollConfig::default(),
            dirty: DirtyConfig::default(),
            resize_debounce_ms: 100.0,
            positions: None,
            rotations: None,
        }
    }
}

/// Ranges used when generating blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlobConfig {
    /// Slowest base angular speed, degrees per second.
    pub speed_min: f64,
    /// Fastest base angular speed, degrees per second.
    pub speed_max: f64,
    /// Maximum absolute random jitter added to the base speed.
    pub speed_jitter: f64,
    /// Scale of the farthest blob.
    pub scale_min: f64,
    /// Scale of the nearest blob.
    pub scale_max: f64,
    /// Off-screen pixels per unit of scale.
    pub size_multiplier: f64,
    /// Smallest rendered blob size in off-screen pixels.
    pub min_size: f64,
    /// Seed for shape choice, jitter and initial angles.
    pub seed: u64,
    /// Raw SVG path data replacing the built-in outlines when non-empty.
    pub outlines: Vec<String>,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            speed_min: 6.0,
            speed_max: 24.0,
            speed_jitter: 3.0,
            scale_min: 0.45,
            scale_max: 1.0,
            size_multiplier: 28.0,
            min_size: 6.0,
            seed: 0x5EED_B10B,
            outlines: Vec::new(),
        }
    }
}

/// Momentum decay tuning. The constants are cosmetic; only the exponential approach matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MomentumConfig {
    /// Per-second decay constant `c > 1`; one second closes `1/c` of the remaining gap.
    pub decay_constant: f64,
    /// Scale applied to scroll-derived target speeds.
    pub transfer: f64,
    /// Gaps smaller than this snap to the target.
    pub velocity_epsilon: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            decay_constant: 1.25,
            transfer: 1.0,
            velocity_epsilon: 1e-3,
        }
    }
}

/// Scroll-coupling tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Exponent of the positional weight `((n - i) / n)^exponent`.
    pub weight_exponent: f64,
    /// Vertical offset at scroll value 0, in off-screen pixels.
    pub offset_base: f64,
    /// Offset change across the full scroll range, in off-screen pixels.
    pub offset_multiplier: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            weight_exponent: 1.5,
            offset_base: 0.0,
            offset_multiplier: 8.0,
        }
    }
}

/// Dirty-region thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirtyConfig {
    /// Rotation change that marks a blob dirty, in degrees.
    pub rotation_threshold_deg: f64,
    /// Position change on either axis that marks a blob dirty, in off-screen pixels.
    pub position_threshold_px: f64,
    /// Extra half-extent around each blob box, in off-screen pixels.
    pub padding_px: f64,
    /// Overlap share above which two regions merge.
    pub merge_overlap: f64,
}

impl Default for DirtyConfig {
    fn default() -> Self {
        Self {
            rotation_threshold_deg: 5.0,
            position_threshold_px: 2.0,
            padding_px: 1.0,
            merge_overlap: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> BlobscapeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| BlobscapeError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_path(path: impl AsRef<Path>) -> BlobscapeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BlobscapeError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Check ranges and palette arity.
    pub fn validate(&self) -> BlobscapeResult<()> {
        if self.palette.is_empty() {
            return Err(BlobscapeError::config("palette needs at least one color pair"));
        }
        for (i, p) in self.palette.iter().enumerate() {
            p.primary
                .validate()
                .and_then(|_| p.secondary.validate())
                .map_err(|e| BlobscapeError::config(format!("palette pair {i}: {e}")))?;
        }
        if !(1..=MAX_BLOBS_LIMIT).contains(&self.max_blobs) {
            return Err(BlobscapeError::config(format!(
                "max_blobs must be in 1..={MAX_BLOBS_LIMIT}, got {}",
                self.max_blobs
            )));
        }
        if !(2..=256).contains(&self.ramp_len) {
            return Err(BlobscapeError::config("ramp_len must be in 2..=256"));
        }
        if self.palette.len() > 1 && self.ramp_len < self.palette.len() {
            return Err(BlobscapeError::config(format!(
                "ramp_len {} cannot hold {} palette pairs",
                self.ramp_len,
                self.palette.len()
            )));
        }
        if !(8..=256).contains(&self.buffer_px) {
            return Err(BlobscapeError::config("buffer_px must be in 8..=256"));
        }
        self.tiers.validate()?;

        let b = &self.blob;
        let finite = [
            b.speed_min,
            b.speed_max,
            b.speed_jitter,
            b.scale_min,
            b.scale_max,
            b.size_multiplier,
            b.min_size,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(BlobscapeError::config("blob ranges must be finite"));
        }
        if b.speed_min > b.speed_max || b.speed_jitter < 0.0 {
            return Err(BlobscapeError::config(
                "blob.speed_min must be <= speed_max and speed_jitter >= 0",
            ));
        }
        if b.scale_min <= 0.0 || b.scale_min > b.scale_max {
            return Err(BlobscapeError::config("blob scale range must satisfy 0 < min <= max"));
        }
        if b.size_multiplier <= 0.0 || b.min_size <= 0.0 {
            return Err(BlobscapeError::config("blob sizes must be > 0"));
        }
        let largest = (b.scale_max * b.size_multiplier).max(b.min_size);
        if largest > MAX_BLOB_SIZE_PX {
            return Err(BlobscapeError::config(format!(
                "blob render size {largest} exceeds {MAX_BLOB_SIZE_PX} px"
            )));
        }

        let m = &self.momentum;
        if !(m.decay_constant.is_finite() && m.decay_constant > 1.0) {
            return Err(BlobscapeError::config("momentum.decay_constant must be > 1"));
        }
        if !m.transfer.is_finite() || !(m.velocity_epsilon >= 0.0) {
            return Err(BlobscapeError::config(
                "momentum.transfer must be finite and velocity_epsilon >= 0",
            ));
        }

        let s = &self.scroll;
        if !(s.weight_exponent.is_finite() && s.weight_exponent >= 0.0)
            || !s.offset_base.is_finite()
            || !s.offset_multiplier.is_finite()
        {
            return Err(BlobscapeError::config("scroll tuning must be finite, exponent >= 0"));
        }

        let d = &self.dirty;
        if !(d.rotation_threshold_deg >= 0.0
            && d.position_threshold_px >= 0.0
            && d.padding_px >= 0.0
            && d.merge_overlap > 0.0
            && d.merge_overlap <= 1.0)
        {
            return Err(BlobscapeError::config(
                "dirty thresholds must be >= 0 and merge_overlap in (0, 1]",
            ));
        }
        if !(self.resize_debounce_ms.is_finite() && self.resize_debounce_ms >= 0.0) {
            return Err(BlobscapeError::config("resize_debounce_ms must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
