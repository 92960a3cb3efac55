use std::sync::Arc;

use crate::config::model::BlobConfig;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::math::{Rng64, lerp, normalize_degrees};
use crate::palette::ramp::PaletteRamp;
use crate::scene::per_item::{PerItem, resolve_per_item};

/// One procedurally animated shape instance.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Raw outline data; also the path-cache key.
    pub shape: Arc<str>,
    /// Animated rotation in degrees, `[0, 360)`.
    pub rotation_deg: f64,
    /// Speed assigned at generation, degrees per second.
    pub base_speed: f64,
    /// Speed integrated each frame.
    pub current_speed: f64,
    /// Speed the momentum step approaches.
    pub target_speed: f64,
    /// Relative size; nearer blobs are larger.
    pub scale: f64,
    /// Default center in normalized buffer coordinates.
    pub anchor: Point,
    /// Rotation added on top of the animated angle.
    pub rotation_offset: f64,
    /// Center override in normalized buffer coordinates.
    pub position_override: Option<Point>,
    /// Shared palette ramp.
    pub ramp: Arc<PaletteRamp>,
}

impl Blob {
    /// Rendered square size in off-screen pixels.
    pub fn render_size(&self, cfg: &BlobConfig) -> f64 {
        (self.scale * cfg.size_multiplier).max(cfg.min_size)
    }

    /// Draw center in off-screen pixels.
    pub fn center(&self, buffer: Canvas, vertical_offset: f64) -> Point {
        let p = self.position_override.unwrap_or(self.anchor);
        Point::new(
            p.x * f64::from(buffer.width),
            p.y * f64::from(buffer.height) + vertical_offset,
        )
    }

    /// Angle the outline is drawn at.
    pub fn draw_rotation(&self) -> f64 {
        normalize_degrees(self.rotation_deg + self.rotation_offset)
    }
}

/// Generate `count` blobs sharing `ramp`.
///
/// Index 0 is the nearest blob: largest and fastest.
#[tracing::instrument(skip(ramp, outlines, cfg), fields(outlines = outlines.len()))]
pub(crate) fn generate_blobs(
    count: usize,
    ramp: &Arc<PaletteRamp>,
    outlines: &[Arc<str>],
    cfg: &BlobConfig,
) -> Vec<Blob> {
    if outlines.is_empty() {
        return Vec::new();
    }
    let mut rng = Rng64::new(cfg.seed);
    let n = count as f64;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let shape = outlines[rng.index(outlines.len())].clone();

        let nearness = (n - 1.0 - i as f64) / n;
        let jitter = rng.range_f64(-cfg.speed_jitter, cfg.speed_jitter);
        let magnitude = lerp(cfg.speed_min, cfg.speed_max, nearness) + jitter;
        let sign = if rng.next_u64() & 1 == 0 { 1.0 } else { -1.0 };
        let base_speed = sign * magnitude.max(0.0);

        let t = if count > 1 {
            i as f64 / (n - 1.0)
        } else {
            0.0
        };
        let scale = lerp(cfg.scale_max, cfg.scale_min, t);

        let anchor = Point::new(rng.range_f64(0.2, 0.8), rng.range_f64(0.2, 0.8));
        let rotation_deg = rng.range_f64(0.0, 360.0);

        out.push(Blob {
            shape,
            rotation_deg,
            base_speed,
            current_speed: base_speed,
            target_speed: base_speed,
            scale,
            anchor,
            rotation_offset: 0.0,
            position_override: None,
            ramp: Arc::clone(ramp),
        });
    }
    out
}

/// Apply external rotation/position overrides in place, keeping accumulated rotation.
pub(crate) fn apply_overrides(
    blobs: &mut [Blob],
    positions: Option<&PerItem<[f64; 2]>>,
    rotations: Option<&PerItem<f64>>,
) {
    for (i, blob) in blobs.iter_mut().enumerate() {
        blob.rotation_offset = resolve_per_item(rotations, i, 0.0);
        blob.position_override = positions
            .map(|p| p.resolve(i, [blob.anchor.x, blob.anchor.y]))
            .map(|[x, y]| Point::new(x, y));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/blob.rs"]
mod tests;
