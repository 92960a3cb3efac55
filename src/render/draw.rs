use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Vec2};
use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::render::cache::{GradientKey, RenderCaches};
use crate::render::dirty::BlobSnapshot;
use crate::render::gradient::{GradientHandle, MAX_GRADIENT_PX, rasterize_gradient};
use crate::scene::blob::Blob;
use crate::scene::outlines::OUTLINE_BOX;

/// Result of drawing one scene.
#[derive(Debug, Default)]
pub(crate) struct DrawOutcome {
    /// Blobs that reached the raster.
    pub(crate) drawn: usize,
    /// Blobs skipped this frame, with the preparation error.
    pub(crate) failed: Vec<(usize, BlobscapeError)>,
}

/// Draw every blob through the caches. A blob whose preparation fails is skipped; the rest of
/// the scene still draws.
pub(crate) fn draw_blobs(
    ctx: &mut vello_cpu::RenderContext,
    blobs: &[Blob],
    snapshots: &[BlobSnapshot],
    caches: &mut RenderCaches,
) -> DrawOutcome {
    let mut outcome = DrawOutcome::default();
    for (i, (blob, snap)) in blobs.iter().zip(snapshots).enumerate() {
        match prepare(blob, snap, caches) {
            Ok((path, gradient)) => {
                fill_blob(ctx, &path, &gradient, snap);
                outcome.drawn += 1;
            }
            Err(e) => outcome.failed.push((i, e)),
        }
    }
    outcome
}

fn prepare(
    blob: &Blob,
    snap: &BlobSnapshot,
    caches: &mut RenderCaches,
) -> BlobscapeResult<(Arc<BezPath>, Arc<GradientHandle>)> {
    let path = caches.paths.try_get(Arc::clone(&blob.shape), || {
        BezPath::from_svg(&blob.shape)
            .map(Arc::new)
            .map_err(|e| BlobscapeError::render(format!("invalid outline path: {e}")))
    })?;
    if blob.ramp.is_empty() {
        return Err(BlobscapeError::render("blob has an empty palette ramp"));
    }
    let entry = blob.ramp.at_clamped(snap.color_index);
    let size = snap.size.ceil();
    if !size.is_finite() || !(1.0..=f64::from(MAX_GRADIENT_PX)).contains(&size) {
        return Err(BlobscapeError::render(format!("invalid render size {}", snap.size)));
    }
    let key = GradientKey {
        a: entry.a.hsl(),
        b: entry.b.hsl(),
        size: size as u32,
    };
    let gradient = caches
        .gradients
        .try_get(key, |generation| rasterize_gradient(key, generation))?;
    Ok((path, gradient))
}

/// Outline space (a `OUTLINE_BOX` square) to buffer space: centered on the blob, rotated, and
/// scaled to the render size.
pub(crate) fn blob_transform(snap: &BlobSnapshot) -> Affine {
    let half = OUTLINE_BOX * 0.5;
    Affine::translate(snap.center.to_vec2())
        * Affine::rotate(snap.rotation_deg.to_radians())
        * Affine::scale(snap.size / OUTLINE_BOX)
        * Affine::translate(Vec2::new(-half, -half))
}

fn fill_blob(
    ctx: &mut vello_cpu::RenderContext,
    path: &BezPath,
    gradient: &GradientHandle,
    snap: &BlobSnapshot,
) {
    ctx.set_transform(affine_to_cpu(blob_transform(snap)));
    // The gradient raster is `size` pixels wide; stretch it over the outline box.
    let paint_scale = OUTLINE_BOX / f64::from(gradient.size());
    ctx.set_paint_transform(affine_to_cpu(Affine::scale(paint_scale)));
    ctx.set_paint(gradient.paint());
    ctx.fill_path(&bezpath_to_cpu(path));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
