use std::fmt;
use std::sync::Arc;

use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::render::cache::GradientKey;

/// A pre-rasterized diagonal linear gradient paint.
///
/// Handles are only valid for the off-screen surface generation they were built for.
#[derive(Clone)]
pub struct GradientHandle {
    paint: vello_cpu::Image,
    size: u32,
    generation: u64,
}

impl GradientHandle {
    /// Paint usable with `RenderContext::set_paint`.
    pub(crate) fn paint(&self) -> vello_cpu::Image {
        self.paint.clone()
    }

    /// Square side length in off-screen pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Off-screen surface generation this handle is bound to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for GradientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientHandle")
            .field("size", &self.size)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Largest gradient side accepted for rasterization, in off-screen pixels.
pub(crate) const MAX_GRADIENT_PX: u32 = 4096;

/// Rasterize `key.a -> key.b` from the top-left to the bottom-right corner of a
/// `key.size` square.
pub(crate) fn rasterize_gradient(
    key: GradientKey,
    generation: u64,
) -> BlobscapeResult<GradientHandle> {
    let size = key.size;
    if size == 0 || size > MAX_GRADIENT_PX {
        return Err(BlobscapeError::render(format!(
            "gradient size {size} outside 1..={MAX_GRADIENT_PX}"
        )));
    }
    let (w, h) = pixmap_dims(size, size)?;
    let start = key.a.to_rgba8();
    let end = key.b.to_rgba8();

    let n = size as usize;
    let mut bytes = vec![0u8; n * n * 4];
    let span = (2 * (size - 1)) as f32;
    for y in 0..size {
        for x in 0..size {
            let t = if span <= 0.0 {
                0.0
            } else {
                ((x + y) as f32) / span
            };
            let lerp = |a: u8, b: u8| -> u8 {
                let af = a as f32;
                let bf = b as f32;
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let idx = ((y as usize) * n + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[
                lerp(start.r, end.r),
                lerp(start.g, end.g),
                lerp(start.b, end.b),
                lerp(start.a, end.a),
            ]);
        }
    }

    let pixmap = pixmap_from_premul_bytes(&bytes, w, h)?;
    Ok(GradientHandle {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        size,
        generation,
    })
}

/// Pixmap dimensions for `width x height`, checked before any pixel memory is reserved.
pub(crate) fn pixmap_dims(width: u32, height: u32) -> BlobscapeResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BlobscapeError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BlobscapeError::render("pixmap height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u16,
    height: u16,
) -> BlobscapeResult<vello_cpu::Pixmap> {
    let pixel_count = usize::from(width) * usize::from(height);
    if bytes.len() != pixel_count * 4 {
        return Err(BlobscapeError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(pixel_count);
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, width, height, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
