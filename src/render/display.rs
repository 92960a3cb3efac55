use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::render::blur::GaussianBlur;

/// Borrowed premultiplied RGBA8 image, tightly packed and row-major.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: &'a [u8],
}

/// The visible surface the engine composes into.
pub trait DisplaySurface {
    /// Current pixel size.
    fn size(&self) -> Canvas;

    /// Feature probe: can [`DisplaySurface::blit_upscaled`] apply a blur filter itself?
    ///
    /// Queried once when the engine is built.
    fn supports_filter_blur(&self) -> bool;

    /// Scale `src` up to the full surface, blurring by `blur_px` display pixels when given.
    fn blit_upscaled(&mut self, src: BufferView<'_>, blur_px: Option<u32>) -> BlobscapeResult<()>;

    /// Fallback for surfaces without a blur filter: a surface-level (CSS-style) blur that the
    /// host applies to everything the surface shows.
    fn set_css_blur(&mut self, radius_px: u32) -> BlobscapeResult<()>;

    /// Paint one flat color over the whole surface.
    fn fill(&mut self, color: Rgba8Premul) -> BlobscapeResult<()>;
}

/// In-memory display: a premultiplied RGBA8 buffer with bilinear upscaling.
///
/// Both the filter path and the CSS fallback blur in source space before upscaling, with the
/// radius converted from display to source pixels.
#[derive(Debug)]
pub struct PixmapDisplay {
    size: Canvas,
    data: Vec<u8>,
    filter_blur: bool,
    css_blur_px: u32,
    blits: u64,
    blur: GaussianBlur,
}

impl PixmapDisplay {
    /// Create a transparent display of `size` that supports the blur filter.
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            data: vec![0; size.rgba_len()],
            filter_blur: true,
            css_blur_px: 0,
            blits: 0,
            blur: GaussianBlur::new(),
        }
    }

    /// Toggle blur-filter support, to exercise the fallback path.
    pub fn with_filter_blur(mut self, supported: bool) -> Self {
        self.filter_blur = supported;
        self
    }

    /// Resize the display, clearing its contents.
    pub fn resize(&mut self, size: Canvas) {
        self.size = size;
        self.data.clear();
        self.data.resize(size.rgba_len(), 0);
    }

    /// Current pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Number of completed blits.
    pub fn blit_count(&self) -> u64 {
        self.blits
    }

    /// Surface-level blur currently requested by the engine.
    pub fn css_blur_px(&self) -> u32 {
        self.css_blur_px
    }
}

impl DisplaySurface for PixmapDisplay {
    fn size(&self) -> Canvas {
        self.size
    }

    fn supports_filter_blur(&self) -> bool {
        self.filter_blur
    }

    fn blit_upscaled(&mut self, src: BufferView<'_>, blur_px: Option<u32>) -> BlobscapeResult<()> {
        let expected = (src.width as usize)
            .saturating_mul(src.height as usize)
            .saturating_mul(4);
        if src.width == 0 || src.height == 0 || src.data.len() != expected {
            return Err(BlobscapeError::surface(
                "blit source does not match its dimensions",
            ));
        }
        let display_px = blur_px.unwrap_or(self.css_blur_px);
        let radius = (f64::from(display_px) * f64::from(src.width) / f64::from(self.size.width))
            .round() as u32;
        let pixels = self.blur.apply(src.data, src.width, src.height, radius)?;
        upscale_bilinear(pixels, src.width, src.height, &mut self.data, self.size);
        self.blits = self.blits.saturating_add(1);
        Ok(())
    }

    fn set_css_blur(&mut self, radius_px: u32) -> BlobscapeResult<()> {
        self.css_blur_px = radius_px;
        Ok(())
    }

    fn fill(&mut self, color: Rgba8Premul) -> BlobscapeResult<()> {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Ok(())
    }
}

fn upscale_bilinear(src: &[u8], sw: u32, sh: u32, dst: &mut [u8], size: Canvas) {
    let (dw, dh) = (size.width as usize, size.height as usize);
    let (sw_f, sh_f) = (f64::from(sw), f64::from(sh));
    let sample = |x: usize, y: usize, c: usize| -> f64 {
        f64::from(src[(y * sw as usize + x) * 4 + c])
    };
    for y in 0..dh {
        // Pixel-center mapping, clamped to the edge texels.
        let fy = (((y as f64) + 0.5) * sh_f / dh as f64 - 0.5).clamp(0.0, sh_f - 1.0);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(sh as usize - 1);
        let ty = fy - y0 as f64;
        for x in 0..dw {
            let fx = (((x as f64) + 0.5) * sw_f / dw as f64 - 0.5).clamp(0.0, sw_f - 1.0);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(sw as usize - 1);
            let tx = fx - x0 as f64;
            let out = (y * dw + x) * 4;
            for c in 0..4 {
                let top = sample(x0, y0, c) * (1.0 - tx) + sample(x1, y0, c) * tx;
                let bottom = sample(x0, y1, c) * (1.0 - tx) + sample(x1, y1, c) * tx;
                dst[out + c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/display.rs"]
mod tests;
