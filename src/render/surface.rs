use crate::foundation::core::Canvas;
use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::render::dirty::DirtyFrame;
use crate::render::display::{BufferView, DisplaySurface};

/// Emitted whenever the off-screen buffer is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceChanged {
    /// Generation of the new buffer.
    pub generation: u64,
    /// Size of the new buffer.
    pub buffer: Canvas,
}

/// Observer of off-screen buffer replacement.
pub trait SurfaceListener {
    /// Called after the buffer has been replaced.
    fn on_surface_changed(&mut self, event: &SurfaceChanged);
}

/// How blur reaches the display, decided once from the display's feature probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurMode {
    /// The display blurs during the blit.
    Filter,
    /// The display cannot filter; a surface-level blur is set instead.
    CssFallback,
}

/// Off-screen buffer size for a display: the short side is `buffer_px`, the long side follows
/// the display aspect ratio, capped at four times the short side.
pub fn buffer_size_for(display: Canvas, buffer_px: u32) -> Canvas {
    let aspect = display.aspect();
    let long = |r: f64| ((f64::from(buffer_px) * r).round() as u32).clamp(buffer_px, buffer_px * 4);
    if aspect >= 1.0 {
        Canvas {
            width: long(aspect),
            height: buffer_px,
        }
    } else {
        Canvas {
            width: buffer_px,
            height: long(1.0 / aspect),
        }
    }
}

/// Owns the low-resolution off-screen buffer and its composition onto the display.
///
/// Blobs are rasterized into a scratch pixmap each drawn frame; only dirty regions are copied
/// into the persistent buffer, which is then upscaled onto the display.
pub struct RenderSurfaceManager {
    buffer_px: u32,
    size: Canvas,
    generation: u64,
    offscreen: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    blur_mode: BlurMode,
    css_blur_px: Option<u32>,
}

impl std::fmt::Debug for RenderSurfaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurfaceManager")
            .field("size", &self.size)
            .field("generation", &self.generation)
            .field("blur_mode", &self.blur_mode)
            .finish()
    }
}

impl RenderSurfaceManager {
    /// Build the buffer for `display` and probe its blur support.
    pub fn new(display: &dyn DisplaySurface, buffer_px: u32) -> BlobscapeResult<Self> {
        let display_size = display.size();
        Canvas::new(display_size.width, display_size.height)?;
        let size = buffer_size_for(display_size, buffer_px);
        let blur_mode = if display.supports_filter_blur() {
            BlurMode::Filter
        } else {
            tracing::info!("display has no blur filter; using surface-level blur");
            BlurMode::CssFallback
        };
        Ok(Self {
            buffer_px,
            size,
            generation: 0,
            offscreen: new_pixmap(size)?,
            scratch: new_pixmap(size)?,
            ctx: None,
            blur_mode,
            css_blur_px: None,
        })
    }

    /// Current buffer size.
    pub fn size(&self) -> Canvas {
        self.size
    }

    /// Current buffer generation; bumps on every replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Blur strategy chosen at construction.
    pub fn blur_mode(&self) -> BlurMode {
        self.blur_mode
    }

    /// Persistent buffer contents.
    pub fn view(&self) -> BufferView<'_> {
        BufferView {
            width: self.size.width,
            height: self.size.height,
            data: self.offscreen.data_as_u8_slice(),
        }
    }

    /// Replace the buffer if `display` now needs a different size, notifying `listener`.
    #[tracing::instrument(skip(self, display, listener))]
    pub fn resize(
        &mut self,
        display: &dyn DisplaySurface,
        listener: &mut dyn SurfaceListener,
    ) -> BlobscapeResult<Option<SurfaceChanged>> {
        let display_size = display.size();
        Canvas::new(display_size.width, display_size.height)?;
        let size = buffer_size_for(display_size, self.buffer_px);
        if size == self.size {
            return Ok(None);
        }
        self.offscreen = new_pixmap(size)?;
        self.scratch = new_pixmap(size)?;
        self.ctx = None;
        self.size = size;
        self.generation = self.generation.wrapping_add(1);

        let event = SurfaceChanged {
            generation: self.generation,
            buffer: size,
        };
        tracing::debug!(
            width = size.width,
            height = size.height,
            generation = self.generation,
            "replaced off-screen buffer"
        );
        listener.on_surface_changed(&event);
        Ok(Some(event))
    }

    /// Rasterize a whole scene into the scratch pixmap.
    pub(crate) fn draw_scene<R>(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let (w, h) = (self.size.width as u16, self.size.height as u16);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        let out = f(&mut ctx);
        ctx.flush();
        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);
        self.ctx = Some(ctx);
        out
    }

    /// Copy the scratch raster into the persistent buffer: everywhere on a full redraw,
    /// otherwise only inside the merged dirty regions.
    pub(crate) fn commit(&mut self, dirty: &DirtyFrame) {
        let src = self.scratch.data_as_u8_slice();
        let dst = self.offscreen.data_as_u8_slice_mut();
        if dirty.full_redraw {
            dst.copy_from_slice(src);
            return;
        }
        let stride = self.size.width as usize * 4;
        for region in &dirty.merged {
            let (x0, y0, x1, y1) = region.pixel_span(self.size);
            if x1 <= x0 {
                continue;
            }
            for y in y0 as usize..y1 as usize {
                let a = y * stride + x0 as usize * 4;
                let b = y * stride + x1 as usize * 4;
                dst[a..b].copy_from_slice(&src[a..b]);
            }
        }
    }

    /// Upscale the persistent buffer onto `display` with `blur_px` of blur.
    pub(crate) fn present(
        &mut self,
        display: &mut dyn DisplaySurface,
        blur_px: u32,
    ) -> BlobscapeResult<()> {
        let filter = match self.blur_mode {
            BlurMode::Filter => Some(blur_px),
            BlurMode::CssFallback => {
                if self.css_blur_px != Some(blur_px) {
                    display.set_css_blur(blur_px)?;
                    self.css_blur_px = Some(blur_px);
                }
                None
            }
        };
        display.blit_upscaled(self.view(), filter)
    }
}

fn new_pixmap(size: Canvas) -> BlobscapeResult<vello_cpu::Pixmap> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| BlobscapeError::surface("buffer width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| BlobscapeError::surface("buffer height exceeds u16"))?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
