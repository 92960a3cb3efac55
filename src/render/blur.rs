use crate::foundation::error::{BlobscapeError, BlobscapeResult};

/// Separable Gaussian blur over premultiplied RGBA8 with reusable scratch buffers.
///
/// The Q16 kernel is rebuilt only when the radius changes.
#[derive(Debug, Default)]
pub(crate) struct GaussianBlur {
    radius: u32,
    kernel: Vec<u32>,
    tmp: Vec<u8>,
    out: Vec<u8>,
}

impl GaussianBlur {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blur `src` and return a view of the result. Radius 0 copies the input.
    pub(crate) fn apply(
        &mut self,
        src: &[u8],
        width: u32,
        height: u32,
        radius: u32,
    ) -> BlobscapeResult<&[u8]> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| BlobscapeError::render("blur buffer size overflow"))?;
        if src.len() != expected_len {
            return Err(BlobscapeError::render(
                "blur expects src matching width*height*4",
            ));
        }
        self.out.resize(expected_len, 0);
        if radius == 0 || width == 0 || height == 0 {
            self.out.copy_from_slice(src);
            return Ok(&self.out);
        }
        if self.kernel.is_empty() || self.radius != radius {
            self.kernel = gaussian_kernel_q16(radius, radius as f32 * 0.5)?;
            self.radius = radius;
        }
        self.tmp.resize(expected_len, 0);

        horizontal_pass(src, &mut self.tmp, width, height, &self.kernel);
        vertical_pass(&self.tmp, &mut self.out, width, height, &self.kernel);
        Ok(&self.out)
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BlobscapeResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BlobscapeError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(BlobscapeError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Push the rounding residue into the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
