use std::ops::Index;

use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::foundation::math::{lerp, lerp_hue};
use crate::palette::color::{ColorPair, ColorStop, ColorString, HslColor};
use crate::render::cache::ColorCache;

/// One ramp step: the two gradient endpoints as canonical color strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampEntry {
    /// Gradient start.
    pub a: ColorString,
    /// Gradient end.
    pub b: ColorString,
}

/// Precomputed, fixed-length sequence of interpolated color pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRamp {
    entries: Vec<RampEntry>,
}

impl PaletteRamp {
    /// Interpolate `pairs` into a ramp of `len` entries.
    ///
    /// A single pair produces a one-entry ramp regardless of `len`. Otherwise `len` must be at
    /// least the number of pairs, so every pair owns a step. Color strings are obtained through
    /// `colors`, so equal triples share one formatted string.
    pub fn build(
        pairs: &[ColorPair],
        len: usize,
        colors: &mut ColorCache,
    ) -> BlobscapeResult<Self> {
        let Some(first) = pairs.first() else {
            return Err(BlobscapeError::config("palette needs at least one color pair"));
        };
        for (i, p) in pairs.iter().enumerate() {
            p.primary
                .validate()
                .and_then(|_| p.secondary.validate())
                .map_err(|e| BlobscapeError::config(format!("palette pair {i}: {e}")))?;
        }

        if pairs.len() == 1 {
            let entry = entry_for(colors, first.primary.rounded(), first.secondary.rounded());
            return Ok(Self {
                entries: vec![entry],
            });
        }
        if len < pairs.len() {
            return Err(BlobscapeError::config(format!(
                "ramp length {len} cannot hold {} pairs",
                pairs.len()
            )));
        }

        let segments = pairs.len() - 1;
        let last_step = len - 1;
        let mut entries = Vec::with_capacity(len);
        for seg in 0..segments {
            // Segment `seg` owns steps [start, end); the final boundary is emitted once at the end.
            let start = seg * last_step / segments;
            let end = (seg + 1) * last_step / segments;
            let steps = end - start;
            let (p0, p1) = (&pairs[seg], &pairs[seg + 1]);
            for k in 0..steps {
                let mix = k as f64 / steps as f64;
                let a = mix_stop(&p0.primary, &p1.primary, mix);
                let b = mix_stop(&p0.secondary, &p1.secondary, mix);
                entries.push(entry_for(colors, a, b));
            }
        }
        let tail = &pairs[segments];
        entries.push(entry_for(
            colors,
            tail.primary.rounded(),
            tail.secondary.rounded(),
        ));
        debug_assert_eq!(entries.len(), len);

        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; ramps hold at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, clamped into range.
    pub fn at_clamped(&self, index: usize) -> &RampEntry {
        let i = index.min(self.entries.len().saturating_sub(1));
        &self.entries[i]
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &RampEntry> {
        self.entries.iter()
    }
}

impl Index<usize> for PaletteRamp {
    type Output = RampEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

fn mix_stop(from: &ColorStop, to: &ColorStop, mix: f64) -> HslColor {
    ColorStop::hsl(
        lerp_hue(from.h, to.h, mix),
        lerp(from.s, to.s, mix),
        lerp(from.l, to.l, mix),
    )
    .rounded()
}

fn entry_for(colors: &mut ColorCache, a: HslColor, b: HslColor) -> RampEntry {
    RampEntry {
        a: colors.get(a, || ColorString::new(a)),
        b: colors.get(b, || ColorString::new(b)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/ramp.rs"]
mod tests;
