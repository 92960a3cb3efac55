use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{BlobscapeError, BlobscapeResult};
use crate::foundation::math::normalize_degrees;

/// One HSL color in palette space: `h` in degrees `[0, 360]`, `s` and `l` in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation in percent.
    pub s: f64,
    /// Lightness in percent.
    pub l: f64,
}

impl ColorStop {
    /// Construct a stop without validation.
    pub const fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Reject non-finite or out-of-range components.
    pub fn validate(&self) -> BlobscapeResult<()> {
        let in_range = |v: f64, hi: f64| v.is_finite() && (0.0..=hi).contains(&v);
        if !in_range(self.h, 360.0) {
            return Err(BlobscapeError::config(format!(
                "hue {} outside [0, 360]",
                self.h
            )));
        }
        if !in_range(self.s, 100.0) || !in_range(self.l, 100.0) {
            return Err(BlobscapeError::config(format!(
                "saturation/lightness ({}, {}) outside [0, 100]",
                self.s, self.l
            )));
        }
        Ok(())
    }

    /// Round to integer components with hue wrapped into `[0, 360)`.
    pub fn rounded(&self) -> HslColor {
        let h = normalize_degrees(self.h.round());
        HslColor {
            h: h as u16,
            s: self.s.round().clamp(0.0, 100.0) as u8,
            l: self.l.round().clamp(0.0, 100.0) as u8,
        }
    }
}

impl<'de> Deserialize<'de> for ColorStop {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Obj { h: f64, s: f64, l: f64 },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Obj { h, s, l } => Ok(Self::hsl(h, s, l)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::hsl(v[0], v[1], v[2]))
                } else {
                    Err(serde::de::Error::custom(
                        "color stop array must have len 3 ([h,s,l])",
                    ))
                }
            }
        }
    }
}

/// The two gradient endpoints at one point along a palette sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    /// Gradient start color.
    pub primary: ColorStop,
    /// Gradient end color.
    pub secondary: ColorStop,
}

impl ColorPair {
    /// Build a pair from two stops.
    pub const fn new(primary: ColorStop, secondary: ColorStop) -> Self {
        Self { primary, secondary }
    }
}

/// Integer HSL triple; the canonical form used for cache keys and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HslColor {
    /// Hue in `[0, 360)`.
    pub h: u16,
    /// Saturation in `[0, 100]`.
    pub s: u8,
    /// Lightness in `[0, 100]`.
    pub l: u8,
}

impl HslColor {
    /// Canonical `h,s,l` cache key.
    pub fn key(&self) -> String {
        format!("{},{},{}", self.h, self.s, self.l)
    }

    /// `hsl(h, s%, l%)` CSS form.
    pub fn css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }

    /// Opaque premultiplied RGBA8 for rasterization.
    pub fn to_rgba8(&self) -> Rgba8Premul {
        let (r, g, b) = hsl_to_rgb(
            f64::from(self.h),
            f64::from(self.s) / 100.0,
            f64::from(self.l) / 100.0,
        );
        let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul::from_straight_rgba(to_u8(r), to_u8(g), to_u8(b), 255)
    }
}

/// A formatted color string together with the integer triple it was formatted from.
///
/// Equality and hashing follow the canonical CSS text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorString {
    css: Arc<str>,
    hsl: HslColor,
}

impl ColorString {
    pub(crate) fn new(hsl: HslColor) -> Self {
        Self {
            css: Arc::from(hsl.css()),
            hsl,
        }
    }

    /// The canonical `hsl(h, s%, l%)` text.
    pub fn as_str(&self) -> &str {
        &self.css
    }

    /// The integer triple.
    pub fn hsl(&self) -> HslColor {
        self.hsl
    }

    /// Return `true` when both values share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.css, &other.css)
    }
}

impl fmt::Display for ColorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = normalize_degrees(h) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}
