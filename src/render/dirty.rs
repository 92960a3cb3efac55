use crate::config::model::DirtyConfig;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::math::angle_distance;

/// Axis-aligned rectangle in off-screen buffer pixels that must be redrawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyRegion {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub width: f64,
    /// Height, `>= 0`.
    pub height: f64,
}

impl DirtyRegion {
    /// Region covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
        }
    }

    /// The region as a `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Covered area.
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Area shared with `other`.
    pub fn intersection_area(self, other: Self) -> f64 {
        let i = self.to_rect().intersect(other.to_rect());
        i.width().max(0.0) * i.height().max(0.0)
    }

    /// Smallest region covering both.
    pub fn union(self, other: Self) -> Self {
        Self::from_rect(self.to_rect().union(other.to_rect()))
    }

    /// Return `true` when `other` lies entirely inside `self`.
    pub fn contains(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Integer pixel span `(x0, y0, x1, y1)` covering the region, clamped to `bounds`.
    pub fn pixel_span(self, bounds: Canvas) -> (u32, u32, u32, u32) {
        let clamp = |v: f64, hi: u32| v.clamp(0.0, f64::from(hi)) as u32;
        (
            clamp(self.x.floor(), bounds.width),
            clamp(self.y.floor(), bounds.height),
            clamp((self.x + self.width).ceil(), bounds.width),
            clamp((self.y + self.height).ceil(), bounds.height),
        )
    }
}

/// Geometry of one blob as drawn in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobSnapshot {
    /// Draw center in buffer pixels.
    pub center: Point,
    /// Draw rotation in degrees.
    pub rotation_deg: f64,
    /// Rendered size in buffer pixels.
    pub size: f64,
    /// Ramp index the blob was colored with.
    pub color_index: usize,
}

/// What a frame has to clear and redraw.
#[derive(Debug, Default)]
pub struct DirtyFrame {
    /// Clear and redraw the whole buffer.
    pub full_redraw: bool,
    /// Old and new boxes of every changed blob, before merging.
    pub contributions: Vec<DirtyRegion>,
    /// Merged regions to clear and redraw.
    pub merged: Vec<DirtyRegion>,
}

impl DirtyFrame {
    /// Return `true` when nothing needs to be redrawn.
    pub fn is_clean(&self) -> bool {
        !self.full_redraw && self.merged.is_empty()
    }
}

/// Per-blob change tracking against the state each blob was last drawn in.
#[derive(Debug)]
pub struct DirtyTracker {
    cfg: DirtyConfig,
    committed: Vec<BlobSnapshot>,
    needs_full: bool,
    frame: DirtyFrame,
}

impl DirtyTracker {
    /// Create a tracker whose first frame is a full redraw.
    pub fn new(cfg: DirtyConfig) -> Self {
        Self {
            cfg,
            committed: Vec::new(),
            needs_full: true,
            frame: DirtyFrame::default(),
        }
    }

    /// Force the next frame to be a full redraw (blob regeneration, buffer replacement).
    pub fn reset(&mut self) {
        self.needs_full = true;
        self.committed.clear();
    }

    /// Compare `current` against the committed state and plan this frame's redraw.
    ///
    /// A blob counts as changed when its rotation moved more than the rotation threshold, its
    /// center moved more than the position threshold on either axis, or its ramp color changed.
    /// Changed blobs contribute their committed and current boxes and become the new committed
    /// state; unchanged blobs keep their committed state, so slow drift still accumulates.
    pub fn track(&mut self, current: &[BlobSnapshot], bounds: Canvas) -> &DirtyFrame {
        self.frame.contributions.clear();
        self.frame.merged.clear();
        self.frame.full_redraw = false;

        if self.needs_full || self.committed.len() != current.len() {
            self.committed.clear();
            self.committed.extend_from_slice(current);
            self.needs_full = false;
            self.frame.full_redraw = true;
            return &self.frame;
        }

        for (prev, cur) in self.committed.iter_mut().zip(current) {
            let rotated = angle_distance(prev.rotation_deg, cur.rotation_deg)
                > self.cfg.rotation_threshold_deg;
            let moved = (prev.center.x - cur.center.x).abs() > self.cfg.position_threshold_px
                || (prev.center.y - cur.center.y).abs() > self.cfg.position_threshold_px;
            let recolored = prev.color_index != cur.color_index || prev.size != cur.size;
            if !(rotated || moved || recolored) {
                continue;
            }
            for snap in [*prev, *cur] {
                if let Some(r) = blob_box(&snap, self.cfg.padding_px, bounds) {
                    self.frame.contributions.push(r);
                }
            }
            *prev = *cur;
        }

        self.frame
            .merged
            .extend_from_slice(&self.frame.contributions);
        merge_regions(&mut self.frame.merged, self.cfg.merge_overlap);
        &self.frame
    }
}

/// Box centered on the blob with `size + padding` half-extents, clamped to `bounds`.
///
/// Returns `None` when the box lies entirely outside the buffer.
pub fn blob_box(snap: &BlobSnapshot, padding: f64, bounds: Canvas) -> Option<DirtyRegion> {
    let half = snap.size + padding;
    let rect = Rect::new(
        snap.center.x - half,
        snap.center.y - half,
        snap.center.x + half,
        snap.center.y + half,
    )
    .intersect(bounds.bounds());
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(DirtyRegion::from_rect(rect))
}

/// Greedily fold regions whose overlap exceeds `overlap` of either region's area.
///
/// Folding replaces two regions with their union, so every input stays covered.
pub fn merge_regions(regions: &mut Vec<DirtyRegion>, overlap: f64) {
    let mut i = 0;
    while i < regions.len() {
        let mut grew = false;
        let mut j = i + 1;
        while j < regions.len() {
            let (a, b) = (regions[i], regions[j]);
            let shared = a.intersection_area(b);
            if shared > overlap * a.area() || shared > overlap * b.area() {
                regions[i] = a.union(b);
                regions.swap_remove(j);
                grew = true;
            } else {
                j += 1;
            }
        }
        // A grown region may now overlap ones it was already checked against.
        if !grew {
            i += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dirty.rs"]
mod tests;
