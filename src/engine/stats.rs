use crate::capability::classifier::PerformanceTier;

/// Smoothing applied to the achieved frame-rate estimate.
const FPS_EMA_ALPHA: f64 = 0.1;

/// Development-time diagnostics for one engine instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FrameStats {
    /// Tier whose profile is active.
    pub tier: PerformanceTier,
    /// Blobs in the current scene.
    pub blob_count: usize,
    /// Frames that ran the physics step.
    pub frames_rendered: u64,
    /// Callbacks rescheduled without work because the tier interval had not elapsed.
    pub frames_throttled: u64,
    /// Rendered frames with nothing to redraw; drawing and the blit were skipped.
    pub frames_clean: u64,
    /// Rendered frames that cleared and redrew the whole buffer.
    pub full_clears: u64,
    /// Merged dirty regions redrawn by the last rendered frame.
    pub dirty_regions: usize,
    /// Blob draws skipped because preparation failed.
    pub blob_errors: u64,
    /// Failed blits onto the display.
    pub present_errors: u64,
    /// Exponential moving average of executed frames per second.
    pub achieved_fps: f64,
}

impl FrameStats {
    pub(crate) fn record_interval(&mut self, elapsed_ms: f64) {
        if !(elapsed_ms.is_finite() && elapsed_ms > 0.0) {
            return;
        }
        let fps = 1000.0 / elapsed_ms;
        self.achieved_fps = if self.achieved_fps == 0.0 {
            fps
        } else {
            self.achieved_fps + (fps - self.achieved_fps) * FPS_EMA_ALPHA
        };
    }
}
