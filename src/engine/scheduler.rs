use std::collections::HashSet;
use std::sync::Arc;

use crate::capability::classifier::PerformanceTier;
use crate::capability::probe::CapabilityProbe;
use crate::config::model::EngineConfig;
use crate::config::tiers::TierProfile;
use crate::engine::host::{FrameHandle, FrameHost, ManualFrameHost};
use crate::engine::momentum::Momentum;
use crate::engine::scroll::{ScrollCoupling, ScrollCouplingState};
use crate::engine::stats::FrameStats;
use crate::foundation::error::BlobscapeResult;
use crate::foundation::math::normalize_degrees;
use crate::palette::color::ColorPair;
use crate::palette::ramp::PaletteRamp;
use crate::render::cache::RenderCaches;
use crate::render::dirty::{BlobSnapshot, DirtyTracker};
use crate::render::display::DisplaySurface;
use crate::render::draw::draw_blobs;
use crate::render::surface::RenderSurfaceManager;
use crate::scene::blob::{Blob, apply_overrides, generate_blobs};
use crate::scene::outlines::outline_set;
use crate::scene::per_item::PerItem;

/// Callbacks arriving this close to the frame interval still run.
const FRAME_SLACK_MS: f64 = 1.0;

/// Longest physics step; longer gaps (a backgrounded host) are clamped.
const MAX_STEP_SECS: f64 = 0.25;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// The per-frame loop is live.
    Running,
    /// The loop is cancelled and caches are released.
    TornDown,
}

/// Everything construction can fail on, built without taking ownership of the display.
pub(crate) struct Prepared {
    cfg: EngineConfig,
    surface: RenderSurfaceManager,
    caches: RenderCaches,
    outlines: Vec<Arc<str>>,
    ramp: Arc<PaletteRamp>,
}

impl Prepared {
    #[tracing::instrument(skip_all)]
    pub(crate) fn new(cfg: EngineConfig, display: &dyn DisplaySurface) -> BlobscapeResult<Self> {
        cfg.validate()?;
        let surface = RenderSurfaceManager::new(display, cfg.buffer_px)?;
        let mut caches = RenderCaches::new(surface.generation());
        let ramp = Arc::new(PaletteRamp::build(
            &cfg.palette,
            cfg.ramp_len,
            &mut caches.colors,
        )?);
        let outlines = outline_set(&cfg.blob.outlines);
        Ok(Self {
            cfg,
            surface,
            caches,
            outlines,
            ramp,
        })
    }
}

/// The animation scheduler: owns the blobs, caches, off-screen buffer and display, and advances
/// them once per host frame callback.
///
/// All state lives in fields read fresh on every callback. Scroll and override updates only
/// write targets; blob regeneration replaces the whole collection between frames.
pub struct Engine<D: DisplaySurface, H: FrameHost> {
    cfg: EngineConfig,
    display: D,
    host: H,
    state: EngineState,
    handle: Option<FrameHandle>,
    last_frame_ms: Option<f64>,

    tier: PerformanceTier,
    profile: TierProfile,
    probe: CapabilityProbe,

    outlines: Vec<Arc<str>>,
    ramp: Arc<PaletteRamp>,
    blobs: Vec<Blob>,
    snapshots: Vec<BlobSnapshot>,
    momentum: Momentum,
    scroll: ScrollCoupling,

    surface: RenderSurfaceManager,
    caches: RenderCaches,
    dirty: DirtyTracker,
    resize_due_ms: Option<f64>,
    present_pending: bool,
    failed_blobs: HashSet<usize>,
    stats: FrameStats,
}

impl<D: DisplaySurface, H: FrameHost> std::fmt::Debug for Engine<D, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("tier", &self.tier)
            .field("blobs", &self.blobs.len())
            .field("handle", &self.handle)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<D: DisplaySurface, H: FrameHost> Engine<D, H> {
    /// Validate `cfg`, build the off-screen buffer for `display`, and generate the medium-tier
    /// scene. `probe` supplies the real tier later; it is polled once per frame.
    ///
    /// The loop does not run until [`Engine::start`].
    pub fn new(
        cfg: EngineConfig,
        display: D,
        host: H,
        probe: CapabilityProbe,
    ) -> BlobscapeResult<Self> {
        let prepared = Prepared::new(cfg, &display)?;
        Ok(Self::assemble(prepared, display, host, probe))
    }

    pub(crate) fn assemble(
        prepared: Prepared,
        display: D,
        host: H,
        probe: CapabilityProbe,
    ) -> Self {
        let Prepared {
            cfg,
            surface,
            caches,
            outlines,
            ramp,
        } = prepared;
        let tier = PerformanceTier::Medium;
        let profile = cfg.tiers.profile(tier);
        let mut engine = Self {
            momentum: Momentum::new(&cfg.momentum),
            scroll: ScrollCoupling::new(cfg.scroll, cfg.momentum.transfer),
            dirty: DirtyTracker::new(cfg.dirty),
            cfg,
            display,
            host,
            state: EngineState::Running,
            handle: None,
            last_frame_ms: None,
            tier,
            profile,
            probe,
            outlines,
            ramp,
            blobs: Vec::new(),
            snapshots: Vec::new(),
            surface,
            caches,
            resize_due_ms: None,
            present_pending: false,
            failed_blobs: HashSet::new(),
            stats: FrameStats::default(),
        };
        engine.regenerate();
        tracing::info!(
            blobs = engine.blobs.len(),
            buffer_w = engine.surface.size().width,
            buffer_h = engine.surface.size().height,
            "engine ready"
        );
        engine
    }

    /// Schedule the first frame. No-op when already scheduled or torn down.
    pub fn start(&mut self) {
        if self.state == EngineState::TornDown || self.handle.is_some() {
            return;
        }
        self.handle = Some(self.host.request_frame());
    }

    /// Host frame callback for `handle` at host time `now_ms`.
    ///
    /// Stale handles and callbacks after teardown are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        if self.state == EngineState::TornDown || self.handle != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame callback");
            return;
        }
        self.handle = None;

        if let Some(tier) = self.probe.poll() {
            self.apply_tier(tier);
        }
        self.flush_resize(now_ms);

        let elapsed_ms = match self.last_frame_ms {
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed + FRAME_SLACK_MS < self.profile.frame_interval_ms() {
                    self.stats.frames_throttled += 1;
                    self.reschedule();
                    return;
                }
                elapsed
            }
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        self.step((elapsed_ms / 1000.0).clamp(0.0, MAX_STEP_SECS));
        self.render();
        self.stats.frames_rendered += 1;
        self.stats.record_interval(elapsed_ms);
        self.reschedule();
    }

    /// Feed one normalized scroll value.
    pub fn on_scroll(&mut self, value: f64) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.scroll.update(value, &mut self.blobs, self.ramp.len());
    }

    /// Note that the display changed size at host time `now_ms`. Bursts coalesce into one buffer
    /// replacement, applied on the first frame after the debounce window.
    pub fn on_resize(&mut self, now_ms: f64) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.resize_due_ms = Some(now_ms + self.cfg.resize_debounce_ms);
    }

    /// Switch to `tier`'s profile, regenerating the blobs when the count changes.
    pub fn apply_tier(&mut self, tier: PerformanceTier) {
        if self.state == EngineState::TornDown {
            return;
        }
        let profile = self.cfg.tiers.profile(tier);
        let count_changed = profile.blob_count(self.cfg.max_blobs) != self.blobs.len();
        tracing::info!(%tier, from = %self.tier, "applying performance tier");
        self.tier = tier;
        self.profile = profile;
        if count_changed {
            self.regenerate();
        }
    }

    /// Replace the palette and regenerate the blobs. An invalid palette is logged and ignored;
    /// the return value reports whether it was applied.
    pub fn set_palette(&mut self, pairs: Vec<ColorPair>) -> bool {
        if self.state == EngineState::TornDown {
            return false;
        }
        match PaletteRamp::build(&pairs, self.cfg.ramp_len, &mut self.caches.colors) {
            Ok(ramp) => {
                self.cfg.palette = pairs;
                self.ramp = Arc::new(ramp);
                self.scroll.reselect(self.ramp.len());
                self.regenerate();
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "rejected palette; keeping the current one");
                false
            }
        }
    }

    /// Replace the rotation overrides in place, keeping accumulated rotation.
    pub fn set_rotation_overrides(&mut self, rotations: Option<PerItem<f64>>) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.cfg.rotations = rotations;
        apply_overrides(
            &mut self.blobs,
            self.cfg.positions.as_ref(),
            self.cfg.rotations.as_ref(),
        );
    }

    /// Replace the position overrides (normalized buffer coordinates) in place.
    pub fn set_position_overrides(&mut self, positions: Option<PerItem<[f64; 2]>>) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.cfg.positions = positions;
        apply_overrides(
            &mut self.blobs,
            self.cfg.positions.as_ref(),
            self.cfg.rotations.as_ref(),
        );
    }

    /// Cancel the scheduled frame, clear every cache and pending timer. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == EngineState::TornDown {
            return;
        }
        if let Some(handle) = self.handle.take() {
            self.host.cancel_frame(handle);
        }
        self.caches.clear();
        self.resize_due_ms = None;
        self.probe.cancel();
        self.state = EngineState::TornDown;
        tracing::info!(frames = self.stats.frames_rendered, "engine torn down");
    }

    /// Lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The outstanding frame request, if any.
    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.handle
    }

    /// Active performance tier.
    pub fn tier(&self) -> PerformanceTier {
        self.tier
    }

    /// Current blob collection.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Current palette ramp.
    pub fn ramp(&self) -> &Arc<PaletteRamp> {
        &self.ramp
    }

    /// Scroll-derived targets.
    pub fn scroll_state(&self) -> &ScrollCouplingState {
        self.scroll.state()
    }

    /// Diagnostics snapshot.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            tier: self.tier,
            blob_count: self.blobs.len(),
            ..self.stats
        }
    }

    /// Instance-scoped render caches.
    pub fn caches(&self) -> &RenderCaches {
        &self.caches
    }

    /// Off-screen buffer manager.
    pub fn surface(&self) -> &RenderSurfaceManager {
        &self.surface
    }

    /// Display the engine composes into.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable display access, e.g. to resize it before calling [`Engine::on_resize`].
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Frame host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable frame host access.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn reschedule(&mut self) {
        self.handle = Some(self.host.request_frame());
    }

    #[tracing::instrument(skip(self), fields(tier = %self.tier))]
    fn regenerate(&mut self) {
        let count = self.profile.blob_count(self.cfg.max_blobs);
        let mut blobs = generate_blobs(count, &self.ramp, &self.outlines, &self.cfg.blob);
        apply_overrides(
            &mut blobs,
            self.cfg.positions.as_ref(),
            self.cfg.rotations.as_ref(),
        );
        self.scroll.retarget(&mut blobs);
        self.blobs = blobs;
        self.dirty.reset();
        self.failed_blobs.clear();
        tracing::debug!(count, "generated blobs");
    }

    fn flush_resize(&mut self, now_ms: f64) {
        let Some(due) = self.resize_due_ms else {
            return;
        };
        if now_ms < due {
            return;
        }
        self.resize_due_ms = None;
        self.present_pending = true;
        match self.surface.resize(&self.display, &mut self.caches) {
            Ok(Some(_)) => self.dirty.reset(),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "keeping the current buffer after a failed resize")
            }
        }
    }

    fn step(&mut self, dt: f64) {
        let factor = self.momentum.factor(dt);
        for blob in &mut self.blobs {
            blob.rotation_deg = normalize_degrees(blob.rotation_deg + blob.current_speed * dt);
            blob.current_speed = self
                .momentum
                .approach(blob.current_speed, blob.target_speed, factor);
        }
        let s = self.scroll.state_mut();
        s.current_vertical_offset =
            self.momentum
                .approach(s.current_vertical_offset, s.target_vertical_offset, factor);
    }

    fn render(&mut self) {
        let buffer = self.surface.size();
        let offset = self.scroll.state().current_vertical_offset;
        let color_index = self.scroll.state().selected_color_index;
        self.snapshots.clear();
        for blob in &self.blobs {
            self.snapshots.push(BlobSnapshot {
                center: blob.center(buffer, offset),
                rotation_deg: blob.draw_rotation(),
                size: blob.render_size(&self.cfg.blob),
                color_index,
            });
        }

        let frame = self.dirty.track(&self.snapshots, buffer);
        self.stats.dirty_regions = frame.merged.len();
        if frame.is_clean() {
            self.stats.frames_clean += 1;
            if !self.present_pending {
                return;
            }
        } else {
            if frame.full_redraw {
                self.stats.full_clears += 1;
            }
            let (blobs, snapshots, caches) = (&self.blobs, &self.snapshots, &mut self.caches);
            let outcome = self
                .surface
                .draw_scene(|ctx| draw_blobs(ctx, blobs, snapshots, caches));
            self.surface.commit(frame);
            for (index, err) in outcome.failed {
                self.stats.blob_errors += 1;
                if self.failed_blobs.insert(index) {
                    tracing::warn!(blob = index, error = %err, "skipping blob");
                } else {
                    tracing::trace!(blob = index, error = %err, "skipping blob");
                }
            }
        }

        match self.surface.present(&mut self.display, self.profile.blur_px) {
            Ok(()) => self.present_pending = false,
            Err(err) => {
                self.stats.present_errors += 1;
                if self.stats.present_errors == 1 {
                    tracing::warn!(error = %err, "blit onto display failed");
                }
            }
        }
    }
}

impl<D: DisplaySurface> Engine<D, ManualFrameHost> {
    /// Fire the pending frame callback at `now_ms`. Returns `false` when nothing was scheduled.
    pub fn run_pending(&mut self, now_ms: f64) -> bool {
        match self.host.take_pending() {
            Some(handle) => {
                self.on_frame(handle, now_ms);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;
