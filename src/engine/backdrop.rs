use crate::capability::probe::CapabilityProbe;
use crate::config::model::EngineConfig;
use crate::engine::host::{FrameHandle, FrameHost};
use crate::engine::scheduler::{Engine, Prepared};
use crate::engine::stats::FrameStats;
use crate::foundation::core::Rgba8Premul;
use crate::render::display::DisplaySurface;

/// Flat color painted by a backdrop that could not start.
pub const NEUTRAL_BACKGROUND: Rgba8Premul = Rgba8Premul {
    r: 18,
    g: 18,
    b: 22,
    a: 255,
};

/// A mounted background: a live engine, or a static neutral fill when construction failed.
///
/// Every method is safe to call in either state; the inert variant ignores them.
#[derive(Debug)]
pub enum Backdrop<D: DisplaySurface, H: FrameHost> {
    /// Animating.
    Live(Box<Engine<D, H>>),
    /// Construction failed; the display shows [`NEUTRAL_BACKGROUND`].
    Inert {
        /// The display, kept so the host can still show and resize it.
        display: D,
        /// The unused frame host.
        host: H,
    },
}

impl<D: DisplaySurface, H: FrameHost> Backdrop<D, H> {
    /// Build and start an engine. Configuration and surface failures are logged and yield an
    /// inert backdrop instead of an error.
    pub fn mount(cfg: EngineConfig, mut display: D, host: H, probe: CapabilityProbe) -> Self {
        match Prepared::new(cfg, &display) {
            Ok(prepared) => {
                let mut engine = Engine::assemble(prepared, display, host, probe);
                engine.start();
                Self::Live(Box::new(engine))
            }
            Err(err) => {
                tracing::error!(error = %err, "background animation disabled");
                if let Err(fill_err) = display.fill(NEUTRAL_BACKGROUND) {
                    tracing::error!(error = %fill_err, "could not paint neutral background");
                }
                Self::Inert { display, host }
            }
        }
    }

    /// Return `true` when construction failed.
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Inert { .. })
    }

    /// The live engine, if any.
    pub fn engine(&self) -> Option<&Engine<D, H>> {
        match self {
            Self::Live(e) => Some(e.as_ref()),
            Self::Inert { .. } => None,
        }
    }

    /// Mutable access to the live engine, if any.
    pub fn engine_mut(&mut self) -> Option<&mut Engine<D, H>> {
        match self {
            Self::Live(e) => Some(e.as_mut()),
            Self::Inert { .. } => None,
        }
    }

    /// The display being painted.
    pub fn display(&self) -> &D {
        match self {
            Self::Live(e) => e.display(),
            Self::Inert { display, .. } => display,
        }
    }

    /// Forward a frame callback.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        if let Self::Live(e) = self {
            e.on_frame(handle, now_ms);
        }
    }

    /// Forward a scroll value.
    pub fn on_scroll(&mut self, value: f64) {
        if let Self::Live(e) = self {
            e.on_scroll(value);
        }
    }

    /// Forward a resize notification.
    pub fn on_resize(&mut self, now_ms: f64) {
        if let Self::Live(e) = self {
            e.on_resize(now_ms);
        }
    }

    /// Tear the engine down. Idempotent.
    pub fn teardown(&mut self) {
        if let Self::Live(e) = self {
            e.teardown();
        }
    }

    /// Diagnostics; all zero for an inert backdrop.
    pub fn stats(&self) -> FrameStats {
        self.engine().map(Engine::stats).unwrap_or_default()
    }
}
