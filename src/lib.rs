//! Blobscape is an adaptive blob-animation engine for scroll-reactive gradient backdrops.
//!
//! A fixed set of organic outlines is filled with palette gradients into a small off-screen
//! buffer, which is blurred and upscaled onto a caller-supplied display:
//!
//! - Classify the host into a [`PerformanceTier`] off the render path
//! - Build an [`Engine`] (or mount a forgiving [`Backdrop`]) over a [`DisplaySurface`]
//! - Drive it from a [`FrameHost`] and feed it scroll values
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capability;
mod config;
mod engine;
mod foundation;
mod palette;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{BlobscapeError, BlobscapeResult};

pub use crate::capability::classifier::{
    CapabilityReport, DEFAULT_LOGICAL_CORES, DEFAULT_MEMORY_GB, PerformanceTier, classify,
};
pub use crate::capability::probe::{
    CapabilityProbe, CapabilitySource, StaticCapabilitySource, SystemCapabilitySource, detect_tier,
};
pub use crate::config::model::{
    BlobConfig, DirtyConfig, EngineConfig, MAX_BLOB_SIZE_PX, MAX_BLOBS_LIMIT, MomentumConfig,
    ScrollConfig,
};
pub use crate::config::tiers::{TierProfile, TierTable};
pub use crate::engine::backdrop::{Backdrop, NEUTRAL_BACKGROUND};
pub use crate::engine::host::{FrameHandle, FrameHost, ManualFrameHost};
pub use crate::engine::scheduler::{Engine, EngineState};
pub use crate::engine::scroll::{ScrollCoupling, ScrollCouplingState, positional_weight};
pub use crate::engine::stats::FrameStats;
pub use crate::palette::color::{ColorPair, ColorStop, ColorString, HslColor};
pub use crate::palette::ramp::{PaletteRamp, RampEntry};
pub use crate::render::cache::{
    CacheStats, ColorCache, GradientCache, GradientKey, PathCache, RenderCache, RenderCaches,
};
pub use crate::render::dirty::{
    BlobSnapshot, DirtyFrame, DirtyRegion, DirtyTracker, blob_box, merge_regions,
};
pub use crate::render::display::{BufferView, DisplaySurface, PixmapDisplay};
pub use crate::render::gradient::GradientHandle;
pub use crate::render::surface::{
    BlurMode, RenderSurfaceManager, SurfaceChanged, SurfaceListener, buffer_size_for,
};
pub use crate::scene::blob::Blob;
pub use crate::scene::outlines::{BUILTIN_OUTLINES, OUTLINE_BOX};
pub use crate::scene::per_item::{PerItem, resolve_per_item};
