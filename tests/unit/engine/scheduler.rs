use super::*;
use crate::foundation::core::Canvas;
use crate::render::display::PixmapDisplay;

fn display() -> PixmapDisplay {
    PixmapDisplay::new(Canvas::new(320, 180).unwrap())
}

fn engine_with(cfg: EngineConfig, tier: PerformanceTier) -> Engine<PixmapDisplay, ManualFrameHost> {
    let mut e = Engine::new(cfg, display(), ManualFrameHost::new(), CapabilityProbe::resolved(tier))
        .unwrap();
    e.start();
    e
}

fn still_config() -> EngineConfig {
    let mut cfg = EngineConfig::default();
    cfg.blob.speed_min = 0.0;
    cfg.blob.speed_max = 0.0;
    cfg.blob.speed_jitter = 0.0;
    cfg
}

#[test]
fn starts_at_medium_until_the_probe_resolves() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::High);
    assert_eq!(e.tier(), PerformanceTier::Medium);
    assert_eq!(e.blobs().len(), 9);
    assert!(e.run_pending(0.0));
    assert_eq!(e.tier(), PerformanceTier::High);
    assert_eq!(e.blobs().len(), 12);
}

#[test]
fn tier_table_drives_blob_count() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::Medium);
    for (tier, n) in [
        (PerformanceTier::Low, 6),
        (PerformanceTier::Medium, 9),
        (PerformanceTier::High, 12),
    ] {
        e.apply_tier(tier);
        assert_eq!(e.blobs().len(), n);
        assert_eq!(e.stats().blob_count, n);
    }
}

#[test]
fn callbacks_inside_the_frame_interval_do_no_work() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::High);
    for t in [0.0, 5.0, 10.0, 17.0] {
        assert!(e.run_pending(t));
    }
    let s = e.stats();
    assert_eq!(s.frames_rendered, 2);
    assert_eq!(s.frames_throttled, 2);
    assert!(e.frame_handle().is_some());
}

#[test]
fn teardown_is_total_and_idempotent() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::High);
    e.run_pending(0.0);
    let handle = e.frame_handle().unwrap();
    assert!(!e.caches().is_empty());

    e.teardown();
    e.teardown();
    assert_eq!(e.state(), EngineState::TornDown);
    assert_eq!(e.frame_handle(), None);
    assert_eq!(e.host().pending(), None);
    assert_eq!(e.host().cancelled(), &[handle]);
    assert!(e.caches().is_empty());

    let rendered = e.stats().frames_rendered;
    e.on_frame(handle, 1000.0);
    e.start();
    assert_eq!(e.stats().frames_rendered, rendered);
    assert_eq!(e.frame_handle(), None);
}

#[test]
fn stale_handles_are_ignored() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::High);
    e.on_frame(FrameHandle(12345), 0.0);
    assert_eq!(e.stats().frames_rendered, 0);
    assert!(e.run_pending(0.0));
    assert_eq!(e.stats().frames_rendered, 1);
}

#[test]
fn resize_bursts_coalesce_into_one_rebind() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::High);
    e.run_pending(0.0);
    assert_eq!(e.caches().gradients.bound_generation(), 0);

    e.display_mut().resize(Canvas::new(180, 320).unwrap());
    e.on_resize(10.0);
    e.on_resize(50.0);
    e.run_pending(100.0);
    assert_eq!(e.surface().generation(), 0);

    e.run_pending(160.0);
    assert_eq!(e.surface().generation(), 1);
    assert_eq!(e.surface().size(), Canvas::new(32, 57).unwrap());
    assert_eq!(e.caches().gradients.bound_generation(), 1);
    assert_eq!(e.stats().full_clears, 2);
}

#[test]
fn unchanged_scene_skips_draw_and_blit() {
    let mut e = engine_with(still_config(), PerformanceTier::High);
    e.run_pending(0.0);
    let blits = e.display().blit_count();
    assert_eq!(blits, 1);
    for i in 1..5 {
        e.run_pending(f64::from(i) * 20.0);
    }
    assert_eq!(e.display().blit_count(), blits);
    assert_eq!(e.stats().frames_clean, 4);
    assert_eq!(e.stats().full_clears, 1);
}

#[test]
fn malformed_outline_only_skips_that_blob() {
    let mut cfg = EngineConfig::default();
    cfg.blob.outlines = vec!["definitely not path data".to_owned()];
    let mut e = engine_with(cfg, PerformanceTier::Low);
    e.run_pending(0.0);
    let s = e.stats();
    assert_eq!(s.frames_rendered, 1);
    assert_eq!(s.blob_errors, 6);
    assert_eq!(e.display().blit_count(), 1);
}

#[test]
fn overrides_mutate_in_place() {
    let mut e = engine_with(EngineConfig::default(), PerformanceTier::Medium);
    e.run_pending(0.0);
    let before: Vec<f64> = e.blobs().iter().map(|b| b.rotation_deg).collect();
    e.set_rotation_overrides(Some(PerItem::Uniform(45.0)));
    e.set_position_overrides(Some(PerItem::Each(vec![[0.5, 0.5]])));
    let after: Vec<f64> = e.blobs().iter().map(|b| b.rotation_deg).collect();
    assert_eq!(before, after);
    assert!(e.blobs().iter().all(|b| b.rotation_offset == 45.0));
    assert_eq!(
        e.blobs()[0].position_override,
        Some(crate::foundation::core::Point::new(0.5, 0.5))
    );
    let second = &e.blobs()[1];
    assert_eq!(second.position_override, Some(second.anchor));

    e.set_position_overrides(None);
    assert!(e.blobs().iter().all(|b| b.position_override.is_none()));

    e.teardown();
    e.set_rotation_overrides(Some(PerItem::Uniform(90.0)));
    e.set_position_overrides(Some(PerItem::Uniform([0.1, 0.1])));
    assert!(e.blobs().iter().all(|b| b.rotation_offset == 45.0));
    assert!(e.blobs().iter().all(|b| b.position_override.is_none()));
}

#[test]
fn palette_changes_regenerate_and_bad_palettes_are_rejected() {
    use crate::palette::color::ColorStop;

    let mut e = engine_with(EngineConfig::default(), PerformanceTier::Medium);
    let old = Arc::clone(e.ramp());
    assert!(!e.set_palette(Vec::new()));
    assert!(Arc::ptr_eq(&old, e.ramp()));

    let pair = ColorPair::new(ColorStop::hsl(200.0, 60.0, 40.0), ColorStop::hsl(20.0, 60.0, 60.0));
    assert!(e.set_palette(vec![pair]));
    assert_eq!(e.ramp().len(), 1);
    assert!(e.blobs().iter().all(|b| Arc::ptr_eq(&b.ramp, e.ramp())));
}

#[test]
fn palette_longer_than_the_ramp_is_rejected() {
    use crate::palette::color::ColorStop;

    let cfg = EngineConfig {
        ramp_len: 2,
        ..EngineConfig::default()
    };
    let mut e = engine_with(cfg, PerformanceTier::Medium);
    let old = Arc::clone(e.ramp());
    let pairs: Vec<ColorPair> = [0.0, 100.0, 200.0]
        .into_iter()
        .map(|h| ColorPair::new(ColorStop::hsl(h, 50.0, 50.0), ColorStop::hsl(h, 50.0, 50.0)))
        .collect();
    assert!(!e.set_palette(pairs));
    assert!(Arc::ptr_eq(&old, e.ramp()));
}
