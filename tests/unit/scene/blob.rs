use super::*;
use crate::palette::color::{ColorPair, ColorStop};
use crate::render::cache::ColorCache;
use crate::scene::outlines::outline_set;

fn ramp() -> Arc<PaletteRamp> {
    let mut colors = ColorCache::new();
    let pair = ColorPair::new(ColorStop::hsl(0.0, 50.0, 50.0), ColorStop::hsl(180.0, 50.0, 50.0));
    Arc::new(PaletteRamp::build(&[pair], 64, &mut colors).unwrap())
}

#[test]
fn generates_requested_count_sharing_one_ramp() {
    let ramp = ramp();
    let blobs = generate_blobs(9, &ramp, &outline_set(&[]), &BlobConfig::default());
    assert_eq!(blobs.len(), 9);
    for b in &blobs {
        assert!(Arc::ptr_eq(&b.ramp, &ramp));
        assert!((0.0..360.0).contains(&b.rotation_deg));
    }
}

#[test]
fn scale_falls_from_nearest_to_farthest() {
    let cfg = BlobConfig::default();
    let blobs = generate_blobs(5, &ramp(), &outline_set(&[]), &cfg);
    assert_eq!(blobs[0].scale, cfg.scale_max);
    assert!((blobs[4].scale - cfg.scale_min).abs() < 1e-12);
    for w in blobs.windows(2) {
        assert!(w[0].scale > w[1].scale);
    }
}

#[test]
fn nearer_blobs_are_faster_without_jitter() {
    let cfg = BlobConfig {
        speed_jitter: 0.0,
        ..BlobConfig::default()
    };
    let blobs = generate_blobs(6, &ramp(), &outline_set(&[]), &cfg);
    for w in blobs.windows(2) {
        assert!(w[0].base_speed.abs() > w[1].base_speed.abs());
    }
    for b in &blobs {
        assert!(b.base_speed.abs() >= cfg.speed_min && b.base_speed.abs() <= cfg.speed_max);
        assert_eq!(b.current_speed, b.base_speed);
    }
}

#[test]
fn generation_is_seeded() {
    let cfg = BlobConfig::default();
    let a = generate_blobs(4, &ramp(), &outline_set(&[]), &cfg);
    let b = generate_blobs(4, &ramp(), &outline_set(&[]), &cfg);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.rotation_deg, y.rotation_deg);
        assert_eq!(x.shape, y.shape);
    }
}

#[test]
fn overrides_apply_in_place() {
    let cfg = BlobConfig::default();
    let mut blobs = generate_blobs(3, &ramp(), &outline_set(&[]), &cfg);
    blobs[1].rotation_deg = 42.0;
    apply_overrides(
        &mut blobs,
        Some(&PerItem::Each(vec![[0.1, 0.9]])),
        Some(&PerItem::Uniform(10.0)),
    );
    assert_eq!(blobs[1].rotation_deg, 42.0);
    assert_eq!(blobs[1].draw_rotation(), 52.0);
    assert_eq!(blobs[0].position_override, Some(Point::new(0.1, 0.9)));
    assert_eq!(
        blobs[2].position_override,
        Some(blobs[2].anchor),
        "short lists fall back to the generated anchor"
    );

    let buffer = Canvas::new(32, 32).unwrap();
    let c = blobs[0].center(buffer, 2.0);
    assert!((c.x - 3.2).abs() < 1e-9 && (c.y - (28.8 + 2.0)).abs() < 1e-9);
}

#[test]
fn render_size_respects_minimum() {
    let cfg = BlobConfig::default();
    let mut blobs = generate_blobs(1, &ramp(), &outline_set(&[]), &cfg);
    blobs[0].scale = 0.01;
    assert_eq!(blobs[0].render_size(&cfg), cfg.min_size);
}
