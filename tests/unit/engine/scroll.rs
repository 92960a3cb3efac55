use std::sync::Arc;

use super::*;
use crate::config::model::BlobConfig;
use crate::palette::color::{ColorPair, ColorStop};
use crate::palette::ramp::PaletteRamp;
use crate::render::cache::ColorCache;
use crate::scene::blob::generate_blobs;
use crate::scene::outlines::outline_set;

fn blobs(n: usize) -> Vec<Blob> {
    let mut colors = ColorCache::new();
    let pair = ColorPair::new(ColorStop::hsl(0.0, 50.0, 50.0), ColorStop::hsl(180.0, 50.0, 50.0));
    let ramp = Arc::new(PaletteRamp::build(&[pair], 64, &mut colors).unwrap());
    generate_blobs(n, &ramp, &outline_set(&[]), &BlobConfig::default())
}

fn coupling() -> ScrollCoupling {
    ScrollCoupling::new(ScrollConfig::default(), 1.0)
}

#[test]
fn scrolling_down_reverses_targets() {
    let mut s = coupling();
    let mut b = blobs(4);
    s.update(0.4, &mut b, 64);
    assert_eq!(s.state().direction, -1);
    for blob in &b {
        assert!(blob.target_speed * blob.base_speed <= 0.0);
    }
    s.update(0.1, &mut b, 64);
    assert_eq!(s.state().direction, 1);
    for blob in &b {
        assert!(blob.target_speed * blob.base_speed >= 0.0);
    }
}

#[test]
fn unchanged_value_resolves_forward() {
    let mut s = coupling();
    let mut b = blobs(2);
    s.update(0.5, &mut b, 64);
    assert_eq!(s.state().direction, -1);
    s.update(0.5, &mut b, 64);
    assert_eq!(s.state().direction, 1);
    for blob in &b {
        assert!(blob.target_speed * blob.base_speed >= 0.0);
    }

    // Resting at the clamped bottom keeps reporting forward motion.
    s.update(1.0, &mut b, 64);
    assert_eq!(s.state().direction, -1);
    s.update(3.0, &mut b, 64);
    assert_eq!(s.state().direction, 1);
}

#[test]
fn nearer_blobs_get_heavier_weight() {
    let mut s = coupling();
    let mut b = blobs(5);
    s.update(1.0, &mut b, 64);
    let w: Vec<f64> = b
        .iter()
        .map(|blob| (blob.target_speed / blob.base_speed).abs())
        .collect();
    assert!((w[0] - 1.0).abs() < 1e-12);
    for pair in w.windows(2) {
        assert!(pair[0] > pair[1]);
    }
}

#[test]
fn color_index_and_offset_follow_value() {
    let cfg = ScrollConfig::default();
    let mut s = coupling();
    let mut b = blobs(1);
    s.update(0.5, &mut b, 64);
    assert_eq!(s.state().selected_color_index, 31);
    assert_eq!(
        s.state().target_vertical_offset,
        cfg.offset_base - 0.5 * cfg.offset_multiplier
    );
    s.update(1.0, &mut b, 64);
    assert_eq!(s.state().selected_color_index, 63);
    s.update(7.0, &mut b, 64);
    assert_eq!(s.state().selected_color_index, 63);
    s.update(f64::NAN, &mut b, 64);
    assert_eq!(s.state().last_value, 1.0);
}

#[test]
fn single_entry_ramp_always_selects_zero() {
    let mut s = coupling();
    let mut b = blobs(1);
    s.update(0.9, &mut b, 1);
    assert_eq!(s.state().selected_color_index, 0);
}

#[test]
fn weight_is_a_power_law() {
    assert_eq!(positional_weight(0, 4.0, 2.0), 1.0);
    assert_eq!(positional_weight(2, 4.0, 2.0), 0.25);
    assert_eq!(positional_weight(0, 0.0, 2.0), 0.0);
}
