use super::*;
use crate::palette::color::HslColor;

fn key(size: u32) -> GradientKey {
    GradientKey {
        a: HslColor { h: 0, s: 0, l: 0 },
        b: HslColor { h: 0, s: 0, l: 100 },
        size,
    }
}

#[test]
fn handle_records_size_and_generation() {
    let g = rasterize_gradient(key(4), 3).unwrap();
    assert_eq!(g.size(), 4);
    assert_eq!(g.generation(), 3);
}

#[test]
fn one_pixel_gradient_is_the_start_color() {
    assert_eq!(rasterize_gradient(key(1), 0).unwrap().size(), 1);
}

#[test]
fn out_of_range_sizes_fail_without_allocating() {
    assert!(matches!(rasterize_gradient(key(0), 0), Err(BlobscapeError::Render(_))));
    assert!(matches!(
        rasterize_gradient(key(MAX_GRADIENT_PX + 1), 0),
        Err(BlobscapeError::Render(_))
    ));
    assert!(matches!(
        rasterize_gradient(key(u32::MAX), 0),
        Err(BlobscapeError::Render(_))
    ));
}

#[test]
fn pixmap_dims_reject_wide_rasters() {
    assert_eq!(pixmap_dims(640, 480).unwrap(), (640, 480));
    assert!(pixmap_dims(70_000, 1).is_err());
    assert!(pixmap_dims(1, 70_000).is_err());
}

#[test]
fn byte_length_must_match_dimensions() {
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
}
