use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

#[test]
fn upscale_of_flat_source_is_flat() {
    let mut d = PixmapDisplay::new(Canvas::new(40, 20).unwrap());
    let src = solid(4, 2, [10, 20, 30, 255]);
    d.blit_upscaled(
        BufferView {
            width: 4,
            height: 2,
            data: &src,
        },
        Some(8),
    )
    .unwrap();
    assert_eq!(d.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(d.pixel(39, 19), Some([10, 20, 30, 255]));
    assert_eq!(d.pixel(40, 0), None);
    assert_eq!(d.blit_count(), 1);
}

#[test]
fn upscale_interpolates_between_texels() {
    let mut d = PixmapDisplay::new(Canvas::new(8, 1).unwrap());
    let mut src = solid(2, 1, [0, 0, 0, 255]);
    src[4..8].copy_from_slice(&[200, 200, 200, 255]);
    d.blit_upscaled(
        BufferView {
            width: 2,
            height: 1,
            data: &src,
        },
        None,
    )
    .unwrap();
    let left = d.pixel(0, 0).unwrap()[0];
    let mid = d.pixel(4, 0).unwrap()[0];
    let right = d.pixel(7, 0).unwrap()[0];
    assert_eq!(left, 0);
    assert_eq!(right, 200);
    assert!(mid > 0 && mid < 200);
}

#[test]
fn rejects_mismatched_source() {
    let mut d = PixmapDisplay::new(Canvas::new(8, 8).unwrap());
    let err = d
        .blit_upscaled(
            BufferView {
                width: 2,
                height: 2,
                data: &[0u8; 3],
            },
            None,
        )
        .unwrap_err();
    assert!(matches!(err, BlobscapeError::Surface(_)));
}

#[test]
fn fill_and_css_blur_state() {
    let mut d = PixmapDisplay::new(Canvas::new(2, 2).unwrap()).with_filter_blur(false);
    assert!(!d.supports_filter_blur());
    d.set_css_blur(6).unwrap();
    assert_eq!(d.css_blur_px(), 6);
    d.fill(Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    assert!(d.data().chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
    d.resize(Canvas::new(3, 3).unwrap());
    assert_eq!(d.data().len(), 36);
}
