use super::*;

fn snap(x: f64, y: f64, rot: f64) -> BlobSnapshot {
    BlobSnapshot {
        center: Point::new(x, y),
        rotation_deg: rot,
        size: 4.0,
        color_index: 0,
    }
}

fn bounds() -> Canvas {
    Canvas::new(64, 64).unwrap()
}

#[test]
fn first_frame_is_full_redraw_then_clean() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    let blobs = [snap(10.0, 10.0, 0.0), snap(40.0, 40.0, 90.0)];
    assert!(t.track(&blobs, bounds()).full_redraw);
    let f = t.track(&blobs, bounds());
    assert!(!f.full_redraw);
    assert!(f.contributions.is_empty());
    assert!(f.is_clean());
}

#[test]
fn rotation_past_threshold_contributes_old_and_new() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    t.track(&[snap(10.0, 10.0, 0.0), snap(40.0, 40.0, 0.0)], bounds());

    let f = t.track(&[snap(10.0, 10.0, 6.0), snap(40.0, 40.0, 1.0)], bounds());
    assert_eq!(f.contributions.len(), 2);
    // Same box twice folds into one.
    assert_eq!(f.merged.len(), 1);
    assert_eq!(f.merged[0], blob_box(&snap(10.0, 10.0, 6.0), 1.0, bounds()).unwrap());
}

#[test]
fn sub_threshold_drift_accumulates_until_it_counts() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    t.track(&[snap(10.0, 10.0, 0.0)], bounds());
    assert!(t.track(&[snap(10.0, 10.0, 3.0)], bounds()).is_clean());
    assert_eq!(
        t.track(&[snap(10.0, 10.0, 6.0)], bounds()).contributions.len(),
        2
    );
    assert!(t.track(&[snap(10.0, 10.0, 8.0)], bounds()).is_clean());
}

#[test]
fn movement_and_color_changes_count() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    t.track(&[snap(10.0, 10.0, 0.0), snap(40.0, 40.0, 0.0)], bounds());
    let mut recolored = snap(40.0, 40.0, 0.0);
    recolored.color_index = 3;
    let f = t.track(&[snap(10.0, 12.5, 0.0), recolored], bounds());
    assert_eq!(f.contributions.len(), 4);
    assert_eq!(f.merged.len(), 2);
}

#[test]
fn merged_regions_cover_every_contribution() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    let start: Vec<_> = (0..8).map(|i| snap(8.0 * i as f64, 30.0, 0.0)).collect();
    t.track(&start, bounds());
    let moved: Vec<_> = (0..8).map(|i| snap(8.0 * i as f64 + 2.5, 32.5, 45.0)).collect();
    let f = t.track(&moved, bounds());
    assert_eq!(f.contributions.len(), 16);
    for c in &f.contributions {
        assert!(f.merged.iter().any(|m| m.contains(*c)), "{c:?} dropped");
    }
    assert!(f.merged.len() < f.contributions.len());
}

#[test]
fn blob_count_change_forces_full_redraw() {
    let mut t = DirtyTracker::new(DirtyConfig::default());
    t.track(&[snap(1.0, 1.0, 0.0)], bounds());
    assert!(t.track(&[snap(1.0, 1.0, 0.0), snap(2.0, 2.0, 0.0)], bounds()).full_redraw);
    t.reset();
    assert!(t.track(&[snap(1.0, 1.0, 0.0), snap(2.0, 2.0, 0.0)], bounds()).full_redraw);
}

#[test]
fn boxes_clamp_to_bounds_or_vanish() {
    let b = blob_box(&snap(1.0, 1.0, 0.0), 1.0, bounds()).unwrap();
    assert_eq!((b.x, b.y), (0.0, 0.0));
    assert_eq!((b.width, b.height), (6.0, 6.0));
    assert!(blob_box(&snap(-50.0, -50.0, 0.0), 1.0, bounds()).is_none());
    assert_eq!(b.pixel_span(bounds()), (0, 0, 6, 6));
}

#[test]
fn disjoint_regions_do_not_merge() {
    let mut v = vec![
        DirtyRegion::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0)),
        DirtyRegion::from_rect(Rect::new(10.0, 10.0, 14.0, 14.0)),
        DirtyRegion::from_rect(Rect::new(3.0, 0.0, 7.0, 4.0)),
    ];
    merge_regions(&mut v, 0.5);
    assert_eq!(v.len(), 3);
    v.push(DirtyRegion::from_rect(Rect::new(1.0, 1.0, 4.0, 4.0)));
    merge_regions(&mut v, 0.5);
    assert_eq!(v.len(), 3);
}
