use ball_detect_core::remove_trash;
use ball_detect_vision::{extract_candidates, EdgeParams, ShapeParams};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

fn disk_mask(center: (i32, i32), radius: i32) -> GrayImage {
    let mut mask = GrayImage::new(640, 480);
    draw_filled_circle_mut(&mut mask, center, radius, Luma([255u8]));
    mask
}

#[test]
fn single_disk_reduces_to_one_candidate() {
    let mask = disk_mask((320, 240), 40);
    let raw = extract_candidates(&mask, &EdgeParams::default(), &ShapeParams::default());
    assert!(
        raw.len() >= 2,
        "expected outer and hole contours, got {}",
        raw.len()
    );

    let kept = remove_trash(&raw, 10.0);
    assert_eq!(kept.len(), 1, "kept {kept:?}");
    let ball = kept[0];
    assert!((ball.center.x - 320.0).abs() <= 2.0, "center {:?}", ball.center);
    assert!((ball.center.y - 240.0).abs() <= 2.0, "center {:?}", ball.center);
    assert!((ball.radius - 40.0).abs() <= 4.0, "radius {}", ball.radius);
}

#[test]
fn separated_disks_yield_one_candidate_each() {
    let mut mask = disk_mask((150, 200), 30);
    draw_filled_circle_mut(&mut mask, (480, 260), 45, Luma([255u8]));

    let raw = extract_candidates(&mask, &EdgeParams::default(), &ShapeParams::default());
    let mut kept = remove_trash(&raw, 10.0);
    kept.sort_by(|a, b| a.center.x.total_cmp(&b.center.x));

    assert_eq!(kept.len(), 2, "kept {kept:?}");
    assert!((kept[0].center.x - 150.0).abs() <= 2.0);
    assert!((kept[0].radius - 30.0).abs() <= 3.0);
    assert!((kept[1].center.x - 480.0).abs() <= 2.0);
    assert!((kept[1].radius - 45.0).abs() <= 4.5);
}

#[test]
fn undersized_blob_is_filtered_out() {
    let mask = disk_mask((100, 100), 4);
    let raw = extract_candidates(&mask, &EdgeParams::default(), &ShapeParams::default());
    assert!(remove_trash(&raw, 10.0).is_empty());
}
