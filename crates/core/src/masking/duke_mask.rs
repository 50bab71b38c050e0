use ndarray::{s, ArrayView1, Axis};

use crate::shared::color::Color;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws the Duke mask over one face region, in place.
///
/// Black fills the upper half of the region and white the lower half,
/// split at `y + h/2`. A red disc of radius `(w + h) / 12` sits at
/// `(x + h/2, y + h/2)`; the horizontal centre is derived from the
/// height, not the width. All arithmetic is integer (floor) division.
///
/// Every shape is clipped to the frame, so regions that hang off the
/// edges or have no area are drawn partially or not at all.
pub fn apply_mask(frame: &mut Frame, region: &Region) {
    let x = i64::from(region.x);
    let y = i64::from(region.y);
    let w = i64::from(region.width.max(0));
    let h = i64::from(region.height.max(0));

    fill_rect(frame, x, y, x + w, y + h / 2, Color::Black);
    fill_rect(frame, x, y + h / 2, x + w, y + h, Color::White);
    fill_circle(frame, x + h / 2, y + h / 2, (w + h) / 12, Color::Red);
}

/// Fills the half-open box `[x1, x2) x [y1, y2)`, clipped to the frame.
fn fill_rect(frame: &mut Frame, x1: i64, y1: i64, x2: i64, y2: i64, color: Color) {
    let Some((cx1, cx2)) = clip_span(x1, x2, frame.width()) else {
        return;
    };
    let Some((cy1, cy2)) = clip_span(y1, y2, frame.height()) else {
        return;
    };

    let channels = frame.channels() as usize;
    let value = color.channels(channels);
    let value = ArrayView1::from(&value[..]);

    let mut pixels = frame.as_ndarray_mut();
    let mut roi = pixels.slice_mut(s![cy1..cy2, cx1..cx2, ..]);
    for mut px in roi.lanes_mut(Axis(2)) {
        px.assign(&value);
    }
}

/// Fills every pixel within `radius` of `(cx, cy)`, clipped to the frame.
///
/// A zero radius draws nothing.
fn fill_circle(frame: &mut Frame, cx: i64, cy: i64, radius: i64, color: Color) {
    if radius <= 0 {
        return;
    }
    let Some((row1, row2)) = clip_span(cy - radius, cy + radius + 1, frame.height()) else {
        return;
    };
    let r_sq = radius * radius;

    for row in row1..row2 {
        let dy = row as i64 - cy;
        let half = isqrt(r_sq - dy * dy);
        fill_rect(frame, cx - half, row as i64, cx + half + 1, row as i64 + 1, color);
    }
}

/// Intersects `[start, end)` with `[0, limit)`; `None` when empty.
fn clip_span(start: i64, end: i64, limit: u32) -> Option<(usize, usize)> {
    let lo = start.clamp(0, i64::from(limit));
    let hi = end.clamp(0, i64::from(limit));
    (lo < hi).then_some((lo as usize, hi as usize))
}

/// Largest `r` with `r * r <= n`, for `n >= 0`.
fn isqrt(n: i64) -> i64 {
    let mut r = (n as f64).sqrt() as i64;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [255, 0, 0];
    const GRAY: [u8; 3] = [128, 128, 128];

    fn make_frame(width: u32, height: u32, value: u8) -> Frame {
        let data = vec![value; (width * height * 3) as usize];
        Frame::new(data, width, height, 3)
    }

    fn px(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let p = frame.pixel(x, y).unwrap();
        [p[0], p[1], p[2]]
    }

    fn in_disc(x: i64, y: i64, cx: i64, cy: i64, r: i64) -> bool {
        r > 0 && (x - cx).pow(2) + (y - cy).pow(2) <= r * r
    }

    #[test]
    fn test_face_at_10_10_on_100x100() {
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &Region::new(10, 10, 20, 20));

        for y in 0..100u32 {
            for x in 0..100u32 {
                let (xi, yi) = (x as i64, y as i64);
                let expected = if !(10..30).contains(&x) || !(10..30).contains(&y) {
                    GRAY
                } else if in_disc(xi, yi, 20, 20, 3) {
                    RED
                } else if y < 20 {
                    BLACK
                } else {
                    WHITE
                };
                assert_eq!(px(&frame, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_disc_radius_three_extent() {
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &Region::new(10, 10, 20, 20));

        assert_eq!(px(&frame, 20, 20), RED);
        assert_eq!(px(&frame, 23, 20), RED);
        assert_eq!(px(&frame, 17, 20), RED);
        assert_eq!(px(&frame, 20, 17), RED);
        assert_eq!(px(&frame, 20, 23), RED);
        assert_eq!(px(&frame, 24, 20), WHITE);
        assert_eq!(px(&frame, 20, 16), BLACK);
        assert_eq!(px(&frame, 22, 22), RED); // 4 + 4 <= 9
        assert_eq!(px(&frame, 23, 23), WHITE); // 9 + 9 > 9
    }

    #[test]
    fn test_circle_centre_uses_height_for_x() {
        // w=60, h=20: centre x = 0 + 20/2 = 10, not 0 + 60/2 = 30
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &Region::new(0, 0, 60, 20));

        // radius = 80/12 = 6
        assert_eq!(px(&frame, 10, 10), RED);
        assert_eq!(px(&frame, 16, 10), RED);
        assert_eq!(px(&frame, 30, 10), WHITE);
        assert_eq!(px(&frame, 30, 5), BLACK);
    }

    #[test]
    fn test_odd_height_splits_at_floor() {
        // h=21: black rows [0, 10), white rows [10, 21)
        let mut frame = make_frame(50, 50, 128);
        apply_mask(&mut frame, &Region::new(30, 0, 11, 21));

        // Disc sits at (40, 10) with radius 2, so sample at x=32
        assert_eq!(px(&frame, 32, 9), BLACK);
        assert_eq!(px(&frame, 32, 10), WHITE);
        assert_eq!(px(&frame, 32, 20), WHITE);
        assert_eq!(px(&frame, 32, 21), GRAY);
        assert_eq!(px(&frame, 41, 5), GRAY);
        assert_eq!(px(&frame, 40, 9), RED);
    }

    #[test]
    fn test_rgba_frame_gets_zero_alpha() {
        let mut frame = Frame::new(vec![200; 40 * 40 * 4], 40, 40, 4);
        apply_mask(&mut frame, &Region::new(0, 0, 24, 24));

        assert_eq!(frame.pixel(12, 12).unwrap(), &[255, 0, 0, 0]);
        assert_eq!(frame.pixel(1, 1).unwrap(), &[0, 0, 0, 0]);
        assert_eq!(frame.pixel(1, 22).unwrap(), &[255, 255, 255, 0]);
        assert_eq!(frame.pixel(30, 30).unwrap(), &[200, 200, 200, 200]);
    }

    #[test]
    fn test_applying_twice_matches_once() {
        let mut once = make_frame(64, 64, 90);
        apply_mask(&mut once, &Region::new(5, 7, 30, 26));

        let mut twice = make_frame(64, 64, 90);
        apply_mask(&mut twice, &Region::new(5, 7, 30, 26));
        apply_mask(&mut twice, &Region::new(5, 7, 30, 26));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_later_mask_is_drawn_on_top() {
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &Region::new(0, 0, 40, 40));
        // Second mask's black half covers the first mask's white half
        apply_mask(&mut frame, &Region::new(0, 30, 40, 40));

        assert_eq!(px(&frame, 35, 32), BLACK);
        assert_eq!(px(&frame, 35, 60), WHITE);
    }

    #[rstest]
    #[case::past_right_edge(Region::new(90, 10, 40, 40))]
    #[case::past_bottom_edge(Region::new(10, 90, 40, 40))]
    #[case::negative_origin(Region::new(-20, -20, 40, 40))]
    #[case::covers_everything(Region::new(-100, -100, 400, 400))]
    #[case::fully_outside(Region::new(500, 500, 40, 40))]
    #[case::fully_outside_negative(Region::new(-500, -500, 40, 40))]
    #[case::zero_width(Region::new(10, 10, 0, 20))]
    #[case::zero_height(Region::new(10, 10, 20, 0))]
    #[case::zero_size(Region::new(10, 10, 0, 0))]
    #[case::negative_size(Region::new(10, 10, -30, -30))]
    #[case::extreme(Region::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX))]
    #[case::extreme_negative(Region::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX))]
    fn test_never_panics_and_keeps_frame_shape(#[case] region: Region) {
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &region);
        assert_eq!(frame.data().len(), 100 * 100 * 3);
    }

    #[test]
    fn test_clipped_region_only_touches_visible_part() {
        let mut frame = make_frame(100, 100, 128);
        apply_mask(&mut frame, &Region::new(90, 90, 40, 40));

        // Everything left of or above the region is untouched
        for y in 0..100u32 {
            for x in 0..100u32 {
                if x < 90 || y < 90 {
                    assert_eq!(px(&frame, x, y), GRAY, "pixel ({x}, {y})");
                }
            }
        }
        // Visible top-left corner of the region is black
        assert_eq!(px(&frame, 95, 95), BLACK);
    }

    #[test]
    fn test_zero_area_region_leaves_frame_unchanged() {
        let mut frame = make_frame(50, 50, 128);
        let original = frame.clone();
        apply_mask(&mut frame, &Region::new(10, 10, 0, 0));
        assert_eq!(frame, original);
    }

    #[test]
    fn test_zero_height_draws_only_disc_from_width() {
        // h=0: both rectangles empty; radius = 24/12 = 2 at (x, y)
        let mut frame = make_frame(50, 50, 128);
        apply_mask(&mut frame, &Region::new(20, 20, 24, 0));

        assert_eq!(px(&frame, 20, 20), RED);
        assert_eq!(px(&frame, 22, 20), RED);
        assert_eq!(px(&frame, 23, 20), GRAY);
        assert_eq!(px(&frame, 30, 20), GRAY);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(8, 2)]
    #[case(9, 3)]
    #[case(10, 3)]
    #[case(99, 9)]
    #[case(100, 10)]
    fn test_isqrt(#[case] n: i64, #[case] expected: i64) {
        assert_eq!(isqrt(n), expected);
    }

    #[test]
    fn test_clip_span() {
        assert_eq!(clip_span(-5, 5, 10), Some((0, 5)));
        assert_eq!(clip_span(5, 15, 10), Some((5, 10)));
        assert_eq!(clip_span(10, 15, 10), None);
        assert_eq!(clip_span(3, 3, 10), None);
        assert_eq!(clip_span(7, 2, 10), None);
    }
}
