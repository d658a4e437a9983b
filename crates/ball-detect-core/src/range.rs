//! Adaptive range lookup and linear range correction.
//!
//! Depth sensors of this class are reliable in the near field and noisy
//! beyond about a meter. Near readings are used directly; far readings are
//! replaced by the mean of the valid samples in a 3x3 neighborhood.

use serde::{Deserialize, Serialize};

use crate::RangeImageView;

/// Readings below this value (mm) are used without averaging.
pub const NEAR_RANGE_THRESHOLD_MM: u16 = 1000;

/// Half-size of the far-range averaging window (3x3).
const NEIGHBORHOOD_RADIUS: i32 = 1;

/// Linear sensor correction `corrected = |(raw - b) / a|`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeCorrection {
    pub a: f32,
    pub b: f32,
}

impl Default for RangeCorrection {
    fn default() -> Self {
        Self { a: 1.0, b: 0.0 }
    }
}

impl RangeCorrection {
    /// Apply the correction, truncating toward zero before folding the sign.
    ///
    /// `a == 0` is rejected by [`crate::CalibrationParams::validate`]; it is
    /// not checked here.
    #[inline]
    pub fn apply(&self, raw_mm: i32) -> i32 {
        let y = ((raw_mm as f32 - self.b) / self.a).trunc() as i32;
        y.saturating_abs()
    }
}

/// Range to the ball center at pixel `(x, y)`, before correction.
///
/// The sampled surface distance is pushed back by the physical ball radius.
/// An out-of-bounds pixel, or a far pixel whose neighborhood has no valid
/// sample, yields exactly `ball_radius_mm`.
pub fn lookup_range(range: &RangeImageView<'_>, x: i32, y: i32, ball_radius_mm: i32) -> i32 {
    let center = range.get(x, y).unwrap_or(0);
    if center < NEAR_RANGE_THRESHOLD_MM {
        return center as i32 + ball_radius_mm;
    }
    neighborhood_mean(range, x, y) + ball_radius_mm
}

/// Integer mean of the nonzero samples in the clipped 3x3 window at `(x, y)`.
pub fn neighborhood_mean(range: &RangeImageView<'_>, x: i32, y: i32) -> i32 {
    let mut sum = 0u32;
    let mut count = 0u32;
    for dy in -NEIGHBORHOOD_RADIUS..=NEIGHBORHOOD_RADIUS {
        for dx in -NEIGHBORHOOD_RADIUS..=NEIGHBORHOOD_RADIUS {
            match range.get(x + dx, y + dy) {
                Some(v) if v != 0 => {
                    sum += v as u32;
                    count += 1;
                }
                _ => {}
            }
        }
    }
    if count == 0 {
        0
    } else {
        (sum / count) as i32
    }
}

/// Full estimator: adaptive lookup followed by the linear correction.
pub fn estimate_range(
    range: &RangeImageView<'_>,
    pixel: [i32; 2],
    ball_radius_mm: i32,
    correction: &RangeCorrection,
) -> i32 {
    let raw = lookup_range(range, pixel[0], pixel[1], ball_radius_mm);
    correction.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: usize, height: usize, fill: u16) -> Vec<u16> {
        vec![fill; width * height]
    }

    fn set(data: &mut [u16], width: usize, x: usize, y: usize, v: u16) {
        data[y * width + x] = v;
    }

    #[test]
    fn near_reading_is_used_directly() {
        let mut data = raster(5, 5, 0);
        set(&mut data, 5, 2, 2, 500);
        let view = RangeImageView::new(5, 5, &data).expect("view");
        assert_eq!(lookup_range(&view, 2, 2, 50), 550);
    }

    #[test]
    fn far_reading_averages_nonzero_neighbors() {
        let (w, h) = (5, 5);
        let mut data = raster(w, h, 0);
        // Row-major 3x3 around (2, 2): {1500,1600,0, 0,1500,1400, 0,1300,0}
        let patch = [[1500, 1600, 0], [0, 1500, 1400], [0, 1300, 0]];
        for (dy, row) in patch.iter().enumerate() {
            for (dx, &v) in row.iter().enumerate() {
                set(&mut data, w, 1 + dx, 1 + dy, v);
            }
        }
        let view = RangeImageView::new(w, h, &data).expect("view");
        assert_eq!(neighborhood_mean(&view, 2, 2), 1460);
        assert_eq!(lookup_range(&view, 2, 2, 50), 1510);
    }

    #[test]
    fn far_window_is_clipped_at_the_border() {
        let data = [2000u16, 1000, 3000, 0];
        let view = RangeImageView::new(2, 2, &data).expect("view");
        assert_eq!(lookup_range(&view, 0, 0, 0), 2000);
    }

    #[test]
    fn out_of_bounds_pixel_degrades_to_ball_radius() {
        let data = raster(3, 3, 1500);
        let view = RangeImageView::new(3, 3, &data).expect("view");
        assert_eq!(lookup_range(&view, 10, 10, 50), 50);
    }

    #[test]
    fn identity_correction_passes_through() {
        let c = RangeCorrection { a: 1.0, b: 0.0 };
        assert_eq!(c.apply(1510), 1510);
    }

    #[test]
    fn negative_slope_folds_to_same_magnitude() {
        let pos = RangeCorrection { a: 1.0, b: 0.0 };
        let neg = RangeCorrection { a: -1.0, b: 0.0 };
        assert_eq!(neg.apply(1510), pos.apply(1510));
    }

    #[test]
    fn correction_applies_offset_and_scale() {
        let c = RangeCorrection { a: 0.9, b: 30.0 };
        // (930 - 30) / 0.9 = 1000
        assert_eq!(c.apply(930), 1000);
        assert_eq!(c.apply(0), 33);
    }
}
