//! 8-bit RGB to HSV conversion.
//!
//! Hue is stored halved in `0..180` so it fits a byte; saturation and value
//! span `0..=255`. Threshold bounds in [`crate::ColorThresholds`] use the
//! same convention.

use image::{Rgb, RgbImage};

/// HSV image: channel 0 is hue (`0..180`), 1 saturation, 2 value.
pub type HsvImage = RgbImage;

/// Convert one RGB pixel to `[h, s, v]`.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    [
        ((h / 2.0).round() as u32 % 180) as u8,
        s.round() as u8,
        v as u8,
    ]
}

/// Convert a whole frame.
pub fn to_hsv(img: &RgbImage) -> HsvImage {
    let mut out = HsvImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(out.pixels_mut()) {
        *dst = Rgb(rgb_to_hsv(src.0));
    }
    out
}
