//! Frame normalization to the canonical working resolution.

use std::borrow::Cow;

use ball_detect_core::RangeImageView;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, RgbImage};

/// Single-channel 16-bit range raster in millimeters.
pub type RangeImage = ImageBuffer<Luma<u16>, Vec<u16>>;

pub const CANONICAL_WIDTH: u32 = 640;
pub const CANONICAL_HEIGHT: u32 = 480;

/// Width of the reduced-resolution stream that gets upscaled.
pub const HALF_WIDTH: u32 = 320;

/// Bring a color frame to 640x480.
///
/// 320-wide frames are upscaled bilinearly; anything else is passed through
/// untouched and the caller owns the consequences.
pub fn normalize_color(img: &RgbImage) -> Cow<'_, RgbImage> {
    normalize(img, "color")
}

/// Bring a range frame to 640x480, same policy as [`normalize_color`].
pub fn normalize_range(img: &RangeImage) -> Cow<'_, RangeImage> {
    normalize(img, "range")
}

fn normalize<'a, P>(
    img: &'a ImageBuffer<P, Vec<P::Subpixel>>,
    label: &str,
) -> Cow<'a, ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: image::Pixel + 'static,
    P::Subpixel: 'static,
{
    if img.width() == HALF_WIDTH {
        log::debug!(
            "upscaling {label} frame {}x{} -> {CANONICAL_WIDTH}x{CANONICAL_HEIGHT}",
            img.width(),
            img.height()
        );
        return Cow::Owned(imageops::resize(
            img,
            CANONICAL_WIDTH,
            CANONICAL_HEIGHT,
            FilterType::Triangle,
        ));
    }
    if img.dimensions() != (CANONICAL_WIDTH, CANONICAL_HEIGHT) {
        log::warn!(
            "unexpected {label} frame size {}x{}, processing as-is",
            img.width(),
            img.height()
        );
    }
    Cow::Borrowed(img)
}

/// Borrow a range image as the core crate's view type.
pub fn range_view(img: &RangeImage) -> RangeImageView<'_> {
    RangeImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn half_resolution_frames_are_upscaled() {
        let color = RgbImage::from_pixel(320, 240, Rgb([10, 20, 30]));
        let range = RangeImage::from_pixel(320, 240, Luma([1200]));

        let color = normalize_color(&color);
        let range = normalize_range(&range);
        assert!(matches!(color, Cow::Owned(_)));
        assert_eq!(color.dimensions(), (640, 480));
        assert_eq!(range.dimensions(), (640, 480));
        let px = color.get_pixel(100, 100).0;
        for (got, want) in px.iter().zip([10u8, 20, 30]) {
            assert!(got.abs_diff(want) <= 1, "got {px:?}");
        }
        assert!(range.get_pixel(600, 400).0[0].abs_diff(1200) <= 1);
    }

    #[test]
    fn canonical_frames_are_borrowed() {
        let color = RgbImage::new(640, 480);
        assert!(matches!(normalize_color(&color), Cow::Borrowed(_)));
    }

    #[test]
    fn range_view_shares_the_buffer() {
        let mut range = RangeImage::new(4, 3);
        range.put_pixel(2, 1, Luma([777]));
        let view = range_view(&range);
        assert_eq!(view.get(2, 1), Some(777));
    }
}
