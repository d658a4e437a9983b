//! Per-class color segmentation in HSV space.

use ball_detect_core::{ColorClass, PerClass};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::hsv::HsvImage;
use crate::{morphology, VisionParamError};

/// Inclusive HSV box `low <= px <= high` per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl HsvRange {
    pub const fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.low[c] <= hsv[c] && hsv[c] <= self.high[c])
    }

    fn validate(&self, class: ColorClass) -> Result<(), VisionParamError> {
        if (0..3).any(|c| self.low[c] > self.high[c]) {
            return Err(VisionParamError::InvertedRange {
                class,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Red thresholds: red straddles hue 0, so a second hue band that shares
/// the primary saturation and value bounds is unioned in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedThresholds {
    pub primary: HsvRange,
    /// `[low_h, high_h]` of the wrapped band.
    pub secondary_hue: [u8; 2],
}

impl RedThresholds {
    pub fn secondary(&self) -> HsvRange {
        let p = self.primary;
        HsvRange {
            low: [self.secondary_hue[0], p.low[1], p.low[2]],
            high: [self.secondary_hue[1], p.high[1], p.high[2]],
        }
    }
}

/// Threshold boxes for every color class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThresholds {
    pub red: RedThresholds,
    pub blue: HsvRange,
    pub green: HsvRange,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            red: RedThresholds {
                primary: HsvRange::new([0, 100, 80], [10, 255, 255]),
                secondary_hue: [170, 179],
            },
            blue: HsvRange::new([100, 100, 50], [130, 255, 255]),
            green: HsvRange::new([40, 70, 50], [80, 255, 255]),
        }
    }
}

impl ColorThresholds {
    /// HSV boxes whose union forms the class mask.
    pub fn ranges(&self, class: ColorClass) -> Vec<HsvRange> {
        match class {
            ColorClass::Red => vec![self.red.primary, self.red.secondary()],
            ColorClass::Blue => vec![self.blue],
            ColorClass::Green => vec![self.green],
        }
    }

    pub fn validate(&self) -> Result<(), VisionParamError> {
        for class in ColorClass::ALL {
            for range in self.ranges(class) {
                range.validate(class)?;
            }
        }
        Ok(())
    }
}

/// Pre- and post-processing around thresholding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Median blur aperture applied to the color frame; `0` or `1` disables.
    pub median_aperture: u32,
    /// Erode 3x3 then dilate 9x9 each class mask.
    pub morph_cleanup: bool,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            median_aperture: 3,
            morph_cleanup: false,
        }
    }
}

/// Median-filter the color frame ahead of the HSV conversion.
pub fn preblur(img: &RgbImage, params: &SegmentParams) -> RgbImage {
    if params.median_aperture <= 1 {
        return img.clone();
    }
    let r = params.median_aperture / 2;
    imageproc::filter::median_filter(img, r, r)
}

/// Binary mask (`0`/`255`) of pixels inside `range`.
pub fn in_range(hsv: &HsvImage, range: &HsvRange) -> GrayImage {
    let mut out = GrayImage::new(hsv.width(), hsv.height());
    for (src, dst) in hsv.pixels().zip(out.pixels_mut()) {
        if range.contains(src.0) {
            *dst = Luma([255]);
        }
    }
    out
}

/// Saturating per-pixel sum; for binary masks this is their union.
pub fn add_masks(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        dst.0[0] = dst.0[0].saturating_add(src.0[0]);
    }
    out
}

/// Mask of one color class.
pub fn class_mask(
    hsv: &HsvImage,
    thresholds: &ColorThresholds,
    class: ColorClass,
    params: &SegmentParams,
) -> GrayImage {
    let mask = thresholds
        .ranges(class)
        .iter()
        .map(|r| in_range(hsv, r))
        .reduce(|acc, m| add_masks(&acc, &m))
        .unwrap_or_else(|| GrayImage::new(hsv.width(), hsv.height()));
    if params.morph_cleanup {
        morphology::cleanup(&mask)
    } else {
        mask
    }
}

/// Masks for every color class.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(width = hsv.width(), height = hsv.height()))
)]
pub fn segment(
    hsv: &HsvImage,
    thresholds: &ColorThresholds,
    params: &SegmentParams,
) -> PerClass<GrayImage> {
    PerClass::from_fn(|class| class_mask(hsv, thresholds, class, params))
}

/// Color pixels under `mask`, black elsewhere. Diagnostic output only.
pub fn apply_mask(color: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut out = RgbImage::new(color.width(), color.height());
    for ((src, m), dst) in color.pixels().zip(mask.pixels()).zip(out.pixels_mut()) {
        if m.0[0] != 0 {
            *dst = *src;
        } else {
            *dst = Rgb([0, 0, 0]);
        }
    }
    out
}
