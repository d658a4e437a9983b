//! Raster stages of the ball detector.
//!
//! Everything here consumes and produces `image` buffers: frame
//! normalization, HSV segmentation into one binary mask per color class,
//! and the contour-to-circle reduction that yields raw candidates.

pub mod circle;
pub mod frame;
pub mod hsv;
pub mod morphology;
pub mod segment;
pub mod shape;

use ball_detect_core::ColorClass;

pub use circle::min_enclosing_circle;
pub use frame::{
    normalize_color, normalize_range, range_view, RangeImage, CANONICAL_HEIGHT, CANONICAL_WIDTH,
};
pub use hsv::{rgb_to_hsv, to_hsv, HsvImage};
pub use segment::{
    apply_mask, class_mask, preblur, segment, ColorThresholds, HsvRange, RedThresholds,
    SegmentParams,
};
pub use shape::{extract_candidates, EdgeParams, ShapeParams};

/// Rejected segmentation or edge settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VisionParamError {
    #[error("{class} HSV range is inverted (low={low:?}, high={high:?})")]
    InvertedRange {
        class: ColorClass,
        low: [u8; 3],
        high: [u8; 3],
    },
    #[error("edge thresholds must be finite and positive (low={low}, ratio={ratio})")]
    InvalidEdgeThreshold { low: f32, ratio: f32 },
}
