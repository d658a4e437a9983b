//! Mask to circle candidates: blur, Canny, thicken, contours, polygon, circle.

use ball_detect_core::Candidate;
use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::circle::min_enclosing_circle;
use crate::morphology::thicken;
use crate::VisionParamError;

/// Per-class Canny thresholds; the high threshold is `low * ratio`.
///
/// The Sobel aperture is fixed at 3.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeParams {
    pub low_threshold: f32,
    pub ratio: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            ratio: 3.0,
        }
    }
}

impl EdgeParams {
    pub fn high_threshold(&self) -> f32 {
        self.low_threshold * self.ratio
    }

    pub fn validate(&self) -> Result<(), VisionParamError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.low_threshold) || !ok(self.ratio) {
            return Err(VisionParamError::InvalidEdgeThreshold {
                low: self.low_threshold,
                ratio: self.ratio,
            });
        }
        Ok(())
    }
}

/// Geometry settings shared by all classes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    /// Gaussian sigma applied to the binary mask before edge detection.
    pub blur_sigma: f32,
    /// Maximum Douglas-Peucker deviation in pixels.
    pub approx_epsilon: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            approx_epsilon: 3.0,
        }
    }
}

/// Edge map of a class mask, one pixel thicker than Canny's output.
pub fn edge_map(mask: &GrayImage, edges: &EdgeParams, shape: &ShapeParams) -> GrayImage {
    let smoothed = if shape.blur_sigma > 0.0 {
        gaussian_blur_f32(mask, shape.blur_sigma)
    } else {
        mask.clone()
    };
    let edge = canny(&smoothed, edges.low_threshold, edges.high_threshold());
    thicken(&edge)
}

/// Enclosing circle of a contour after polygon simplification.
pub fn contour_circle(points: &[Point<i32>], epsilon: f64) -> Option<Candidate> {
    let poly = if points.len() > 2 {
        approximate_polygon_dp(points, epsilon, true)
    } else {
        points.to_vec()
    };
    let pts: Vec<Point2<f32>> = poly
        .iter()
        .map(|p| Point2::new(p.x as f32, p.y as f32))
        .collect();
    min_enclosing_circle(&pts)
}

/// One candidate per outer or hole contour of the mask's edge map.
///
/// Degenerate and noise contours are kept; filtering is the caller's job.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(width = mask.width(), height = mask.height()))
)]
pub fn extract_candidates(
    mask: &GrayImage,
    edges: &EdgeParams,
    shape: &ShapeParams,
) -> Vec<Candidate> {
    let edge = edge_map(mask, edges, shape);
    let contours = find_contours::<i32>(&edge);
    let out: Vec<Candidate> = contours
        .iter()
        .filter_map(|c| contour_circle(&c.points, shape.approx_epsilon))
        .collect();
    log::trace!("{} contours -> {} candidates", contours.len(), out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn empty_mask_has_no_candidates() {
        let mask = GrayImage::new(64, 48);
        let out = extract_candidates(&mask, &EdgeParams::default(), &ShapeParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn full_mask_has_no_edges() {
        let mask = GrayImage::from_pixel(64, 48, Luma([255]));
        let out = extract_candidates(&mask, &EdgeParams::default(), &ShapeParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn tiny_contours_skip_simplification() {
        let pts = [Point::new(3, 4), Point::new(5, 4)];
        let c = contour_circle(&pts, 3.0).expect("circle");
        assert_eq!(c, Candidate::new(4.0, 4.0, 1.0));
    }

    #[test]
    fn edge_params_reject_non_positive_threshold() {
        let bad = EdgeParams {
            low_threshold: 0.0,
            ratio: 3.0,
        };
        assert!(bad.validate().is_err());
        assert_eq!(EdgeParams::default().high_threshold(), 150.0);
    }
}
