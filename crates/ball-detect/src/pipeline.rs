//! One-frame detection pipeline.
//!
//! normalize -> median blur -> HSV -> per-class mask -> edge contours ->
//! enclosing circles -> trash filter -> range lookup and correction.

use std::sync::{Arc, PoisonError, RwLock};

use ball_detect_core::{
    estimate_range, project_detection, remove_trash, Candidate, Detection, PerClass, Position3D,
};
use ball_detect_vision::{
    apply_mask, extract_candidates, normalize_color, normalize_range, preblur, range_view,
    segment, to_hsv, RangeImage,
};
use image::{GrayImage, RgbImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DetectorParams, ParamsError};

/// Detections of one frame, index-aligned per class in filtered order.
pub type BallDetections = PerClass<Vec<Detection>>;

/// Errors surfaced at the detection boundary.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(
        "color frame is {color_width}x{color_height} \
         but range frame is {range_width}x{range_height}"
    )]
    SizeMismatch {
        color_width: u32,
        color_height: u32,
        range_width: u32,
        range_height: u32,
    },
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Intermediate rasters and lists kept for inspection.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    pub masks: PerClass<GrayImage>,
    /// Color frame restricted to each class mask.
    pub masked: PerClass<RgbImage>,
    /// Filtered candidates with their float centers and radii.
    pub candidates: PerClass<Vec<Candidate>>,
}

/// Detect balls of every color class in one color + range frame pair.
pub fn detect(
    color: &RgbImage,
    range: &RangeImage,
    params: &DetectorParams,
) -> Result<BallDetections, DetectError> {
    run(color, range, params).map(|frame| frame.detections)
}

/// [`detect`] that also returns masks, masked color images and candidates.
pub fn detect_with_diagnostics(
    color: &RgbImage,
    range: &RangeImage,
    params: &DetectorParams,
) -> Result<(BallDetections, Diagnostics), DetectError> {
    let frame = run(color, range, params)?;
    let diagnostics = Diagnostics {
        masked: frame.masks.as_ref().map(|_, m| apply_mask(&frame.smoothed, m)),
        masks: frame.masks,
        candidates: frame.candidates,
    };
    Ok((frame.detections, diagnostics))
}

struct FrameOutput {
    detections: BallDetections,
    masks: PerClass<GrayImage>,
    candidates: PerClass<Vec<Candidate>>,
    smoothed: RgbImage,
}

#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip_all,
        fields(width = color.width(), height = color.height())
    )
)]
fn run(
    color: &RgbImage,
    range: &RangeImage,
    params: &DetectorParams,
) -> Result<FrameOutput, DetectError> {
    params.validate()?;

    let color = normalize_color(color);
    let range = normalize_range(range);
    if color.dimensions() != range.dimensions() {
        return Err(DetectError::SizeMismatch {
            color_width: color.width(),
            color_height: color.height(),
            range_width: range.width(),
            range_height: range.height(),
        });
    }

    let smoothed = preblur(&color, &params.segment);
    let hsv = to_hsv(&smoothed);
    let masks = segment(&hsv, &params.thresholds, &params.segment);

    let min_radius = params.min_ball_radius_px as f32;
    let candidates = masks.as_ref().map(|class, mask| {
        let raw = extract_candidates(mask, params.edges.get(class), &params.shape);
        let kept = remove_trash(&raw, min_radius);
        log::debug!("{class}: {} raw candidates, {} kept", raw.len(), kept.len());
        kept
    });

    let view = range_view(&range);
    let calib = &params.calibration;
    let ball_radius_mm = calib.ball_radius_mm();
    let detections = candidates.as_ref().map(|_, kept| {
        kept.iter()
            .map(|c| {
                let pixel = Detection::pixel_from_candidate(c);
                let range_mm =
                    estimate_range(&view, pixel, ball_radius_mm, &calib.range_correction);
                Detection::from_candidate(c, range_mm)
            })
            .collect::<Vec<_>>()
    });

    Ok(FrameOutput {
        detections,
        masks,
        candidates,
        smoothed,
    })
}

/// Reference-frame positions for every detection, index-aligned.
pub fn locate(detections: &BallDetections, params: &DetectorParams) -> PerClass<Vec<Position3D>> {
    detections.as_ref().map(|_, dets| {
        dets.iter()
            .map(|d| project_detection(d, &params.calibration))
            .collect()
    })
}

/// Detector whose parameters can be swapped between frames.
///
/// Every call takes one snapshot of the parameters up front, so a concurrent
/// [`BallDetector::replace_params`] is seen by the next frame, never halfway
/// through the current one.
#[derive(Debug)]
pub struct BallDetector {
    params: RwLock<Arc<DetectorParams>>,
}

impl BallDetector {
    pub fn new(params: DetectorParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            params: RwLock::new(Arc::new(params)),
        })
    }

    /// Current parameter snapshot.
    pub fn params(&self) -> Arc<DetectorParams> {
        self.params
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and install new parameters; the old set stays on error.
    pub fn replace_params(&self, params: DetectorParams) -> Result<(), ParamsError> {
        params.validate()?;
        *self.params.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(params);
        log::info!("detector parameters replaced");
        Ok(())
    }

    pub fn detect(
        &self,
        color: &RgbImage,
        range: &RangeImage,
    ) -> Result<BallDetections, DetectError> {
        let params = self.params();
        detect(color, range, &params)
    }

    pub fn detect_with_diagnostics(
        &self,
        color: &RgbImage,
        range: &RangeImage,
    ) -> Result<(BallDetections, Diagnostics), DetectError> {
        let params = self.params();
        detect_with_diagnostics(color, range, &params)
    }
}
