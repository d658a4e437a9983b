//! Core types and policies for colored ball detection.
//!
//! This crate is purely geometric: it knows nothing about image decoding or
//! edge detection. It owns the candidate filter, the adaptive range
//! estimator and the projection of detections into the reference frame.

mod camera;
mod candidate;
mod color;
mod filter;
mod image;
mod project;
mod range;

pub use camera::{CalibrationError, CalibrationParams, CameraIntrinsics, Extrinsics};
pub use candidate::{Candidate, Detection, Position3D};
pub use color::{ColorClass, PerClass};
pub use filter::{collapse_nested, remove_trash};
pub use image::RangeImageView;
pub use project::{
    pixel_radius_to_camera, pixel_to_camera, project_detection, project_detection_by_radius,
    round_mm,
};
pub use range::{
    estimate_range, lookup_range, neighborhood_mean, RangeCorrection, NEAR_RANGE_THRESHOLD_MM,
};
