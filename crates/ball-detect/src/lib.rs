//! Colored ball detection and localization from a color + range frame pair.
//!
//! This crate provides:
//! - re-exports of the core types (`ball_detect_core`) and raster stages
//!   (`ball_detect_vision`)
//! - the [`detect`] entry point and a [`BallDetector`] whose parameters can be
//!   hot-swapped between frames
//! - the flat [`BallPositionMessage`] and JSON config/report helpers
//!
//! ## Quickstart
//!
//! ```no_run
//! use ball_detect::{detect, load_color, load_range, locate, DetectorParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let color = load_color("color.png")?;
//! let range = load_range("depth.png")?;
//! let params = DetectorParams::default();
//!
//! let detections = detect(&color, &range, &params)?;
//! let positions = locate(&detections, &params);
//! println!("red balls: {}", detections.red.len());
//! for p in &positions.red {
//!     println!("  at ({:.3}, {:.3}, {:.3}) m", p.x, p.y, p.z);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ball_detect::core`: classes, candidates, filter, range and projection.
//! - `ball_detect::vision`: normalization, HSV segmentation, contour circles.
//! - [`detect`] / [`detect_with_diagnostics`]: the full per-frame pipeline.

pub use ball_detect_core as core;
pub use ball_detect_vision as vision;

pub use ball_detect_core::{
    CalibrationParams, Candidate, ColorClass, Detection, PerClass, Position3D,
};
pub use ball_detect_vision::RangeImage;

mod io;
mod message;
mod params;
mod pipeline;

pub use io::{load_color, load_range, DetectIoError, DetectionReport, LocatedBall};
pub use message::{BallPositionMessage, ClassPositions};
pub use params::{DetectorParams, ParamsError};
pub use pipeline::{
    detect, detect_with_diagnostics, locate, BallDetections, BallDetector, DetectError,
    Diagnostics,
};
