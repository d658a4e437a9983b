//! JSON parameter files, frame loading and detection reports.

use std::{fs, path::Path};

use ball_detect_core::{Detection, PerClass, Position3D};
use ball_detect_vision::RangeImage;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::{locate, BallDetections, BallPositionMessage, DetectError, DetectorParams};

#[derive(thiserror::Error, Debug)]
pub enum DetectIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl DetectorParams {
    /// Load parameters from a JSON file; missing fields take defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write parameters as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Decode a color frame of any supported format into 8-bit RGB.
pub fn load_color(path: impl AsRef<Path>) -> Result<RgbImage, DetectIoError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Decode a 16-bit single-channel range frame (millimeters).
pub fn load_range(path: impl AsRef<Path>) -> Result<RangeImage, DetectIoError> {
    Ok(image::open(path)?.to_luma16())
}

/// A detection together with its reference-frame position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedBall {
    #[serde(flatten)]
    pub detection: Detection,
    pub position: Position3D,
}

/// Output of one CLI run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub color_path: String,
    pub depth_path: String,
    #[serde(default)]
    pub balls: PerClass<Vec<LocatedBall>>,
    #[serde(default)]
    pub message: BallPositionMessage,
    #[serde(default)]
    pub error: Option<String>,
}

impl DetectionReport {
    pub fn new(color_path: &Path, depth_path: &Path) -> Self {
        Self {
            color_path: color_path.to_string_lossy().into_owned(),
            depth_path: depth_path.to_string_lossy().into_owned(),
            balls: PerClass::default(),
            message: BallPositionMessage::default(),
            error: None,
        }
    }

    /// Populate from a successful detection.
    pub fn set_detections(&mut self, detections: &BallDetections, params: &DetectorParams) {
        let positions = locate(detections, params);
        self.balls = PerClass::from_fn(|class| {
            detections
                .get(class)
                .iter()
                .zip(positions.get(class))
                .map(|(&detection, &position)| LocatedBall {
                    detection,
                    position,
                })
                .collect()
        });
        self.message = BallPositionMessage::from_detections(detections, &params.calibration);
        self.error = None;
    }

    pub fn set_error(&mut self, err: &DetectError) {
        self.error = Some(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_survive_a_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.json");

        let mut params = DetectorParams::default();
        params.min_ball_radius_px = 7;
        params.calibration.range_correction.a = 0.97;
        params.write_json(&path).expect("write");

        let back = DetectorParams::load_json(&path).expect("load");
        assert_eq!(back, params);
    }

    #[test]
    fn report_carries_positions_and_message() {
        let params = DetectorParams::default();
        let mut detections = BallDetections::default();
        detections.green.push(Detection {
            center: [320, 240],
            radius: 25,
            range_mm: 900,
        });

        let mut report = DetectionReport::new(Path::new("c.png"), Path::new("d.png"));
        report.set_detections(&detections, &params);

        assert_eq!(report.balls.green.len(), 1);
        assert_eq!(report.balls.green[0].position, Position3D::new(0.0, 0.0, 0.9));
        assert_eq!(report.message.classes.green.distance, vec![900]);
        assert!(report.balls.red.is_empty());

        let json = serde_json::to_string(&report).expect("serialize");
        let back: DetectionReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, report);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DetectorParams::load_json("/nonexistent/params.json").unwrap_err();
        assert!(matches!(err, DetectIoError::Io(_)));
    }
}
