//! Flat per-class position message handed to the transport layer.

use ball_detect_core::{project_detection, CalibrationParams, Detection, PerClass};
use serde::{Deserialize, Serialize};

use crate::BallDetections;

/// Positions of one color class as index-aligned arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPositions {
    pub size: u16,
    /// Reference-frame x in millimeters.
    pub x: Vec<i16>,
    /// Reference-frame y in millimeters.
    pub y: Vec<i16>,
    /// Corrected range in millimeters.
    pub distance: Vec<i16>,
}

impl ClassPositions {
    fn from_detections(dets: &[Detection], calib: &CalibrationParams) -> Self {
        let mut out = Self {
            size: u16::try_from(dets.len()).unwrap_or(u16::MAX),
            ..Self::default()
        };
        for det in dets {
            let pos = project_detection(det, calib);
            out.x.push(meters_to_mm(pos.x));
            out.y.push(meters_to_mm(pos.y));
            out.distance.push(clamp_i16(det.range_mm));
        }
        out
    }
}

/// One message per frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallPositionMessage {
    #[serde(flatten)]
    pub classes: PerClass<ClassPositions>,
}

impl BallPositionMessage {
    pub fn from_detections(detections: &BallDetections, calib: &CalibrationParams) -> Self {
        Self {
            classes: detections
                .as_ref()
                .map(|_, dets| ClassPositions::from_detections(dets, calib)),
        }
    }
}

/// Truncate toward zero; out-of-range values saturate.
fn meters_to_mm(v: f32) -> i16 {
    (1000.0 * v) as i16
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_detect_core::{CameraIntrinsics, Extrinsics};

    #[test]
    fn message_arrays_are_index_aligned() {
        let calib = CalibrationParams {
            intrinsics: CameraIntrinsics {
                fx: 1.0,
                fy: 1.0,
                cx: 0.0,
                cy: 0.0,
            },
            extrinsics: Extrinsics {
                rotation: [[0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
                translation: [0.0, 0.0, 0.0],
            },
            ..CalibrationParams::default()
        };
        let mut detections = BallDetections::default();
        detections.red.push(Detection {
            center: [0, 0],
            radius: 20,
            range_mm: 750,
        });
        detections.red.push(Detection {
            center: [0, 0],
            radius: 15,
            range_mm: 1200,
        });

        let msg = BallPositionMessage::from_detections(&detections, &calib);
        assert_eq!(msg.classes.red.size, 2);
        assert_eq!(msg.classes.red.x, vec![750, 1200]);
        assert_eq!(msg.classes.red.y, vec![0, 0]);
        assert_eq!(msg.classes.red.distance, vec![750, 1200]);
        assert_eq!(msg.classes.blue, ClassPositions::default());
    }

    #[test]
    fn conversions_truncate_and_saturate() {
        assert_eq!(meters_to_mm(0.1239), 123);
        assert_eq!(meters_to_mm(-0.1239), -123);
        assert_eq!(meters_to_mm(100.0), i16::MAX);
        assert_eq!(clamp_i16(70_000), i16::MAX);
    }
}
