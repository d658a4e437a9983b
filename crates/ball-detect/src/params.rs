use ball_detect_core::{CalibrationError, CalibrationParams, PerClass};
use ball_detect_vision::{ColorThresholds, EdgeParams, SegmentParams, ShapeParams, VisionParamError};
use serde::{Deserialize, Serialize};

/// Configuration rejected before it reaches the pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Vision(#[from] VisionParamError),
}

/// Everything one detection call reads. Treated as an immutable snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    #[serde(default)]
    pub thresholds: ColorThresholds,
    #[serde(default)]
    pub segment: SegmentParams,
    #[serde(default = "default_edges")]
    pub edges: PerClass<EdgeParams>,
    #[serde(default)]
    pub shape: ShapeParams,
    /// Minimum tracked ball radius in pixels.
    #[serde(default = "default_min_ball_radius_px")]
    pub min_ball_radius_px: u32,
    #[serde(default)]
    pub calibration: CalibrationParams,
}

fn default_edges() -> PerClass<EdgeParams> {
    PerClass::from_fn(|_| EdgeParams::default())
}

fn default_min_ball_radius_px() -> u32 {
    10
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            thresholds: ColorThresholds::default(),
            segment: SegmentParams::default(),
            edges: default_edges(),
            shape: ShapeParams::default(),
            min_ball_radius_px: default_min_ball_radius_px(),
            calibration: CalibrationParams::default(),
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.calibration.validate()?;
        self.thresholds.validate()?;
        for (_, edges) in self.edges.iter() {
            edges.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(DetectorParams::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "min_ball_radius_px": 6, "calibration": {
            "intrinsics": { "fx": 600.0, "fy": 600.0, "cx": 320.0, "cy": 240.0 },
            "ball_radius_m": 0.035
        } }"#;
        let params: DetectorParams = serde_json::from_str(json).expect("parse");
        assert_eq!(params.min_ball_radius_px, 6);
        assert_eq!(params.calibration.ball_radius_mm(), 35);
        assert_eq!(params.thresholds, ColorThresholds::default());
        assert_eq!(params.calibration.range_correction.a, 1.0);
    }

    #[test]
    fn degenerate_calibration_is_a_params_error() {
        let mut params = DetectorParams::default();
        params.calibration.intrinsics.fx = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Calibration(_))
        ));

        let mut params = DetectorParams::default();
        params.edges.blue.ratio = -1.0;
        assert!(matches!(params.validate(), Err(ParamsError::Vision(_))));
    }
}
