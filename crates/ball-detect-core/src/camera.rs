//! Sensor calibration: pinhole intrinsics, extrinsic transform, range
//! correction and the physical ball radius.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::RangeCorrection;

/// Calibration values that make the pipeline numerically undefined.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("focal lengths must be finite and non-zero (fx={fx}, fy={fy})")]
    DegenerateFocalLength { fx: f32, fy: f32 },
    #[error("principal point must be finite (cx={cx}, cy={cy})")]
    NonFinitePrincipalPoint { cx: f32, cy: f32 },
    #[error("range correction slope must be finite and non-zero (a={a}, b={b})")]
    DegenerateRangeCorrection { a: f32, b: f32 },
    #[error("ball radius must be finite and non-negative (got {0} m)")]
    InvalidBallRadius(f32),
    #[error("extrinsic transform contains non-finite values")]
    NonFiniteExtrinsics,
}

/// Pinhole camera intrinsics in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            fx: 615.0,
            fy: 615.0,
            cx: 320.0,
            cy: 240.0,
        }
    }
}

impl CameraIntrinsics {
    /// Read `fx, fy, cx, cy` from a row-major 3x3 camera matrix.
    pub fn from_matrix(k: &[f32; 9]) -> Self {
        Self {
            fx: k[0],
            fy: k[4],
            cx: k[2],
            cy: k[5],
        }
    }

    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Normalized image coordinates `((x - cx) / fx, (y - cy) / fy)`.
    #[inline]
    pub fn pixel_to_normalized(&self, x: f32, y: f32) -> [f32; 2] {
        [(x - self.cx) / self.fx, (y - self.cy) / self.fy]
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        let ok = |f: f32| f.is_finite() && f != 0.0;
        if !ok(self.fx) || !ok(self.fy) {
            return Err(CalibrationError::DegenerateFocalLength {
                fx: self.fx,
                fy: self.fy,
            });
        }
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(CalibrationError::NonFinitePrincipalPoint {
                cx: self.cx,
                cy: self.cy,
            });
        }
        Ok(())
    }
}

/// Rigid transform from the sensor frame into the reference frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extrinsics {
    /// Row-major rotation matrix.
    pub rotation: [[f32; 3]; 3],
    /// Translation in meters.
    pub translation: [f32; 3],
}

impl Default for Extrinsics {
    fn default() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }
}

impl Extrinsics {
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        let r = &self.rotation;
        Matrix3::new(
            r[0][0], r[0][1], r[0][2], //
            r[1][0], r[1][1], r[1][2], //
            r[2][0], r[2][1], r[2][2],
        )
    }

    pub fn translation_vector(&self) -> Vector3<f32> {
        Vector3::from(self.translation)
    }

    /// `R * p + T`.
    #[inline]
    pub fn apply(&self, p: Vector3<f32>) -> Vector3<f32> {
        self.rotation_matrix() * p + self.translation_vector()
    }

    fn is_finite(&self) -> bool {
        self.rotation.iter().flatten().all(|v| v.is_finite())
            && self.translation.iter().all(|v| v.is_finite())
    }
}

/// Complete calibration snapshot consumed by range estimation and projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationParams {
    pub intrinsics: CameraIntrinsics,
    /// `k1, k2, p1, p2, k3`. Input frames are expected to be undistorted
    /// already, so these are carried but not applied.
    #[serde(default)]
    pub distortion: [f32; 5],
    /// Physical ball radius in meters.
    pub ball_radius_m: f32,
    #[serde(default)]
    pub range_correction: RangeCorrection,
    #[serde(default)]
    pub extrinsics: Extrinsics,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            intrinsics: CameraIntrinsics::default(),
            distortion: [0.0; 5],
            ball_radius_m: 0.05,
            range_correction: RangeCorrection::default(),
            extrinsics: Extrinsics::default(),
        }
    }
}

impl CalibrationParams {
    /// Ball radius in whole millimeters, truncated.
    pub fn ball_radius_mm(&self) -> i32 {
        (self.ball_radius_m * 1000.0) as i32
    }

    /// Reject calibrations that would divide by zero or propagate NaN.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        self.intrinsics.validate()?;
        let RangeCorrection { a, b } = self.range_correction;
        if !a.is_finite() || a == 0.0 || !b.is_finite() {
            return Err(CalibrationError::DegenerateRangeCorrection { a, b });
        }
        if !self.ball_radius_m.is_finite() || self.ball_radius_m < 0.0 {
            return Err(CalibrationError::InvalidBallRadius(self.ball_radius_m));
        }
        if !self.extrinsics.is_finite() {
            return Err(CalibrationError::NonFiniteExtrinsics);
        }
        Ok(())
    }
}
