//! Back-projection of detections into the reference frame.

use nalgebra::Vector3;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{CalibrationParams, CameraIntrinsics, Detection, Position3D};

/// Round meters to millimeter precision.
#[inline]
pub fn round_mm(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

/// Sensor-frame point from a pixel and its slant range.
///
/// `range_mm` is a straight-line distance, so it is divided by the norm of
/// the ray `(u, v, 1)` to obtain the axial depth before scaling. Each
/// component is rounded to millimeters.
pub fn pixel_to_camera(
    pixel: [i32; 2],
    range_mm: i32,
    intrinsics: &CameraIntrinsics,
) -> Vector3<f32> {
    let [u, v] = intrinsics.pixel_to_normalized(pixel[0] as f32, pixel[1] as f32);
    let zc = 1.0 / (u * u + v * v + 1.0).sqrt() * range_mm as f32 / 1000.0;
    let xc = u * zc;
    let yc = v * zc;
    Vector3::new(round_mm(xc), round_mm(yc), round_mm(zc))
}

/// Position of a detection in the reference frame, in meters.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(calib)))]
pub fn project_detection(detection: &Detection, calib: &CalibrationParams) -> Position3D {
    let camera = pixel_to_camera(detection.center, detection.range_mm, &calib.intrinsics);
    calib.extrinsics.apply(camera).into()
}

/// Sensor-frame point estimated from the apparent pixel radius alone.
///
/// Uses similar triangles on the known ball radius, so it needs no range
/// reading. Returns `None` for a non-positive radius.
pub fn pixel_radius_to_camera(
    pixel: [i32; 2],
    pixel_radius: i32,
    calib: &CalibrationParams,
) -> Option<Vector3<f32>> {
    if pixel_radius <= 0 {
        return None;
    }
    let intr = &calib.intrinsics;
    let [u, v] = intr.pixel_to_normalized(pixel[0] as f32, pixel[1] as f32);
    let zc = intr.fx * calib.ball_radius_m / pixel_radius as f32;
    Some(Vector3::new(round_mm(u * zc), round_mm(v * zc), round_mm(zc)))
}

/// Reference-frame position from the pixel radius, see [`pixel_radius_to_camera`].
pub fn project_detection_by_radius(
    detection: &Detection,
    calib: &CalibrationParams,
) -> Option<Position3D> {
    pixel_radius_to_camera(detection.center, detection.radius, calib)
        .map(|camera| calib.extrinsics.apply(camera).into())
}
