use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Circle fitted to one contour, before filtering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl Candidate {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Point2::new(x, y),
            radius,
        }
    }

    /// `true` when `other`'s center lies strictly inside this circle.
    #[inline]
    pub fn contains_center_of(&self, other: &Candidate) -> bool {
        nalgebra::distance(&self.center, &other.center) < self.radius
    }
}

/// Finalized ball detection in pixel space with its corrected range.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Pixel center, truncated from the fitted circle center.
    pub center: [i32; 2],
    /// Pixel radius, truncated from the fitted circle radius.
    pub radius: i32,
    /// Corrected range to the ball center in millimeters.
    pub range_mm: i32,
}

impl Detection {
    /// Pixel coordinates used for range lookup and projection.
    pub fn pixel_from_candidate(candidate: &Candidate) -> [i32; 2] {
        [candidate.center.x as i32, candidate.center.y as i32]
    }

    pub fn from_candidate(candidate: &Candidate, range_mm: i32) -> Self {
        Self {
            center: Self::pixel_from_candidate(candidate),
            radius: candidate.radius as i32,
            range_mm,
        }
    }
}

/// 3D point in meters, rounded to millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> nalgebra::Vector3<f32> {
        nalgebra::Vector3::new(self.x, self.y, self.z)
    }
}

impl From<nalgebra::Vector3<f32>> for Position3D {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
