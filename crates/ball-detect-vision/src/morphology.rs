//! Binary mask cleanup.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

/// Erode with a 3x3 square, then dilate with a larger square.
///
/// Removes speckle noise and closes small holes inside a blob. The dilation
/// square is 9x9, the nearest odd size to an 8x8 element.
pub fn cleanup(mask: &GrayImage) -> GrayImage {
    let eroded = erode(mask, Norm::LInf, 1);
    dilate(&eroded, Norm::LInf, 4)
}

/// One 3x3 dilation pass, used to thicken edge maps.
pub fn thicken(edges: &GrayImage) -> GrayImage {
    dilate(edges, Norm::LInf, 1)
}
