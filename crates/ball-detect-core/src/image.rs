/// Borrowed single-channel range raster, row-major, millimeters.
///
/// A value of `0` means the sensor produced no reading at that pixel.
#[derive(Clone, Copy, Debug)]
pub struct RangeImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u16], // row-major, len = w*h
}

impl<'a> RangeImageView<'a> {
    /// Wrap a buffer, returning `None` when `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: &'a [u16]) -> Option<Self> {
        (width.checked_mul(height)? == data.len()).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Value at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u16> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }
}
