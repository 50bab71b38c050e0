use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::error::DukeError;

/// A decoded image: contiguous RGB or RGBA bytes in row-major order.
///
/// Format conversion happens at codec boundaries only; the detection and
/// masking layers see pixels through this type.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert!(
            channels == 3 || channels == 4,
            "frames carry 3 (RGB) or 4 (RGBA) channels"
        );
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rejects zero-sized frames, which no detector can scan.
    pub fn ensure_not_empty(&self) -> Result<(), DukeError> {
        if self.is_empty() {
            return Err(DukeError::InvalidInput(format!(
                "frame has zero size ({}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Pixel at `(x, y)`, or `None` when outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels as usize;
        let offset = ((y as usize) * (self.width as usize) + x as usize) * c;
        Some(&self.data[offset..offset + c])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert!(!frame.has_alpha());
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_data_mut_allows_modification() {
        let data = vec![0u8; 6]; // 2x1x3
        let mut frame = Frame::new(data, 2, 1, 3);
        frame.data_mut()[0] = 255;
        assert_eq!(frame.data()[0], 255);
    }

    #[test]
    fn test_clone_is_independent() {
        let data = vec![100u8; 12];
        let frame = Frame::new(data, 2, 2, 3);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3);
    }

    #[test]
    fn test_ensure_not_empty_rejects_zero_width() {
        let frame = Frame::new(Vec::new(), 0, 10, 3);
        assert!(matches!(
            frame.ensure_not_empty(),
            Err(DukeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ensure_not_empty_rejects_zero_height() {
        let frame = Frame::new(Vec::new(), 10, 0, 4);
        assert!(frame.ensure_not_empty().is_err());
    }

    #[test]
    fn test_ensure_not_empty_accepts_single_pixel() {
        let frame = Frame::new(vec![1, 2, 3], 1, 1, 3);
        assert!(frame.ensure_not_empty().is_ok());
    }

    #[test]
    fn test_pixel_lookup() {
        // 2x2 RGBA: pixel (1, 1) is the last four bytes
        let data: Vec<u8> = (0..16).collect();
        let frame = Frame::new(data, 2, 2, 4);
        assert_eq!(frame.pixel(1, 1), Some(&[12u8, 13, 14, 15][..]));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixel(0, 2), None);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let frame = Frame::new(data, 4, 2, 3);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let data = vec![0u8; 12]; // 2x2x3
        let mut frame = Frame::new(data, 2, 2, 3);
        {
            let mut arr = frame.as_ndarray_mut();
            arr[[0, 1, 2]] = 128; // row=0, col=1, B channel
        }
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 128);
        assert_eq!(frame.pixel(1, 0), Some(&[0u8, 0, 128][..]));
    }
}
