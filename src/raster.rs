//! The raster handed to the encoder.

use crate::error::{Error, Result};

/// A top-row-first image stored as B,G,R byte triplets.
///
/// Width and height are multiples of 8 and the buffer holds exactly
/// `width * height * 3` bytes. Either side may be zero; the encoder
/// refuses such a raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    bgr: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, bgr: Vec<u8>) -> Result<Self> {
        if width % 8 != 0 || height % 8 != 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if bgr.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: bgr.len(),
            });
        }

        Ok(RasterImage { width, height, bgr })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bgr
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_multiples_of_eight() {
        let raster = RasterImage::new(16, 8, vec![0; 16 * 8 * 3]).unwrap();
        assert_eq!(raster.width(), 16);
        assert_eq!(raster.height(), 8);
        assert_eq!(raster.stride(), 48);
        assert!(!raster.is_empty());
    }

    #[test]
    fn rejects_odd_dimensions() {
        let result = RasterImage::new(10, 8, vec![0; 10 * 8 * 3]);
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { width: 10, height: 8 })
        ));
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let result = RasterImage::new(8, 8, vec![0; 8 * 8 * 3 - 1]);
        assert!(matches!(
            result,
            Err(Error::BufferSizeMismatch { expected: 192, actual: 191 })
        ));
    }

    #[test]
    fn zero_sized_raster_is_representable() {
        let raster = RasterImage::new(0, 8, Vec::new()).unwrap();
        assert!(raster.is_empty());
    }
}
