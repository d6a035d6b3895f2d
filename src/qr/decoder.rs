//! QR code decoder using rqrr

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// QR code decoder used to read back rendered artifacts
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self {}
    }

    /// Decode the first QR code found in an image
    pub fn decode(&self, img: &DynamicImage) -> Result<String> {
        self.decode_gray(img.to_luma8())
    }

    /// Load an image from disk and decode it
    pub fn decode_file(&self, path: &Path) -> Result<String> {
        let img = image::open(path)?;
        self.decode(&img)
    }

    fn decode_gray(&self, img: GrayImage) -> Result<String> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );
                Ok(content)
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image_has_no_qr() {
        let decoder = QrDecoder::new();
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, image::Luma([255])));
        assert!(matches!(decoder.decode(&blank), Err(Error::NoQrCodeFound)));
    }
}
