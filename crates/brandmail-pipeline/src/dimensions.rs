//! Display dimension extraction
//!
//! Emails embed images at half their native pixel size so they stay sharp
//! on retina displays. The halving is exact round-half-up integer math
//! because the result is echoed verbatim into the width/height attributes
//! of the rendered markup.

use brandmail_core::AppError;
use image::{GenericImageView, ImageReader};
use serde::Serialize;
use std::path::Path;

/// Retina scaling divisor.
const DISPLAY_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayDimensions {
    pub width: u32,
    pub height: u32,
}

/// Divide by the display scale, rounding to nearest (half rounds up).
fn halve(pixels: u32) -> u32 {
    (pixels + DISPLAY_SCALE / 2) / DISPLAY_SCALE
}

/// Decode the image at `path` and return its display dimensions.
///
/// A file that cannot be decoded is a fatal error: it propagates and aborts
/// the whole request rather than producing a silently malformed email.
pub fn display_dimensions(path: &Path) -> Result<DisplayDimensions, AppError> {
    let img = ImageReader::open(path)
        .map_err(|e| {
            AppError::ImageProcessing(format!("Failed to open {}: {}", path.display(), e))
        })?
        .with_guessed_format()
        .map_err(|e| {
            AppError::ImageProcessing(format!("Failed to probe {}: {}", path.display(), e))
        })?
        .decode()
        .map_err(|e| {
            AppError::ImageProcessing(format!("Failed to decode {}: {}", path.display(), e))
        })?;

    let (width, height) = img.dimensions();
    Ok(DisplayDimensions {
        width: halve(width),
        height: halve(height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
        img.save_with_format(path, ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn test_halving_rounds_to_nearest() {
        assert_eq!(halve(101), 51);
        assert_eq!(halve(50), 25);
        assert_eq!(halve(7), 4);
        assert_eq!(halve(1), 1);
        assert_eq!(halve(0), 0);
    }

    #[test]
    fn test_display_dimensions_of_odd_sized_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.jpg");
        write_test_jpeg(&path, 101, 50);

        let dims = display_dimensions(&path).unwrap();
        assert_eq!(dims, DisplayDimensions { width: 51, height: 25 });
    }

    #[test]
    fn test_undecodable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let err = display_dimensions(&path).unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = display_dimensions(Path::new("/no/such/file.jpg")).unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
    }
}
