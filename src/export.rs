use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::error::SketchError;
use crate::surface::Surface;

/// Default JPEG quality (0.92 of max)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Png => "drawing.png",
            Self::Jpeg => "drawing.jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Encode the current raster. The surface itself is never modified.
///
/// Args:
///     surface (&Surface): The raster to encode at its physical size
///     format (ExportFormat): PNG keeps transparency, JPEG is flattened onto white
///     jpeg_quality (u8): Encoder quality, clamped to 1..=100; ignored for PNG
///
/// Returns:
///     Result<Vec<u8>, SketchError>: The encoded file contents
pub fn encode(
    surface: &Surface,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, SketchError> {
    match format {
        ExportFormat::Png => {
            let mut buf = Cursor::new(Vec::new());
            surface.to_rgba_image().write_to(&mut buf, ImageFormat::Png)?;
            Ok(buf.into_inner())
        }
        ExportFormat::Jpeg => {
            let composite = composite_on_white(surface);
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100))
                .encode_image(&composite)?;
            Ok(buf)
        }
    }
}

/// Flatten the raster onto an opaque white buffer of the same physical size
pub fn composite_on_white(surface: &Surface) -> RgbImage {
    let [width, height] = surface.physical_size();
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    // Premultiplied source over white: c + 255 * (1 - a)
    for pixel in surface.pixmap().pixels() {
        let cover = 255 - pixel.alpha();
        data.extend_from_slice(&[
            pixel.red().saturating_add(cover),
            pixel.green().saturating_add(cover),
            pixel.blue().saturating_add(cover),
        ]);
    }
    RgbImage::from_raw(width, height, data).unwrap_or_else(|| {
        let mut blank = RgbImage::new(width, height);
        blank.fill(255);
        blank
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ExportFormat::Png.file_name(), "drawing.png");
        assert_eq!(ExportFormat::Jpeg.file_name(), "drawing.jpg");
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_blank_surface_composites_to_white() {
        let surface = Surface::new(240.0, 240.0, 1.5, 240).unwrap();
        let composite = composite_on_white(&surface);
        assert_eq!(composite.dimensions(), (360, 360));
        assert!(composite.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_composite_leaves_surface_untouched() {
        let mut surface = Surface::new(240.0, 240.0, 1.0, 240).unwrap();
        surface.pixmap_mut().fill(tiny_skia::Color::from_rgba8(10, 20, 30, 128));
        let before = surface.pixmap().data().to_vec();
        let revision = surface.revision();
        let _ = composite_on_white(&surface);
        assert_eq!(surface.pixmap().data(), &before[..]);
        assert_eq!(surface.revision(), revision);
    }
}
