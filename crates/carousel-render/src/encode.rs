//! Slide encoding.

use crate::export::{BoxFuture, ExportError, ExportResult};
use image::ExtendedColorType;
use image::codecs::jpeg;
use tiny_skia::Pixmap;

/// Default JPEG quality (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Trait for slide encoders.
pub trait SlideEncoder {
    /// Encode one slide.
    fn encode<'a>(&'a self, slide: &'a Pixmap) -> BoxFuture<'a, ExportResult<Vec<u8>>>;

    /// File extension for encoded slides, without the dot.
    fn extension(&self) -> &'static str;
}

/// Baseline JPEG encoder.
#[derive(Debug, Clone, Copy)]
pub struct JpegEncoder {
    quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl JpegEncoder {
    /// Create an encoder with the given quality, clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl SlideEncoder for JpegEncoder {
    fn encode<'a>(&'a self, slide: &'a Pixmap) -> BoxFuture<'a, ExportResult<Vec<u8>>> {
        Box::pin(async move {
            let rgb = pixmap_to_rgb(slide);
            let mut bytes = Vec::new();
            jpeg::JpegEncoder::new_with_quality(&mut bytes, self.quality)
                .encode(&rgb, slide.width(), slide.height(), ExtendedColorType::Rgb8)
                .map_err(|e| ExportError::Encode(e.to_string()))?;
            Ok(bytes)
        })
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }
}

/// Drop alpha from premultiplied pixels. Translucent areas come out as if
/// composited over black.
pub fn pixmap_to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
    for px in pixmap.data().chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    #[test]
    fn test_jpeg_roundtrip_dimensions() {
        let mut pixmap = Pixmap::new(64, 32).unwrap();
        pixmap.fill(Color::from_rgba8(20, 120, 220, 255));

        let bytes = pollster::block_on(JpegEncoder::default().encode(&pixmap)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (64, 32));
        let px = decoded.get_pixel(30, 15).0;
        assert!(px[0].abs_diff(20) <= 4 && px[1].abs_diff(120) <= 4 && px[2].abs_diff(220) <= 4);
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(JpegEncoder::new(0).quality(), 1);
        assert_eq!(JpegEncoder::new(250).quality(), 100);
        assert_eq!(JpegEncoder::default().quality(), 95);
    }

    #[test]
    fn test_rgb_flattens_over_black() {
        let mut pixmap = Pixmap::new(1, 1).unwrap();
        pixmap.fill(Color::from_rgba8(255, 255, 255, 0));
        assert_eq!(pixmap_to_rgb(&pixmap), vec![0, 0, 0]);
    }
}
