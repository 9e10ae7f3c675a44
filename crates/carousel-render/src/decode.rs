//! Decoding source files into rasters.

use carousel_core::{RasterData, RasterError};

/// Decode an encoded image (PNG, JPEG or WebP) into straight RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RasterData, RasterError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| RasterError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    RasterData::new(width, height, decoded.into_raw())
}

/// Decode a batch, skipping (and logging) anything that fails.
pub fn decode_images<'a, I>(sources: I) -> Vec<RasterData>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    sources
        .into_iter()
        .filter_map(|(name, bytes)| match decode_image(bytes) {
            Ok(raster) => Some(raster),
            Err(e) => {
                log::warn!("Skipping {}: {}", name, e);
                None
            }
        })
        .collect()
}
