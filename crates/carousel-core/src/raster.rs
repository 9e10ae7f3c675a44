//! Decoded raster storage with explicit release.
//!
//! Every image in a carousel owns exactly one [`SourceRef`] into the session's
//! [`RasterArena`]. Handles cannot be cloned, so a raster can only be released
//! through the entry that owns it.

use std::collections::HashMap;
use thiserror::Error;

/// Raster errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Raster has zero size: {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("Raster buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// A decoded image: straight (non-premultiplied) RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterData {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RasterData {
    /// Wrap decoded pixels, checking the dimensions against the buffer.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// A raster filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Consume the raster, returning its pixel buffer.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Exclusive handle to a raster stored in a [`RasterArena`].
///
/// Deliberately not `Clone`: the owning image entry is the only holder.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SourceRef(u64);

impl SourceRef {
    /// Numeric key, for logging.
    pub fn key(&self) -> u64 {
        self.0
    }
}

/// Arena of decoded rasters keyed by [`SourceRef`].
#[derive(Debug, Default)]
pub struct RasterArena {
    next_key: u64,
    slots: HashMap<u64, RasterData>,
}

impl RasterArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raster and hand out its owning handle.
    pub fn insert(&mut self, raster: RasterData) -> SourceRef {
        let key = self.next_key;
        self.next_key += 1;
        self.slots.insert(key, raster);
        SourceRef(key)
    }

    /// Look up the raster behind a handle.
    pub fn get(&self, source: &SourceRef) -> Option<&RasterData> {
        self.slots.get(&source.0)
    }

    /// Release a handle, returning the raster it owned.
    pub fn release(&mut self, source: SourceRef) -> Option<RasterData> {
        let released = self.slots.remove(&source.0);
        if released.is_some() {
            log::debug!("Released raster {}", source.0);
        } else {
            log::warn!("Raster {} was already released", source.0);
        }
        released
    }

    /// Number of live rasters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_validation() {
        assert_eq!(
            RasterData::new(0, 10, vec![]),
            Err(RasterError::ZeroSize { width: 0, height: 10 })
        );
        assert!(matches!(
            RasterData::new(2, 2, vec![0; 15]),
            Err(RasterError::BufferSize { expected: 16, actual: 15, .. })
        ));
        assert!(RasterData::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_solid_raster() {
        let raster = RasterData::solid(3, 2, [1, 2, 3, 255]).unwrap();
        assert_eq!(raster.rgba().len(), 24);
        assert_eq!(&raster.rgba()[20..24], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_insert_and_release() {
        let mut arena = RasterArena::new();
        let a = arena.insert(RasterData::solid(1, 1, [0, 0, 0, 255]).unwrap());
        let b = arena.insert(RasterData::solid(2, 1, [0, 0, 0, 255]).unwrap());
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(&b).map(|r| r.width()), Some(2));

        let released = arena.release(a);
        assert_eq!(released.map(|r| r.width()), Some(1));
        assert_eq!(arena.len(), 1);
    }
}
