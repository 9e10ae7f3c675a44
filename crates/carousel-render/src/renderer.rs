//! Render errors.

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The output surface could not be allocated. Fatal for the whole render.
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceUnavailable { width: u32, height: u32 },
    #[error("Slide {index} lies outside the {canvas_width}px canvas")]
    SliceOutOfBounds { index: u32, canvas_width: u32 },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
