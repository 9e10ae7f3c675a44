//! Cutting the composited canvas into slides.

use crate::renderer::{RenderError, RenderResult};
use tiny_skia::{IntRect, Pixmap};

/// Copy out `slide_count` slides of `slide_width` pixels each, left to
/// right. Every slide is an exact pixel copy of its column of the canvas.
pub fn slice_slides(
    canvas: &Pixmap,
    slide_width: u32,
    slide_count: u32,
) -> RenderResult<Vec<Pixmap>> {
    (0..slide_count)
        .map(|index| {
            let out_of_bounds = RenderError::SliceOutOfBounds {
                index,
                canvas_width: canvas.width(),
            };
            let left = index
                .checked_mul(slide_width)
                .and_then(|x| i32::try_from(x).ok())
                .ok_or_else(|| out_of_bounds.clone())?;
            if u64::from(left as u32) + u64::from(slide_width) > u64::from(canvas.width()) {
                return Err(out_of_bounds);
            }
            IntRect::from_xywh(left, 0, slide_width, canvas.height())
                .and_then(|rect| canvas.clone_rect(rect))
                .ok_or(out_of_bounds)
        })
        .collect()
}
