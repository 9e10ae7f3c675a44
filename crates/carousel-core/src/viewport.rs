//! Preview viewport: maps between screen and canvas coordinates.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom a fresh preview starts at.
pub const DEFAULT_ZOOM: f64 = 0.25;
/// Step used by the zoom buttons.
pub const ZOOM_STEP: f64 = 0.05;
/// Margin (in screen pixels, summed over both sides) kept around the canvas
/// when fitting.
pub const FIT_MARGIN: f64 = 100.0;
/// Largest zoom auto-fit will choose.
pub const FIT_MAX_ZOOM: f64 = 0.8;
/// Smallest zoom auto-fit will choose.
pub const FIT_MIN_ZOOM: f64 = 0.1;

/// The preview's display transform.
///
/// `zoom` is purely a display scale and never touches image `scale` or
/// `base_scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewViewport {
    /// Screen position of the canvas origin.
    pub offset: Vec2,
    /// Screen pixels per canvas pixel.
    pub zoom: f64,
    /// Minimum allowed manual zoom.
    pub min_zoom: f64,
    /// Maximum allowed manual zoom.
    pub max_zoom: f64,
}

impl Default for PreviewViewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: 0.05,
            max_zoom: 1.5,
        }
    }
}

impl PreviewViewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(self.max_zoom);
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(self.min_zoom);
    }

    /// Zoom percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Fit a canvas into the preview area and center it.
    pub fn fit(&mut self, canvas: Size, area: Size) {
        let zoom_x = (area.width - FIT_MARGIN) / canvas.width;
        let zoom_y = (area.height - FIT_MARGIN) / canvas.height;
        let fitted = zoom_x.min(zoom_y).min(FIT_MAX_ZOOM);
        self.zoom = ((fitted * 100.0).floor() / 100.0).max(FIT_MIN_ZOOM);
        self.center(canvas, area);
    }

    /// Center the canvas in the preview area at the current zoom.
    pub fn center(&mut self, canvas: Size, area: Size) {
        self.offset = Vec2::new(
            (area.width - canvas.width * self.zoom) / 2.0,
            (area.height - canvas.height * self.zoom) / 2.0,
        );
    }
}
