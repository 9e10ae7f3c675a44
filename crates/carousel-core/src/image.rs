//! Image entries and their placement transform.
//!
//! The transform contract shared by the preview and the compositor is:
//! translate to `(x, y)`, rotate by `rotation` degrees (clockwise on a
//! y-down canvas) about that point, then draw at the local origin scaled by
//! `base_scale * scale`.

use crate::raster::SourceRef;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for images.
pub type ImageId = Uuid;

/// Lower bound applied by drag-resizing.
pub const MIN_SCALE: f64 = 0.1;
/// Upper bound of the scale slider.
pub const MAX_SCALE: f64 = 3.0;
/// Fraction of the slide height an image fills when inserted.
pub const INITIAL_HEIGHT_FRACTION: f64 = 0.8;
/// Fraction of the slide height used as the initial top offset.
pub const INITIAL_TOP_FRACTION: f64 = 0.1;

/// An image placed on the carousel canvas.
#[derive(Debug)]
pub struct CarouselImage {
    pub(crate) id: ImageId,
    /// Owning handle to the decoded raster.
    pub(crate) source: SourceRef,
    pub(crate) natural_width: u32,
    pub(crate) natural_height: u32,
    /// Translation of the top-left corner in canvas pixels.
    pub x: f64,
    pub y: f64,
    /// User scale multiplier.
    pub scale: f64,
    pub(crate) base_scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Z-order key, dense from 0.
    pub(crate) order: u32,
}

impl CarouselImage {
    /// Create an image entry with the default placement for a slide of the
    /// given height: 80% of the slide tall, 10% from the top, flush left.
    pub(crate) fn new(
        source: SourceRef,
        natural_width: u32,
        natural_height: u32,
        slide_height: u32,
        order: u32,
    ) -> Self {
        let slide_height = slide_height as f64;
        Self {
            id: Uuid::new_v4(),
            source,
            natural_width,
            natural_height,
            x: 0.0,
            y: slide_height * INITIAL_TOP_FRACTION,
            scale: 1.0,
            base_scale: slide_height * INITIAL_HEIGHT_FRACTION / natural_height as f64,
            rotation: 0.0,
            order,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    /// Combined scale applied to the natural size.
    pub fn effective_scale(&self) -> f64 {
        self.base_scale * self.scale
    }

    /// Drawn size in canvas pixels.
    pub fn display_size(&self) -> Size {
        let k = self.effective_scale();
        Size::new(
            self.natural_width as f64 * k,
            self.natural_height as f64 * k,
        )
    }

    /// Maps the image's natural pixel space onto the canvas.
    pub fn affine(&self) -> Affine {
        self.placement() * Affine::scale(self.effective_scale())
    }

    /// Maps the image's display space (already scaled) onto the canvas.
    pub fn placement(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Corners on the canvas: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let size = self.display_size();
        let placement = self.placement();
        [
            placement * Point::new(0.0, 0.0),
            placement * Point::new(size.width, 0.0),
            placement * Point::new(size.width, size.height),
            placement * Point::new(0.0, size.height),
        ]
    }

    /// Axis-aligned bounding box of the rotated image on the canvas.
    pub fn bounds(&self) -> Rect {
        let size = self.display_size();
        self.placement().transform_rect_bbox(size.to_rect())
    }

    /// Map a canvas point into the image's display space.
    pub fn canvas_to_local(&self, point: Point) -> Point {
        self.placement().inverse() * point
    }

    /// Check if a canvas point lies on the image.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = self.canvas_to_local(point);
        let size = self.display_size();
        local.x >= 0.0 && local.y >= 0.0 && local.x <= size.width && local.y <= size.height
    }

    /// The transform fields the interaction engine works against.
    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            x: self.x,
            y: self.y,
            scale: self.scale,
            rotation: self.rotation,
        }
    }

    /// Apply a partial update. Non-finite values and non-positive scales are
    /// ignored.
    pub fn apply(&mut self, patch: &ImagePatch) {
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        match patch.scale {
            Some(scale) if scale.is_finite() && scale > 0.0 => self.scale = scale,
            Some(scale) => log::warn!("Ignoring invalid scale {} for image {}", scale, self.id),
            None => {}
        }
        if let Some(rotation) = patch.rotation.filter(|v| v.is_finite()) {
            self.rotation = rotation;
        }
    }
}

/// Transform fields captured when an interaction starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
}

/// A partial update to an image's transform. `order`, `base_scale` and the
/// natural size are not editable this way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl ImagePatch {
    /// Patch setting the position.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch setting the scale.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Patch setting the rotation.
    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
