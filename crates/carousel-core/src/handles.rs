//! Selection handles and preview hit-testing.
//!
//! Handles sit in the selected image's rotated frame. Their offsets and sizes
//! are fixed in screen pixels, so they are divided by the preview zoom before
//! being placed on the canvas.

use crate::config::CarouselConfig;
use crate::image::{CarouselImage, ImageId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Hit radius of a corner handle in screen pixels.
pub const CORNER_HIT_RADIUS: f64 = 10.0;
/// Distance from the top edge to the rotation handle's center, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;
/// Hit radius of the rotation handle in screen pixels.
pub const ROTATE_HIT_RADIUS: f64 = 16.0;
/// Hit radius of the delete button in screen pixels.
pub const DELETE_HIT_RADIUS: f64 = 12.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Resize handle.
    Corner(Corner),
    /// Rotation handle above the top-center.
    Rotate,
    /// Delete button on the top-right corner.
    Delete,
}

/// A selection handle with its canvas position and hit radius.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Hit radius in canvas units.
    pub radius: f64,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, radius: f64, kind: HandleKind) -> Self {
        Self {
            position,
            radius,
            kind,
        }
    }

    /// Check if a canvas point hits this handle.
    pub fn hit_test(&self, point: Point) -> bool {
        (point - self.position).hypot2() <= self.radius * self.radius
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A handle of the selected image.
    Handle(ImageId, HandleKind),
    /// The body of an image.
    Body(ImageId),
    /// Empty canvas.
    Empty,
}

/// Get the handles for an image at the given preview zoom, in hit-test
/// priority order (rotate, delete, corners).
pub fn get_handles(image: &CarouselImage, zoom: f64) -> Vec<Handle> {
    let size = image.display_size();
    let placement = image.placement();
    let px = 1.0 / zoom;
    let at = |x: f64, y: f64| placement * Point::new(x, y);

    vec![
        Handle::new(
            at(size.width / 2.0, -ROTATE_HANDLE_OFFSET * px),
            ROTATE_HIT_RADIUS * px,
            HandleKind::Rotate,
        ),
        Handle::new(at(size.width, 0.0), DELETE_HIT_RADIUS * px, HandleKind::Delete),
        Handle::new(at(0.0, 0.0), CORNER_HIT_RADIUS * px, HandleKind::Corner(Corner::TopLeft)),
        Handle::new(
            at(size.width, 0.0),
            CORNER_HIT_RADIUS * px,
            HandleKind::Corner(Corner::TopRight),
        ),
        Handle::new(
            at(0.0, size.height),
            CORNER_HIT_RADIUS * px,
            HandleKind::Corner(Corner::BottomLeft),
        ),
        Handle::new(
            at(size.width, size.height),
            CORNER_HIT_RADIUS * px,
            HandleKind::Corner(Corner::BottomRight),
        ),
    ]
}

/// Find which handle (if any) of an image is hit at a canvas point.
pub fn hit_test_handles(image: &CarouselImage, point: Point, zoom: f64) -> Option<HandleKind> {
    get_handles(image, zoom)
        .into_iter()
        .find(|handle| handle.hit_test(point))
        .map(|handle| handle.kind)
}

/// Resolve a canvas point to a hit target.
///
/// The selected image's handles win, then image bodies front to back.
pub fn hit_test(
    config: &CarouselConfig,
    selected: Option<ImageId>,
    point: Point,
    zoom: f64,
) -> HitTarget {
    if let Some(image) = selected.and_then(|id| config.image(id)) {
        if let Some(kind) = hit_test_handles(image, point, zoom) {
            return HitTarget::Handle(image.id(), kind);
        }
    }

    config
        .images_ordered()
        .into_iter()
        .rev()
        .find(|image| image.hit_test(point))
        .map_or(HitTarget::Empty, |image| HitTarget::Body(image.id()))
}
