//! Drag interaction state machine.
//!
//! Every update is computed against the snapshot taken when the interaction
//! started, never incrementally, so many small pointer moves cannot drift.

use crate::handles::HandleKind;
use crate::image::{CarouselImage, ImageId, ImagePatch, MIN_SCALE, TransformSnapshot};
use kurbo::{Point, Vec2};

/// Scale change per canvas pixel of `dx + dy` while resizing.
pub const RESIZE_SENSITIVITY: f64 = 0.002;
/// Degrees per screen pixel of horizontal travel while rotating.
pub const ROTATE_SENSITIVITY: f64 = 0.5;

/// State captured when an interaction starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    /// The image being manipulated.
    pub image: ImageId,
    /// Pointer position at pointer-down, in screen coordinates.
    pub start: Point,
    /// Image transform at pointer-down.
    pub snapshot: TransformSnapshot,
}

impl Grab {
    pub fn new(image: &CarouselImage, start: Point) -> Self {
        Self {
            image: image.id(),
            start,
            snapshot: image.snapshot(),
        }
    }

    /// Screen-space pointer travel since the grab started.
    pub fn screen_delta(&self, pointer: Point) -> Vec2 {
        pointer - self.start
    }
}

/// The interaction currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// No pointer interaction.
    #[default]
    Idle,
    /// Dragging an image body.
    Moving(Grab),
    /// Dragging a corner handle.
    Resizing(Grab),
    /// Dragging the rotation handle.
    Rotating(Grab),
}

impl Interaction {
    /// Start the interaction a pointer-down on `handle` (or the body when
    /// `None`) triggers. The delete button starts nothing.
    pub fn begin(image: &CarouselImage, handle: Option<HandleKind>, pointer: Point) -> Self {
        let grab = Grab::new(image, pointer);
        match handle {
            None => Interaction::Moving(grab),
            Some(HandleKind::Corner(_)) => Interaction::Resizing(grab),
            Some(HandleKind::Rotate) => Interaction::Rotating(grab),
            Some(HandleKind::Delete) => Interaction::Idle,
        }
    }

    /// The active grab, if any.
    pub fn grab(&self) -> Option<&Grab> {
        match self {
            Interaction::Idle => None,
            Interaction::Moving(grab)
            | Interaction::Resizing(grab)
            | Interaction::Rotating(grab) => Some(grab),
        }
    }

    /// The image being manipulated, if any.
    pub fn image(&self) -> Option<ImageId> {
        self.grab().map(|grab| grab.image)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }

    /// Return to idle.
    pub fn end(&mut self) {
        *self = Interaction::Idle;
    }

    /// Compute the transform update for a pointer position.
    ///
    /// `zoom` is the preview display scale.
    pub fn update(&self, pointer: Point, zoom: f64) -> Option<(ImageId, ImagePatch)> {
        let grab = self.grab()?;
        let raw = grab.screen_delta(pointer);
        let dx = raw.x / zoom;
        let dy = raw.y / zoom;
        let snap = grab.snapshot;

        let patch = match self {
            Interaction::Idle => return None,
            Interaction::Moving(_) => ImagePatch::position(snap.x + dx, snap.y + dy),
            Interaction::Resizing(_) => {
                // Sum of both axes, not the corner distance
                let delta = dx + dy;
                ImagePatch::scale((snap.scale * (1.0 + delta * RESIZE_SENSITIVITY)).max(MIN_SCALE))
            }
            Interaction::Rotating(_) => {
                ImagePatch::rotation((snap.rotation + raw.x * ROTATE_SENSITIVITY) % 360.0)
            }
        };
        Some((grab.image, patch))
    }
}
