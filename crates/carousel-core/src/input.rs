//! Pointer events for unified mouse/touch handling.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A pointer event in preview screen coordinates.
///
/// Touch input maps its first touch point onto the same events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The pointer left the preview area.
    Leave,
}

impl PointerEvent {
    /// Position of the event, if it carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// Whether this event ends any active interaction.
    pub fn ends_interaction(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::Leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let down = PointerEvent::Down { position: Point::new(1.0, 2.0) };
        assert_eq!(down.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_ending_events() {
        assert!(PointerEvent::Leave.ends_interaction());
        assert!(PointerEvent::Up { position: Point::ZERO }.ends_interaction());
        assert!(!PointerEvent::Move { position: Point::ZERO }.ends_interaction());
    }
}
