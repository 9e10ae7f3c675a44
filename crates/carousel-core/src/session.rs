//! Editing session: the configuration, its rasters and the preview state.
//!
//! All external mutation goes through [`Session`]. The session owns every
//! raster handle and releases them when images are deleted or the session is
//! reset.

use crate::config::{CarouselConfig, ConfigPatch, MAX_SLIDES};
use crate::handles::{self, HandleKind, HitTarget};
use crate::image::{CarouselImage, ImageId, ImagePatch};
use crate::input::PointerEvent;
use crate::interaction::Interaction;
use crate::layout;
use crate::raster::{RasterArena, RasterData};
use crate::viewport::PreviewViewport;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Image not found: {0}")]
    ImageNotFound(ImageId),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Layer movement for [`Session::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerDirection {
    /// Topmost.
    Front,
    /// Bottommost.
    Back,
    /// One layer up.
    Forward,
    /// One layer down.
    Backward,
}

/// Runtime editing state (not persisted).
#[derive(Debug, Default)]
pub struct Session {
    config: CarouselConfig,
    rasters: RasterArena,
    selection: Option<ImageId>,
    interaction: Interaction,
    /// Preview display transform.
    pub viewport: PreviewViewport,
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn rasters(&self) -> &RasterArena {
        &self.rasters
    }

    pub fn selection(&self) -> Option<ImageId> {
        self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The selected image, if any.
    pub fn selected_image(&self) -> Option<&CarouselImage> {
        self.selection.and_then(|id| self.config.image(id))
    }

    /// Insert decoded rasters as new images, stacked above the existing ones.
    ///
    /// Returns the new image IDs in input order.
    pub fn add_images(&mut self, rasters: Vec<RasterData>) -> Vec<ImageId> {
        let slide_height = self.config.slide_height();
        let first_order = self.config.images.len() as u32;

        let mut ids = Vec::with_capacity(rasters.len());
        for (index, raster) in rasters.into_iter().enumerate() {
            let (width, height) = (raster.width(), raster.height());
            let source = self.rasters.insert(raster);
            let image =
                CarouselImage::new(source, width, height, slide_height, first_order + index as u32);
            log::debug!(
                "Added image {} ({}x{}, base scale {:.4})",
                image.id(),
                width,
                height,
                image.base_scale()
            );
            ids.push(image.id());
            self.config.images.push(image);
        }

        self.config = layout::after_insert(std::mem::take(&mut self.config));
        ids
    }

    /// Apply a partial configuration update. Changing the layout re-runs the
    /// layout policy.
    pub fn update_config(&mut self, patch: ConfigPatch) {
        let layout_changed = patch.layout.is_some_and(|layout| layout != self.config.layout);

        if let Some(size) = patch.size {
            self.config.size = size;
        }
        if let Some(layout) = patch.layout {
            self.config.layout = layout;
        }
        if let Some(color) = patch.background_color {
            self.config.background_color = color;
        }
        if let Some(count) = patch.slide_count {
            self.config.slide_count = count.max(1);
        }
        if let Some(gap) = patch.gap {
            self.config.gap = gap;
        }

        if layout_changed {
            self.config = layout::recalculate(std::mem::take(&mut self.config));
            log::debug!(
                "Layout changed to {:?}, {} slides",
                self.config.layout,
                self.config.slide_count
            );
        }
    }

    /// Step the slide count by `delta`.
    ///
    /// Stepping up caps at `MAX_SLIDES`; stepping down only stops at 1, so a
    /// grid above the cap steps down one slide at a time.
    pub fn step_slide_count(&mut self, delta: i32) {
        let current = self.config.slide_count;
        let magnitude = delta.unsigned_abs();
        self.config.slide_count = match delta.signum() {
            1 => current.saturating_add(magnitude).min(MAX_SLIDES),
            -1 => current.saturating_sub(magnitude).max(1),
            _ => current,
        };
    }

    /// Apply a partial transform update to one image.
    pub fn update_image(&mut self, id: ImageId, patch: ImagePatch) -> SessionResult<()> {
        let image = self
            .config
            .image_mut(id)
            .ok_or(SessionError::ImageNotFound(id))?;
        image.apply(&patch);
        Ok(())
    }

    /// Move an image by whole canvas pixels.
    pub fn nudge(&mut self, id: ImageId, dx: f64, dy: f64) -> SessionResult<()> {
        let image = self.config.image(id).ok_or(SessionError::ImageNotFound(id))?;
        let patch = ImagePatch::position(image.x + dx, image.y + dy);
        self.update_image(id, patch)
    }

    /// Reset an image's user scale to 1.
    pub fn reset_scale(&mut self, id: ImageId) -> SessionResult<()> {
        self.update_image(id, ImagePatch::scale(1.0))
    }

    /// Reset an image's rotation to 0.
    pub fn reset_rotation(&mut self, id: ImageId) -> SessionResult<()> {
        self.update_image(id, ImagePatch::rotation(0.0))
    }

    /// Delete an image and release its raster.
    pub fn delete_image(&mut self, id: ImageId) -> SessionResult<()> {
        let index = self
            .config
            .images
            .iter()
            .position(|img| img.id() == id)
            .ok_or(SessionError::ImageNotFound(id))?;

        let mut z_order = self.config.z_order();
        z_order.retain(|&other| other != id);

        let image = self.config.images.remove(index);
        self.rasters.release(image.source);
        self.config.apply_z_order(&z_order);

        if self.selection == Some(id) {
            self.selection = None;
        }
        if self.interaction.image() == Some(id) {
            self.interaction.end();
        }
        log::debug!("Deleted image {}", id);
        Ok(())
    }

    /// Change an image's layer and renumber all orders densely.
    pub fn reorder(&mut self, id: ImageId, direction: LayerDirection) -> SessionResult<()> {
        let mut z_order = self.config.z_order();
        let pos = z_order
            .iter()
            .position(|&other| other == id)
            .ok_or(SessionError::ImageNotFound(id))?;

        match direction {
            LayerDirection::Front => {
                z_order.remove(pos);
                z_order.push(id);
            }
            LayerDirection::Back => {
                z_order.remove(pos);
                z_order.insert(0, id);
            }
            LayerDirection::Forward => {
                if pos + 1 < z_order.len() {
                    z_order.swap(pos, pos + 1);
                }
            }
            LayerDirection::Backward => {
                if pos > 0 {
                    z_order.swap(pos, pos - 1);
                }
            }
        }

        self.config.apply_z_order(&z_order);
        Ok(())
    }

    /// Release every raster and return to the default configuration.
    pub fn reset(&mut self) {
        let released = self.config.images.len();
        for image in self.config.images.drain(..) {
            self.rasters.release(image.source);
        }
        self.config = CarouselConfig::default();
        self.selection = None;
        self.interaction.end();
        log::info!("Session reset, released {} rasters", released);
    }

    /// Select an image, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ImageId>) {
        self.selection = id.filter(|id| self.config.image(*id).is_some());
    }

    /// Fit the preview to an area of the given screen size.
    pub fn fit_preview(&mut self, area: Size) {
        let canvas = self.config.canvas_size();
        self.viewport.fit(canvas, area);
    }

    /// Resolve a screen point to what it would hit in the preview.
    pub fn hit_test(&self, screen_point: Point) -> HitTarget {
        let point = self.viewport.screen_to_canvas(screen_point);
        handles::hit_test(&self.config, self.selection, point, self.viewport.zoom)
    }

    /// Feed a pointer event to the interaction engine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.interaction.end(),
        }
    }

    fn pointer_down(&mut self, position: Point) {
        // A new press always ends whatever was in progress
        self.interaction.end();

        let (id, kind) = match self.hit_test(position) {
            HitTarget::Empty => {
                self.selection = None;
                return;
            }
            HitTarget::Handle(id, HandleKind::Delete) => {
                if let Err(e) = self.delete_image(id) {
                    log::warn!("Delete from handle failed: {}", e);
                }
                return;
            }
            HitTarget::Handle(id, kind) => (id, Some(kind)),
            HitTarget::Body(id) => (id, None),
        };

        self.selection = Some(id);
        if let Some(image) = self.config.image(id) {
            self.interaction = Interaction::begin(image, kind, position);
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let Some((id, patch)) = self.interaction.update(position, self.viewport.zoom) else {
            return;
        };
        if let Some(image) = self.config.image_mut(id) {
            image.apply(&patch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::handles::{get_handles, Corner};
    use crate::image::TransformSnapshot;
    use kurbo::Vec2;

    fn raster(width: u32, height: u32) -> RasterData {
        RasterData::solid(width, height, [200, 10, 10, 255]).unwrap()
    }

    fn session_with(count: usize) -> (Session, Vec<ImageId>) {
        let mut session = Session::new();
        let ids = session.add_images((0..count).map(|_| raster(100, 100)).collect());
        (session, ids)
    }

    fn orders(session: &Session, ids: &[ImageId]) -> Vec<u32> {
        ids.iter()
            .map(|id| session.config().image(*id).unwrap().order())
            .collect()
    }

    /// Canvas-to-screen identity preview, so screen and canvas points agree.
    fn identity_preview(session: &mut Session) {
        session.viewport.zoom = 1.0;
        session.viewport.offset = Vec2::ZERO;
    }

    #[test]
    fn test_add_images_assigns_defaults() {
        let mut session = Session::new();
        let ids = session.add_images(vec![raster(2000, 1000), raster(500, 500)]);
        assert_eq!(ids.len(), 2);

        let first = session.config().image(ids[0]).unwrap();
        assert_eq!(first.order(), 0);
        assert_eq!(first.x, 0.0);
        assert!((first.y - 108.0).abs() < 1e-9);
        assert!((first.base_scale() - 0.864).abs() < 1e-12);

        let second = session.config().image(ids[1]).unwrap();
        assert_eq!(second.order(), 1);
        assert!((second.base_scale() - 1.728).abs() < 1e-12);

        assert_eq!(session.rasters().len(), 2);
    }

    #[test]
    fn test_grid_insert_gives_each_image_a_slide() {
        let (mut session, _) = session_with(2);
        assert_eq!(session.config().slide_count, 2);
        session.add_images(vec![raster(10, 10); 3]);
        assert_eq!(session.config().slide_count, 5);
    }

    #[test]
    fn test_insert_outside_grid_keeps_slide_count() {
        let mut session = Session::new();
        session.update_config(ConfigPatch::default().layout(Layout::Collage));
        assert_eq!(session.config().slide_count, 3);
        session.add_images(vec![raster(10, 10); 6]);
        assert_eq!(session.config().slide_count, 3);
    }

    #[test]
    fn test_freeform_to_grid_with_five_images() {
        let mut session = Session::new();
        session.update_config(ConfigPatch::default().layout(Layout::Freeform).slide_count(2));
        let ids = session.add_images(vec![raster(100, 50); 5]);
        session.nudge(ids[3], 400.0, -20.0).unwrap();
        session.update_image(ids[1], ImagePatch::rotation(45.0)).unwrap();

        let before: Vec<TransformSnapshot> = ids
            .iter()
            .map(|id| session.config().image(*id).unwrap().snapshot())
            .collect();

        session.update_config(ConfigPatch::default().layout(Layout::Grid));
        assert_eq!(session.config().slide_count, 5);

        let after: Vec<TransformSnapshot> = ids
            .iter()
            .map(|id| session.config().image(*id).unwrap().snapshot())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_layout_policy_only_runs_on_change() {
        let (mut session, _) = session_with(2);
        session.update_config(ConfigPatch::default().slide_count(7));
        // Same layout again: no recalculation
        session.update_config(ConfigPatch::default().layout(Layout::Grid));
        assert_eq!(session.config().slide_count, 7);
    }

    #[test]
    fn test_split_minimum_on_switch() {
        let mut session = Session::new();
        session.update_config(ConfigPatch::default().layout(Layout::Freeform).slide_count(1));
        session.update_config(ConfigPatch::default().layout(Layout::Split));
        assert_eq!(session.config().slide_count, 3);
    }

    #[test]
    fn test_slide_count_never_zero() {
        let mut session = Session::new();
        session.update_config(ConfigPatch::default().slide_count(0));
        assert_eq!(session.config().slide_count, 1);
    }

    #[test]
    fn test_step_slide_count_clamps() {
        let mut session = Session::new();
        for _ in 0..20 {
            session.step_slide_count(1);
        }
        assert_eq!(session.config().slide_count, MAX_SLIDES);
        for _ in 0..20 {
            session.step_slide_count(-1);
        }
        assert_eq!(session.config().slide_count, 1);
    }

    #[test]
    fn test_step_down_from_large_grid() {
        let (mut session, _) = session_with(15);
        assert_eq!(session.config().slide_count, 15);

        session.step_slide_count(-1);
        assert_eq!(session.config().slide_count, 14);

        session.step_slide_count(1);
        assert_eq!(session.config().slide_count, MAX_SLIDES);
    }

    #[test]
    fn test_gap_is_stored() {
        let mut session = Session::new();
        session.update_config(ConfigPatch::default().gap(40));
        assert_eq!(session.config().gap, 40);
        assert_eq!(session.config().canvas_pixels(), Some((3240, 1080)));
    }

    #[test]
    fn test_reorder_back_on_topmost() {
        let (mut session, ids) = session_with(4);
        session.reorder(ids[3], LayerDirection::Back).unwrap();
        assert_eq!(orders(&session, &ids), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_reorder_front() {
        let (mut session, ids) = session_with(4);
        session.reorder(ids[0], LayerDirection::Front).unwrap();
        assert_eq!(orders(&session, &ids), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_reorder_one_step() {
        let (mut session, ids) = session_with(3);
        session.reorder(ids[0], LayerDirection::Forward).unwrap();
        assert_eq!(orders(&session, &ids), vec![1, 0, 2]);
        session.reorder(ids[2], LayerDirection::Backward).unwrap();
        assert_eq!(orders(&session, &ids), vec![2, 0, 1]);

        // Already at the edges: nothing moves
        session.reorder(ids[0], LayerDirection::Forward).unwrap();
        session.reorder(ids[1], LayerDirection::Backward).unwrap();
        assert_eq!(orders(&session, &ids), vec![2, 0, 1]);
    }

    #[test]
    fn test_reorder_unknown_image() {
        let (mut session, _) = session_with(1);
        let missing = uuid::Uuid::new_v4();
        assert_eq!(
            session.reorder(missing, LayerDirection::Front),
            Err(SessionError::ImageNotFound(missing))
        );
    }

    #[test]
    fn test_order_stays_dense() {
        let script: [(usize, Option<LayerDirection>); 8] = [
            (2, Some(LayerDirection::Front)),
            (0, None),
            (1, Some(LayerDirection::Back)),
            (0, Some(LayerDirection::Forward)),
            (2, None),
            (0, Some(LayerDirection::Backward)),
            (1, Some(LayerDirection::Front)),
            (0, None),
        ];

        // Every rotation of the script, forwards and backwards, three times over
        for rotation in 0..script.len() {
            for reversed in [false, true] {
                let mut steps = script;
                steps.rotate_left(rotation);
                if reversed {
                    steps.reverse();
                }

                let (mut session, mut ids) = session_with(5);
                for (index, step) in steps.iter().cycle().take(steps.len() * 3).copied() {
                    let id = ids[index % ids.len()];
                    match step {
                        Some(direction) => session.reorder(id, direction).unwrap(),
                        None => {
                            session.delete_image(id).unwrap();
                            ids.retain(|&other| other != id);
                            ids.extend(session.add_images(vec![raster(10, 10)]));
                        }
                    }
                    assert!(
                        session.config().has_dense_order(),
                        "rotation {rotation}, reversed {reversed}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_delete_releases_and_renumbers() {
        let (mut session, ids) = session_with(3);
        session.select(Some(ids[1]));
        session.delete_image(ids[1]).unwrap();

        assert_eq!(session.rasters().len(), 2);
        assert_eq!(session.selection(), None);
        assert_eq!(orders(&session, &[ids[0], ids[2]]), vec![0, 1]);
        assert_eq!(
            session.delete_image(ids[1]),
            Err(SessionError::ImageNotFound(ids[1]))
        );
    }

    #[test]
    fn test_reset_releases_everything() {
        let (mut session, ids) = session_with(4);
        session.select(Some(ids[0]));
        session.update_config(ConfigPatch::default().layout(Layout::Collage).gap(20));

        session.reset();
        assert!(session.rasters().is_empty());
        assert!(session.config().is_empty());
        assert_eq!(session.selection(), None);
        assert_eq!(session.config().layout, Layout::Grid);
        assert_eq!(session.config().slide_count, 3);
    }

    #[test]
    fn test_nudge_and_resets() {
        let (mut session, ids) = session_with(1);
        session.nudge(ids[0], 1.0, -1.0).unwrap();
        let patch = ImagePatch {
            scale: Some(2.0),
            rotation: Some(33.0),
            ..Default::default()
        };
        session.update_image(ids[0], patch).unwrap();
        session.reset_scale(ids[0]).unwrap();
        session.reset_rotation(ids[0]).unwrap();

        let img = session.config().image(ids[0]).unwrap();
        assert_eq!(img.x, 1.0);
        assert!((img.y - 107.0).abs() < 1e-9);
        assert_eq!(img.scale, 1.0);
        assert_eq!(img.rotation, 0.0);
    }

    #[test]
    fn test_drag_moves_selected_image() {
        let (mut session, ids) = session_with(2);
        identity_preview(&mut session);
        session.viewport.zoom = 0.5;

        // Image 1 is on top and occupies canvas (0,108)..(864,972); at zoom 0.5
        // its screen rect is (0,54)..(432,486)
        session.handle_pointer(PointerEvent::Down { position: Point::new(100.0, 100.0) });
        assert_eq!(session.selection(), Some(ids[1]));
        assert!(matches!(session.interaction(), Interaction::Moving(_)));

        session.handle_pointer(PointerEvent::Move { position: Point::new(110.0, 90.0) });
        session.handle_pointer(PointerEvent::Move { position: Point::new(150.0, 120.0) });
        session.handle_pointer(PointerEvent::Up { position: Point::new(150.0, 120.0) });

        let moved = session.config().image(ids[1]).unwrap();
        assert!((moved.x - 100.0).abs() < 1e-9);
        assert!((moved.y - 148.0).abs() < 1e-9);
        assert!(!session.interaction().is_active());

        // The other image is untouched
        let other = session.config().image(ids[0]).unwrap();
        assert_eq!(other.x, 0.0);

        // Moves after release do nothing
        session.handle_pointer(PointerEvent::Move { position: Point::new(400.0, 400.0) });
        assert!((session.config().image(ids[1]).unwrap().x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_on_empty_canvas_deselects() {
        let (mut session, ids) = session_with(1);
        identity_preview(&mut session);
        session.select(Some(ids[0]));
        session.handle_pointer(PointerEvent::Down { position: Point::new(2000.0, 20.0) });
        assert_eq!(session.selection(), None);
        assert!(!session.interaction().is_active());
    }

    #[test]
    fn test_resize_and_rotate_via_handles() {
        let (mut session, ids) = session_with(1);
        identity_preview(&mut session);
        session.select(Some(ids[0]));

        let handle_at = |session: &Session, kind: HandleKind| {
            let image = session.config().image(ids[0]).unwrap();
            get_handles(image, 1.0)
                .into_iter()
                .find(|h| h.kind == kind)
                .unwrap()
                .position
        };

        let corner = handle_at(&session, HandleKind::Corner(Corner::BottomRight));
        session.handle_pointer(PointerEvent::Down { position: corner });
        assert!(matches!(session.interaction(), Interaction::Resizing(_)));
        session.handle_pointer(PointerEvent::Move { position: corner + Vec2::new(30.0, 20.0) });
        session.handle_pointer(PointerEvent::Leave);
        let scale = session.config().image(ids[0]).unwrap().scale;
        assert!((scale - 1.1).abs() < 1e-12);

        // Handles moved with the resize
        let rotate = handle_at(&session, HandleKind::Rotate);
        session.handle_pointer(PointerEvent::Down { position: rotate });
        assert!(matches!(session.interaction(), Interaction::Rotating(_)));
        session.handle_pointer(PointerEvent::Move { position: rotate + Vec2::new(60.0, 0.0) });
        session.handle_pointer(PointerEvent::Up { position: rotate });
        assert_eq!(session.config().image(ids[0]).unwrap().rotation, 30.0);
    }

    #[test]
    fn test_delete_button_removes_image() {
        let (mut session, ids) = session_with(1);
        identity_preview(&mut session);
        session.select(Some(ids[0]));
        let top_right = session.config().image(ids[0]).unwrap().corners()[1];

        session.handle_pointer(PointerEvent::Down { position: top_right });
        assert!(session.config().is_empty());
        assert!(session.rasters().is_empty());
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let (mut session, _) = session_with(1);
        session.select(Some(uuid::Uuid::new_v4()));
        assert_eq!(session.selection(), None);
    }
}
