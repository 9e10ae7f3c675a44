//! Carousel configuration: canvas format, layout mode and the image set.

use crate::color::SerializableColor;
use crate::image::{CarouselImage, ImageId};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Upper bound for the manual slide count stepper.
pub const MAX_SLIDES: u32 = 10;

/// Slide count of a fresh configuration.
pub const DEFAULT_SLIDE_COUNT: u32 = 3;

/// Canvas aspect presets. Each maps to the pixel size of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizePreset {
    /// 1080x1080.
    #[default]
    #[serde(rename = "1080x1080")]
    Square,
    /// 1080x1350.
    #[serde(rename = "1080x1350")]
    Portrait,
    /// 1080x566.
    #[serde(rename = "1080x566")]
    Landscape,
}

impl SizePreset {
    /// Slide size in pixels as `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            SizePreset::Square => (1080, 1080),
            SizePreset::Portrait => (1080, 1350),
            SizePreset::Landscape => (1080, 566),
        }
    }

    pub fn width(self) -> u32 {
        self.dimensions().0
    }

    pub fn height(self) -> u32 {
        self.dimensions().1
    }

    /// Get display name for this preset.
    pub fn label(self) -> &'static str {
        match self {
            SizePreset::Square => "Square (1:1)",
            SizePreset::Portrait => "Portrait (4:5)",
            SizePreset::Landscape => "Landscape (1.91:1)",
        }
    }

    /// All presets, in picker order.
    pub fn all() -> &'static [SizePreset] {
        &[SizePreset::Square, SizePreset::Portrait, SizePreset::Landscape]
    }
}

/// Layout mode. A policy selector for the slide count, not a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One slide per image.
    #[default]
    Grid,
    /// Overlapping images, manual slide count.
    Collage,
    /// Panoramas spanning several slides (at least two).
    Split,
    /// Manual placement, manual slide count.
    Freeform,
}

impl Layout {
    /// Get display name for this layout.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Grid => "Grid (Auto-Place)",
            Layout::Collage => "Collage (Layered)",
            Layout::Split => "Panorama (Seamless)",
            Layout::Freeform => "Freeform (Manual)",
        }
    }
}

/// The full carousel description.
#[derive(Debug)]
pub struct CarouselConfig {
    /// Slide format.
    pub size: SizePreset,
    /// Layout policy.
    pub layout: Layout,
    /// Fill color of every slide.
    pub background_color: SerializableColor,
    /// Images in insertion order. `order` decides draw order.
    pub images: Vec<CarouselImage>,
    /// Number of slides, always at least 1.
    pub slide_count: u32,
    /// Spacing between slides in pixels. Stored, never rendered.
    pub gap: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            size: SizePreset::default(),
            layout: Layout::default(),
            background_color: SerializableColor::white(),
            images: Vec::new(),
            slide_count: DEFAULT_SLIDE_COUNT,
            gap: 0,
        }
    }
}

impl CarouselConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of one slide in pixels.
    pub fn slide_width(&self) -> u32 {
        self.size.width()
    }

    /// Height of one slide (and of the whole canvas) in pixels.
    pub fn slide_height(&self) -> u32 {
        self.size.height()
    }

    /// Size of the full multi-slide canvas in pixels, or `None` if the width
    /// does not fit in a `u32`.
    pub fn canvas_pixels(&self) -> Option<(u32, u32)> {
        let width = self.slide_width().checked_mul(self.slide_count)?;
        Some((width, self.slide_height()))
    }

    /// Size of the full canvas as a kurbo size.
    pub fn canvas_size(&self) -> Size {
        Size::new(
            self.slide_width() as f64 * self.slide_count as f64,
            self.slide_height() as f64,
        )
    }

    /// X positions of the boundaries between slides.
    pub fn slide_dividers(&self) -> Vec<f64> {
        let width = self.slide_width() as f64;
        (1..self.slide_count).map(|i| i as f64 * width).collect()
    }

    /// Get an image by ID.
    pub fn image(&self, id: ImageId) -> Option<&CarouselImage> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Get a mutable reference to an image by ID.
    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut CarouselImage> {
        self.images.iter_mut().find(|img| img.id == id)
    }

    /// Images sorted by ascending `order` (back to front).
    pub fn images_ordered(&self) -> Vec<&CarouselImage> {
        let mut sorted: Vec<&CarouselImage> = self.images.iter().collect();
        sorted.sort_by_key(|img| img.order);
        sorted
    }

    /// Image IDs sorted back to front.
    pub fn z_order(&self) -> Vec<ImageId> {
        self.images_ordered().into_iter().map(|img| img.id).collect()
    }

    /// Rewrite `order` so that it follows `z_order` densely from 0.
    pub(crate) fn apply_z_order(&mut self, z_order: &[ImageId]) {
        for (order, id) in z_order.iter().enumerate() {
            if let Some(img) = self.image_mut(*id) {
                img.order = order as u32;
            }
        }
    }

    /// Check the ordering invariant: `order` is a permutation of `0..len`.
    pub fn has_dense_order(&self) -> bool {
        let mut orders: Vec<u32> = self.images.iter().map(|img| img.order).collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, &order)| order == i as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

/// A partial update to the configuration. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub size: Option<SizePreset>,
    pub layout: Option<Layout>,
    pub background_color: Option<SerializableColor>,
    pub slide_count: Option<u32>,
    pub gap: Option<u32>,
}

impl ConfigPatch {
    pub fn size(mut self, size: SizePreset) -> Self {
        self.size = Some(size);
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn background_color(mut self, color: SerializableColor) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn slide_count(mut self, count: u32) -> Self {
        self.slide_count = Some(count);
        self
    }

    pub fn gap(mut self, gap: u32) -> Self {
        self.gap = Some(gap);
        self
    }
}
