//! Layout policy: derives the slide count from the layout mode.

use crate::config::{CarouselConfig, Layout};

/// Minimum number of slides a panorama is given when the split layout is
/// selected with fewer than two slides.
pub const SPLIT_DEFAULT_SLIDES: u32 = 3;

/// Recompute the slide count for the current layout.
///
/// - `Grid`: one slide per image, at least one.
/// - `Split`: fewer than two slides becomes three; otherwise unchanged.
/// - `Collage`, `Freeform`: unchanged.
pub fn recalculate(mut config: CarouselConfig) -> CarouselConfig {
    config.slide_count = slide_count_for(&config);
    config
}

/// The slide count [`recalculate`] would settle on.
pub fn slide_count_for(config: &CarouselConfig) -> u32 {
    match config.layout {
        Layout::Grid => (config.images.len() as u32).max(1),
        Layout::Split if config.slide_count < 2 => SPLIT_DEFAULT_SLIDES,
        Layout::Split | Layout::Collage | Layout::Freeform => config.slide_count,
    }
}

/// Grow the slide count after images were inserted so that, in grid mode,
/// every image has its own slide.
pub fn after_insert(mut config: CarouselConfig) -> CarouselConfig {
    if config.layout == Layout::Grid {
        config.slide_count = config.slide_count.max(config.images.len() as u32);
        config = recalculate(config);
    }
    config
}
