//! CPU compositor: draws a carousel configuration onto one wide surface.
//!
//! Every image is drawn with its own transform built from the shared
//! placement contract (see [`CarouselImage::affine`]), so nothing carries
//! over between images.

use crate::renderer::{RenderError, RenderResult};
use carousel_core::{CarouselConfig, CarouselImage, RasterArena, RasterData, SerializableColor};
use kurbo::Affine;
use tiny_skia::{Color, ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

/// Tolerance for treating a transform as a whole-pixel translation.
const ALIGN_EPSILON: f64 = 1e-9;

/// A surface being composited.
pub struct Compositor {
    pixmap: Pixmap,
}

impl Compositor {
    /// Allocate a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: SerializableColor) -> RenderResult<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceUnavailable { width, height })?;
        pixmap.fill(Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            background.a,
        ));
        Ok(Self { pixmap })
    }

    /// Draw a raster whose natural pixel space is mapped onto the surface by
    /// `affine`.
    pub fn draw_layer(&mut self, raster: &RasterData, affine: Affine) {
        let Some(layer) = raster_to_pixmap(raster) else {
            log::warn!(
                "Skipping unusable {}x{} raster",
                raster.width(),
                raster.height()
            );
            return;
        };

        let paint = PixmapPaint {
            quality: filter_quality(affine),
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &paint, to_skia(affine), None);
    }

    /// Draw one carousel image.
    pub fn draw_image(&mut self, image: &CarouselImage, raster: &RasterData) {
        self.draw_layer(raster, image.affine());
    }

    /// The composited surface.
    pub fn finish(self) -> Pixmap {
        self.pixmap
    }
}

/// Composite the whole carousel at full resolution.
///
/// Images are drawn back to front. An image whose raster is missing is
/// skipped with a warning; failing to allocate the surface is fatal.
pub fn render(config: &CarouselConfig, rasters: &RasterArena) -> RenderResult<Pixmap> {
    let (width, height) = config
        .canvas_pixels()
        .ok_or(RenderError::SurfaceUnavailable {
            width: config.slide_width().saturating_mul(config.slide_count),
            height: config.slide_height(),
        })?;
    let mut compositor = Compositor::new(width, height, config.background_color)?;

    for image in config.images_ordered() {
        match rasters.get(image.source()) {
            Some(raster) => compositor.draw_image(image, raster),
            None => log::warn!("Skipping image {}: raster not available", image.id()),
        }
    }

    log::debug!(
        "Composited {} images onto {}x{}",
        config.len(),
        width,
        height
    );
    Ok(compositor.finish())
}

/// Convert straight RGBA into a premultiplied pixmap.
fn raster_to_pixmap(raster: &RasterData) -> Option<Pixmap> {
    let size = IntSize::from_wh(raster.width(), raster.height())?;
    let mut data = Vec::with_capacity(raster.rgba().len());
    for px in raster.rgba().chunks_exact(4) {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

fn to_skia(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Nearest sampling for whole-pixel translations keeps them pixel-exact.
fn filter_quality(affine: Affine) -> FilterQuality {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let near = |v: f64, target: f64| (v - target).abs() < ALIGN_EPSILON;
    let aligned = near(a, 1.0)
        && near(b, 0.0)
        && near(c, 0.0)
        && near(d, 1.0)
        && near(e, e.round())
        && near(f, f.round());
    if aligned {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    }
}
