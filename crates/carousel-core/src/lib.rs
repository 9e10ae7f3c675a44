//! Carousel Core Library
//!
//! Platform-agnostic data model, layout policy and interaction engine for
//! composing multi-slide image carousels.

pub mod color;
pub mod config;
pub mod handles;
pub mod image;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod raster;
pub mod session;
pub mod viewport;

pub use color::SerializableColor;
pub use config::{CarouselConfig, ConfigPatch, Layout, SizePreset, MAX_SLIDES};
pub use handles::{Corner, Handle, HandleKind, HitTarget};
pub use image::{CarouselImage, ImageId, ImagePatch, TransformSnapshot};
pub use input::PointerEvent;
pub use interaction::{Grab, Interaction};
pub use layout::recalculate;
pub use raster::{RasterArena, RasterData, RasterError, SourceRef};
pub use session::{LayerDirection, Session, SessionError};
pub use viewport::PreviewViewport;
