//! Carousel Render Library
//!
//! Composites a carousel configuration onto a CPU surface with tiny-skia,
//! slices it into slides and packages them for download.

pub mod archive;
pub mod compositor;
pub mod decode;
pub mod encode;
pub mod export;
mod renderer;
pub mod slice;

pub use archive::{ArchivePacker, SlideFile, ZipPacker};
pub use compositor::{Compositor, render};
pub use decode::{decode_image, decode_images};
pub use encode::{JpegEncoder, SlideEncoder};
pub use export::{
    BoxFuture, DownloadSink, ExportError, ExportGate, ExportGuard, ExportOptions, ExportResult,
    Exporter, MemorySink, archive_filename,
};
pub use renderer::{RenderError, RenderResult};
pub use slice::slice_slides;
