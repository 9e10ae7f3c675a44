//! Export pipeline: composite, slice, encode, pack and deliver.
//!
//! The encoder, packer and download sink are traits returning boxed futures so
//! that hosts can plug in asynchronous implementations. The bundled ones
//! complete synchronously.

use crate::archive::{ArchivePacker, SlideFile, ZipPacker};
use crate::compositor::render;
use crate::encode::{DEFAULT_JPEG_QUALITY, JpegEncoder, SlideEncoder};
use crate::renderer::RenderError;
use crate::slice::slice_slides;
use carousel_core::{CarouselConfig, RasterArena, Session};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Folder every slide is stored under inside the archive.
pub const DEFAULT_FOLDER: &str = "instagram-carousel";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Archive failed: {0}")]
    Archive(String),
    #[error("Delivery failed: {0}")]
    Sink(String),
    #[error("An export is already running")]
    AlreadyRunning,
    #[error("Nothing to export: add at least one image")]
    NoImages,
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Exporter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Folder name inside the archive.
    pub folder: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            folder: DEFAULT_FOLDER.to_string(),
        }
    }
}

/// Archive file name for an export started at `now`.
pub fn archive_filename(now: DateTime<Utc>) -> String {
    format!("carousel-{}.zip", now.timestamp_millis())
}

/// Single-flight guard for exports.
#[derive(Debug, Default)]
pub struct ExportGate {
    running: AtomicBool,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, failing if an export already holds it.
    pub fn try_acquire(&self) -> ExportResult<ExportGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::AlreadyRunning)?;
        Ok(ExportGuard { gate: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Holds an [`ExportGate`] until dropped.
#[derive(Debug)]
pub struct ExportGuard<'a> {
    gate: &'a ExportGate,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}

/// Trait for delivering a finished archive to the user.
pub trait DownloadSink {
    /// Hand over the archive bytes under the given file name.
    fn deliver<'a>(&'a self, filename: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, ExportResult<()>>;
}

/// In-memory sink for testing and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RwLock<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in delivery order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.read().map(|files| files.clone()).unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn deliver<'a>(&'a self, filename: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, ExportResult<()>> {
        Box::pin(async move {
            let mut files = self
                .files
                .write()
                .map_err(|e| ExportError::Sink(format!("Lock error: {}", e)))?;
            files.push((filename.to_string(), bytes));
            Ok(())
        })
    }
}

/// Turns a carousel into a slide archive.
pub struct Exporter {
    options: ExportOptions,
    encoder: Box<dyn SlideEncoder>,
    packer: Box<dyn ArchivePacker>,
    gate: ExportGate,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl Exporter {
    /// Create an exporter with the JPEG encoder and zip packer.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            encoder: Box::new(JpegEncoder::new(options.quality)),
            packer: Box::new(ZipPacker::new()),
            gate: ExportGate::new(),
            options,
        }
    }

    /// Replace the slide encoder.
    pub fn with_encoder(mut self, encoder: impl SlideEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// Replace the archive packer.
    pub fn with_packer(mut self, packer: impl ArchivePacker + 'static) -> Self {
        self.packer = Box::new(packer);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    /// Build the archive for a configuration.
    pub async fn export(
        &self,
        config: &CarouselConfig,
        rasters: &RasterArena,
    ) -> ExportResult<Vec<u8>> {
        let _guard = self.gate.try_acquire()?;
        self.build_archive(config, rasters).await
    }

    /// Export a session and deliver the archive to `sink`.
    ///
    /// Returns the delivered file name. Nothing is delivered if any step fails.
    pub async fn export_all(
        &self,
        session: &Session,
        sink: &dyn DownloadSink,
    ) -> ExportResult<String> {
        let _guard = self.gate.try_acquire()?;
        if session.config().is_empty() {
            return Err(ExportError::NoImages);
        }

        let archive = self.build_archive(session.config(), session.rasters()).await?;
        let filename = archive_filename(Utc::now());
        let size = archive.len();
        sink.deliver(&filename, archive).await?;

        log::info!("Exported {} ({} bytes)", filename, size);
        Ok(filename)
    }

    async fn build_archive(
        &self,
        config: &CarouselConfig,
        rasters: &RasterArena,
    ) -> ExportResult<Vec<u8>> {
        let canvas = render(config, rasters)?;
        let slides = slice_slides(&canvas, config.slide_width(), config.slide_count)?;
        drop(canvas);

        let mut files = Vec::with_capacity(slides.len());
        for (index, slide) in slides.iter().enumerate() {
            let bytes = self.encoder.encode(slide).await.inspect_err(|e| {
                log::error!("Slide {} failed to encode: {}", index + 1, e);
            })?;
            log::debug!("Encoded slide {} ({} bytes)", index + 1, bytes.len());
            files.push(SlideFile {
                name: format!("slide-{}.{}", index + 1, self.encoder.extension()),
                bytes,
            });
        }

        let archive = self.packer.pack(&self.options.folder, &files).await?;
        log::info!(
            "Packed {} slides into {}/ ({} bytes)",
            files.len(),
            self.options.folder,
            archive.len()
        );
        Ok(archive)
    }
}
