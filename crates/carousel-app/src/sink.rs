//! Delivering archives to the local filesystem.

use carousel_render::{BoxFuture, DownloadSink, ExportError, ExportResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes delivered archives into a directory, creating it if needed.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a delivered file ends up.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DownloadSink for FileSink {
    fn deliver<'a>(&'a self, filename: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, ExportResult<()>> {
        Box::pin(async move {
            fs::create_dir_all(&self.dir).map_err(|e| {
                ExportError::Sink(format!("Failed to create {}: {}", self.dir.display(), e))
            })?;
            let path = self.path_for(filename);
            fs::write(&path, bytes).map_err(|e| {
                ExportError::Sink(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::debug!("Wrote {}", path.display());
            Ok(())
        })
    }
}
