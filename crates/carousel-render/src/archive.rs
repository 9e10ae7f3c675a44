//! Archive packaging.

use crate::export::{BoxFuture, ExportError, ExportResult};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One encoded slide, named relative to the archive folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Trait for archive packers.
pub trait ArchivePacker {
    /// Pack `files` under `folder/` and serialize the archive.
    fn pack<'a>(
        &'a self,
        folder: &'a str,
        files: &'a [SlideFile],
    ) -> BoxFuture<'a, ExportResult<Vec<u8>>>;
}

/// Zip packer. JPEG data does not deflate usefully, so members are stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPacker;

impl ZipPacker {
    pub fn new() -> Self {
        Self
    }

    fn write(folder: &str, files: &[SlideFile]) -> zip::result::ZipResult<Vec<u8>> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        writer.add_directory(format!("{}/", folder), options)?;
        for file in files {
            writer.start_file(format!("{}/{}", folder, file.name), options)?;
            writer.write_all(&file.bytes)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

impl ArchivePacker for ZipPacker {
    fn pack<'a>(
        &'a self,
        folder: &'a str,
        files: &'a [SlideFile],
    ) -> BoxFuture<'a, ExportResult<Vec<u8>>> {
        Box::pin(async move {
            Self::write(folder, files).map_err(|e| ExportError::Archive(e.to_string()))
        })
    }
}
