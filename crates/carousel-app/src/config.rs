//! CLI configuration.

use crate::error::{AppError, AppResult};
use carousel_render::ExportOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the command-line shell. Every field may be omitted from a
/// config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Directory archives are written to.
    pub output_dir: PathBuf,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Folder name inside the archive.
    pub folder: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let export = ExportOptions::default();
        Self {
            output_dir: PathBuf::from("."),
            quality: export.quality,
            folder: export.folder,
        }
    }
}

impl AppConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let config: Self = serde_json::from_str(&json).map_err(|e| AppError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(AppError::config(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        if self.folder.is_empty() || self.folder.contains(['/', '\\']) {
            return Err(AppError::config(format!(
                "folder must be a single path component, got {:?}",
                self.folder
            )));
        }
        Ok(())
    }

    /// Exporter settings derived from this config.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            quality: self.quality,
            folder: self.folder.clone(),
        }
    }
}
