//! Project files: a JSON description of a carousel and its source images.

use crate::error::{AppError, AppResult};
use carousel_core::{
    ConfigPatch, ImagePatch, Layout, RasterData, SerializableColor, Session, SizePreset,
};
use carousel_render::decode_image;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_background() -> String {
    SerializableColor::white().to_hex()
}

/// A carousel project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub size: SizePreset,
    #[serde(default)]
    pub layout: Layout,
    /// CSS color string.
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Explicit slide count, applied after the layout policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_count: Option<u32>,
    #[serde(default)]
    pub gap: u32,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
}

/// An image entry. Paths are relative to the project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl ProjectImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            x: None,
            y: None,
            scale: None,
            rotation: None,
        }
    }

    fn patch(&self) -> ImagePatch {
        ImagePatch {
            x: self.x,
            y: self.y,
            scale: self.scale,
            rotation: self.rotation,
        }
    }
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            size: SizePreset::default(),
            layout: Layout::default(),
            background_color: default_background(),
            slide_count: None,
            gap: 0,
            images: Vec::new(),
        }
    }
}

impl ProjectFile {
    /// Load a project file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        serde_json::from_str(&json).map_err(|e| AppError::json(path, e))
    }

    /// Write the project as pretty JSON.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| AppError::json(path, e))?;
        fs::write(path, json).map_err(|e| AppError::io(path, e))
    }

    /// Build an editing session, resolving image paths against `base_dir`.
    ///
    /// Images that cannot be read or decoded are skipped with a warning.
    pub fn build_session(&self, base_dir: &Path) -> AppResult<Session> {
        let mut session = Session::new();
        session.update_config(
            ConfigPatch::default()
                .size(self.size)
                .layout(self.layout)
                .background_color(SerializableColor::parse_or_white(&self.background_color))
                .gap(self.gap),
        );

        let mut loaded: Vec<(&ProjectImage, RasterData)> = Vec::new();
        for entry in &self.images {
            let path = base_dir.join(&entry.path);
            match read_raster(&path) {
                Ok(raster) => loaded.push((entry, raster)),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        let (entries, rasters): (Vec<_>, Vec<_>) = loaded.into_iter().unzip();
        let ids = session.add_images(rasters);
        for (entry, id) in entries.into_iter().zip(ids) {
            let patch = entry.patch();
            if !patch.is_empty() {
                session.update_image(id, patch)?;
            }
        }

        if let Some(count) = self.slide_count {
            session.update_config(ConfigPatch::default().slide_count(count));
        }

        log::info!(
            "Loaded {} of {} images, {} slides ({})",
            session.config().len(),
            self.images.len(),
            session.config().slide_count,
            session.config().layout.name()
        );
        Ok(session)
    }
}

fn read_raster(path: &Path) -> AppResult<RasterData> {
    let bytes = fs::read(path).map_err(|e| AppError::io(path, e))?;
    decode_image(&bytes).map_err(|e| AppError::decode(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_minimal_project() {
        let project: ProjectFile = serde_json::from_str("{}").unwrap();
        assert_eq!(project, ProjectFile::default());
        assert_eq!(project.background_color, "#FFFFFF");
    }

    #[test]
    fn test_full_project() {
        let json = r##"{
            "size": "1080x1350",
            "layout": "freeform",
            "backgroundColor": "#112233",
            "slideCount": 4,
            "gap": 12,
            "images": [{"path": "a.png", "x": 5.0, "rotation": 15.0}]
        }"##;
        let project: ProjectFile = serde_json::from_str(json).unwrap();
        assert_eq!(project.size, SizePreset::Portrait);
        assert_eq!(project.layout, Layout::Freeform);
        assert_eq!(project.slide_count, Some(4));
        assert_eq!(project.images[0].x, Some(5.0));
        assert_eq!(project.images[0].y, None);
    }

    #[test]
    fn test_build_session() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 100, 50);
        write_png(dir.path(), "b.png", 20, 20);
        fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

        let project = ProjectFile {
            background_color: "#000".to_string(),
            images: vec![
                ProjectImage {
                    x: Some(40.0),
                    rotation: Some(90.0),
                    ..ProjectImage::new("a.png")
                },
                ProjectImage::new("broken.png"),
                ProjectImage::new("missing.png"),
                ProjectImage::new("b.png"),
            ],
            ..ProjectFile::default()
        };

        let session = project.build_session(dir.path()).unwrap();
        let config = session.config();
        assert_eq!(config.len(), 2);
        // Grid gives one slide per loaded image
        assert_eq!(config.slide_count, 2);
        assert_eq!(config.background_color, SerializableColor::black());

        let first = config.images_ordered()[0];
        assert_eq!(first.natural_width(), 100);
        assert_eq!(first.x, 40.0);
        assert_eq!(first.rotation, 90.0);
        assert!((first.y - 108.0).abs() < 1e-9);

        let second = config.images_ordered()[1];
        assert_eq!(second.natural_width(), 20);
        assert_eq!(second.x, 0.0);
    }

    #[test]
    fn test_corrupt_image_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not a png").unwrap();

        let err = read_raster(&path).unwrap_err();
        assert!(matches!(err, AppError::Decode { ref path, .. } if path.ends_with("broken.png")));
        assert!(err.to_string().starts_with("Cannot decode"));
    }

    #[test]
    fn test_explicit_slide_count_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 10, 10);
        let project = ProjectFile {
            slide_count: Some(5),
            images: vec![ProjectImage::new("a.png")],
            ..ProjectFile::default()
        };
        let session = project.build_session(dir.path()).unwrap();
        assert_eq!(session.config().slide_count, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let project = ProjectFile {
            layout: Layout::Split,
            images: vec![ProjectImage::new("pano.jpg")],
            ..ProjectFile::default()
        };
        project.save(&path).unwrap();
        assert_eq!(ProjectFile::load(&path).unwrap(), project);
    }
}
