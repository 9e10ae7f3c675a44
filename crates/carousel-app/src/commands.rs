//! CLI subcommands.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::project::{ProjectFile, ProjectImage};
use crate::sink::FileSink;
use carousel_core::Session;
use carousel_render::Exporter;
use std::path::{Path, PathBuf};

fn project_dir(project_path: &Path) -> &Path {
    project_path.parent().unwrap_or(Path::new("."))
}

fn load_session(project_path: &Path) -> AppResult<Session> {
    let project = ProjectFile::load(project_path)?;
    project.build_session(project_dir(project_path))
}

/// Export a project into a zip of slides. Returns the archive path.
pub fn export(project_path: &Path, config: &AppConfig) -> AppResult<PathBuf> {
    config.validate()?;
    let session = load_session(project_path)?;

    let exporter = Exporter::new(config.export_options());
    let sink = FileSink::new(&config.output_dir);
    let filename = pollster::block_on(exporter.export_all(&session, &sink))?;
    Ok(sink.path_for(&filename))
}

/// Describe a project.
pub fn info(project_path: &Path) -> AppResult<String> {
    let session = load_session(project_path)?;
    let config = session.config();
    let canvas = match config.canvas_pixels() {
        Some((width, height)) => format!("{}x{} canvas", width, height),
        None => "canvas too large".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!("Size: {}\n", config.size.label()));
    out.push_str(&format!("Layout: {}\n", config.layout.name()));
    out.push_str(&format!("Background: {}\n", config.background_color.to_hex()));
    out.push_str(&format!("Slides: {} ({})\n", config.slide_count, canvas));
    out.push_str(&format!("Images: {}\n", config.len()));
    for image in config.images_ordered() {
        let size = image.display_size();
        out.push_str(&format!(
            "  [{}] {}x{} at ({:.0}, {:.0}), {:.0}x{:.0} shown, {:.1} deg\n",
            image.order(),
            image.natural_width(),
            image.natural_height(),
            image.x,
            image.y,
            size.width,
            size.height,
            image.rotation
        ));
    }
    Ok(out)
}

/// Write a new project listing `images`. Refuses to overwrite.
pub fn init(project_path: &Path, images: Vec<PathBuf>) -> AppResult<()> {
    if project_path.exists() {
        return Err(AppError::config(format!(
            "{} already exists",
            project_path.display()
        )));
    }
    let project = ProjectFile {
        images: images.into_iter().map(ProjectImage::new).collect(),
        ..ProjectFile::default()
    };
    project.save(project_path)
}
