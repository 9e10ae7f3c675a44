//! Carousel App Library
//!
//! Command-line shell around the carousel composer: project files, CLI
//! configuration and delivery of exported archives to disk.

pub mod commands;
pub mod config;
pub mod error;
pub mod project;
pub mod sink;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use project::{ProjectFile, ProjectImage};
pub use sink::FileSink;
