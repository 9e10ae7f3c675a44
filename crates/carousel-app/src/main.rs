//! carousel: compose multi-slide image carousels from the command line.
//!
//! Usage:
//!   carousel init <PROJECT> [IMAGES...]   Create a project file
//!   carousel info <PROJECT>               Show the resolved layout
//!   carousel export <PROJECT>             Export slides as a zip archive

use std::path::PathBuf;
use std::process::ExitCode;

use carousel_app::{AppConfig, AppResult, commands};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carousel", about = "Compose image carousels and export them as slides", version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project file
    Init {
        /// Path of the project file to create
        project: PathBuf,

        /// Images to include, relative to the project file
        images: Vec<PathBuf>,
    },

    /// Show how a project resolves
    Info {
        /// Path to the project file
        project: PathBuf,
    },

    /// Export a project as a zip of JPEG slides
    Export {
        /// Path to the project file
        project: PathBuf,

        /// CLI config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Folder name inside the archive
        #[arg(long)]
        folder: Option<String>,
    },
}

fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Init { project, images } => {
            commands::init(&project, images)?;
            println!("Created {}", project.display());
        }
        Commands::Info { project } => print!("{}", commands::info(&project)?),
        Commands::Export {
            project,
            config,
            output,
            quality,
            folder,
        } => {
            let mut app_config = match config {
                Some(path) => AppConfig::load(&path)?,
                None => AppConfig::default(),
            };
            if let Some(output) = output {
                app_config.output_dir = output;
            }
            if let Some(quality) = quality {
                app_config.quality = quality;
            }
            if let Some(folder) = folder {
                app_config.folder = folder;
            }
            let archive = commands::export(&project, &app_config)?;
            println!("Exported {}", archive.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
