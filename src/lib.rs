#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sprite Mesher
//!
//! Compiles voxel sprites into compact face lists for a renderer.
//!
//! A sprite is a cube of colored voxels stored as a "cube-unrolled" PNG. The
//! mesher decodes it into a voxel volume, finds the voxel faces that border
//! empty space and greedily merges same-colored neighbours into rectangles.
//! World terrain built from many sprites is grouped into chunk-sized volumes
//! and meshed the same way.
//!
//! ## Key Modules
//!
//! * `color` - Packing RGB colors into integer hex triplets
//! * `sprite` - Decoding cube-unrolled images into volumes
//! * `voxels` - Volume storage, visibility and grouping
//! * `meshing` - The greedy face merger and the face lists
//! * `model` - Named models, the world file and terrain chunks
//! * `task_management` - Meshing sprites on worker threads
//! * `compiler` - The end-to-end compile run
//!
//! ## Usage
//!
//! ```
//! use voxel_sprite_mesher::color::Color;
//! use voxel_sprite_mesher::meshing::voxels_to_faces;
//! use voxel_sprite_mesher::voxels::VoxelVolume;
//!
//! let mut volume = VoxelVolume::new(2)?;
//! volume.populate(0, 0, 0, Color::new(255, 0, 0))?;
//! volume.populate(1, 0, 0, Color::new(255, 0, 0))?;
//!
//! let faces = voxels_to_faces(&mut volume);
//! assert_eq!(faces.top_faces.len(), 1);
//! assert_eq!(faces.top_faces[0].width, 2);
//! # Ok::<(), voxel_sprite_mesher::error::MesherError>(())
//! ```

use clap::Parser;
use log::{error, info};

pub mod color;
pub mod compiler;
pub mod config;
pub mod error;
pub mod meshing;
pub mod model;
pub mod sprite;
pub mod task_management;
pub mod voxels;

use compiler::ModelCompiler;
use config::Cli;

/// Command-line entry point: parses flags, compiles and reports.
///
/// Log output goes to stdout and is filtered by `RUST_LOG`.
///
/// # Returns
/// The process exit code.
pub fn run() -> std::process::ExitCode {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let outcome = Cli::parse()
        .into_config()
        .and_then(|config| ModelCompiler::new(config).compile());

    match outcome {
        Ok(report) => {
            info!("Done: {} models, {} faces", report.models, report.faces);
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Compile failed: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
